//! One-time demo data population.
//!
//! # Invariants
//! - Seeding happens at most once per repository, guarded by the
//!   `tms_seeded` key, even if the seeded data is later deleted.
//! - Seeding replaces the whole document.
//! - The flag is written before the document, so a failure in between
//!   leaves the repository marked as seeded and never reseeds.

use crate::model::document::{Document, SEEDED_FLAG_KEY};
use crate::model::ids::{new_id, new_token, Clock, EpochMs};
use crate::model::project::Project;
use crate::model::task::{Task, TaskPriority, TaskStatus};
use crate::model::user::{Session, User};
use crate::repo::DocumentRepository;
use crate::service::store::{DocumentStore, StoreResult};
use chrono::DateTime;
use log::info;

pub const DEMO_EMAIL: &str = "demo@task.app";
pub const DEMO_PASSWORD: &str = "demo";

const MS_PER_DAY: i64 = 86_400_000;
const DEMO_CATEGORIES: [&str; 3] = ["Frontend", "Backend", "Design"];
const DEMO_TASKS: [(&str, TaskStatus, TaskPriority, u8); 4] = [
    ("Landing hero", TaskStatus::Backlog, TaskPriority::Medium, 10),
    ("Auth API", TaskStatus::InProgress, TaskPriority::High, 40),
    ("Style guide", TaskStatus::Review, TaskPriority::Low, 80),
    ("Deploy to host", TaskStatus::Done, TaskPriority::Medium, 100),
];

impl<R: DocumentRepository, C: Clock> DocumentStore<R, C> {
    /// Populates demo data unless this repository was seeded before.
    ///
    /// Returns `true` when seeding happened.
    pub fn seed_demo(&mut self) -> StoreResult<bool> {
        if self.repo.read(SEEDED_FLAG_KEY)?.is_some() {
            return Ok(false);
        }

        // Flag first: a failed commit must not leave a repository that seeds
        // again over data written later.
        self.repo.write(SEEDED_FLAG_KEY, "1")?;
        let document = demo_document(self.now());
        self.commit(&document)?;

        info!(
            "event=seed_demo module=store status=ok projects={} tasks={}",
            document.projects.len(),
            document.tasks.len()
        );
        Ok(true)
    }
}

fn demo_document(now: EpochMs) -> Document {
    let user = User {
        id: new_id(),
        name: "Demo User".to_string(),
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
    };
    let project = Project {
        id: new_id(),
        name: "Website Revamp".to_string(),
        description: "New marketing site".to_string(),
        owner: user.id.clone(),
        members: vec![user.id.clone()],
        created_at: now,
        updated_at: now,
    };

    let tasks = DEMO_TASKS
        .iter()
        .enumerate()
        .map(|(index, &(title, status, priority, progress))| {
            let offset_days = 2 + 3 * index as i64;
            Task {
                id: new_id(),
                project_id: project.id.clone(),
                title: title.to_string(),
                description: format!("{title} details"),
                category: DEMO_CATEGORIES[index % DEMO_CATEGORIES.len()].to_string(),
                priority,
                status,
                due_date: format_epoch_date(now + offset_days * MS_PER_DAY),
                progress,
                assignees: vec![user.id.clone()],
                created_by: user.id.clone(),
                created_at: now,
                updated_at: now,
            }
        })
        .collect();

    Document {
        session: Some(Session {
            token: new_token(),
            user_id: user.id.clone(),
        }),
        users: vec![user],
        projects: vec![project],
        tasks,
    }
}

/// Formats epoch milliseconds as a UTC `YYYY-MM-DD` date.
///
/// Timestamps outside chrono's range format as an empty due date.
fn format_epoch_date(epoch_ms: EpochMs) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|moment| moment.date_naive().format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
