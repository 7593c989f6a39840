//! Kanban board views: column moves, per-project summary and dashboard.
//!
//! # Invariants
//! - Moving past the first or last column is a no-op that does not write.
//! - Summaries are derived on demand and never persisted.

use crate::model::ids::{Clock, ProjectId};
use crate::model::task::{Task, TaskPatch, TaskStatus, MAX_PROGRESS};
use crate::repo::DocumentRepository;
use crate::service::store::{DocumentStore, StoreError, StoreResult};
use crate::service::task_service::{patch_task, sort_by_recent};
use log::{debug, info};

const RECENT_TASK_LIMIT: usize = 5;

/// Direction of a one-column Kanban step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCount {
    pub status: TaskStatus,
    pub count: usize,
}

/// Per-project board statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
    pub project_id: ProjectId,
    /// One entry per column, in `TaskStatus::ORDER`.
    pub columns: Vec<ColumnCount>,
    pub total: usize,
    /// Mean task progress rounded half up; `0` for an empty board.
    pub average_progress: u8,
}

impl BoardSummary {
    pub fn count(&self, status: TaskStatus) -> usize {
        self.columns
            .iter()
            .find(|column| column.status == status)
            .map_or(0, |column| column.count)
    }
}

/// Cross-project statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Tasks in `in_progress` or `review`.
    pub in_flight_tasks: usize,
    /// Most recently updated tasks, newest first.
    pub recent_tasks: Vec<Task>,
}

impl<R: DocumentRepository, C: Clock> DocumentStore<R, C> {
    /// Steps a task one column left or right.
    ///
    /// Returns the task unchanged when it is already in the edge column.
    pub fn move_task(&mut self, task_id: &str, direction: MoveDirection) -> StoreResult<Task> {
        let mut document = self.load()?;
        let current = document
            .task(task_id)
            .cloned()
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;

        let target = match direction {
            MoveDirection::Left => current.status.previous(),
            MoveDirection::Right => current.status.next(),
        };
        let Some(target) = target else {
            debug!(
                "event=task_move module=store status=ok task_id={task_id} moved=false column={}",
                current.status.as_str()
            );
            return Ok(current);
        };

        let now = self.now();
        let task = patch_task(&mut document, task_id, TaskPatch::status(target), now)?;
        Self::touch_project(&mut document, &task.project_id, now);
        self.commit(&document)?;

        info!(
            "event=task_move module=store status=ok task_id={task_id} moved=true from={} to={}",
            current.status.as_str(),
            target.as_str()
        );
        Ok(task)
    }

    pub fn board_summary(&self, project_id: &str) -> StoreResult<BoardSummary> {
        let document = self.load()?;
        if document.project(project_id).is_none() {
            return Err(StoreError::ProjectNotFound(project_id.to_string()));
        }

        let tasks = document
            .tasks
            .iter()
            .filter(|task| task.project_id == project_id)
            .collect::<Vec<_>>();
        let columns = TaskStatus::ORDER
            .iter()
            .map(|&status| ColumnCount {
                status,
                count: tasks.iter().filter(|task| task.status == status).count(),
            })
            .collect();
        let progress_sum = tasks
            .iter()
            .map(|task| u64::from(task.progress.min(MAX_PROGRESS)))
            .sum::<u64>();

        Ok(BoardSummary {
            project_id: project_id.to_string(),
            columns,
            total: tasks.len(),
            average_progress: rounded_average(progress_sum, tasks.len()),
        })
    }

    pub fn dashboard(&self, user_id: &str) -> StoreResult<DashboardStats> {
        let document = self.load()?;
        let project_ids = document
            .projects
            .iter()
            .filter(|project| project.is_accessible_by(user_id))
            .map(|project| project.id.as_str())
            .collect::<Vec<_>>();

        let mut tasks = document
            .tasks
            .iter()
            .filter(|task| project_ids.contains(&task.project_id.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        sort_by_recent(&mut tasks);

        let stats = DashboardStats {
            total_projects: project_ids.len(),
            total_tasks: tasks.len(),
            completed_tasks: tasks
                .iter()
                .filter(|task| task.status == TaskStatus::Done)
                .count(),
            in_flight_tasks: tasks.iter().filter(|task| task.status.is_in_flight()).count(),
            recent_tasks: tasks.into_iter().take(RECENT_TASK_LIMIT).collect(),
        };
        debug!(
            "event=dashboard module=store status=ok user_id={user_id} projects={} tasks={}",
            stats.total_projects, stats.total_tasks
        );
        Ok(stats)
    }
}

fn rounded_average(sum: u64, count: usize) -> u8 {
    if count == 0 {
        return 0;
    }
    let count = count as u64;
    let average = (2 * sum + count) / (2 * count);
    u8::try_from(average).unwrap_or(MAX_PROGRESS)
}
