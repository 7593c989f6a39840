//! The aggregate board document.
//!
//! # Invariants
//! - One document holds every entity; it is loaded and saved as a whole.
//! - A missing document is equivalent to `Document::default()`.

use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::user::{Session, User};
use serde::{Deserialize, Serialize};

/// Storage key of the serialized document.
pub const DOCUMENT_KEY: &str = "tms_data";
/// Storage key of the one-time demo seeding guard.
pub const SEEDED_FLAG_KEY: &str = "tms_seeded";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Document {
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == project_id)
    }

    pub fn project_mut(&mut self, project_id: &str) -> Option<&mut Project> {
        self.projects
            .iter_mut()
            .find(|project| project.id == project_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;

    #[test]
    fn empty_object_parses_as_empty_document() {
        let document: Document = serde_json::from_str("{}").unwrap();
        assert_eq!(document, Document::default());
    }

    #[test]
    fn null_session_round_trips_as_null() {
        let json = serde_json::to_value(Document::default()).unwrap();
        assert!(json["session"].is_null());
        assert!(json["users"].as_array().unwrap().is_empty());
    }
}
