//! Project record.
//!
//! # Invariants
//! - `members` never contains duplicates.
//! - `owner` grants access on its own; it does not have to appear in
//!   `members`.

use crate::model::ids::{EpochMs, ProjectId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner: UserId,
    #[serde(default)]
    pub members: Vec<UserId>,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

impl Project {
    /// Returns whether `user_id` owns or belongs to this project.
    pub fn is_accessible_by(&self, user_id: &str) -> bool {
        self.owner == user_id || self.is_member(user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|member| member == user_id)
    }

    /// Appends `user_id` unless already present. Returns whether it was added.
    pub fn add_member(&mut self, user_id: &str) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.members.push(user_id.to_string());
        true
    }
}
