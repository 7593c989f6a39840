//! User and session records.

use crate::model::ids::UserId;
use serde::{Deserialize, Serialize};

/// Registered account.
///
/// `password` is stored in plain text; this store is a demo persistence
/// layer, not a credential system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Remote backends never echo this back.
    #[serde(default)]
    pub password: String,
}

impl User {
    /// Case-insensitive email comparison used for uniqueness and login.
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}

/// The single "who is logged in" marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
}

/// Result of a successful `register` or `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub user: User,
}
