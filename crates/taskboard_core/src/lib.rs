//! Embedded document store for a Kanban task board.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{
    open_remote, open_store, BackendConfig, ConfigError, LoggingConfig, RemoteConfig, StoreConfig,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Document, DOCUMENT_KEY, SEEDED_FLAG_KEY};
pub use model::ids::{Clock, EpochMs, ManualClock, ProjectId, SystemClock, TaskId, UserId};
pub use model::project::Project;
pub use model::task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus, TaskValidationError};
pub use model::user::{AuthGrant, Session, User};
pub use remote::RemoteStore;
pub use repo::{
    DocumentRepository, FileDocumentRepository, MemoryDocumentRepository, RepoError, RepoResult,
    SqliteDocumentRepository,
};
pub use search::matcher::{InvalidQueryError, SearchMode};
pub use service::board_service::{BoardSummary, ColumnCount, DashboardStats, MoveDirection};
pub use service::seed::{DEMO_EMAIL, DEMO_PASSWORD};
pub use service::store::{Deleted, DocumentStore, StoreError, StoreResult, ValidationError};
pub use service::task_service::TaskListQuery;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
