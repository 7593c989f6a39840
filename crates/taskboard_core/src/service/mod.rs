//! Board use-case services.
//!
//! # Responsibility
//! - Expose every board operation on one `DocumentStore`.
//! - Keep callers decoupled from the persistence backend.
//!
//! # Invariants
//! - Every operation loads the whole document, validates before mutating,
//!   and writes the whole document back only on success.

pub mod auth_service;
pub mod board_service;
pub mod project_service;
pub mod seed;
pub mod store;
pub mod task_service;
