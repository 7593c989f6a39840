//! Typed domain model for the task board document.
//!
//! # Responsibility
//! - Define the entities persisted inside the single board document.
//! - Provide id generation and timestamp helpers shared by every entity.
//!
//! # Invariants
//! - Entities reference each other only by id, never by pointer.
//! - Timestamps are Unix epoch milliseconds.
//! - Serialized field names match the camelCase document shape.

pub mod document;
pub mod ids;
pub mod project;
pub mod task;
pub mod user;
