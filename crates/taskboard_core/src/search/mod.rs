//! Text matching for user and task queries.
//!
//! # Responsibility
//! - Turn a free-text query into a reusable case-insensitive matcher.
//! - Keep match semantics identical for every list operation.

pub mod matcher;
