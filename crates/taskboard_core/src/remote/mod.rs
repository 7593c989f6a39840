//! Delegation of board operations to a remote JSON API.
//!
//! # Responsibility
//! - Map auth and task operations to one HTTP request each.
//! - Keep the session token in a local `DocumentRepository` and attach it
//!   to every request.
//!
//! # Invariants
//! - A `401` response clears the local session before the error returns.
//! - Requests are never retried.
//! - Tokens and passwords never reach log lines.

mod client;

pub use client::{RemoteStore, DEFAULT_TIMEOUT};
