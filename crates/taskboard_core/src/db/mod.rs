//! SQLite connection setup for the key-value backend.
//!
//! Failures surface as [`RepoError`](crate::repo::RepoError): the
//! `kv_entries` table has no consumer other than
//! [`SqliteDocumentRepository`](crate::repo::SqliteDocumentRepository).
//!
//! # Invariants
//! - The `kv_entries` schema version lives in `PRAGMA user_version`.
//! - A connection is handed out only after its schema is current.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
