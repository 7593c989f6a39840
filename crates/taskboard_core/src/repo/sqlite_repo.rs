//! SQLite-backed key-value repository.
//!
//! # Responsibility
//! - Persist document keys in the `kv_entries` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The owned connection has migrations applied before first use.
//! - `write` is an upsert; one row per key.

use crate::db::{open_db, open_db_in_memory};
use crate::repo::{DocumentRepository, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

#[derive(Debug)]
pub struct SqliteDocumentRepository {
    conn: Connection,
}

impl SqliteDocumentRepository {
    /// Opens (creating if needed) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Borrows the underlying connection for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DocumentRepository for SqliteDocumentRepository {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
