//! Persistence contracts and backend implementations.
//!
//! # Responsibility
//! - Define the uniform key-value contract every backend implements.
//! - Load and save the whole board document through that contract.
//!
//! # Invariants
//! - Backends store opaque strings; only this module knows the document
//!   is JSON.
//! - A missing document key loads as the empty document.
//! - A present but undecodable document is an error, never silently reset.

pub mod file_repo;
pub mod memory_repo;
pub mod sqlite_repo;

use crate::model::document::{Document, DOCUMENT_KEY};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error shared by all backends.
#[derive(Debug)]
pub enum RepoError {
    Sqlite(rusqlite::Error),
    /// The `kv_entries` database was written by a newer build.
    SchemaTooNew {
        found: u32,
        supported: u32,
    },
    Io(std::io::Error),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "kv store failure: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "kv store schema v{found} is ahead of this build (max v{supported})"
            ),
            Self::Io(err) => write!(f, "storage io failure: {err}"),
            Self::Serialization(err) => write!(f, "document serialization failure: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// String key-value storage, shaped like browser local storage.
pub trait DocumentRepository {
    /// Returns the stored value for `key`, or `None` when absent.
    fn read(&self, key: &str) -> RepoResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> RepoResult<()>;

    /// Short backend label used in log events.
    fn backend_name(&self) -> &'static str;

    /// Loads the full board document.
    fn load_document(&self) -> RepoResult<Document> {
        match self.read(DOCUMENT_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|err| {
                RepoError::InvalidData(format!("document under `{DOCUMENT_KEY}`: {err}"))
            }),
            None => Ok(Document::default()),
        }
    }

    /// Overwrites the full board document.
    fn save_document(&mut self, document: &Document) -> RepoResult<()> {
        let raw = serde_json::to_string(document)?;
        self.write(DOCUMENT_KEY, &raw)
    }
}

impl<R: DocumentRepository + ?Sized> DocumentRepository for Box<R> {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write(key, value)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

pub use file_repo::FileDocumentRepository;
pub use memory_repo::MemoryDocumentRepository;
pub use sqlite_repo::SqliteDocumentRepository;
