//! In-memory repository for tests and ephemeral sessions.

use crate::repo::{DocumentRepository, RepoResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentRepository {
    entries: HashMap<String, String>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DocumentRepository for MemoryDocumentRepository {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
