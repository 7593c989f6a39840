//! Directory-backed repository storing one JSON file per key.
//!
//! # Invariants
//! - Keys map to `<dir>/<key>.json`; keys outside `[A-Za-z0-9_-]` are
//!   rejected so no write escapes the directory.
//! - Writes land in a temporary sibling first and are renamed into place,
//!   so a crash never leaves a half-written document.
//! - A failed write removes its temporary sibling.

use crate::repo::{DocumentRepository, RepoError, RepoResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const FILE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone)]
pub struct FileDocumentRepository {
    dir: PathBuf,
}

impl FileDocumentRepository {
    /// Opens (creating if needed) a repository rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> RepoResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> RepoResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepoError::InvalidData(format!(
                "storage key `{key}` contains unsupported characters"
            )));
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl DocumentRepository for FileDocumentRepository {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> RepoResult<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension(format!("{FILE_EXTENSION}.{TEMP_SUFFIX}"));

        if let Err(err) = replace_with_temp(&temp_path, &path, value) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

fn replace_with_temp(temp_path: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, path)
}
