//! Store configuration.
//!
//! # Responsibility
//! - Deserialize backend, search and logging settings from JSON.
//! - Build a ready-to-use `DocumentStore` from those settings.
//! - Build a `RemoteStore` when a remote API is configured.
//!
//! # Invariants
//! - Every field has a default; `{}` is a valid configuration.
//! - Logging is initialized before the backend is opened, so `db_open`
//!   events are captured.

use crate::logging::{default_log_level, init_logging};
use crate::remote::RemoteStore;
use crate::repo::{
    DocumentRepository, FileDocumentRepository, MemoryDocumentRepository, RepoError,
    SqliteDocumentRepository,
};
use crate::search::matcher::SearchMode;
use crate::service::store::{DocumentStore, StoreError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Store type produced from configuration.
pub type ConfiguredStore = DocumentStore<Box<dyn DocumentRepository>>;

/// Remote client produced from configuration; the backend keeps its session.
pub type ConfiguredRemote = RemoteStore<Box<dyn DocumentRepository>>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Logging(String),
    Backend(RepoError),
    Seed(StoreError),
    RemoteNotConfigured,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Backend(err) => write!(f, "failed to open storage backend: {err}"),
            Self::Seed(err) => write!(f, "failed to seed demo data: {err}"),
            Self::RemoteNotConfigured => write!(f, "no `remote` section in config"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Logging(_) | Self::RemoteNotConfigured => None,
            Self::Backend(err) => Some(err),
            Self::Seed(err) => Some(err),
        }
    }
}

/// Persistence backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    #[default]
    Memory,
    File {
        dir: PathBuf,
    },
    Sqlite {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub dir: PathBuf,
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

/// Remote JSON API the board delegates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Prefix for every request path, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    crate::remote::DEFAULT_TIMEOUT.as_millis() as u64
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    pub backend: BackendConfig,
    pub search_mode: SearchMode,
    pub seed_demo: bool,
    pub logging: Option<LoggingConfig>,
    pub remote: Option<RemoteConfig>,
}

impl StoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Opens the configured backend without touching logging or seeding.
    pub fn open_repository(&self) -> Result<Box<dyn DocumentRepository>, ConfigError> {
        let repo: Box<dyn DocumentRepository> = match &self.backend {
            BackendConfig::Memory => Box::new(MemoryDocumentRepository::new()),
            BackendConfig::File { dir } => {
                Box::new(FileDocumentRepository::open(dir).map_err(ConfigError::Backend)?)
            }
            BackendConfig::Sqlite { path } => {
                Box::new(SqliteDocumentRepository::open(path).map_err(ConfigError::Backend)?)
            }
        };
        Ok(repo)
    }
}

/// Builds a store from configuration.
///
/// # Side effects
/// - Initializes process logging when `logging` is set.
/// - Seeds demo data when `seedDemo` is set and the backend was never seeded.
pub fn open_store(config: &StoreConfig) -> Result<ConfiguredStore, ConfigError> {
    init_configured_logging(config)?;

    let repo = config.open_repository()?;
    let mut store = DocumentStore::new(repo).with_search_mode(config.search_mode);
    if config.seed_demo {
        store.seed_demo().map_err(ConfigError::Seed)?;
    }
    Ok(store)
}

/// Builds a remote client whose session is kept in the configured backend.
///
/// `seedDemo` and `searchMode` do not apply; the server owns the data.
pub fn open_remote(config: &StoreConfig) -> Result<ConfiguredRemote, ConfigError> {
    let remote = config
        .remote
        .as_ref()
        .ok_or(ConfigError::RemoteNotConfigured)?;
    init_configured_logging(config)?;

    let repo = config.open_repository()?;
    Ok(RemoteStore::with_timeout(
        remote.base_url.clone(),
        repo,
        Duration::from_millis(remote.timeout_ms),
    ))
}

fn init_configured_logging(config: &StoreConfig) -> Result<(), ConfigError> {
    let Some(logging) = &config.logging else {
        return Ok(());
    };
    let dir = logging.dir.to_str().ok_or_else(|| {
        ConfigError::Logging(format!(
            "log dir `{}` is not valid UTF-8",
            logging.dir.display()
        ))
    })?;
    init_logging(&logging.level, dir).map_err(ConfigError::Logging)
}
