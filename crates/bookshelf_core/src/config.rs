//! Runtime configuration for catalog sessions.
//!
//! # Responsibility
//! - Resolve the backing file, store backend and logging settings.
//! - Build the configured persistence gateway.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never touches the filesystem.

use crate::logging::{default_log_level, normalize_level};
use crate::store::{CatalogStore, JsonFileStore, SqliteStore};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable overriding the catalog file path.
pub const ENV_DATA_PATH: &str = "BOOKSHELF_DATA_PATH";
/// Environment variable selecting `json` or `sqlite`.
pub const ENV_BACKEND: &str = "BOOKSHELF_BACKEND";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "BOOKSHELF_LOG_LEVEL";
/// Environment variable enabling file logging into a directory.
pub const ENV_LOG_DIR: &str = "BOOKSHELF_LOG_DIR";

const DEFAULT_JSON_FILE: &str = "bookshelf.json";
const DEFAULT_SQLITE_FILE: &str = "bookshelf.sqlite3";

/// Persistence backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Json,
    Sqlite,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    fn default_file_name(self) -> &'static str {
        match self {
            Self::Json => DEFAULT_JSON_FILE,
            Self::Sqlite => DEFAULT_SQLITE_FILE,
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(ConfigError::UnsupportedBackend(other.to_string())),
        }
    }
}

/// Configuration resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedBackend(String),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedBackend(value) => {
                write!(f, "unsupported store backend `{value}`; expected json|sqlite")
            }
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one catalog session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookshelfConfig {
    pub data_path: PathBuf,
    pub backend: StoreBackend,
    pub log_level: &'static str,
    /// `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for BookshelfConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_JSON_FILE),
            backend: StoreBackend::Json,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl BookshelfConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// When no data path is given, the default file name follows the backend
    /// (`bookshelf.json` or `bookshelf.sqlite3`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend = match read(ENV_BACKEND) {
            Some(value) => value.parse::<StoreBackend>()?,
            None => StoreBackend::default(),
        };
        let data_path = read(ENV_DATA_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(backend.default_file_name()));
        let log_level = match read(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value)
                .map_err(|err| ConfigError::InvalidLogLevel(err.to_string()))?,
            None => default_log_level(),
        };
        let log_dir = read(ENV_LOG_DIR).map(PathBuf::from);

        Ok(Self {
            data_path,
            backend,
            log_level,
            log_dir,
        })
    }

    /// Switches backend, following it with the default file name when the
    /// data path was never set explicitly.
    pub fn set_backend(&mut self, backend: StoreBackend) {
        if self.data_path == PathBuf::from(self.backend.default_file_name()) {
            self.data_path = PathBuf::from(backend.default_file_name());
        }
        self.backend = backend;
    }

    /// Builds the persistence gateway for `data_path` and `backend`.
    pub fn open_store(&self) -> Box<dyn CatalogStore> {
        match self.backend {
            StoreBackend::Json => Box::new(JsonFileStore::new(self.data_path.clone())),
            StoreBackend::Sqlite => Box::new(SqliteStore::new(self.data_path.clone())),
        }
    }
}
