//! Persistence gateway for the full catalog.
//!
//! # Responsibility
//! - Define the narrow load/save contract the catalog depends on.
//! - Provide flat-file JSON and SQLite implementations.
//!
//! # Invariants
//! - `load` on a missing backing store returns an empty list, not an error.
//! - `save` writes the whole sequence; there are no partial updates.
//! - Loaded records have passed `BookRecord` validation.

use crate::model::book::BookRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

mod json;
mod sqlite;

pub use json::JsonFileStore;
pub use sqlite::{SqliteStore, SCHEMA_VERSION};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure while reading or writing the backing store.
#[derive(Debug)]
pub enum PersistenceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Stored content decoded but violates a catalog invariant.
    InvalidData(String),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "malformed catalog file `{}`: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Load/save contract consumed by `Catalog`.
pub trait CatalogStore: Send + Sync {
    /// Short backend label used in log events.
    fn backend(&self) -> &'static str;

    /// Replaces the persisted catalog with `books`.
    fn save(&self, books: &[BookRecord]) -> PersistenceResult<()>;

    /// Reads the persisted catalog; empty when nothing was ever saved.
    fn load(&self) -> PersistenceResult<Vec<BookRecord>>;
}

impl<S: CatalogStore + ?Sized> CatalogStore for Box<S> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn save(&self, books: &[BookRecord]) -> PersistenceResult<()> {
        (**self).save(books)
    }

    fn load(&self) -> PersistenceResult<Vec<BookRecord>> {
        (**self).load()
    }
}

impl<S: CatalogStore + ?Sized> CatalogStore for Arc<S> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn save(&self, books: &[BookRecord]) -> PersistenceResult<()> {
        (**self).save(books)
    }

    fn load(&self) -> PersistenceResult<Vec<BookRecord>> {
        (**self).load()
    }
}
