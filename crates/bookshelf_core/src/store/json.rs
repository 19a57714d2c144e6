//! Flat-file JSON catalog store.
//!
//! # Invariants
//! - The file holds one pretty-printed JSON array of book records.
//! - Writes go to a sibling temp file that is renamed over the target, so a
//!   failed save never truncates the previous catalog.

use super::{CatalogStore, PersistenceError, PersistenceResult};
use crate::model::book::BookRecord;
use log::{error, info};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// JSON-array file store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(&self, books: &[BookRecord]) -> PersistenceResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(&dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, books).map_err(|source| {
            PersistenceError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl CatalogStore for JsonFileStore {
    fn backend(&self) -> &'static str {
        "json"
    }

    fn save(&self, books: &[BookRecord]) -> PersistenceResult<()> {
        let started_at = Instant::now();
        match self.write_atomically(books) {
            Ok(()) => {
                info!(
                    "event=store_save module=store backend=json status=ok count={} duration_ms={}",
                    books.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store backend=json status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn load(&self) -> PersistenceResult<Vec<BookRecord>> {
        let started_at = Instant::now();
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=store_load module=store backend=json status=ok count=0 missing=true");
                return Ok(Vec::new());
            }
            Err(source) => {
                error!(
                    "event=store_load module=store backend=json status=error error_code=read_failed error={}",
                    source
                );
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let books: Vec<BookRecord> = serde_json::from_str(&raw).map_err(|source| {
            error!(
                "event=store_load module=store backend=json status=error error_code=parse_failed error={}",
                source
            );
            PersistenceError::Json {
                path: self.path.clone(),
                source,
            }
        })?;

        info!(
            "event=store_load module=store backend=json status=ok count={} duration_ms={}",
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileStore;
    use crate::store::{CatalogStore, PersistenceError};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn blank_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(JsonFileStore::new(path).load().unwrap().is_empty());
    }

    #[test]
    fn malformed_file_reports_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"title\": ").unwrap();
        let err = JsonFileStore::new(path).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Json { .. }));
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/catalog.json"));
        store.save(&[]).unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap().trim(), "[]");
    }
}
