#![allow(dead_code)]

use bookshelf_core::{BookRecord, CatalogObserver, CatalogStore, PersistenceError, PersistenceResult};
use parking_lot::Mutex;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory store that counts writes and can be told to fail.
#[derive(Default)]
pub struct MemoryStore {
    books: Mutex<Vec<BookRecord>>,
    saves: AtomicUsize,
    fail_save: AtomicBool,
    fail_load: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_books(books: Vec<BookRecord>) -> Arc<Self> {
        let store = Self::default();
        *store.books.lock() = books;
        Arc::new(store)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn persisted(&self) -> Vec<BookRecord> {
        self.books.lock().clone()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }
}

fn injected_failure() -> PersistenceError {
    PersistenceError::Io {
        path: PathBuf::from("memory"),
        source: io::Error::new(io::ErrorKind::Other, "injected failure"),
    }
}

impl CatalogStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn save(&self, books: &[BookRecord]) -> PersistenceResult<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.books.lock() = books.to_vec();
        Ok(())
    }

    fn load(&self) -> PersistenceResult<Vec<BookRecord>> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(injected_failure());
        }
        Ok(self.books.lock().clone())
    }
}

/// Observer that records the ISBN order of every delivered snapshot.
#[derive(Default)]
pub struct SnapshotRecorder {
    deliveries: Mutex<Vec<Vec<String>>>,
}

impl SnapshotRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deliveries(&self) -> Vec<Vec<String>> {
        self.deliveries.lock().clone()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().len()
    }

    pub fn last(&self) -> Option<Vec<String>> {
        self.deliveries.lock().last().cloned()
    }
}

impl CatalogObserver for SnapshotRecorder {
    fn on_catalog_changed(&self, snapshot: &[BookRecord]) {
        self.deliveries
            .lock()
            .push(snapshot.iter().map(|book| book.isbn().to_string()).collect());
    }
}

pub fn book(title: &str, author: &str, isbn: &str, year: i32) -> BookRecord {
    BookRecord::new(title, author, isbn, "Novel", year).expect("fixture book should be valid")
}

pub fn isbns(books: &[BookRecord]) -> Vec<String> {
    books.iter().map(|book| book.isbn().to_string()).collect()
}
