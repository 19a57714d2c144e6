//! Thread-safe catalog repository.
//!
//! # Responsibility
//! - Own the ordered book collection and the active sort/search strategies.
//! - Enforce ISBN uniqueness on add, modify and load.
//! - Persist through the injected `CatalogStore` and notify observers.
//!
//! # Invariants
//! - Every operation runs under one mutex; readers never see torn state.
//! - No two stored books share an ISBN (case-insensitive).
//! - After add/modify/load/sort-change the collection is ordered by the active
//!   sort strategy.
//! - Callers only ever receive copies of stored records.
//! - A failed save keeps the in-memory mutation; a failed load changes nothing.

use crate::model::book::BookRecord;
use crate::observer::{CatalogObserver, ObserverRegistry};
use crate::store::{CatalogStore, PersistenceError, PersistenceResult};
use crate::strategy::search::{AdvancedFilter, SearchByTitle, SearchStrategy};
use crate::strategy::sort::{SortByTitle, SortStrategy};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Instant;

struct CatalogState {
    books: Vec<BookRecord>,
    sort: Arc<dyn SortStrategy>,
    search: Arc<dyn SearchStrategy>,
    observers: ObserverRegistry,
}

impl CatalogState {
    fn position_of(&self, isbn: &str) -> Option<usize> {
        self.books.iter().position(|book| book.has_isbn(isbn))
    }

    fn apply_sort(&mut self) {
        self.sort.sort(&mut self.books);
    }

    fn notify(&self) {
        self.observers.notify(&self.books);
    }
}

/// Book catalog shared by every caller of one session.
///
/// Wrap in `Arc` to share across threads; all methods take `&self`.
pub struct Catalog<S: CatalogStore> {
    store: S,
    state: Mutex<CatalogState>,
}

impl<S: CatalogStore> Catalog<S> {
    /// Creates an empty catalog sorted and searched by title.
    ///
    /// Nothing is read from `store` until [`Catalog::load`] is called.
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: Mutex::new(CatalogState {
                books: Vec::new(),
                sort: Arc::new(SortByTitle),
                search: Arc::new(SearchByTitle),
                observers: ObserverRegistry::new(),
            }),
        }
    }

    /// Creates a catalog pre-populated from `store`.
    ///
    /// # Errors
    /// - Propagates store read/parse failures.
    /// - `InvalidData` when the stored catalog repeats an ISBN.
    pub fn open(store: S) -> PersistenceResult<Self> {
        let catalog = Self::new(store);
        catalog.load()?;
        Ok(catalog)
    }

    /// Returns the injected persistence gateway.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Inserts `book` unless its ISBN is already present.
    ///
    /// Returns `Ok(false)` without touching state or storage on a duplicate.
    /// On success the catalog is saved, re-sorted and observers are notified.
    ///
    /// # Errors
    /// Returns the save failure after the insert has been applied in memory.
    pub fn add(&self, book: BookRecord) -> PersistenceResult<bool> {
        let started_at = Instant::now();
        let mut state = self.state.lock();
        if state.position_of(book.isbn()).is_some() {
            info!("event=book_add module=catalog status=rejected reason=duplicate_isbn");
            return Ok(false);
        }

        state.books.push(book);
        self.commit(&mut state, "book_add", true, started_at)?;
        Ok(true)
    }

    /// Removes the stored book with the same ISBN as `book`.
    ///
    /// Returns `Ok(false)` without a save or notification when absent.
    pub fn remove(&self, book: &BookRecord) -> PersistenceResult<bool> {
        let started_at = Instant::now();
        let mut state = self.state.lock();
        let Some(index) = state.position_of(book.isbn()) else {
            info!("event=book_remove module=catalog status=rejected reason=not_found");
            return Ok(false);
        };

        state.books.remove(index);
        self.commit(&mut state, "book_remove", false, started_at)?;
        Ok(true)
    }

    /// Replaces `old` with `new` in place.
    ///
    /// Returns `Ok(false)` when `old` is absent or when `new` reuses the ISBN
    /// of a different stored book. Keeping the same ISBN is allowed.
    pub fn modify(&self, old: &BookRecord, new: BookRecord) -> PersistenceResult<bool> {
        let started_at = Instant::now();
        let mut state = self.state.lock();
        let Some(index) = state.position_of(old.isbn()) else {
            info!("event=book_modify module=catalog status=rejected reason=not_found");
            return Ok(false);
        };

        let collides = state
            .books
            .iter()
            .enumerate()
            .any(|(position, stored)| position != index && stored.has_isbn(new.isbn()));
        if collides {
            info!("event=book_modify module=catalog status=rejected reason=duplicate_isbn");
            return Ok(false);
        }

        state.books[index] = new;
        self.commit(&mut state, "book_modify", true, started_at)?;
        Ok(true)
    }

    /// Runs the active search strategy over the catalog.
    pub fn search(&self, criterion: &str) -> Vec<BookRecord> {
        let state = self.state.lock();
        state.search.search(&state.books, criterion)
    }

    /// Runs a multi-criteria filter over the catalog.
    pub fn filter(&self, filter: &AdvancedFilter) -> Vec<BookRecord> {
        let state = self.state.lock();
        filter.apply(&state.books)
    }

    /// Swaps the ordering, re-sorts immediately and notifies observers.
    pub fn set_sort_strategy(&self, strategy: Arc<dyn SortStrategy>) {
        let mut state = self.state.lock();
        info!(
            "event=sort_strategy_set module=catalog status=ok strategy={}",
            strategy.name()
        );
        state.sort = strategy;
        state.apply_sort();
        state.notify();
    }

    /// Swaps the search behavior used by [`Catalog::search`].
    pub fn set_search_strategy(&self, strategy: Arc<dyn SearchStrategy>) {
        let mut state = self.state.lock();
        info!(
            "event=search_strategy_set module=catalog status=ok strategy={}",
            strategy.name()
        );
        state.search = strategy;
    }

    pub fn sort_strategy_name(&self) -> &'static str {
        self.state.lock().sort.name()
    }

    pub fn search_strategy_name(&self) -> &'static str {
        self.state.lock().search.name()
    }

    /// Returns a copy of the current ordered collection.
    pub fn snapshot(&self) -> Vec<BookRecord> {
        self.state.lock().books.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().books.is_empty()
    }

    /// Looks up one book by ISBN (case-insensitive, trimmed).
    pub fn find_by_isbn(&self, isbn: &str) -> Option<BookRecord> {
        let state = self.state.lock();
        state
            .position_of(isbn)
            .map(|index| state.books[index].clone())
    }

    /// Distinct genres, sorted.
    pub fn genres(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .books
            .iter()
            .map(|book| book.genre().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest publication year, or `None` when empty.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let state = self.state.lock();
        let years = state.books.iter().map(BookRecord::publication_year);
        let min = years.clone().min()?;
        let max = years.max()?;
        Some((min, max))
    }

    /// Writes the current collection to the store.
    pub fn save(&self) -> PersistenceResult<()> {
        let state = self.state.lock();
        self.store.save(&state.books)
    }

    /// Replaces the collection with the store contents and notifies.
    ///
    /// On any failure the in-memory collection is left untouched.
    pub fn load(&self) -> PersistenceResult<()> {
        let started_at = Instant::now();
        let mut state = self.state.lock();
        let loaded = match self.store.load().and_then(ensure_unique_isbns) {
            Ok(books) => books,
            Err(err) => {
                error!(
                    "event=catalog_load module=catalog status=error backend={} duration_ms={} error={}",
                    self.store.backend(),
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        state.books = loaded;
        state.apply_sort();
        state.notify();
        info!(
            "event=catalog_load module=catalog status=ok backend={} total={} duration_ms={}",
            self.store.backend(),
            state.books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Registers `observer` and immediately delivers the current snapshot.
    ///
    /// Returns `false` (and delivers nothing) when already registered.
    pub fn subscribe(&self, observer: Arc<dyn CatalogObserver>) -> bool {
        let mut state = self.state.lock();
        if !state.observers.register(observer.clone()) {
            return false;
        }
        observer.on_catalog_changed(&state.books);
        true
    }

    /// Unregisters `observer`; returns `false` when it was not registered.
    pub fn unsubscribe(&self, observer: &Arc<dyn CatalogObserver>) -> bool {
        self.state.lock().observers.unregister(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.state.lock().observers.len()
    }

    fn commit(
        &self,
        state: &mut CatalogState,
        event: &'static str,
        resort: bool,
        started_at: Instant,
    ) -> PersistenceResult<()> {
        let saved = self.store.save(&state.books);
        if resort {
            state.apply_sort();
        }
        state.notify();

        match saved {
            Ok(()) => {
                info!(
                    "event={} module=catalog status=ok total={} duration_ms={}",
                    event,
                    state.books.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event={} module=catalog status=error error_code=save_failed total={} error={}",
                    event,
                    state.books.len(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn ensure_unique_isbns(books: Vec<BookRecord>) -> PersistenceResult<Vec<BookRecord>> {
    let mut seen = HashSet::with_capacity(books.len());
    for book in &books {
        if !seen.insert(book.isbn().to_ascii_lowercase()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate isbn `{}`",
                book.isbn()
            )));
        }
    }
    Ok(books)
}
