//! Core domain logic for the Bookshelf personal catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod observer;
pub mod store;
pub mod strategy;

pub use catalog::Catalog;
pub use config::{BookshelfConfig, ConfigError, StoreBackend};
pub use logging::{
    default_log_level, init_logging, logging_status, normalize_level, LoggingError, LoggingStatus,
};
pub use model::book::{
    BookRecord, BookValidationError, ReadingStatus, MAX_PUBLICATION_YEAR, MAX_RATING,
    MIN_PUBLICATION_YEAR, MIN_RATING,
};
pub use model::isbn::{is_valid_isbn, normalize_isbn};
pub use observer::{CatalogObserver, ObserverRegistry};
pub use store::{
    CatalogStore, JsonFileStore, PersistenceError, PersistenceResult, SqliteStore,
    SCHEMA_VERSION,
};
pub use strategy::search::{
    AdvancedFilter, SearchByAuthor, SearchByIsbn, SearchByTitle, SearchKey, SearchStrategy,
};
pub use strategy::sort::{SortByAuthor, SortByTitle, SortByYear, SortKey, SortStrategy};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
