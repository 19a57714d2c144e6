//! Catalog ordering strategies.
//!
//! # Invariants
//! - Every strategy sorts stably: equal keys keep their prior relative order.
//! - Sorting twice with the same strategy is a no-op on the second pass.

use crate::model::book::BookRecord;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Swappable ordering applied by the catalog after every insert or replace.
pub trait SortStrategy: Send + Sync {
    /// Stable identifier for diagnostics and CLI echo.
    fn name(&self) -> &'static str;

    /// Reorders `books` in place.
    fn sort(&self, books: &mut [BookRecord]);
}

/// Case-insensitive lexical order on title.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortByTitle;

/// Case-insensitive lexical order on author.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortByAuthor;

/// Ascending publication year.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortByYear;

impl SortStrategy for SortByTitle {
    fn name(&self) -> &'static str {
        SortKey::Title.as_str()
    }

    fn sort(&self, books: &mut [BookRecord]) {
        books.sort_by_cached_key(|book| book.title().to_lowercase());
    }
}

impl SortStrategy for SortByAuthor {
    fn name(&self) -> &'static str {
        SortKey::Author.as_str()
    }

    fn sort(&self, books: &mut [BookRecord]) {
        books.sort_by_cached_key(|book| book.author().to_lowercase());
    }
}

impl SortStrategy for SortByYear {
    fn name(&self) -> &'static str {
        SortKey::Year.as_str()
    }

    fn sort(&self, books: &mut [BookRecord]) {
        books.sort_by_key(BookRecord::publication_year);
    }
}

/// Named selector for the built-in sort strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Title,
    Author,
    Year,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Year => "year",
        }
    }

    /// Returns a shareable strategy instance for this key.
    pub fn strategy(self) -> Arc<dyn SortStrategy> {
        match self {
            Self::Title => Arc::new(SortByTitle),
            Self::Author => Arc::new(SortByAuthor),
            Self::Year => Arc::new(SortByYear),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "year" => Ok(Self::Year),
            other => Err(format!(
                "unsupported sort key `{other}`; expected title|author|year"
            )),
        }
    }
}
