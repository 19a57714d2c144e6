//! Catalog search strategies and the multi-criteria filter.
//!
//! # Invariants
//! - Searching never reorders: hits keep catalog order.
//! - Title/author matching is case-insensitive substring; ISBN is exact.
//! - Criteria are trimmed before matching.

use crate::model::book::{BookRecord, ReadingStatus};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Swappable predicate used by `Catalog::search`.
pub trait SearchStrategy: Send + Sync {
    /// Stable identifier for diagnostics and CLI echo.
    fn name(&self) -> &'static str;

    /// Returns whether `book` satisfies `criterion`.
    fn matches(&self, book: &BookRecord, criterion: &str) -> bool;

    /// Returns owned copies of every matching book, in input order.
    fn search(&self, books: &[BookRecord], criterion: &str) -> Vec<BookRecord> {
        books
            .iter()
            .filter(|book| self.matches(book, criterion))
            .cloned()
            .collect()
    }
}

/// Case-insensitive substring match on title.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchByTitle;

/// Case-insensitive substring match on author.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchByAuthor;

/// Exact, case-sensitive match on the normalized ISBN.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchByIsbn;

impl SearchStrategy for SearchByTitle {
    fn name(&self) -> &'static str {
        SearchKey::Title.as_str()
    }

    fn matches(&self, book: &BookRecord, criterion: &str) -> bool {
        contains_ignore_case(book.title(), criterion)
    }
}

impl SearchStrategy for SearchByAuthor {
    fn name(&self) -> &'static str {
        SearchKey::Author.as_str()
    }

    fn matches(&self, book: &BookRecord, criterion: &str) -> bool {
        contains_ignore_case(book.author(), criterion)
    }
}

impl SearchStrategy for SearchByIsbn {
    fn name(&self) -> &'static str {
        SearchKey::Isbn.as_str()
    }

    fn matches(&self, book: &BookRecord, criterion: &str) -> bool {
        book.isbn() == criterion.trim()
    }
}

/// Named selector for the built-in search strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchKey {
    #[default]
    Title,
    Author,
    Isbn,
}

impl SearchKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Isbn => "isbn",
        }
    }

    /// Returns a shareable strategy instance for this key.
    pub fn strategy(self) -> Arc<dyn SearchStrategy> {
        match self {
            Self::Title => Arc::new(SearchByTitle),
            Self::Author => Arc::new(SearchByAuthor),
            Self::Isbn => Arc::new(SearchByIsbn),
        }
    }
}

impl Display for SearchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "isbn" => Ok(Self::Isbn),
            other => Err(format!(
                "unsupported search key `{other}`; expected title|author|isbn"
            )),
        }
    }
}

/// Conjunctive multi-criteria filter.
///
/// Every `None` criterion matches all books; set criteria must all hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedFilter {
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Case-insensitive author substring.
    pub author: Option<String>,
    /// Exact ISBN.
    pub isbn: Option<String>,
    /// Exact genre.
    pub genre: Option<String>,
    pub status: Option<ReadingStatus>,
    /// Inclusive lower bound on publication year.
    pub year_min: Option<i32>,
    /// Inclusive upper bound on publication year.
    pub year_max: Option<i32>,
    /// Unrated books count as 0.
    pub min_rating: Option<u8>,
}

impl AdvancedFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self, book: &BookRecord) -> bool {
        non_blank(&self.title).map_or(true, |title| contains_ignore_case(book.title(), title))
            && non_blank(&self.author)
                .map_or(true, |author| contains_ignore_case(book.author(), author))
            && non_blank(&self.isbn).map_or(true, |isbn| book.isbn() == isbn)
            && non_blank(&self.genre).map_or(true, |genre| book.genre() == genre)
            && self
                .status
                .map_or(true, |status| book.reading_status() == status)
            && self
                .year_min
                .map_or(true, |min| book.publication_year() >= min)
            && self
                .year_max
                .map_or(true, |max| book.publication_year() <= max)
            && self.min_rating.map_or(true, |min| book.rating() >= min)
    }

    /// Returns owned copies of every matching book, in input order.
    pub fn apply(&self, books: &[BookRecord]) -> Vec<BookRecord> {
        books
            .iter()
            .filter(|book| self.matches(book))
            .cloned()
            .collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(needle.trim().to_lowercase().as_str())
}
