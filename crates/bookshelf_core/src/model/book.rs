//! Book record domain model.
//!
//! # Responsibility
//! - Define the canonical catalog entry and its reading lifecycle.
//! - Validate every record at construction and deserialization time.
//!
//! # Invariants
//! - Equality and hashing use the ISBN only, compared case-insensitively.
//! - `rating` is 0 unless `reading_status == ReadingStatus::Read`.
//! - A non-zero `rating` is always within `1..=5`.
//! - `publication_year` is within `1000..=2030`.
//! - `title`, `author` and `genre` are stored trimmed and non-empty.

use crate::model::isbn::{is_valid_isbn, normalize_isbn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Earliest accepted publication year.
pub const MIN_PUBLICATION_YEAR: i32 = 1000;
/// Latest accepted publication year.
pub const MAX_PUBLICATION_YEAR: i32 = 2030;
/// Lowest rating a read book can receive.
pub const MIN_RATING: u8 = 1;
/// Highest rating a read book can receive.
pub const MAX_RATING: u8 = 5;

/// Reading progress for one book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    /// Not started yet.
    #[default]
    ToRead,
    /// Currently being read.
    Reading,
    /// Finished; the only status that accepts a rating.
    Read,
}

impl ReadingStatus {
    /// Stable string id used by the wire format and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "to_read",
            Self::Reading => "reading",
            Self::Read => "read",
        }
    }
}

impl Display for ReadingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = BookValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "to_read" => Ok(Self::ToRead),
            "reading" => Ok(Self::Reading),
            "read" => Ok(Self::Read),
            _ => Err(BookValidationError::UnknownReadingStatus(
                value.trim().to_string(),
            )),
        }
    }
}

/// Validation failures for book construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// A required text field is blank.
    EmptyField(&'static str),
    /// ISBN does not match an accepted format.
    InvalidIsbn(String),
    /// Publication year is outside the accepted range.
    PublicationYearOutOfRange(i32),
    /// Rating is outside `1..=5`.
    RatingOutOfRange(u8),
    /// A rating was set while the book is not marked as read.
    RatingRequiresRead(ReadingStatus),
    /// Status text is not one of `to_read|reading|read`.
    UnknownReadingStatus(String),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::InvalidIsbn(value) => write!(
                f,
                "invalid isbn `{value}`: expected 10 digits or 978-/979- followed by 10 digits"
            ),
            Self::PublicationYearOutOfRange(year) => write!(
                f,
                "publication year {year} must be within {MIN_PUBLICATION_YEAR}..={MAX_PUBLICATION_YEAR}"
            ),
            Self::RatingOutOfRange(rating) => write!(
                f,
                "rating {rating} must be within {MIN_RATING}..={MAX_RATING}"
            ),
            Self::RatingRequiresRead(status) => write!(
                f,
                "rating can only be set on books marked as read (current status: {status})"
            ),
            Self::UnknownReadingStatus(value) => write!(
                f,
                "unknown reading status `{value}`; expected to_read|reading|read"
            ),
        }
    }
}

impl Error for BookValidationError {}

/// One catalog entry.
///
/// Fields are private so the status/rating coupling cannot be bypassed;
/// callers read through accessors and mutate through the validated setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BookRecordWire")]
pub struct BookRecord {
    title: String,
    author: String,
    isbn: String,
    genre: String,
    publication_year: i32,
    reading_status: ReadingStatus,
    rating: u8,
}

impl BookRecord {
    /// Creates an unread, unrated record after validating every field.
    ///
    /// # Errors
    /// - `EmptyField` when title, author or genre is blank.
    /// - `InvalidIsbn` when the ISBN format is rejected.
    /// - `PublicationYearOutOfRange` outside `1000..=2030`.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        genre: impl Into<String>,
        publication_year: i32,
    ) -> Result<Self, BookValidationError> {
        let title = required_text("title", title.into())?;
        let author = required_text("author", author.into())?;
        let genre = required_text("genre", genre.into())?;

        let isbn = isbn.into();
        if !is_valid_isbn(&isbn) {
            return Err(BookValidationError::InvalidIsbn(isbn.trim().to_string()));
        }
        validate_year(publication_year)?;

        Ok(Self {
            title,
            author,
            isbn: normalize_isbn(&isbn),
            genre,
            publication_year,
            reading_status: ReadingStatus::ToRead,
            rating: 0,
        })
    }

    /// Builder form of [`BookRecord::set_reading_status`].
    pub fn with_status(mut self, status: ReadingStatus) -> Self {
        self.set_reading_status(status);
        self
    }

    /// Builder form of [`BookRecord::set_rating`].
    pub fn with_rating(mut self, rating: u8) -> Result<Self, BookValidationError> {
        self.set_rating(rating)?;
        Ok(self)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Normalized (trimmed) ISBN; the catalog key.
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn publication_year(&self) -> i32 {
        self.publication_year
    }

    pub fn reading_status(&self) -> ReadingStatus {
        self.reading_status
    }

    /// Current rating; 0 means "not rated".
    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn is_rated(&self) -> bool {
        self.rating != 0
    }

    /// Changes reading status.
    ///
    /// Leaving `Read` clears the rating so no unread book keeps a score.
    pub fn set_reading_status(&mut self, status: ReadingStatus) {
        if status != ReadingStatus::Read {
            self.rating = 0;
        }
        self.reading_status = status;
    }

    /// Rates a finished book.
    ///
    /// # Errors
    /// - `RatingRequiresRead` when the status is not `Read`.
    /// - `RatingOutOfRange` when `rating` is outside `1..=5`.
    pub fn set_rating(&mut self, rating: u8) -> Result<(), BookValidationError> {
        if self.reading_status != ReadingStatus::Read {
            return Err(BookValidationError::RatingRequiresRead(self.reading_status));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(BookValidationError::RatingOutOfRange(rating));
        }
        self.rating = rating;
        Ok(())
    }

    /// Returns whether this record is keyed by `isbn` (case-insensitive, trimmed).
    pub fn has_isbn(&self, isbn: &str) -> bool {
        self.isbn.eq_ignore_ascii_case(isbn.trim())
    }

    /// Re-checks every invariant.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre),
        ] {
            if value.trim().is_empty() {
                return Err(BookValidationError::EmptyField(field));
            }
        }
        if !is_valid_isbn(&self.isbn) {
            return Err(BookValidationError::InvalidIsbn(self.isbn.clone()));
        }
        validate_year(self.publication_year)?;
        if self.rating != 0 {
            if self.reading_status != ReadingStatus::Read {
                return Err(BookValidationError::RatingRequiresRead(self.reading_status));
            }
            if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
                return Err(BookValidationError::RatingOutOfRange(self.rating));
            }
        }
        Ok(())
    }
}

impl PartialEq for BookRecord {
    fn eq(&self, other: &Self) -> bool {
        self.isbn.eq_ignore_ascii_case(&other.isbn)
    }
}

impl Eq for BookRecord {}

impl Hash for BookRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.isbn.to_ascii_lowercase().hash(state);
    }
}

impl Display for BookRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\"{}\" by {} - {} ({}) - ISBN: {}",
            self.title, self.author, self.genre, self.publication_year, self.isbn
        )?;
        if self.reading_status == ReadingStatus::Read && self.is_rated() {
            write!(f, " - {}/{MAX_RATING} stars", self.rating)?;
        }
        write!(f, " - {}", self.reading_status)
    }
}

/// Serialized shape; converted through the validating constructor.
#[derive(Deserialize)]
struct BookRecordWire {
    title: String,
    author: String,
    isbn: String,
    genre: String,
    publication_year: i32,
    #[serde(default)]
    reading_status: ReadingStatus,
    #[serde(default)]
    rating: u8,
}

impl TryFrom<BookRecordWire> for BookRecord {
    type Error = BookValidationError;

    fn try_from(wire: BookRecordWire) -> Result<Self, Self::Error> {
        let mut record = BookRecord::new(
            wire.title,
            wire.author,
            wire.isbn,
            wire.genre,
            wire.publication_year,
        )?;
        record.set_reading_status(wire.reading_status);
        if wire.rating != 0 {
            record.set_rating(wire.rating)?;
        }
        Ok(record)
    }
}

fn required_text(field: &'static str, value: String) -> Result<String, BookValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

fn validate_year(year: i32) -> Result<(), BookValidationError> {
    if !(MIN_PUBLICATION_YEAR..=MAX_PUBLICATION_YEAR).contains(&year) {
        return Err(BookValidationError::PublicationYearOutOfRange(year));
    }
    Ok(())
}
