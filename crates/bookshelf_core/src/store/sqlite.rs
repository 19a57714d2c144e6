//! SQLite catalog store.
//!
//! # Responsibility
//! - Persist the catalog as rows of a single `books` table.
//! - Bootstrap the table on first write and guard against newer schemas.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - `save` replaces every row inside one transaction.
//! - `load` never creates a database file that does not exist yet.

use super::{CatalogStore, PersistenceError, PersistenceResult};
use crate::model::book::{BookRecord, ReadingStatus};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS books (
    position INTEGER NOT NULL,
    isbn TEXT NOT NULL PRIMARY KEY COLLATE NOCASE,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    genre TEXT NOT NULL,
    publication_year INTEGER NOT NULL,
    reading_status TEXT NOT NULL,
    rating INTEGER NOT NULL DEFAULT 0
);";

const BOOK_SELECT_SQL: &str = "SELECT
    isbn,
    title,
    author,
    genre,
    publication_year,
    reading_status,
    rating
FROM books
ORDER BY position ASC";

/// SQLite file store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> PersistenceResult<Connection> {
        let conn = Connection::open(&self.path)?;
        bootstrap_connection(&conn)?;
        Ok(conn)
    }

    fn replace_all(&self, books: &[BookRecord]) -> PersistenceResult<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM books;", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO books (
                    position,
                    isbn,
                    title,
                    author,
                    genre,
                    publication_year,
                    reading_status,
                    rating
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            )?;
            for (position, book) in books.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    book.isbn(),
                    book.title(),
                    book.author(),
                    book.genre(),
                    book.publication_year(),
                    book.reading_status().as_str(),
                    book.rating(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn read_all(&self) -> PersistenceResult<Vec<BookRecord>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(BOOK_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }
}

impl CatalogStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn save(&self, books: &[BookRecord]) -> PersistenceResult<()> {
        let started_at = Instant::now();
        match self.replace_all(books) {
            Ok(()) => {
                info!(
                    "event=store_save module=store backend=sqlite status=ok count={} duration_ms={}",
                    books.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store backend=sqlite status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn load(&self) -> PersistenceResult<Vec<BookRecord>> {
        if !self.path.exists() {
            info!("event=store_load module=store backend=sqlite status=ok count=0 missing=true");
            return Ok(Vec::new());
        }

        let started_at = Instant::now();
        match self.read_all() {
            Ok(books) => {
                info!(
                    "event=store_load module=store backend=sqlite status=ok count={} duration_ms={}",
                    books.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(books)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store backend=sqlite status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> PersistenceResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if current > SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if current < SCHEMA_VERSION {
        conn.execute_batch(SCHEMA_SQL)?;
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    Ok(())
}

fn parse_book_row(row: &Row<'_>) -> PersistenceResult<BookRecord> {
    let isbn: String = row.get("isbn")?;
    let status_text: String = row.get("reading_status")?;
    let status: ReadingStatus = status_text.parse().map_err(|_| {
        PersistenceError::InvalidData(format!(
            "invalid reading status `{status_text}` in books.reading_status"
        ))
    })?;
    let rating: u8 = row.get("rating")?;

    let mut book = BookRecord::new(
        row.get::<_, String>("title")?,
        row.get::<_, String>("author")?,
        isbn.as_str(),
        row.get::<_, String>("genre")?,
        row.get("publication_year")?,
    )
    .map_err(|err| PersistenceError::InvalidData(format!("book `{isbn}`: {err}")))?;
    book.set_reading_status(status);
    if rating != 0 {
        book.set_rating(rating)
            .map_err(|err| PersistenceError::InvalidData(format!("book `{isbn}`: {err}")))?;
    }
    Ok(book)
}
