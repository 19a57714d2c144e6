//! Catalog domain model.
//!
//! # Responsibility
//! - Define the book record and its reading lifecycle.
//! - Own ISBN format rules used as the catalog key.
//!
//! # Invariants
//! - Every stored record passed `BookRecord::validate()` rules on entry.
//! - Record identity is the ISBN, never the title or position.

pub mod book;
pub mod isbn;
