//! Catalog repository.
//!
//! # Responsibility
//! - Coordinate the book collection, strategies, persistence and observers.
//! - Report conflicts (duplicate or missing ISBN) as `false` results so
//!   callers can pick their own UI flow.
//!
//! # See also
//! - `crate::store` for the persistence gateway contract.

pub mod repository;

pub use repository::Catalog;
