//! Swappable sort and search behavior.
//!
//! # Responsibility
//! - Provide the built-in orderings (title, author, year).
//! - Provide the built-in searches (title, author, ISBN) and the
//!   multi-criteria `AdvancedFilter`.
//!
//! # Invariants
//! - Strategies are stateless and `Send + Sync`, so one instance can be shared
//!   by every catalog handle.

pub mod search;
pub mod sort;
