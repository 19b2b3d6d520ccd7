//! # Annostore - Embedded annotation triple store
//!
//! Data-access layer over SQLite for linguistic annotations.
//!
//! Annostore provides:
//! - The `(lemma, token, msd)` triple as the unit of storage, unique as a whole
//! - Lookups by lemma, token, msd and any combination, with SQL LIKE patterns
//! - Membership queries over lists of lemmas/tokens with grouped results
//! - Duplicate-tolerant single and batch inserts with an explicit outcome
//! - A `nowords` registry table reserved for unrecognized tokens

pub mod storage;
pub mod triple;

// Re-exports for convenient access
pub use storage::{AnnotationStore, InsertOutcome, InsertReport, StoreStats};
pub use triple::Triple;

/// Result type alias for annostore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for annostore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
