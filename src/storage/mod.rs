//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - words(lemma, token, msd) with the full triple as composite primary key
//! - nowords(token), registry of unrecognized tokens (reserved for external use)

pub mod schema;
pub mod sqlite;

pub use sqlite::{AnnotationStore, InsertOutcome, InsertReport, StoreStats};
