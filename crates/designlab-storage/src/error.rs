//! Storage error types for designlab-storage.
//!
//! [`StorageError`] covers the failure modes of the persistence layer:
//! serialization of graph and scene JSON, SQLite and migration failures,
//! and missing diagrams.

use thiserror::Error;

use crate::types::DiagramId;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SQLite backend reported an error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// No diagram with the given id is stored.
    #[error("diagram not found: {0}")]
    NotFound(DiagramId),
}
