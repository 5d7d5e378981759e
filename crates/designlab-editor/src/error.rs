//! Editor error types.
//!
//! User-facing graph edits never fail; [`EditorError`] is produced only at
//! the boundaries: persistence, loading external diagrams, serializing the
//! scene, and reading configuration.

use designlab_core::error::CoreError;
use designlab_storage::StorageError;
use thiserror::Error;

/// Errors produced by the editor's boundary operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A save, load or list call on a diagram store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A loaded graph violates the semantic graph invariants. The in-memory
    /// diagram was left untouched.
    #[error("corrupt diagram: {0}")]
    Integrity(#[from] CoreError),

    /// The visual scene could not be converted to or from JSON.
    #[error("scene serialization error: {0}")]
    Scene(#[from] serde_json::Error),

    /// No built-in template has the requested id.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// An environment variable held an unusable value.
    #[error("invalid configuration {key}: {reason}")]
    Config { key: String, reason: String },
}
