//! The [`DiagramStore`] trait defining the storage contract for diagrams.
//!
//! Diagrams are saved and loaded whole: a snapshot is small, and the editor
//! only ever persists the complete graph together with its scene. Both
//! backends ([`InMemoryStore`](crate::memory::InMemoryStore) and
//! [`SqliteStore`](crate::sqlite::SqliteStore)) implement this trait and are
//! interchangeable.

use crate::error::StorageError;
use crate::types::{DiagramId, DiagramSnapshot, DiagramSummary};

/// The storage contract for diagram snapshots.
///
/// The trait is synchronous; persistence is a boundary step that the editor
/// drives explicitly.
pub trait DiagramStore {
    /// Inserts or overwrites a snapshot.
    ///
    /// A snapshot without an id is stored under a freshly allocated one.
    /// Overwriting keeps the originally stored `created_at`. Returns the id
    /// the snapshot was stored under.
    fn save(&mut self, snapshot: &DiagramSnapshot) -> Result<DiagramId, StorageError>;

    /// Loads a snapshot by id. The returned snapshot carries `Some(id)`.
    ///
    /// Errors with [`StorageError::NotFound`] if nothing is stored under `id`.
    fn load(&self, id: &DiagramId) -> Result<DiagramSnapshot, StorageError>;

    /// Lists stored diagrams, most recently updated first.
    fn list(&self) -> Result<Vec<DiagramSummary>, StorageError>;

    /// Deletes a stored diagram.
    ///
    /// Errors with [`StorageError::NotFound`] if nothing is stored under `id`.
    fn delete(&mut self, id: &DiagramId) -> Result<(), StorageError>;
}
