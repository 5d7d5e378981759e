//! Persistence for system-design diagrams.
//!
//! Provides the [`DiagramStore`] trait that every backend implements, plus
//! [`InMemoryStore`] and [`SqliteStore`] as interchangeable backends and the
//! built-in template catalog.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: DiagramId, UserId, DiagramSnapshot, DiagramSummary
//! - [`traits`]: DiagramStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation
//! - [`templates`]: starter diagrams

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod templates;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use templates::{builtin_templates, find_template, DiagramTemplate, TemplateCategory};
pub use traits::DiagramStore;
pub use types::{DiagramId, DiagramSnapshot, DiagramSummary, UserId};
