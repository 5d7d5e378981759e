//! Editing session for system-design diagrams.
//!
//! Ties the semantic model to a free-form canvas and to persistence.
//!
//! # Modules
//!
//! - [`store`]: SemanticGraphStore, the single mutation surface, and its events
//! - [`scene`]: visual elements and the scene they live in
//! - [`sync`]: VisualSyncAdapter, keeping the scene and the graph in step
//! - [`inspector`]: derived views for the properties panel
//! - [`persistence`]: save, open and template loading
//! - [`notify`]: user-facing notices
//! - [`config`]: EditorConfig and its environment overrides
//! - [`error`]: EditorError for boundary failures

pub mod config;
pub mod error;
pub mod inspector;
pub mod notify;
pub mod persistence;
pub mod scene;
pub mod store;
pub mod sync;

// Re-export key types for ergonomic use.
pub use config::EditorConfig;
pub use error::EditorError;
pub use inspector::{inspect, DiagramReport, InspectorView, NodeInspection};
pub use notify::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use persistence::{Anonymous, DiagramSession, IdentityProvider, SaveOutcome, SignedIn};
pub use scene::{ElementId, ElementKind, Scene, VisualElement};
pub use store::{GraphEvent, PendingSave, SemanticGraphStore, SubscriptionId};
pub use sync::{ScenePlan, SyncReport, VisualSyncAdapter};
