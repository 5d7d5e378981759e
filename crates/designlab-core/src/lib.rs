//! Semantic graph model for system-design diagrams.
//!
//! - [`types`]: `NodeType`, `Category`, `ConnectionType`, `Position`
//! - [`registry`]: the static node type catalog and connection policies
//! - [`node`] / [`edge`]: semantic graph elements
//! - [`graph`]: the `SemanticGraph` aggregate and its invariants

pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use edge::SemanticEdge;
pub use error::CoreError;
pub use graph::SemanticGraph;
pub use id::{EdgeId, NodeId};
pub use node::{now_millis, SemanticNode};
pub use registry::{ConnectionConstraints, NodeMetadata, NodeTypeRegistry};
pub use types::{Category, ConnectionType, NodeType, Position};
