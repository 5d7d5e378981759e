//! Core error types for designlab-core.
//!
//! Uses `thiserror` for structured, matchable error variants. User-facing
//! graph mutations never produce these; they surface only when parsing
//! external tags or checking the integrity of a graph that came from outside
//! (a saved diagram or a template).

use crate::id::{EdgeId, NodeId};
use thiserror::Error;

/// Core errors produced by the designlab-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A node type tag did not name any registered node type.
    #[error("unknown node type: '{tag}'")]
    UnknownNodeType { tag: String },

    /// A connection type tag did not name any known connection type.
    #[error("unknown connection type: '{tag}'")]
    UnknownConnectionType { tag: String },

    /// Two nodes in the same graph share an id.
    #[error("duplicate node id: {id}")]
    DuplicateNodeId { id: NodeId },

    /// Two edges in the same graph share an id.
    #[error("duplicate edge id: {id}")]
    DuplicateEdgeId { id: EdgeId },

    /// An edge references a node that is not in the graph.
    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    /// More than one edge connects the same unordered pair of nodes.
    #[error("parallel edge {edge} between {from} and {to}")]
    ParallelEdge {
        edge: EdgeId,
        from: NodeId,
        to: NodeId,
    },
}
