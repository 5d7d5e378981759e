//! Semantic edges: directed connections between components.
//!
//! An edge records the outcome of the connection check made when it was
//! drawn. Invalid connections are kept in the graph with `is_valid = false`
//! so the learner can see what is wrong; the verdict is never recomputed.

use serde::{Deserialize, Serialize};

use crate::id::{EdgeId, NodeId};
use crate::types::ConnectionType;

/// A directed connection in the semantic graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(rename = "type", default)]
    pub connection_type: ConnectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub is_valid: bool,
    #[serde(default)]
    pub validation_message: String,
}

impl SemanticEdge {
    /// Returns `true` if this edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    /// Returns `true` if `node` is either endpoint.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.from == node || &self.to == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all.
    pub fn other_end(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.from == node {
            Some(&self.to)
        } else if &self.to == node {
            Some(&self.from)
        } else {
            None
        }
    }
}
