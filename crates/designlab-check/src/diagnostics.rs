//! Diagram-wide findings reported by [`audit_graph`](crate::audit::audit_graph).
//!
//! Findings are advisory. None of them block editing; they feed the
//! diagram-level warning list in the properties panel.

use designlab_core::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// A problem found while auditing a whole graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    /// An edge was recorded as a policy violation when it was drawn.
    #[error("invalid connection {edge} ({from} -> {to}): {message}")]
    InvalidConnection {
        edge: EdgeId,
        from: NodeId,
        to: NodeId,
        /// The message stored on the edge.
        message: String,
    },

    /// The stored verdict disagrees with the current policy, e.g. a saved
    /// diagram predating a rule change. Informational only.
    #[error("stale verdict on {edge}: stored valid={recorded_valid}, policy says valid={current_valid}")]
    StaleVerdict {
        edge: EdgeId,
        recorded_valid: bool,
        current_valid: bool,
        current_message: String,
    },

    /// An edge endpoint does not resolve to a node.
    #[error("dangling edge {edge}: node {node} not found")]
    DanglingEdge { edge: EdgeId, node: NodeId },
}

/// Result of auditing a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphAudit {
    pub findings: Vec<AuditFinding>,
}

impl GraphAudit {
    /// Returns true if nothing was found.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn invalid_connections(&self) -> impl Iterator<Item = &AuditFinding> {
        self.findings
            .iter()
            .filter(|f| matches!(f, AuditFinding::InvalidConnection { .. }))
    }

    pub fn stale_verdicts(&self) -> impl Iterator<Item = &AuditFinding> {
        self.findings
            .iter()
            .filter(|f| matches!(f, AuditFinding::StaleVerdict { .. }))
    }
}
