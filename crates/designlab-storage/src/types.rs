//! Storage-layer types for diagram identity and snapshots.
//!
//! [`DiagramId`] lives here rather than in designlab-core because diagram
//! identity is a storage concern: a diagram only gains an id when persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use designlab_core::graph::SemanticGraph;

/// Unique identifier for a stored diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagramId(pub String);

impl DiagramId {
    /// Allocates a fresh random id.
    pub fn generate() -> Self {
        DiagramId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DiagramId {
    fn from(s: &str) -> Self {
        DiagramId(s.to_string())
    }
}

/// Identifier of a signed-in user, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

/// Everything needed to restore a diagram: the semantic graph plus the
/// opaque visual scene it was drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSnapshot {
    /// `None` until the diagram has been saved once.
    pub id: Option<DiagramId>,
    pub title: String,
    pub owner_id: Option<UserId>,
    pub graph: SemanticGraph,
    /// Serialized canvas state. Never interpreted by storage.
    #[serde(default)]
    pub visual_scene: serde_json::Value,
    /// Unix timestamps in milliseconds.
    pub created_at: i64,
    pub updated_at: i64,
}

/// Summary of a stored diagram (for listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSummary {
    pub id: DiagramId,
    pub title: String,
    pub owner_id: Option<UserId>,
    pub node_count: usize,
    pub updated_at: i64,
}

impl DiagramSummary {
    pub(crate) fn of(id: DiagramId, snapshot: &DiagramSnapshot) -> Self {
        DiagramSummary {
            id,
            title: snapshot.title.clone(),
            owner_id: snapshot.owner_id.clone(),
            node_count: snapshot.graph.node_count(),
            updated_at: snapshot.updated_at,
        }
    }
}
