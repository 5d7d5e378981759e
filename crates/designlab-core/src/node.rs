//! Semantic nodes: typed infrastructure components placed on a diagram.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::registry::NodeTypeRegistry;
use crate::types::{NodeType, Position};

/// A typed component in the semantic graph.
///
/// The type is fixed for the node's lifetime. `config` is an opaque bag of
/// per-node settings that the core never interprets but always preserves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
    pub position: Position,
    /// Unix timestamp in milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

impl SemanticNode {
    /// Creates a node with a fresh id, the type's default label and an empty
    /// config, stamped with the current time.
    pub fn new(node_type: NodeType, position: Position, registry: &NodeTypeRegistry) -> Self {
        SemanticNode {
            id: NodeId::generate(),
            node_type,
            label: registry.label(node_type).to_string(),
            config: serde_json::Map::new(),
            position,
            created_at: now_millis(),
        }
    }

    /// Builder-style id override, used by templates and tests that need
    /// predictable ids.
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }
}

/// Milliseconds since the Unix epoch, saturating to 0 for clocks set before it.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_uses_default_label() {
        let registry = NodeTypeRegistry::standard();
        let node = SemanticNode::new(NodeType::LoadBalancer, Position::new(10.0, 20.0), &registry);
        assert_eq!(node.label, "Load Balancer");
        assert_eq!(node.position, Position::new(10.0, 20.0));
        assert!(node.config.is_empty());
        assert!(node.created_at > 0);
    }

    #[test]
    fn serializes_with_camel_case_and_type_field() {
        let registry = NodeTypeRegistry::standard();
        let node = SemanticNode::new(NodeType::Cache, Position::default(), &registry)
            .with_id("cache-1");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["id"], "cache-1");
        assert_eq!(value["type"], "cache");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn config_is_preserved_opaquely() {
        let json = r#"{
            "id": "db-1",
            "type": "database",
            "label": "Primary",
            "config": {"engine": "postgres", "replicas": 2},
            "position": {"x": 1.5, "y": -3.0},
            "createdAt": 1700000000000
        }"#;
        let node: SemanticNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.config["replicas"], 2);
        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["config"]["engine"], "postgres");
    }
}
