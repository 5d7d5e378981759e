//! Whole-graph audit.
//!
//! Scans every edge and reports ALL findings at once. The audit reads the
//! graph but never modifies it; in particular stored verdicts are compared
//! against the current policy, not rewritten.

use designlab_core::graph::SemanticGraph;
use designlab_core::registry::NodeTypeRegistry;

use crate::connection::check_types;
use crate::diagnostics::{AuditFinding, GraphAudit};

/// Audits every edge in `graph` against `registry`.
pub fn audit_graph(graph: &SemanticGraph, registry: &NodeTypeRegistry) -> GraphAudit {
    let mut findings = Vec::new();

    for edge in graph.edges() {
        let endpoints = (graph.node(&edge.from), graph.node(&edge.to));
        let (source, target) = match endpoints {
            (Some(s), Some(t)) => (s, t),
            (None, _) => {
                findings.push(AuditFinding::DanglingEdge {
                    edge: edge.id.clone(),
                    node: edge.from.clone(),
                });
                continue;
            }
            (_, None) => {
                findings.push(AuditFinding::DanglingEdge {
                    edge: edge.id.clone(),
                    node: edge.to.clone(),
                });
                continue;
            }
        };

        if !edge.is_valid {
            findings.push(AuditFinding::InvalidConnection {
                edge: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                message: edge.validation_message.clone(),
            });
        }

        let current = check_types(registry, source.node_type, target.node_type);
        if current.valid != edge.is_valid {
            findings.push(AuditFinding::StaleVerdict {
                edge: edge.id.clone(),
                recorded_valid: edge.is_valid,
                current_valid: current.valid,
                current_message: current.message,
            });
        }
    }

    GraphAudit { findings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designlab_core::edge::SemanticEdge;
    use designlab_core::id::{EdgeId, NodeId};
    use designlab_core::node::SemanticNode;
    use designlab_core::types::{ConnectionType, NodeType, Position};

    fn node(id: &str, ty: NodeType) -> SemanticNode {
        SemanticNode::new(ty, Position::default(), &NodeTypeRegistry::standard()).with_id(id)
    }

    fn edge(id: &str, from: &str, to: &str, is_valid: bool, message: &str) -> SemanticEdge {
        SemanticEdge {
            id: EdgeId::from(id),
            from: NodeId::from(from),
            to: NodeId::from(to),
            connection_type: ConnectionType::Http,
            label: None,
            is_valid,
            validation_message: message.into(),
        }
    }

    #[test]
    fn consistent_graph_reports_only_invalid_edges() {
        let registry = NodeTypeRegistry::standard();
        let message = check_types(&registry, NodeType::Client, NodeType::Database).message;
        let graph = SemanticGraph::from_parts(
            vec![
                node("c", NodeType::Client),
                node("db", NodeType::Database),
                node("api", NodeType::ApiServer),
            ],
            vec![
                edge("e1", "c", "db", false, &message),
                edge("e2", "api", "db", true, "Valid connection"),
            ],
        );

        let audit = audit_graph(&graph, &registry);
        assert_eq!(audit.findings.len(), 1);
        assert_eq!(
            audit.findings[0],
            AuditFinding::InvalidConnection {
                edge: "e1".into(),
                from: "c".into(),
                to: "db".into(),
                message,
            }
        );
        assert_eq!(audit.stale_verdicts().count(), 0);
    }

    #[test]
    fn stale_verdict_is_reported_not_fixed() {
        let registry = NodeTypeRegistry::standard();
        let graph = SemanticGraph::from_parts(
            vec![node("c", NodeType::Client), node("db", NodeType::Database)],
            vec![edge("e1", "c", "db", true, "Valid connection")],
        );

        let audit = audit_graph(&graph, &registry);
        assert_eq!(audit.stale_verdicts().count(), 1);
        assert_eq!(audit.invalid_connections().count(), 0);
        assert!(graph.edges()[0].is_valid);
    }

    #[test]
    fn dangling_edges_are_reported() {
        let registry = NodeTypeRegistry::standard();
        let graph = SemanticGraph::from_parts(
            vec![node("c", NodeType::Client)],
            vec![edge("e1", "c", "gone", true, "Valid connection")],
        );
        let audit = audit_graph(&graph, &registry);
        assert_eq!(
            audit.findings,
            vec![AuditFinding::DanglingEdge {
                edge: "e1".into(),
                node: "gone".into()
            }]
        );
    }

    #[test]
    fn empty_graph_is_clean() {
        let audit = audit_graph(&SemanticGraph::new(), &NodeTypeRegistry::standard());
        assert!(audit.is_clean());
    }
}
