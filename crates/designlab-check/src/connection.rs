//! Connection-constraint validation.
//!
//! [`classify`] decides how the source type's policy treats a target type;
//! [`validate_connection`] resolves two node ids in a graph and turns that
//! decision into a learner-facing [`ConnectionVerdict`].
//!
//! Order matters: the forbidden list is consulted before the allowed list,
//! so a forbidden target is rejected even if it is also listed as allowed,
//! and a target listed in neither is accepted only when the allowed list is
//! empty.

use serde::{Deserialize, Serialize};

use designlab_core::graph::SemanticGraph;
use designlab_core::id::NodeId;
use designlab_core::registry::NodeTypeRegistry;
use designlab_core::types::NodeType;

/// Message used when an endpoint id does not resolve to a node.
pub const INVALID_NODES_MESSAGE: &str = "Invalid nodes";

/// Message used for accepted connections.
pub const VALID_MESSAGE: &str = "Valid connection";

/// How a source type's policy treats a target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyDecision {
    /// Target is in the source's forbidden list.
    Forbidden,
    /// Source has an allowed list and the target is not in it.
    NotInAllowList,
    /// Target is explicitly allowed, or no list governs the pair.
    Permitted,
}

/// Outcome of checking one proposed connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionVerdict {
    pub valid: bool,
    pub message: String,
}

impl ConnectionVerdict {
    fn valid() -> Self {
        ConnectionVerdict {
            valid: true,
            message: VALID_MESSAGE.to_string(),
        }
    }

    fn invalid(message: String) -> Self {
        ConnectionVerdict {
            valid: false,
            message,
        }
    }
}

/// Applies the source type's constraints to a target type.
pub fn classify(registry: &NodeTypeRegistry, from: NodeType, to: NodeType) -> PolicyDecision {
    let constraints = registry.constraints(from);
    if constraints.forbids(to) {
        PolicyDecision::Forbidden
    } else if !constraints.can_connect_to.is_empty() && !constraints.allows_explicitly(to) {
        PolicyDecision::NotInAllowList
    } else {
        PolicyDecision::Permitted
    }
}

/// Checks a connection between two node types and explains the result.
pub fn check_types(registry: &NodeTypeRegistry, from: NodeType, to: NodeType) -> ConnectionVerdict {
    let from_label = registry.label(from);
    match classify(registry, from, to) {
        PolicyDecision::Forbidden => {
            let advice = registry.connection_advice(from, to);
            let mut message = format!(
                "{} should not connect directly to {}.",
                from_label,
                registry.label(to)
            );
            if !advice.is_empty() {
                message.push(' ');
                message.push_str(advice);
            }
            ConnectionVerdict::invalid(message)
        }
        PolicyDecision::NotInAllowList => ConnectionVerdict::invalid(format!(
            "{} typically connects to: {}",
            from_label,
            registry.allowed_target_labels(from).join(", ")
        )),
        PolicyDecision::Permitted => ConnectionVerdict::valid(),
    }
}

/// Validates a proposed edge `from -> to` between nodes of `graph`.
///
/// Missing endpoints produce an invalid verdict rather than an error; the
/// caller decides whether to record anything.
pub fn validate_connection(
    graph: &SemanticGraph,
    registry: &NodeTypeRegistry,
    from: &NodeId,
    to: &NodeId,
) -> ConnectionVerdict {
    match (graph.node(from), graph.node(to)) {
        (Some(source), Some(target)) => check_types(registry, source.node_type, target.node_type),
        _ => ConnectionVerdict::invalid(INVALID_NODES_MESSAGE.to_string()),
    }
}
