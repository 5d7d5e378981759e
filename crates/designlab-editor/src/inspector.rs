//! PropertiesInspector: derived views for the properties panel.
//!
//! [`inspect`] reads the store and produces either a detail view of the
//! selected node or, with nothing selected, a diagram-wide report. Both are
//! plain serializable values recomputed on demand. Editing goes through
//! [`rename_selected`] and [`delete_selected`], which delegate to the store.

use serde::Serialize;

use designlab_check::topology::GraphView;
use designlab_core::id::{EdgeId, NodeId};
use designlab_core::node::SemanticNode;
use designlab_core::types::{Category, ConnectionType};

use crate::store::SemanticGraphStore;

/// Label shown for a connection whose other end cannot be resolved.
const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One edge touching the inspected node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummary {
    pub edge: EdgeId,
    pub direction: Direction,
    pub other: NodeId,
    pub other_label: String,
    pub connection_type: ConnectionType,
    pub is_valid: bool,
    pub validation_message: String,
}

/// Detail view of the selected node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInspection {
    pub node: SemanticNode,
    pub type_label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub category: Category,
    pub category_label: &'static str,
    pub tips: &'static [&'static str],
    pub learn_more: Option<&'static str>,
    pub connections: Vec<ConnectionSummary>,
    /// Messages of the invalid edges among `connections`.
    pub warnings: Vec<String>,
    /// Display labels of the types this node may connect to.
    pub can_connect_to: Vec<&'static str>,
    /// True when the type lists no outgoing targets.
    pub is_terminal: bool,
}

/// One invalid edge in the diagram-wide report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidConnection {
    pub edge: EdgeId,
    /// "`<from label>` → `<to label>`".
    pub summary: String,
    pub message: String,
}

/// Diagram-wide view shown when nothing is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramReport {
    pub node_count: usize,
    pub edge_count: usize,
    pub invalid_connections: Vec<InvalidConnection>,
    pub isolated_nodes: Vec<NodeId>,
    pub islands: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum InspectorView {
    Node(NodeInspection),
    Diagram(DiagramReport),
}

/// Builds the properties view for the current selection.
///
/// A selection that no longer resolves falls back to the diagram view.
pub fn inspect(store: &SemanticGraphStore) -> InspectorView {
    match store
        .selected_node()
        .and_then(|id| store.graph().node(id))
    {
        Some(node) => InspectorView::Node(inspect_node(store, node)),
        None => InspectorView::Diagram(diagram_report(store)),
    }
}

fn label_of(store: &SemanticGraphStore, id: &NodeId) -> String {
    store
        .graph()
        .node(id)
        .map(|n| n.label.clone())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

fn inspect_node(store: &SemanticGraphStore, node: &SemanticNode) -> NodeInspection {
    let registry = store.registry();
    let meta = registry.metadata_for(node.node_type);

    let connections: Vec<ConnectionSummary> = store
        .graph()
        .incident_edges(&node.id)
        .filter_map(|edge| {
            let other = edge.other_end(&node.id)?.clone();
            let direction = if edge.from == node.id {
                Direction::Outgoing
            } else {
                Direction::Incoming
            };
            Some(ConnectionSummary {
                edge: edge.id.clone(),
                direction,
                other_label: label_of(store, &other),
                other,
                connection_type: edge.connection_type,
                is_valid: edge.is_valid,
                validation_message: edge.validation_message.clone(),
            })
        })
        .collect();
    let warnings = connections
        .iter()
        .filter(|c| !c.is_valid)
        .map(|c| c.validation_message.clone())
        .collect();

    NodeInspection {
        node: node.clone(),
        type_label: meta.label,
        description: meta.description,
        icon: meta.icon,
        color: meta.color,
        category: meta.category,
        category_label: meta.category.label(),
        tips: meta.tips,
        learn_more: meta.learn_more,
        connections,
        warnings,
        can_connect_to: registry.allowed_target_labels(node.node_type),
        is_terminal: meta.constraints.can_connect_to.is_empty(),
    }
}

fn diagram_report(store: &SemanticGraphStore) -> DiagramReport {
    let graph = store.graph();
    let invalid_connections = graph
        .invalid_edges()
        .map(|edge| InvalidConnection {
            edge: edge.id.clone(),
            summary: format!(
                "{} \u{2192} {}",
                label_of(store, &edge.from),
                label_of(store, &edge.to)
            ),
            message: edge.validation_message.clone(),
        })
        .collect();
    let view = GraphView::build(graph);

    DiagramReport {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        invalid_connections,
        isolated_nodes: view.isolated_nodes(),
        islands: view.island_count(),
    }
}

/// Renames the selected node. Returns false when nothing is selected.
pub fn rename_selected(store: &mut SemanticGraphStore, label: impl Into<String>) -> bool {
    let Some(id) = store.selected_node().cloned() else {
        return false;
    };
    store.update_node_label(&id, label);
    true
}

/// Deletes the selected node and its edges, then clears the selection.
/// Returns false when nothing is selected.
pub fn delete_selected(store: &mut SemanticGraphStore) -> bool {
    let Some(id) = store.selected_node().cloned() else {
        return false;
    };
    store.remove_node(&id);
    store.select_node(None);
    true
}
