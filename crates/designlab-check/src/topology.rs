//! Structural analysis over a petgraph view of a semantic graph.
//!
//! [`GraphView`] mirrors node ids into a `DiGraph` so petgraph's algorithms
//! can answer diagram-level questions such as "which components are not
//! connected to anything" and "how many separate islands does the diagram
//! have". Edges with unresolvable endpoints are left out of the view.

use std::collections::HashMap;

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};

use designlab_core::graph::SemanticGraph;
use designlab_core::id::{EdgeId, NodeId};

/// Read-only petgraph mirror of a [`SemanticGraph`].
#[derive(Debug, Clone)]
pub struct GraphView {
    graph: DiGraph<NodeId, EdgeId>,
    index: HashMap<NodeId, NodeIndex>,
}

impl GraphView {
    /// Builds the view. Nodes keep their semantic insertion order.
    pub fn build(semantic: &SemanticGraph) -> Self {
        let mut graph = DiGraph::with_capacity(semantic.node_count(), semantic.edge_count());
        let mut index = HashMap::with_capacity(semantic.node_count());

        for node in semantic.nodes() {
            let idx = graph.add_node(node.id.clone());
            index.insert(node.id.clone(), idx);
        }
        for edge in semantic.edges() {
            if let (Some(&from), Some(&to)) = (index.get(&edge.from), index.get(&edge.to)) {
                graph.add_edge(from, to, edge.id.clone());
            }
        }

        GraphView { graph, index }
    }

    /// Nodes with no incident edges, in insertion order.
    pub fn isolated_nodes(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_undirected(idx).next().is_none())
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Number of weakly connected components. An empty graph has none.
    pub fn island_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Number of distinct neighbours of `node`, ignoring direction.
    pub fn degree(&self, node: &NodeId) -> usize {
        self.index
            .get(node)
            .map(|&idx| self.graph.neighbors_undirected(idx).count())
            .unwrap_or(0)
    }
}

/// Convenience wrapper for [`GraphView::isolated_nodes`].
pub fn isolated_nodes(graph: &SemanticGraph) -> Vec<NodeId> {
    GraphView::build(graph).isolated_nodes()
}

/// Convenience wrapper for [`GraphView::island_count`].
pub fn island_count(graph: &SemanticGraph) -> usize {
    GraphView::build(graph).island_count()
}
