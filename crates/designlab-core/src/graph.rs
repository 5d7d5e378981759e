//! SemanticGraph: the node/edge aggregate behind every diagram.
//!
//! [`SemanticGraph`] keeps nodes and edges in insertion order so rendering is
//! deterministic. Its mutators uphold the structural invariants:
//! - every edge endpoint names a node in the graph;
//! - at most one edge joins any unordered pair of nodes;
//! - removing a node removes every edge touching it.
//!
//! Policy validation (which types may connect) is not this type's concern;
//! see `designlab-check`. A graph deserialized from outside may violate the
//! invariants, so callers loading external data run
//! [`check_integrity`](SemanticGraph::check_integrity) first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::edge::SemanticEdge;
use crate::error::CoreError;
use crate::id::{EdgeId, NodeId};
use crate::node::SemanticNode;

/// The semantic graph of a diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticGraph {
    #[serde(default)]
    nodes: Vec<SemanticNode>,
    #[serde(default)]
    edges: Vec<SemanticEdge>,
}

impl SemanticGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        SemanticGraph::default()
    }

    /// Constructs a graph from raw parts without checking invariants.
    ///
    /// Used when reconstructing stored data; follow with
    /// [`check_integrity`](Self::check_integrity) if the source is untrusted.
    pub fn from_parts(nodes: Vec<SemanticNode>, edges: Vec<SemanticEdge>) -> Self {
        SemanticGraph { nodes, edges }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn nodes(&self) -> &[SemanticNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SemanticEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&SemanticNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&SemanticEdge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    /// The edge joining `a` and `b` in either direction, if any.
    pub fn edge_between(&self, a: &NodeId, b: &NodeId) -> Option<&SemanticEdge> {
        self.edges.iter().find(|e| e.connects(a, b))
    }

    /// Edges with `node` as either endpoint, in insertion order.
    pub fn incident_edges<'a>(
        &'a self,
        node: &'a NodeId,
    ) -> impl Iterator<Item = &'a SemanticEdge> + 'a {
        self.edges.iter().filter(move |e| e.touches(node))
    }

    /// Edges recorded as policy violations.
    pub fn invalid_edges(&self) -> impl Iterator<Item = &SemanticEdge> {
        self.edges.iter().filter(|e| !e.is_valid)
    }

    // -----------------------------------------------------------------------
    // Mutators
    // -----------------------------------------------------------------------

    /// Appends a node. Errors if a node with the same id already exists.
    pub fn insert_node(&mut self, node: SemanticNode) -> Result<(), CoreError> {
        if self.contains_node(&node.id) {
            return Err(CoreError::DuplicateNodeId { id: node.id });
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Mutable access to a node's fields. Callers must not change its id.
    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut SemanticNode> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// Moves a node. Returns `false` if the node does not exist.
    pub fn set_node_position(&mut self, id: &NodeId, position: crate::types::Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Renames a node. Returns `false` if the node does not exist.
    pub fn set_node_label(&mut self, id: &NodeId, label: String) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.label = label;
                true
            }
            None => false,
        }
    }

    /// Removes a node and every edge touching it.
    ///
    /// Returns the removed node and the cascaded edges, or `None` if the node
    /// was not present.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<(SemanticNode, Vec<SemanticEdge>)> {
        let pos = self.nodes.iter().position(|n| &n.id == id)?;
        let node = self.nodes.remove(pos);
        let (removed, kept): (Vec<SemanticEdge>, Vec<SemanticEdge>) =
            std::mem::take(&mut self.edges)
                .into_iter()
                .partition(|e| e.touches(id));
        self.edges = kept;
        Some((node, removed))
    }

    /// Appends an edge.
    ///
    /// Errors with [`CoreError::DanglingEdge`] if either endpoint is missing,
    /// [`CoreError::ParallelEdge`] if the unordered pair is already connected,
    /// or [`CoreError::DuplicateEdgeId`] on an id clash.
    pub fn insert_edge(&mut self, edge: SemanticEdge) -> Result<(), CoreError> {
        for endpoint in [&edge.from, &edge.to] {
            if !self.contains_node(endpoint) {
                return Err(CoreError::DanglingEdge {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        if self.edge_between(&edge.from, &edge.to).is_some() {
            return Err(CoreError::ParallelEdge {
                edge: edge.id,
                from: edge.from,
                to: edge.to,
            });
        }
        if self.edge(&edge.id).is_some() {
            return Err(CoreError::DuplicateEdgeId { id: edge.id });
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Removes an edge by id, returning it if present.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<SemanticEdge> {
        let pos = self.edges.iter().position(|e| &e.id == id)?;
        Some(self.edges.remove(pos))
    }

    // -----------------------------------------------------------------------
    // Integrity
    // -----------------------------------------------------------------------

    /// Verifies the structural invariants, reporting the first violation.
    pub fn check_integrity(&self) -> Result<(), CoreError> {
        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(CoreError::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        let mut pairs = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(CoreError::DuplicateEdgeId {
                    id: edge.id.clone(),
                });
            }
            for endpoint in [&edge.from, &edge.to] {
                if !node_ids.contains(endpoint) {
                    return Err(CoreError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            let pair = if edge.from <= edge.to {
                (&edge.from, &edge.to)
            } else {
                (&edge.to, &edge.from)
            };
            if !pairs.insert(pair) {
                return Err(CoreError::ParallelEdge {
                    edge: edge.id.clone(),
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }
        }
        Ok(())
    }
}
