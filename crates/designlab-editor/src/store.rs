//! SemanticGraphStore: the single mutation surface for a diagram.
//!
//! The store owns the [`SemanticGraph`] together with the editing session
//! around it:
//! - selection and hover cursor
//! - diagram id and title
//! - dirty flag, revision counter and `last_saved` timestamp
//! - subscribers notified with a [`GraphEvent`] after every state change
//!
//! User-facing operations never fail. Operations naming an absent node or
//! edge are no-ops (logged at `debug`). Connections that break the type
//! policy are still recorded, flagged invalid with an explanation.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use designlab_check::connection::{self, ConnectionVerdict};
use designlab_core::edge::SemanticEdge;
use designlab_core::graph::SemanticGraph;
use designlab_core::id::{EdgeId, NodeId};
use designlab_core::node::{now_millis, SemanticNode};
use designlab_core::registry::NodeTypeRegistry;
use designlab_core::types::{ConnectionType, NodeType, Position};
use designlab_storage::types::{DiagramId, DiagramSnapshot};

use crate::config::EditorConfig;

/// A state change broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GraphEvent {
    NodeAdded { node: SemanticNode },
    NodeRemoved {
        node: NodeId,
        /// Incident edges removed along with the node.
        removed_edges: Vec<EdgeId>,
    },
    NodeMoved { node: NodeId, position: Position },
    NodeRelabelled { node: NodeId, label: String },
    EdgeAdded { edge: SemanticEdge },
    EdgeRemoved { edge: EdgeId },
    /// The whole graph was replaced.
    GraphLoaded { graph: SemanticGraph },
    GraphCleared,
    SelectionChanged { node: Option<NodeId> },
    HoverChanged { node: Option<NodeId> },
    TitleChanged { title: String },
    DiagramIdChanged { id: Option<DiagramId> },
    /// The dirty flag flipped.
    DirtyChanged { dirty: bool },
}

/// Handle returned by [`SemanticGraphStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GraphEvent)>;

/// A snapshot captured by [`SemanticGraphStore::begin_save`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    /// Revision of the store when the snapshot was taken.
    pub revision: u64,
    /// The diagram as it stood at `revision`. `visual_scene` and `owner_id`
    /// are left for the caller to fill in.
    pub snapshot: DiagramSnapshot,
}

/// Authoritative editing state for one diagram.
pub struct SemanticGraphStore {
    graph: SemanticGraph,
    registry: NodeTypeRegistry,
    selected: Option<NodeId>,
    hovered: Option<NodeId>,
    diagram_id: Option<DiagramId>,
    title: String,
    default_title: String,
    dirty: bool,
    revision: u64,
    last_saved: Option<i64>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl SemanticGraphStore {
    /// Creates an empty, clean store using the standard node catalog.
    pub fn new() -> Self {
        Self::with_registry(NodeTypeRegistry::standard(), &EditorConfig::default())
    }

    /// Creates an empty store whose default title comes from `config`.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_registry(NodeTypeRegistry::standard(), config)
    }

    pub fn with_registry(registry: NodeTypeRegistry, config: &EditorConfig) -> Self {
        SemanticGraphStore {
            graph: SemanticGraph::new(),
            registry,
            selected: None,
            hovered: None,
            diagram_id: None,
            title: config.default_title.clone(),
            default_title: config.default_title.clone(),
            dirty: false,
            revision: 0,
            last_saved: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &SemanticGraph {
        &self.graph
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    pub fn selected_node(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn hovered_node(&self) -> Option<&NodeId> {
        self.hovered.as_ref()
    }

    pub fn diagram_id(&self) -> Option<&DiagramId> {
        self.diagram_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Counter bumped by every edit to the diagram content or title.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Unix milliseconds of the last successful save, if any.
    pub fn last_saved(&self) -> Option<i64> {
        self.last_saved
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Registers a listener. Listeners run in subscription order after each
    /// state change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: GraphEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Records an edit: bumps the revision and raises the dirty flag.
    fn touch(&mut self) {
        self.revision += 1;
        self.set_dirty(true);
    }

    fn set_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            self.emit(GraphEvent::DirtyChanged { dirty });
        }
    }

    // -----------------------------------------------------------------------
    // Node operations
    // -----------------------------------------------------------------------

    /// Adds a node of `node_type` at `position` with a fresh id and the
    /// type's default label.
    pub fn add_node(&mut self, node_type: NodeType, position: Position) -> SemanticNode {
        let mut node = SemanticNode::new(node_type, position, &self.registry);
        // Fresh uuids do not collide in practice; regenerate rather than fail.
        while self.graph.contains_node(&node.id) {
            node.id = NodeId::generate();
        }
        if let Err(err) = self.graph.insert_node(node.clone()) {
            warn!(%err, "node insert rejected");
            return node;
        }
        debug!(node = %node.id, node_type = %node_type, "node added");
        self.emit(GraphEvent::NodeAdded { node: node.clone() });
        self.touch();
        node
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: &NodeId) {
        let Some((_, removed)) = self.graph.remove_node(id) else {
            debug!(node = %id, "remove_node: no such node");
            return;
        };
        let removed_edges: Vec<EdgeId> = removed.into_iter().map(|e| e.id).collect();
        debug!(node = %id, edges = removed_edges.len(), "node removed");
        self.emit(GraphEvent::NodeRemoved {
            node: id.clone(),
            removed_edges,
        });
        if self.selected.as_ref() == Some(id) {
            self.select_node(None);
        }
        if self.hovered.as_ref() == Some(id) {
            self.hover_node(None);
        }
        self.touch();
    }

    pub fn update_node_position(&mut self, id: &NodeId, position: Position) {
        if !self.graph.set_node_position(id, position) {
            debug!(node = %id, "update_node_position: no such node");
            return;
        }
        self.emit(GraphEvent::NodeMoved {
            node: id.clone(),
            position,
        });
        self.touch();
    }

    pub fn update_node_label(&mut self, id: &NodeId, label: impl Into<String>) {
        let label = label.into();
        if !self.graph.set_node_label(id, label.clone()) {
            debug!(node = %id, "update_node_label: no such node");
            return;
        }
        self.emit(GraphEvent::NodeRelabelled {
            node: id.clone(),
            label,
        });
        self.touch();
    }

    // -----------------------------------------------------------------------
    // Edge operations
    // -----------------------------------------------------------------------

    /// Checks a proposed connection against the node type policy without
    /// changing anything.
    pub fn validate_connection(&self, from: &NodeId, to: &NodeId) -> ConnectionVerdict {
        connection::validate_connection(&self.graph, &self.registry, from, to)
    }

    /// Connects `from` to `to`.
    ///
    /// Returns `None` if the pair is already connected in either direction
    /// or if an endpoint does not exist. Otherwise the edge is recorded even
    /// when the policy rejects it; the verdict is stored on the edge.
    pub fn add_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        connection_type: ConnectionType,
    ) -> Option<SemanticEdge> {
        if self.graph.edge_between(from, to).is_some() {
            debug!(%from, %to, "add_edge: pair already connected");
            return None;
        }
        if !self.graph.contains_node(from) || !self.graph.contains_node(to) {
            debug!(%from, %to, "add_edge: endpoint missing");
            return None;
        }

        let verdict = self.validate_connection(from, to);
        let mut edge = SemanticEdge {
            id: EdgeId::generate(),
            from: from.clone(),
            to: to.clone(),
            connection_type,
            label: None,
            is_valid: verdict.valid,
            validation_message: verdict.message,
        };
        while self.graph.edge(&edge.id).is_some() {
            edge.id = EdgeId::generate();
        }
        if let Err(err) = self.graph.insert_edge(edge.clone()) {
            warn!(%err, "edge insert rejected");
            return None;
        }

        if edge.is_valid {
            debug!(edge = %edge.id, %from, %to, "edge added");
        } else {
            warn!(edge = %edge.id, %from, %to, message = %edge.validation_message, "invalid connection recorded");
        }
        self.emit(GraphEvent::EdgeAdded { edge: edge.clone() });
        self.touch();
        Some(edge)
    }

    /// [`add_edge`](Self::add_edge) with the default connection type.
    pub fn add_edge_default(&mut self, from: &NodeId, to: &NodeId) -> Option<SemanticEdge> {
        self.add_edge(from, to, ConnectionType::default())
    }

    pub fn remove_edge(&mut self, id: &EdgeId) {
        if self.graph.remove_edge(id).is_none() {
            debug!(edge = %id, "remove_edge: no such edge");
            return;
        }
        self.emit(GraphEvent::EdgeRemoved { edge: id.clone() });
        self.touch();
    }

    // -----------------------------------------------------------------------
    // Whole-graph operations
    // -----------------------------------------------------------------------

    /// Replaces the graph wholesale. The store ends up clean with nothing
    /// selected.
    ///
    /// The graph is taken as given; callers loading untrusted data run
    /// [`SemanticGraph::check_integrity`] first.
    pub fn load_graph(&mut self, graph: SemanticGraph) {
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph loaded"
        );
        self.graph = graph;
        self.revision += 1;
        self.emit(GraphEvent::GraphLoaded {
            graph: self.graph.clone(),
        });
        self.select_node(None);
        self.hover_node(None);
        self.set_dirty(false);
    }

    /// Empties the graph and resets the title, diagram id and cursor.
    pub fn clear_graph(&mut self) {
        self.graph = SemanticGraph::new();
        self.emit(GraphEvent::GraphCleared);
        self.select_node(None);
        self.hover_node(None);
        self.set_diagram_id(None);
        if self.title != self.default_title {
            self.title = self.default_title.clone();
            self.emit(GraphEvent::TitleChanged {
                title: self.title.clone(),
            });
        }
        self.touch();
    }

    // -----------------------------------------------------------------------
    // Cursor and metadata
    // -----------------------------------------------------------------------

    pub fn select_node(&mut self, id: Option<NodeId>) {
        if self.selected != id {
            self.selected = id.clone();
            self.emit(GraphEvent::SelectionChanged { node: id });
        }
    }

    pub fn hover_node(&mut self, id: Option<NodeId>) {
        if self.hovered != id {
            self.hovered = id.clone();
            self.emit(GraphEvent::HoverChanged { node: id });
        }
    }

    pub fn set_diagram_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.emit(GraphEvent::TitleChanged {
            title: self.title.clone(),
        });
        self.touch();
    }

    /// Sets the persisted identity of the diagram. Not an edit.
    pub fn set_diagram_id(&mut self, id: Option<DiagramId>) {
        if self.diagram_id != id {
            self.diagram_id = id.clone();
            self.emit(GraphEvent::DiagramIdChanged { id });
        }
    }

    // -----------------------------------------------------------------------
    // Save bookkeeping
    // -----------------------------------------------------------------------

    pub fn mark_dirty(&mut self) {
        self.set_dirty(true);
    }

    /// Clears the dirty flag and stamps `last_saved`.
    pub fn mark_clean(&mut self) {
        self.mark_clean_at(now_millis());
    }

    /// Clears the dirty flag, recording `saved_at` as the last save. Used
    /// when opening a stored diagram, whose last save happened earlier.
    pub fn mark_clean_at(&mut self, saved_at: i64) {
        self.last_saved = Some(saved_at);
        self.set_dirty(false);
    }

    /// Captures the current diagram for saving.
    pub fn begin_save(&self) -> PendingSave {
        let now = now_millis();
        PendingSave {
            revision: self.revision,
            snapshot: DiagramSnapshot {
                id: self.diagram_id.clone(),
                title: self.title.clone(),
                owner_id: None,
                graph: self.graph.clone(),
                visual_scene: serde_json::Value::Null,
                created_at: now,
                updated_at: now,
            },
        }
    }

    /// Completes a save started with [`begin_save`](Self::begin_save).
    ///
    /// `last_saved` is always stamped. The dirty flag is cleared only if no
    /// edit happened since the snapshot was taken; returns whether it was.
    pub fn finish_save(&mut self, pending: &PendingSave) -> bool {
        self.last_saved = Some(now_millis());
        if pending.revision == self.revision {
            self.set_dirty(false);
            true
        } else {
            debug!(
                saved = pending.revision,
                current = self.revision,
                "edits made during save; staying dirty"
            );
            false
        }
    }
}

impl Default for SemanticGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SemanticGraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticGraphStore")
            .field("graph", &self.graph)
            .field("selected", &self.selected)
            .field("hovered", &self.hovered)
            .field("diagram_id", &self.diagram_id)
            .field("title", &self.title)
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .field("last_saved", &self.last_saved)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    fn at(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    fn recorder(store: &mut SemanticGraphStore) -> Rc<RefCell<Vec<GraphEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn test_add_node_defaults() {
        let mut store = SemanticGraphStore::new();
        let node = store.add_node(NodeType::LoadBalancer, at(10.0, 20.0));

        assert!(node.id.as_str().starts_with("node-"));
        assert_eq!(node.label, "Load Balancer");
        assert!(node.config.is_empty());
        assert!(node.created_at > 0);
        assert_eq!(store.graph().node(&node.id), Some(&node));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_client_to_database_is_recorded_invalid() {
        let mut store = SemanticGraphStore::new();
        let c = store.add_node(NodeType::Client, at(0.0, 0.0));
        let db = store.add_node(NodeType::Database, at(300.0, 0.0));

        let edge = store.add_edge_default(&c.id, &db.id).unwrap();
        assert!(!edge.is_valid);
        assert_eq!(
            edge.validation_message,
            "Client should not connect directly to Database. Use an API server or API gateway as an intermediary for security."
        );
        assert_eq!(edge.connection_type, ConnectionType::Http);
        assert_eq!(store.graph().edge_count(), 1);
    }

    #[test]
    fn test_api_server_to_database_is_valid() {
        let mut store = SemanticGraphStore::new();
        let api = store.add_node(NodeType::ApiServer, at(0.0, 0.0));
        let db = store.add_node(NodeType::Database, at(300.0, 0.0));

        let edge = store.add_edge(&api.id, &db.id, ConnectionType::Tcp).unwrap();
        assert!(edge.is_valid);
        assert_eq!(edge.validation_message, "Valid connection");
    }

    #[test]
    fn test_reverse_duplicate_edge_is_rejected() {
        let mut store = SemanticGraphStore::new();
        let a = store.add_node(NodeType::ApiServer, at(0.0, 0.0));
        let b = store.add_node(NodeType::Cache, at(1.0, 0.0));

        assert!(store.add_edge_default(&a.id, &b.id).is_some());
        assert!(store.add_edge_default(&b.id, &a.id).is_none());
        assert!(store.add_edge_default(&a.id, &b.id).is_none());
        assert_eq!(store.graph().edge_count(), 1);
    }

    #[test]
    fn test_add_edge_with_missing_endpoint_is_noop() {
        let mut store = SemanticGraphStore::new();
        let a = store.add_node(NodeType::ApiServer, at(0.0, 0.0));
        store.mark_clean();
        let revision = store.revision();

        assert!(store.add_edge_default(&a.id, &"ghost".into()).is_none());
        assert_eq!(store.graph().edge_count(), 0);
        assert_eq!(store.revision(), revision);
        assert!(!store.is_dirty());

        let verdict = store.validate_connection(&a.id, &"ghost".into());
        assert!(!verdict.valid);
        assert_eq!(verdict.message, "Invalid nodes");
    }

    #[test]
    fn test_remove_node_cascades_and_clears_cursor() {
        let mut store = SemanticGraphStore::new();
        let lb = store.add_node(NodeType::LoadBalancer, at(0.0, 0.0));
        let api = store.add_node(NodeType::ApiServer, at(200.0, 0.0));
        let db = store.add_node(NodeType::Database, at(400.0, 0.0));
        store.add_edge_default(&lb.id, &api.id).unwrap();
        store.add_edge_default(&api.id, &db.id).unwrap();
        store.select_node(Some(api.id.clone()));
        store.hover_node(Some(api.id.clone()));

        store.remove_node(&api.id);

        assert_eq!(store.graph().node_count(), 2);
        assert_eq!(store.graph().edge_count(), 0);
        assert_eq!(store.selected_node(), None);
        assert_eq!(store.hovered_node(), None);
    }

    #[test]
    fn test_absent_ids_are_noops() {
        let mut store = SemanticGraphStore::new();
        let events = recorder(&mut store);
        let ghost = NodeId::from("ghost");

        store.remove_node(&ghost);
        store.update_node_position(&ghost, at(1.0, 1.0));
        store.update_node_label(&ghost, "x");
        store.remove_edge(&EdgeId::from("nope"));

        assert!(events.borrow().is_empty());
        assert!(!store.is_dirty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_update_position_and_label() {
        let mut store = SemanticGraphStore::new();
        let n = store.add_node(NodeType::Cache, at(0.0, 0.0));

        store.update_node_position(&n.id, at(50.0, 75.0));
        store.update_node_label(&n.id, "Session cache");

        let node = store.graph().node(&n.id).unwrap();
        assert_eq!(node.position, at(50.0, 75.0));
        assert_eq!(node.label, "Session cache");
    }

    #[test]
    fn test_events_in_order() {
        let mut store = SemanticGraphStore::new();
        let events = recorder(&mut store);

        let a = store.add_node(NodeType::ApiServer, at(0.0, 0.0));
        let b = store.add_node(NodeType::Database, at(1.0, 0.0));
        let edge = store.add_edge_default(&a.id, &b.id).unwrap();
        store.remove_edge(&edge.id);

        let events = events.borrow();
        assert_eq!(
            *events,
            vec![
                GraphEvent::NodeAdded { node: a.clone() },
                GraphEvent::DirtyChanged { dirty: true },
                GraphEvent::NodeAdded { node: b.clone() },
                GraphEvent::EdgeAdded { edge: edge.clone() },
                GraphEvent::EdgeRemoved { edge: edge.id.clone() },
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut store = SemanticGraphStore::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.set_diagram_title("One");
        let seen = *count.borrow();
        assert!(seen > 0);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_diagram_title("Two");
        assert_eq!(*count.borrow(), seen);
    }

    #[test]
    fn test_load_graph_is_clean_and_resets_selection() {
        let mut store = SemanticGraphStore::new();
        let n = store.add_node(NodeType::Client, at(0.0, 0.0));
        store.select_node(Some(n.id.clone()));

        let other = SemanticNode::new(NodeType::Cdn, at(5.0, 5.0), store.registry()).with_id("cdn");
        store.load_graph(SemanticGraph::from_parts(vec![other], vec![]));

        assert!(!store.is_dirty());
        assert_eq!(store.selected_node(), None);
        assert!(store.graph().contains_node(&"cdn".into()));
        assert!(!store.graph().contains_node(&n.id));
    }

    #[test]
    fn test_clear_graph_resets_title_and_id() {
        let mut store = SemanticGraphStore::new();
        store.set_diagram_title("Checkout");
        store.set_diagram_id(Some(DiagramId::from("d1")));
        store.add_node(NodeType::Client, at(0.0, 0.0));
        store.mark_clean();

        store.clear_graph();

        assert!(store.graph().is_empty());
        assert_eq!(store.title(), "Untitled Diagram");
        assert_eq!(store.diagram_id(), None);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_set_diagram_id_is_not_an_edit() {
        let mut store = SemanticGraphStore::new();
        store.set_diagram_id(Some(DiagramId::from("d1")));
        assert!(!store.is_dirty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_mark_clean_stamps_last_saved() {
        let mut store = SemanticGraphStore::new();
        store.set_diagram_title("T");
        assert!(store.last_saved().is_none());
        store.mark_clean();
        assert!(!store.is_dirty());
        assert!(store.last_saved().is_some());
        store.mark_dirty();
        assert!(store.is_dirty());
    }

    #[test]
    fn test_every_edit_marks_dirty_after_clean() {
        let mut store = SemanticGraphStore::new();
        let api = store.add_node(NodeType::ApiServer, at(0.0, 0.0));
        let db = store.add_node(NodeType::Database, at(300.0, 0.0));
        let cache = store.add_node(NodeType::Cache, at(300.0, 200.0));

        store.mark_clean();
        store.update_node_position(&db.id, at(320.0, 10.0));
        assert!(store.is_dirty(), "update_node_position");

        store.mark_clean();
        store.update_node_label(&db.id, "Orders DB");
        assert!(store.is_dirty(), "update_node_label");

        store.mark_clean();
        let edge = store.add_edge_default(&api.id, &db.id).unwrap();
        assert!(store.is_dirty(), "add_edge");

        store.mark_clean();
        store.remove_edge(&edge.id);
        assert!(store.is_dirty(), "remove_edge");

        store.mark_clean();
        store.remove_node(&cache.id);
        assert!(store.is_dirty(), "remove_node");

        // No-ops on absent ids leave a clean store clean.
        store.mark_clean();
        store.update_node_position(&"ghost".into(), at(1.0, 1.0));
        store.remove_edge(&"ghost".into());
        store.remove_node(&"ghost".into());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_finish_save_without_intervening_edit_cleans() {
        let mut store = SemanticGraphStore::new();
        store.add_node(NodeType::Client, at(0.0, 0.0));
        let pending = store.begin_save();
        assert_eq!(pending.snapshot.graph, *store.graph());
        assert_eq!(pending.snapshot.title, "Untitled Diagram");

        assert!(store.finish_save(&pending));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_finish_save_after_edit_stays_dirty() {
        let mut store = SemanticGraphStore::new();
        store.add_node(NodeType::Client, at(0.0, 0.0));
        let pending = store.begin_save();
        store.add_node(NodeType::Cdn, at(10.0, 0.0));

        assert!(!store.finish_save(&pending));
        assert!(store.is_dirty());
        assert!(store.last_saved().is_some());
    }

    #[test]
    fn test_config_default_title() {
        let config = EditorConfig {
            default_title: "Practice Board".into(),
            ..EditorConfig::default()
        };
        let mut store = SemanticGraphStore::from_config(&config);
        assert_eq!(store.title(), "Practice Board");
        store.set_diagram_title("Other");
        store.clear_graph();
        assert_eq!(store.title(), "Practice Board");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Connect(usize, usize),
        Remove(usize),
        RemoveEdge(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..NodeType::ALL.len()).prop_map(Op::Add),
            (0..8usize, 0..8usize).prop_map(|(a, b)| Op::Connect(a, b)),
            (0..8usize).prop_map(Op::Remove),
            (0..8usize).prop_map(Op::RemoveEdge),
        ]
    }

    proptest! {
        #[test]
        fn store_preserves_graph_invariants(ops in proptest::collection::vec(op(), 0..40)) {
            let mut store = SemanticGraphStore::new();
            for op in ops {
                let ids: Vec<NodeId> = store.graph().nodes().iter().map(|n| n.id.clone()).collect();
                store.mark_clean();
                let changed = match op {
                    Op::Add(t) => {
                        store.add_node(NodeType::ALL[t], Position::default());
                        true
                    }
                    Op::Connect(a, b) if !ids.is_empty() => {
                        let from = ids[a % ids.len()].clone();
                        let to = ids[b % ids.len()].clone();
                        let already = store.graph().edge_between(&from, &to).is_some();
                        let added = store.add_edge_default(&from, &to);
                        prop_assert_eq!(added.is_some(), !already);
                        added.is_some()
                    }
                    Op::Remove(i) if !ids.is_empty() => {
                        let id = ids[i % ids.len()].clone();
                        store.remove_node(&id);
                        prop_assert!(store.graph().edges().iter().all(|e| !e.touches(&id)));
                        true
                    }
                    Op::RemoveEdge(i) if store.graph().edge_count() > 0 => {
                        let id = store.graph().edges()[i % store.graph().edge_count()].id.clone();
                        store.remove_edge(&id);
                        prop_assert!(store.graph().edge(&id).is_none());
                        true
                    }
                    _ => false,
                };
                prop_assert_eq!(store.is_dirty(), changed);
                prop_assert!(store.graph().check_integrity().is_ok());
            }
        }

        #[test]
        fn recorded_verdict_matches_policy(from in 0..NodeType::ALL.len(), to in 0..NodeType::ALL.len()) {
            let mut store = SemanticGraphStore::new();
            let a = store.add_node(NodeType::ALL[from], Position::default());
            let b = store.add_node(NodeType::ALL[to], Position::new(200.0, 0.0));
            let expected = store.validate_connection(&a.id, &b.id);
            let edge = store.add_edge_default(&a.id, &b.id).unwrap();
            prop_assert_eq!(edge.is_valid, expected.valid);
            prop_assert_eq!(edge.validation_message, expected.message);
        }
    }
}
