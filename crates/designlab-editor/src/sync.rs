//! VisualSyncAdapter: keeps the semantic graph and the visual scene aligned.
//!
//! Two directions, two entry points:
//! - [`VisualSyncAdapter::apply_event`] folds a store [`GraphEvent`] into a
//!   scene (semantic to visual). Rendering is idempotent: an arrow the user
//!   already drew is adopted rather than duplicated.
//! - [`VisualSyncAdapter::plan_scene`] reads a scene after the user changed
//!   it and collects moves and new arrows as a [`ScenePlan`];
//!   [`VisualSyncAdapter::apply_plan`] turns the plan into store calls
//!   (visual to semantic). [`VisualSyncAdapter::observe_scene`] does both.
//!   Untagged shapes are free-form annotations and are ignored.
//!
//! The adapter only uses the store's public mutation API.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use designlab_core::edge::SemanticEdge;
use designlab_core::graph::SemanticGraph;
use designlab_core::id::{EdgeId, NodeId};
use designlab_core::node::SemanticNode;
use designlab_core::registry::NodeTypeRegistry;
use designlab_core::types::Position;

use crate::config::EditorConfig;
use crate::notify::{Notice, Notifier};
use crate::scene::{
    Binding, ElementId, ElementKind, Scene, SemanticTag, StrokeStyle, VisualElement,
};
use crate::store::{GraphEvent, SemanticGraphStore};

/// Arrow stroke color, independent of node type.
pub const ARROW_COLOR: &str = "#888888";

/// Alpha suffix appended to a node color for the rectangle fill.
const FILL_ALPHA: &str = "20";

/// Horizontal inset of a label inside its rectangle.
const LABEL_INSET: f64 = 10.0;
const LABEL_HEIGHT: f64 = 20.0;

/// What [`VisualSyncAdapter::observe_scene`] did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Nodes whose position was updated from their rectangle.
    pub moved: Vec<NodeId>,
    /// Edges created for newly bound arrows.
    pub edges_added: Vec<EdgeId>,
    /// Bound arrows whose pair was already connected.
    pub existing_connections: usize,
    /// Connection warnings raised.
    pub warnings: usize,
    /// Deleted, untagged or unresolvable elements that were ignored.
    pub skipped: usize,
}

/// Store calls derived from a scene by [`VisualSyncAdapter::plan_scene`].
///
/// Owns everything it needs, so the scene can be released before the plan
/// is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenePlan {
    /// Nodes whose rectangle moved, with the new position.
    pub moves: Vec<(NodeId, Position)>,
    /// Unconnected pairs joined by a bound arrow, in scene order.
    pub connections: Vec<(NodeId, NodeId)>,
    pub existing_connections: usize,
    pub skipped: usize,
}

/// A rectangle an arrow attaches to.
struct Anchor {
    element: ElementId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Anchor {
    fn of(element: &VisualElement) -> Self {
        Anchor {
            element: element.id.clone(),
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
        }
    }
}

/// Arrow box from the source's right-middle to the target's top-left.
fn route(from: &Anchor, to: &Anchor) -> (f64, f64, f64, f64) {
    let x = from.x + from.width;
    let y = from.y + from.height / 2.0;
    (x, y, to.x - x, to.y - from.y)
}

fn stroke_for(edge: &SemanticEdge) -> StrokeStyle {
    if edge.is_valid {
        StrokeStyle::Solid
    } else {
        StrokeStyle::Dashed
    }
}

fn arrow_bindings(element: &VisualElement) -> Option<(&ElementId, &ElementId)> {
    match &element.kind {
        ElementKind::Arrow {
            start_binding: Some(start),
            end_binding: Some(end),
            ..
        } => Some((&start.element_id, &end.element_id)),
        _ => None,
    }
}

/// Renders semantic changes into a scene and reads user edits back.
#[derive(Debug, Clone, Copy)]
pub struct VisualSyncAdapter {
    registry: NodeTypeRegistry,
    node_width: f64,
    node_height: f64,
}

impl Default for VisualSyncAdapter {
    fn default() -> Self {
        Self::from_config(NodeTypeRegistry::standard(), &EditorConfig::default())
    }
}

impl VisualSyncAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(registry: NodeTypeRegistry, config: &EditorConfig) -> Self {
        VisualSyncAdapter {
            registry,
            node_width: config.node_width,
            node_height: config.node_height,
        }
    }

    // -----------------------------------------------------------------------
    // Semantic -> visual
    // -----------------------------------------------------------------------

    /// Renders a node as a tagged rectangle plus a bound text label.
    pub fn render_node(&self, node: &SemanticNode) -> [VisualElement; 2] {
        let meta = self.registry.metadata_for(node.node_type);
        let rect_id = ElementId(node.id.0.clone());
        let rect = VisualElement {
            id: rect_id.clone(),
            x: node.position.x,
            y: node.position.y,
            width: self.node_width,
            height: self.node_height,
            kind: ElementKind::Rectangle {
                stroke_color: meta.color.to_string(),
                background_color: format!("{}{}", meta.color, FILL_ALPHA),
                tag: Some(SemanticTag {
                    semantic_id: node.id.clone(),
                    node_type: node.node_type,
                }),
            },
            is_deleted: false,
        };
        let mut text = VisualElement {
            id: ElementId(format!("{}-label", node.id)),
            x: 0.0,
            y: 0.0,
            width: self.node_width - 2.0 * LABEL_INSET,
            height: LABEL_HEIGHT,
            kind: ElementKind::Text {
                text: node.label.clone(),
                container_id: Some(rect_id),
            },
            is_deleted: false,
        };
        center_label(&mut text, &rect);
        [rect, text]
    }

    /// Renders an edge as an arrow bound to both endpoint rectangles.
    ///
    /// Returns `None` if either endpoint is missing from `graph`.
    pub fn render_edge(&self, edge: &SemanticEdge, graph: &SemanticGraph) -> Option<VisualElement> {
        let from = graph.node(&edge.from)?;
        let to = graph.node(&edge.to)?;
        let anchor = |n: &SemanticNode| Anchor {
            element: ElementId(n.id.0.clone()),
            x: n.position.x,
            y: n.position.y,
            width: self.node_width,
            height: self.node_height,
        };
        Some(self.arrow(edge, &anchor(from), &anchor(to)))
    }

    fn arrow(&self, edge: &SemanticEdge, from: &Anchor, to: &Anchor) -> VisualElement {
        let (x, y, width, height) = route(from, to);
        VisualElement {
            id: ElementId(edge.id.0.clone()),
            x,
            y,
            width,
            height,
            kind: ElementKind::Arrow {
                start_binding: Some(Binding {
                    element_id: from.element.clone(),
                }),
                end_binding: Some(Binding {
                    element_id: to.element.clone(),
                }),
                stroke_style: stroke_for(edge),
                edge: Some(edge.id.clone()),
            },
            is_deleted: false,
        }
    }

    /// Renders a whole graph into a fresh scene.
    pub fn render_graph(&self, graph: &SemanticGraph) -> Scene {
        let mut scene = Scene::new();
        for node in graph.nodes() {
            scene.elements.extend(self.render_node(node));
        }
        for edge in graph.edges() {
            if let Some(arrow) = self.render_edge(edge, graph) {
                scene.push(arrow);
            }
        }
        scene
    }

    /// Folds one store event into `scene`.
    pub fn apply_event(&self, scene: &mut Scene, event: &GraphEvent) {
        match event {
            GraphEvent::NodeAdded { node } => {
                if scene.rectangle_for(&node.id).is_none() {
                    scene.elements.extend(self.render_node(node));
                }
            }
            GraphEvent::NodeRemoved {
                node,
                removed_edges,
            } => {
                let rect = scene.rectangle_for(node).map(|r| r.id.clone());
                scene.remove_where(|e| {
                    let semantic_arrow = matches!(
                        &e.kind,
                        ElementKind::Arrow { edge: Some(id), .. } if removed_edges.contains(id)
                    );
                    semantic_arrow
                        || rect.as_ref().is_some_and(|r| {
                            &e.id == r || is_label_of(e, r) || e.is_bound_to(r)
                        })
                });
            }
            GraphEvent::NodeMoved { node, position } => self.move_rectangle(scene, node, *position),
            GraphEvent::NodeRelabelled { node, label } => {
                let Some(rect) = scene.rectangle_for(node).map(|r| r.id.clone()) else {
                    return;
                };
                for element in scene.elements.iter_mut() {
                    if is_label_of(element, &rect) {
                        if let ElementKind::Text { text, .. } = &mut element.kind {
                            *text = label.clone();
                        }
                    }
                }
            }
            GraphEvent::EdgeAdded { edge } => self.place_arrow(scene, edge),
            GraphEvent::EdgeRemoved { edge } => {
                scene.remove_where(|e| {
                    matches!(&e.kind, ElementKind::Arrow { edge: Some(id), .. } if id == edge)
                });
            }
            GraphEvent::GraphLoaded { graph } => {
                strip_semantic_elements(scene);
                let rendered = self.render_graph(graph);
                scene.elements.extend(rendered.elements);
            }
            GraphEvent::GraphCleared => strip_semantic_elements(scene),
            GraphEvent::SelectionChanged { .. }
            | GraphEvent::HoverChanged { .. }
            | GraphEvent::TitleChanged { .. }
            | GraphEvent::DiagramIdChanged { .. }
            | GraphEvent::DirtyChanged { .. } => {}
        }
    }

    fn move_rectangle(&self, scene: &mut Scene, node: &NodeId, position: Position) {
        let Some(idx) = scene.rectangle_index(node) else {
            return;
        };
        scene.elements[idx].x = position.x;
        scene.elements[idx].y = position.y;
        let rect = scene.elements[idx].clone();

        for element in scene.elements.iter_mut() {
            if is_label_of(element, &rect.id) {
                center_label(element, &rect);
            }
        }
        reroute_arrows(scene, &rect.id);
    }

    /// Draws the arrow for a new edge, or adopts the one the user drew.
    fn place_arrow(&self, scene: &mut Scene, edge: &SemanticEdge) {
        let (Some(from), Some(to)) = (
            scene.rectangle_for(&edge.from).map(Anchor::of),
            scene.rectangle_for(&edge.to).map(Anchor::of),
        ) else {
            debug!(edge = %edge.id, "edge endpoints not on canvas; no arrow drawn");
            return;
        };

        let drawn = scene.elements.iter_mut().find(|e| {
            !e.is_deleted
                && arrow_bindings(e).is_some_and(|(s, t)| {
                    (s == &from.element && t == &to.element)
                        || (s == &to.element && t == &from.element)
                })
        });
        match drawn {
            Some(arrow) => {
                if let ElementKind::Arrow {
                    stroke_style,
                    edge: tagged,
                    ..
                } = &mut arrow.kind
                {
                    *stroke_style = stroke_for(edge);
                    *tagged = Some(edge.id.clone());
                }
            }
            None => scene.push(self.arrow(edge, &from, &to)),
        }
    }

    // -----------------------------------------------------------------------
    // Visual -> semantic
    // -----------------------------------------------------------------------

    /// Applies user edits found in `scene` to `store`.
    ///
    /// Shorthand for [`plan_scene`](Self::plan_scene) followed by
    /// [`apply_plan`](Self::apply_plan). When the scene is shared with a
    /// store subscriber (e.g. behind a `RefCell`), call the two halves
    /// separately and release the scene between them: applying the plan
    /// emits store events that update the scene.
    pub fn observe_scene(
        &self,
        scene: &Scene,
        store: &mut SemanticGraphStore,
        notifier: &mut dyn Notifier,
    ) -> SyncReport {
        let plan = self.plan_scene(scene, store.graph());
        self.apply_plan(plan, store, notifier)
    }

    /// Reads `scene` against `graph` and collects the store calls it needs.
    ///
    /// Moved tagged rectangles become position updates. An arrow bound at
    /// both ends to tagged rectangles becomes a connection unless the pair
    /// is already connected. Everything else is skipped.
    pub fn plan_scene(&self, scene: &Scene, graph: &SemanticGraph) -> ScenePlan {
        let mut plan = ScenePlan::default();

        for element in scene.elements() {
            if element.is_deleted {
                plan.skipped += 1;
                continue;
            }
            match &element.kind {
                ElementKind::Rectangle { .. } => match element.tag() {
                    Some(tag) => plan_rectangle(element, tag, graph, &mut plan),
                    None => plan.skipped += 1,
                },
                ElementKind::Arrow { .. } => plan_arrow(scene, element, graph, &mut plan),
                ElementKind::Text { .. } => {}
            }
        }
        plan
    }

    /// Applies a plan from [`plan_scene`](Self::plan_scene). An invalid new
    /// connection raises a [`Notice::ConnectionWarning`].
    pub fn apply_plan(
        &self,
        plan: ScenePlan,
        store: &mut SemanticGraphStore,
        notifier: &mut dyn Notifier,
    ) -> SyncReport {
        let mut report = SyncReport {
            existing_connections: plan.existing_connections,
            skipped: plan.skipped,
            ..SyncReport::default()
        };

        for (node, position) in plan.moves {
            if !store.graph().contains_node(&node) {
                report.skipped += 1;
                continue;
            }
            store.update_node_position(&node, position);
            report.moved.push(node);
        }

        for (from, to) in plan.connections {
            // Two arrows drawn between the same pair connect it once.
            if store.graph().edge_between(&from, &to).is_some() {
                report.existing_connections += 1;
                continue;
            }
            let Some(edge) = store.add_edge_default(&from, &to) else {
                report.skipped += 1;
                continue;
            };
            if !edge.is_valid {
                warn!(edge = %edge.id, message = %edge.validation_message, "connection warning");
                notifier.notify(Notice::ConnectionWarning {
                    edge: edge.id.clone(),
                    message: edge.validation_message.clone(),
                });
                report.warnings += 1;
            }
            report.edges_added.push(edge.id);
        }

        debug!(
            moved = report.moved.len(),
            edges_added = report.edges_added.len(),
            skipped = report.skipped,
            "scene observed"
        );
        report
    }
}

fn plan_rectangle(
    element: &VisualElement,
    tag: &SemanticTag,
    graph: &SemanticGraph,
    plan: &mut ScenePlan,
) {
    let Some(node) = graph.node(&tag.semantic_id) else {
        plan.skipped += 1;
        return;
    };
    if node.position.x != element.x || node.position.y != element.y {
        plan.moves
            .push((tag.semantic_id.clone(), Position::new(element.x, element.y)));
    }
}

fn plan_arrow(scene: &Scene, element: &VisualElement, graph: &SemanticGraph, plan: &mut ScenePlan) {
    let resolved = arrow_bindings(element).and_then(|(start, end)| {
        Some((
            scene.semantic_id_of(start)?.clone(),
            scene.semantic_id_of(end)?.clone(),
        ))
    });
    let Some((from, to)) = resolved else {
        plan.skipped += 1;
        return;
    };
    if !graph.contains_node(&from) || !graph.contains_node(&to) {
        plan.skipped += 1;
        return;
    }
    if graph.edge_between(&from, &to).is_some() {
        plan.existing_connections += 1;
        return;
    }
    plan.connections.push((from, to));
}

fn is_label_of(element: &VisualElement, rect: &ElementId) -> bool {
    matches!(&element.kind, ElementKind::Text { container_id: Some(c), .. } if c == rect)
}

fn center_label(text: &mut VisualElement, rect: &VisualElement) {
    text.x = rect.x + (rect.width - text.width) / 2.0;
    text.y = rect.y + (rect.height - text.height) / 2.0;
}

fn reroute_arrows(scene: &mut Scene, rect: &ElementId) {
    let updates: Vec<(usize, (f64, f64, f64, f64))> = scene
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_deleted && e.is_bound_to(rect))
        .filter_map(|(i, e)| {
            let (start, end) = arrow_bindings(e)?;
            let from = Anchor::of(scene.get(start)?);
            let to = Anchor::of(scene.get(end)?);
            Some((i, route(&from, &to)))
        })
        .collect();

    for (i, (x, y, width, height)) in updates {
        let arrow = &mut scene.elements[i];
        arrow.x = x;
        arrow.y = y;
        arrow.width = width;
        arrow.height = height;
    }
}

/// Drops tagged rectangles, their labels and every arrow tied to them,
/// keeping free-form annotations.
fn strip_semantic_elements(scene: &mut Scene) {
    let tagged: HashSet<ElementId> = scene
        .elements
        .iter()
        .filter(|e| e.tag().is_some())
        .map(|e| e.id.clone())
        .collect();

    scene.remove_where(|e| {
        if tagged.contains(&e.id) {
            return true;
        }
        match &e.kind {
            ElementKind::Text {
                container_id: Some(c),
                ..
            } => tagged.contains(c),
            ElementKind::Arrow { edge: Some(_), .. } => true,
            ElementKind::Arrow { .. } => tagged.iter().any(|r| e.is_bound_to(r)),
            _ => false,
        }
    });
}
