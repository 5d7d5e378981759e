//! The visual scene: free-form geometry with optional semantic tags.
//!
//! A [`Scene`] is an ordered list of [`VisualElement`]s (rectangles, text
//! and arrows). Elements carry no meaning of their own; a rectangle becomes
//! a diagram component only through its [`SemanticTag`], and an arrow
//! becomes a connection only when both of its bindings land on tagged
//! rectangles. Deleted elements stay in the list flagged `is_deleted`, as a
//! canvas keeps them until the next compaction.

use std::fmt;

use serde::{Deserialize, Serialize};

use designlab_core::id::{EdgeId, NodeId};
use designlab_core::types::NodeType;

/// Identifier of a visual element, unique within a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        ElementId(s.to_string())
    }
}

/// Back-reference from a rectangle to the semantic node it depicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticTag {
    pub semantic_id: NodeId,
    pub node_type: NodeType,
}

/// Arrow endpoint attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub element_id: ElementId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Shape-specific element data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    #[serde(rename_all = "camelCase")]
    Rectangle {
        stroke_color: String,
        background_color: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<SemanticTag>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        /// Rectangle the text is bound to, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        container_id: Option<ElementId>,
    },
    #[serde(rename_all = "camelCase")]
    Arrow {
        #[serde(default)]
        start_binding: Option<Binding>,
        #[serde(default)]
        end_binding: Option<Binding>,
        #[serde(default)]
        stroke_style: StrokeStyle,
        /// Semantic edge the arrow depicts, once known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        edge: Option<EdgeId>,
    },
}

/// A single element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default)]
    pub is_deleted: bool,
}

impl VisualElement {
    /// The semantic tag of a live rectangle.
    pub fn tag(&self) -> Option<&SemanticTag> {
        match &self.kind {
            ElementKind::Rectangle { tag, .. } if !self.is_deleted => tag.as_ref(),
            _ => None,
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self.kind, ElementKind::Arrow { .. })
    }

    /// True if this is an arrow bound at either end to `element`.
    pub fn is_bound_to(&self, element: &ElementId) -> bool {
        match &self.kind {
            ElementKind::Arrow {
                start_binding,
                end_binding,
                ..
            } => [start_binding, end_binding]
                .into_iter()
                .flatten()
                .any(|b| &b.element_id == element),
            _ => false,
        }
    }
}

/// An ordered collection of visual elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub elements: Vec<VisualElement>,
    #[serde(default)]
    pub theme: Theme,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    /// Decodes a scene stored in a diagram snapshot.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Scene::deserialize(value)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn elements(&self) -> &[VisualElement] {
        &self.elements
    }

    pub fn push(&mut self, element: VisualElement) {
        self.elements.push(element);
    }

    /// Live element by id.
    pub fn get(&self, id: &ElementId) -> Option<&VisualElement> {
        self.elements.iter().find(|e| &e.id == id && !e.is_deleted)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut VisualElement> {
        self.elements
            .iter_mut()
            .find(|e| &e.id == id && !e.is_deleted)
    }

    /// The live rectangle tagged with `node`.
    pub fn rectangle_for(&self, node: &NodeId) -> Option<&VisualElement> {
        self.elements
            .iter()
            .find(|e| e.tag().is_some_and(|t| &t.semantic_id == node))
    }

    /// Index of the live rectangle tagged with `node`.
    pub(crate) fn rectangle_index(&self, node: &NodeId) -> Option<usize> {
        self.elements
            .iter()
            .position(|e| e.tag().is_some_and(|t| &t.semantic_id == node))
    }

    /// Resolves an element id to the semantic node its rectangle depicts.
    pub fn semantic_id_of(&self, element: &ElementId) -> Option<&NodeId> {
        self.get(element)
            .and_then(VisualElement::tag)
            .map(|t| &t.semantic_id)
    }

    /// Number of live elements.
    pub fn live_count(&self) -> usize {
        self.elements.iter().filter(|e| !e.is_deleted).count()
    }

    /// Drops every element matching `predicate`.
    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&VisualElement) -> bool,
    {
        let before = self.elements.len();
        self.elements.retain(|e| !predicate(e));
        before - self.elements.len()
    }
}
