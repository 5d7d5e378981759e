//! In-memory implementation of [`DiagramStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and for the local
//! (signed-out) save slot. It has the same semantics as the SQLite backend.

use std::collections::HashMap;

use crate::error::StorageError;
use crate::traits::DiagramStore;
use crate::types::{DiagramId, DiagramSnapshot, DiagramSummary};

/// HashMap-backed diagram store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    diagrams: HashMap<DiagramId, DiagramSnapshot>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Number of stored diagrams.
    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    fn get_stored(&self, id: &DiagramId) -> Result<&DiagramSnapshot, StorageError> {
        self.diagrams
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.clone()))
    }
}

impl DiagramStore for InMemoryStore {
    fn save(&mut self, snapshot: &DiagramSnapshot) -> Result<DiagramId, StorageError> {
        let id = snapshot.id.clone().unwrap_or_else(DiagramId::generate);

        let mut stored = snapshot.clone();
        stored.id = Some(id.clone());
        if let Some(existing) = self.diagrams.get(&id) {
            stored.created_at = existing.created_at;
        }
        self.diagrams.insert(id.clone(), stored);
        Ok(id)
    }

    fn load(&self, id: &DiagramId) -> Result<DiagramSnapshot, StorageError> {
        self.get_stored(id).cloned()
    }

    fn list(&self) -> Result<Vec<DiagramSummary>, StorageError> {
        let mut summaries: Vec<DiagramSummary> = self
            .diagrams
            .iter()
            .map(|(id, snapshot)| DiagramSummary::of(id.clone(), snapshot))
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    fn delete(&mut self, id: &DiagramId) -> Result<(), StorageError> {
        self.diagrams
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designlab_core::graph::SemanticGraph;
    use designlab_core::node::SemanticNode;
    use designlab_core::registry::NodeTypeRegistry;
    use designlab_core::types::{NodeType, Position};

    fn snapshot(title: &str, updated_at: i64) -> DiagramSnapshot {
        let node = SemanticNode::new(
            NodeType::ApiServer,
            Position::new(10.0, 20.0),
            &NodeTypeRegistry::standard(),
        )
        .with_id("api");
        DiagramSnapshot {
            id: None,
            title: title.into(),
            owner_id: None,
            graph: SemanticGraph::from_parts(vec![node], vec![]),
            visual_scene: serde_json::json!({ "elements": [] }),
            created_at: 1_000,
            updated_at,
        }
    }

    #[test]
    fn test_save_assigns_id_and_loads_back() {
        let mut store = InMemoryStore::new();
        let snap = snapshot("Shop", 1_000);
        let id = store.save(&snap).unwrap();

        let loaded = store.load(&id).unwrap();
        assert_eq!(
            loaded,
            DiagramSnapshot {
                id: Some(id),
                ..snap
            }
        );
    }

    #[test]
    fn test_overwrite_keeps_created_at() {
        let mut store = InMemoryStore::new();
        let id = store.save(&snapshot("v1", 1_000)).unwrap();

        let mut second = snapshot("v2", 5_000);
        second.id = Some(id.clone());
        second.created_at = 4_000;
        assert_eq!(store.save(&second).unwrap(), id);

        let loaded = store.load(&id).unwrap();
        assert_eq!(loaded.title, "v2");
        assert_eq!(loaded.created_at, 1_000);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_most_recent_first() {
        let mut store = InMemoryStore::new();
        store.save(&snapshot("old", 1_000)).unwrap();
        store.save(&snapshot("new", 9_000)).unwrap();

        let titles: Vec<_> = store.list().unwrap().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[test]
    fn test_missing_diagram_is_not_found() {
        let mut store = InMemoryStore::new();
        let id = DiagramId::from("nope");
        match store.load(&id) {
            Err(StorageError::NotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(matches!(store.delete(&id), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete_removes_diagram() {
        let mut store = InMemoryStore::new();
        let id = store.save(&snapshot("gone", 1_000)).unwrap();
        store.delete(&id).unwrap();
        assert!(store.is_empty());
    }
}
