//! Save and load orchestration.
//!
//! [`DiagramSession`] connects a [`SemanticGraphStore`] to two diagram
//! stores: a local slot that is always written, and the signed-in user's
//! remote store. Failures never touch the in-memory diagram; they are
//! raised as notices and returned as [`EditorError`]s so the user can retry.

use tracing::{info, warn};

use designlab_storage::templates::{find_template, DiagramTemplate};
use designlab_storage::traits::DiagramStore;
use designlab_storage::types::{DiagramId, DiagramSnapshot, DiagramSummary, UserId};
use designlab_storage::SqliteStore;

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::notify::{Notice, Notifier};
use crate::scene::Scene;
use crate::store::SemanticGraphStore;

/// Id of the local save slot used before a diagram has a remote identity.
pub const LOCAL_DRAFT_ID: &str = "local-draft";

/// Who is using the editor.
pub trait IdentityProvider {
    fn current_user_id(&self) -> Option<UserId>;
}

/// Nobody is signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user_id(&self) -> Option<UserId> {
        None
    }
}

/// A fixed signed-in user.
#[derive(Debug, Clone)]
pub struct SignedIn(pub UserId);

impl IdentityProvider for SignedIn {
    fn current_user_id(&self) -> Option<UserId> {
        Some(self.0.clone())
    }
}

/// Where a save ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written locally and to the user's account under this id.
    Cloud(DiagramId),
    /// Written to the local slot only.
    Local(DiagramId),
}

/// Persistence front end for one editor.
pub struct DiagramSession {
    local: Box<dyn DiagramStore>,
    remote: Box<dyn DiagramStore>,
    identity: Box<dyn IdentityProvider>,
}

impl DiagramSession {
    pub fn new(
        local: Box<dyn DiagramStore>,
        remote: Box<dyn DiagramStore>,
        identity: Box<dyn IdentityProvider>,
    ) -> Self {
        DiagramSession {
            local,
            remote,
            identity,
        }
    }

    /// Session whose local slot is the SQLite database at
    /// [`EditorConfig::db_path`].
    pub fn with_local_db(
        config: &EditorConfig,
        remote: Box<dyn DiagramStore>,
        identity: Box<dyn IdentityProvider>,
    ) -> Result<Self, EditorError> {
        let local = SqliteStore::new(&config.db_path)?;
        info!(path = %config.db_path, "local diagram database opened");
        Ok(DiagramSession::new(Box::new(local), remote, identity))
    }

    pub fn local(&self) -> &dyn DiagramStore {
        self.local.as_ref()
    }

    pub fn remote(&self) -> &dyn DiagramStore {
        self.remote.as_ref()
    }

    /// The store diagrams are opened from and listed in.
    fn active(&self) -> &dyn DiagramStore {
        if self.identity.current_user_id().is_some() {
            self.remote.as_ref()
        } else {
            self.local.as_ref()
        }
    }

    /// Saves the current diagram with its scene.
    ///
    /// The local slot is always written. When a user is signed in the
    /// diagram is also written to their account; the first such save
    /// assigns the diagram id. The store is marked clean only if it was not
    /// edited while saving.
    pub fn save(
        &mut self,
        store: &mut SemanticGraphStore,
        scene: &Scene,
        notifier: &mut dyn Notifier,
    ) -> Result<SaveOutcome, EditorError> {
        match self.try_save(store, scene) {
            Ok(outcome) => {
                notifier.notify(match outcome {
                    SaveOutcome::Cloud(_) => Notice::SavedToCloud,
                    SaveOutcome::Local(_) => Notice::SavedLocally,
                });
                Ok(outcome)
            }
            Err(err) => {
                warn!(%err, "save failed");
                notifier.notify(Notice::SaveFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn try_save(
        &mut self,
        store: &mut SemanticGraphStore,
        scene: &Scene,
    ) -> Result<SaveOutcome, EditorError> {
        let visual_scene = scene.to_json()?;
        let user = self.identity.current_user_id();

        let mut pending = store.begin_save();
        pending.snapshot.visual_scene = visual_scene;
        pending.snapshot.owner_id = user.clone();

        let local_snapshot = DiagramSnapshot {
            id: Some(
                pending
                    .snapshot
                    .id
                    .clone()
                    .unwrap_or_else(|| DiagramId::from(LOCAL_DRAFT_ID)),
            ),
            ..pending.snapshot.clone()
        };
        let local_id = self.local.save(&local_snapshot)?;

        let outcome = match user {
            Some(user) => {
                let id = self.remote.save(&pending.snapshot)?;
                info!(diagram = %id, %user, "diagram saved to cloud");
                store.set_diagram_id(Some(id.clone()));
                SaveOutcome::Cloud(id)
            }
            None => {
                info!(diagram = %local_id, "diagram saved locally");
                SaveOutcome::Local(local_id)
            }
        };

        store.finish_save(&pending);
        Ok(outcome)
    }

    /// Opens a stored diagram into `store`.
    ///
    /// Reads from the user's account when signed in, otherwise from the
    /// local slot. The graph is integrity-checked before anything in
    /// `store` changes. Returns the loaded snapshot so the caller can
    /// restore its scene with [`Scene::from_json`].
    pub fn open(
        &mut self,
        store: &mut SemanticGraphStore,
        id: &DiagramId,
        notifier: &mut dyn Notifier,
    ) -> Result<DiagramSnapshot, EditorError> {
        let loaded = self
            .active()
            .load(id)
            .map_err(EditorError::from)
            .and_then(|snapshot| {
                snapshot.graph.check_integrity()?;
                Ok(snapshot)
            });

        let snapshot = match loaded {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(diagram = %id, %err, "open failed");
                notifier.notify(Notice::LoadFailed {
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        info!(diagram = %id, title = %snapshot.title, "diagram opened");
        store.load_graph(snapshot.graph.clone());
        store.set_diagram_title(snapshot.title.clone());
        // The draft slot is not a real diagram identity.
        store.set_diagram_id(
            snapshot
                .id
                .clone()
                .filter(|id| id.as_str() != LOCAL_DRAFT_ID),
        );
        store.mark_clean_at(snapshot.updated_at);
        Ok(snapshot)
    }

    /// Lists diagrams in the active store.
    pub fn list(&self) -> Result<Vec<DiagramSummary>, EditorError> {
        Ok(self.active().list()?)
    }
}

/// Replaces the current diagram with a template.
pub fn load_template(
    store: &mut SemanticGraphStore,
    template: &DiagramTemplate,
    notifier: &mut dyn Notifier,
) {
    store.clear_graph();
    store.load_graph(template.graph.clone());
    info!(template = %template.id, "template loaded");
    notifier.notify(Notice::TemplateLoaded {
        name: template.name.clone(),
        components: template.graph.node_count(),
    });
}

/// [`load_template`] by built-in template id.
pub fn load_template_by_id(
    store: &mut SemanticGraphStore,
    id: &str,
    notifier: &mut dyn Notifier,
) -> Result<(), EditorError> {
    let template = find_template(id).ok_or_else(|| EditorError::TemplateNotFound(id.to_string()))?;
    load_template(store, &template, notifier);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use designlab_core::edge::SemanticEdge;
    use designlab_core::graph::SemanticGraph;
    use designlab_core::types::{ConnectionType, NodeType, Position};
    use designlab_storage::{InMemoryStore, StorageError};

    use crate::notify::RecordingNotifier;
    use crate::sync::VisualSyncAdapter;

    /// Store that refuses every write.
    struct BrokenStore;

    impl DiagramStore for BrokenStore {
        fn save(&mut self, _: &DiagramSnapshot) -> Result<DiagramId, StorageError> {
            Err(StorageError::Migration("read-only database".into()))
        }
        fn load(&self, id: &DiagramId) -> Result<DiagramSnapshot, StorageError> {
            Err(StorageError::NotFound(id.clone()))
        }
        fn list(&self) -> Result<Vec<DiagramSummary>, StorageError> {
            Ok(Vec::new())
        }
        fn delete(&mut self, id: &DiagramId) -> Result<(), StorageError> {
            Err(StorageError::NotFound(id.clone()))
        }
    }

    fn session(identity: Box<dyn IdentityProvider>) -> DiagramSession {
        DiagramSession::new(
            Box::new(InMemoryStore::new()),
            Box::new(SqliteStore::in_memory().unwrap()),
            identity,
        )
    }

    fn sample_store() -> SemanticGraphStore {
        let mut store = SemanticGraphStore::new();
        let api = store.add_node(NodeType::ApiServer, Position::new(0.0, 0.0));
        let db = store.add_node(NodeType::Database, Position::new(300.0, 0.0));
        store.add_edge_default(&api.id, &db.id).unwrap();
        store.set_diagram_title("Orders");
        store
    }

    #[test]
    fn test_anonymous_save_goes_to_local_slot() {
        let mut session = session(Box::new(Anonymous));
        let mut store = sample_store();
        let mut notifier = RecordingNotifier::new();

        let outcome = session.save(&mut store, &Scene::new(), &mut notifier).unwrap();

        assert_eq!(outcome, SaveOutcome::Local(DiagramId::from(LOCAL_DRAFT_ID)));
        assert_eq!(notifier.notices(), &[Notice::SavedLocally]);
        assert!(!store.is_dirty());
        assert!(store.last_saved().is_some());
        assert_eq!(store.diagram_id(), None);
        assert!(session.remote().list().unwrap().is_empty());
        assert_eq!(session.local().list().unwrap().len(), 1);
    }

    #[test]
    fn test_signed_in_save_writes_both_and_assigns_id() {
        let mut session = session(Box::new(SignedIn(UserId::from("user-7"))));
        let mut store = sample_store();
        let adapter = VisualSyncAdapter::new();
        let scene = adapter.render_graph(store.graph());
        let mut notifier = RecordingNotifier::new();

        let SaveOutcome::Cloud(id) = session.save(&mut store, &scene, &mut notifier).unwrap() else {
            panic!("expected cloud save");
        };
        assert_eq!(store.diagram_id(), Some(&id));
        assert_eq!(notifier.notices(), &[Notice::SavedToCloud]);

        let remote = session.remote().load(&id).unwrap();
        assert_eq!(remote.owner_id, Some(UserId::from("user-7")));
        assert_eq!(remote.graph, *store.graph());
        assert_eq!(Scene::from_json(&remote.visual_scene).unwrap(), scene);
        assert_eq!(session.local().list().unwrap().len(), 1);

        // A second save updates the same remote row.
        store.set_diagram_title("Orders v2");
        session.save(&mut store, &scene, &mut notifier).unwrap();
        let summaries = session.remote().list().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title, "Orders v2");
    }

    #[test]
    fn test_local_db_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig {
            db_path: dir.path().join("designs.db").to_string_lossy().into_owned(),
            ..EditorConfig::default()
        };
        let mut store = sample_store();
        let mut notifier = RecordingNotifier::new();

        let mut first =
            DiagramSession::with_local_db(&config, Box::new(InMemoryStore::new()), Box::new(Anonymous))
                .unwrap();
        first.save(&mut store, &Scene::new(), &mut notifier).unwrap();
        drop(first);

        let mut second =
            DiagramSession::with_local_db(&config, Box::new(InMemoryStore::new()), Box::new(Anonymous))
                .unwrap();
        let mut fresh = SemanticGraphStore::new();
        second
            .open(&mut fresh, &DiagramId::from(LOCAL_DRAFT_ID), &mut notifier)
            .unwrap();
        assert_eq!(*fresh.graph(), *store.graph());
        assert_eq!(fresh.diagram_id(), None);
        assert_eq!(second.list().unwrap()[0].title, "Orders");
    }

    #[test]
    fn test_failed_save_keeps_store_dirty() {
        let mut session = DiagramSession::new(
            Box::new(BrokenStore),
            Box::new(InMemoryStore::new()),
            Box::new(Anonymous),
        );
        let mut store = sample_store();
        let graph_before = store.graph().clone();
        let mut notifier = RecordingNotifier::new();

        let result = session.save(&mut store, &Scene::new(), &mut notifier);

        assert!(matches!(result, Err(EditorError::Storage(_))));
        assert!(store.is_dirty());
        assert!(store.last_saved().is_none());
        assert_eq!(*store.graph(), graph_before);
        assert!(matches!(notifier.notices(), [Notice::SaveFailed { .. }]));
    }

    #[test]
    fn test_open_roundtrip() {
        let mut session = session(Box::new(SignedIn(UserId::from("user-7"))));
        let mut store = sample_store();
        let mut notifier = RecordingNotifier::new();
        let SaveOutcome::Cloud(id) = session.save(&mut store, &Scene::new(), &mut notifier).unwrap()
        else {
            panic!("expected cloud save");
        };
        let saved_graph = store.graph().clone();

        let mut fresh = SemanticGraphStore::new();
        let snapshot = session.open(&mut fresh, &id, &mut notifier).unwrap();

        assert_eq!(snapshot.title, "Orders");
        assert_eq!(*fresh.graph(), saved_graph);
        assert_eq!(fresh.title(), "Orders");
        assert_eq!(fresh.diagram_id(), Some(&id));
        assert!(!fresh.is_dirty());
        // Opening is not a save: last_saved reflects the stored diagram.
        assert_eq!(fresh.last_saved(), Some(snapshot.updated_at));
    }

    #[test]
    fn test_open_rejects_corrupt_graph() {
        let mut remote = InMemoryStore::new();
        let mut store = sample_store();
        let edge = SemanticEdge {
            id: "dangling".into(),
            from: "nobody".into(),
            to: store.graph().nodes()[0].id.clone(),
            connection_type: ConnectionType::Http,
            label: None,
            is_valid: true,
            validation_message: "Valid connection".into(),
        };
        let corrupt = DiagramSnapshot {
            id: Some(DiagramId::from("bad")),
            title: "Broken".into(),
            owner_id: None,
            graph: SemanticGraph::from_parts(store.graph().nodes().to_vec(), vec![edge]),
            visual_scene: serde_json::Value::Null,
            created_at: 0,
            updated_at: 0,
        };
        remote.save(&corrupt).unwrap();
        let mut session = DiagramSession::new(
            Box::new(InMemoryStore::new()),
            Box::new(remote),
            Box::new(SignedIn(UserId::from("u"))),
        );
        let before = store.graph().clone();
        let mut notifier = RecordingNotifier::new();

        let result = session.open(&mut store, &DiagramId::from("bad"), &mut notifier);

        assert!(matches!(result, Err(EditorError::Integrity(_))));
        assert_eq!(*store.graph(), before);
        assert_eq!(store.title(), "Orders");
        assert!(matches!(notifier.notices(), [Notice::LoadFailed { .. }]));
    }

    #[test]
    fn test_open_missing_diagram() {
        let mut session = session(Box::new(Anonymous));
        let mut store = SemanticGraphStore::new();
        let mut notifier = RecordingNotifier::new();
        let result = session.open(&mut store, &DiagramId::from("nope"), &mut notifier);
        assert!(matches!(
            result,
            Err(EditorError::Storage(StorageError::NotFound(_)))
        ));
    }

    #[test]
    fn test_load_template() {
        let mut store = sample_store();
        store.set_diagram_id(Some(DiagramId::from("old")));
        let mut notifier = RecordingNotifier::new();

        load_template_by_id(&mut store, "event-driven-notifications", &mut notifier).unwrap();

        assert_eq!(store.graph().node_count(), 9);
        assert_eq!(store.title(), "Untitled Diagram");
        assert_eq!(store.diagram_id(), None);
        assert!(!store.is_dirty());
        assert_eq!(
            notifier.notices(),
            &[Notice::TemplateLoaded {
                name: "Event-Driven Notifications".into(),
                components: 9,
            }]
        );

        assert!(matches!(
            load_template_by_id(&mut store, "missing", &mut notifier),
            Err(EditorError::TemplateNotFound(_))
        ));
    }
}
