//! SQLite implementation of [`DiagramStore`].
//!
//! [`SqliteStore`] keeps one row per diagram. The semantic graph and the
//! visual scene are stored as JSON TEXT via serde_json; every write runs in
//! a transaction.

use rusqlite::{params, Connection, OptionalExtension};

use designlab_core::graph::SemanticGraph;

use crate::error::StorageError;
use crate::traits::DiagramStore;
use crate::types::{DiagramId, DiagramSnapshot, DiagramSummary, UserId};

/// SQLite-backed implementation of [`DiagramStore`].
pub struct SqliteStore {
    conn: Connection,
}

/// Raw column values of one `diagrams` row, before JSON decoding.
struct DiagramRow {
    title: String,
    owner_id: Option<String>,
    graph: String,
    visual_scene: String,
    created_at: i64,
    updated_at: i64,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    fn decode(id: DiagramId, row: DiagramRow) -> Result<DiagramSnapshot, StorageError> {
        let graph: SemanticGraph = serde_json::from_str(&row.graph)?;
        let visual_scene: serde_json::Value = serde_json::from_str(&row.visual_scene)?;
        Ok(DiagramSnapshot {
            id: Some(id),
            title: row.title,
            owner_id: row.owner_id.map(UserId),
            graph,
            visual_scene,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl DiagramStore for SqliteStore {
    fn save(&mut self, snapshot: &DiagramSnapshot) -> Result<DiagramId, StorageError> {
        let id = snapshot.id.clone().unwrap_or_else(DiagramId::generate);
        let graph = serde_json::to_string(&snapshot.graph)?;
        let visual_scene = serde_json::to_string(&snapshot.visual_scene)?;
        let owner_id = snapshot.owner_id.as_ref().map(|u| u.0.as_str());

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO diagrams
                 (id, title, owner_id, graph, node_count, visual_scene, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 owner_id = excluded.owner_id,
                 graph = excluded.graph,
                 node_count = excluded.node_count,
                 visual_scene = excluded.visual_scene,
                 updated_at = excluded.updated_at",
            params![
                id.as_str(),
                snapshot.title,
                owner_id,
                graph,
                snapshot.graph.node_count() as i64,
                visual_scene,
                snapshot.created_at,
                snapshot.updated_at,
            ],
        )?;
        tx.commit()?;
        Ok(id)
    }

    fn load(&self, id: &DiagramId) -> Result<DiagramSnapshot, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT title, owner_id, graph, visual_scene, created_at, updated_at
                 FROM diagrams WHERE id = ?1",
                params![id.as_str()],
                |row| {
                    Ok(DiagramRow {
                        title: row.get(0)?,
                        owner_id: row.get(1)?,
                        graph: row.get(2)?,
                        visual_scene: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(id.clone()))?;
        Self::decode(id.clone(), row)
    }

    fn list(&self) -> Result<Vec<DiagramSummary>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, title, owner_id, node_count, updated_at
             FROM diagrams ORDER BY updated_at DESC, id",
        )?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let owner_id: Option<String> = row.get(2)?;
            let node_count: i64 = row.get(3)?;
            Ok(DiagramSummary {
                id: DiagramId(id),
                title: row.get(1)?,
                owner_id: owner_id.map(UserId),
                node_count: node_count.max(0) as usize,
                updated_at: row.get(4)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn delete(&mut self, id: &DiagramId) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM diagrams WHERE id = ?1", params![id.as_str()])?;
        tx.commit()?;
        if removed == 0 {
            return Err(StorageError::NotFound(id.clone()));
        }
        Ok(())
    }
}
