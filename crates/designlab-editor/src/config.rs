//! Editor configuration.
//!
//! Reads configuration from environment variables:
//! - `DESIGNLAB_DB_PATH`: SQLite database file path (default: "designlab.db")
//! - `DESIGNLAB_DEFAULT_TITLE`: title for new diagrams (default: "Untitled Diagram")
//! - `DESIGNLAB_NODE_WIDTH` / `DESIGNLAB_NODE_HEIGHT`: rectangle size used
//!   when rendering nodes (default: 140 x 80)

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

pub const DB_PATH_VAR: &str = "DESIGNLAB_DB_PATH";
pub const DEFAULT_TITLE_VAR: &str = "DESIGNLAB_DEFAULT_TITLE";
pub const NODE_WIDTH_VAR: &str = "DESIGNLAB_NODE_WIDTH";
pub const NODE_HEIGHT_VAR: &str = "DESIGNLAB_NODE_HEIGHT";

/// Settings shared by the store, the sync adapter and the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub db_path: String,
    pub default_title: String,
    pub node_width: f64,
    pub node_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            db_path: "designlab.db".to_string(),
            default_title: "Untitled Diagram".to_string(),
            node_width: 140.0,
            node_height: 80.0,
        }
    }
}

impl EditorConfig {
    /// Builds a config from the process environment, falling back to the
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self, EditorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EditorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EditorConfig::default();
        if let Some(path) = lookup(DB_PATH_VAR) {
            config.db_path = path;
        }
        if let Some(title) = lookup(DEFAULT_TITLE_VAR) {
            config.default_title = title;
        }
        if let Some(raw) = lookup(NODE_WIDTH_VAR) {
            config.node_width = parse_dimension(NODE_WIDTH_VAR, &raw)?;
        }
        if let Some(raw) = lookup(NODE_HEIGHT_VAR) {
            config.node_height = parse_dimension(NODE_HEIGHT_VAR, &raw)?;
        }
        Ok(config)
    }
}

fn parse_dimension(key: &str, raw: &str) -> Result<f64, EditorError> {
    let value: f64 = raw.trim().parse().map_err(|_| EditorError::Config {
        key: key.to_string(),
        reason: format!("'{}' is not a number", raw),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(EditorError::Config {
            key: key.to_string(),
            reason: format!("must be a positive size, got {}", value),
        });
    }
    Ok(value)
}
