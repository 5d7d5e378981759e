//! Vocabulary types for system-design diagrams.
//!
//! [`NodeType`] is the closed set of infrastructure components a learner can
//! place on the canvas. It drives every policy lookup in the registry.
//! [`ConnectionType`] labels an edge's transport and is purely cosmetic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Infrastructure component kinds available in the palette.
///
/// The discriminant order matches the registry table, so `node_type as usize`
/// is a valid index into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Client,
    Cdn,
    LoadBalancer,
    ApiGateway,
    ApiServer,
    AuthService,
    Database,
    Cache,
    MessageQueue,
    ObjectStorage,
    SearchEngine,
    NotificationService,
    Analytics,
    Logging,
}

impl NodeType {
    /// Every node type, in registry order.
    pub const ALL: [NodeType; 14] = [
        NodeType::Client,
        NodeType::Cdn,
        NodeType::LoadBalancer,
        NodeType::ApiGateway,
        NodeType::ApiServer,
        NodeType::AuthService,
        NodeType::Database,
        NodeType::Cache,
        NodeType::MessageQueue,
        NodeType::ObjectStorage,
        NodeType::SearchEngine,
        NodeType::NotificationService,
        NodeType::Analytics,
        NodeType::Logging,
    ];

    /// The snake_case tag used in saved diagrams and templates.
    pub fn tag(self) -> &'static str {
        match self {
            NodeType::Client => "client",
            NodeType::Cdn => "cdn",
            NodeType::LoadBalancer => "load_balancer",
            NodeType::ApiGateway => "api_gateway",
            NodeType::ApiServer => "api_server",
            NodeType::AuthService => "auth_service",
            NodeType::Database => "database",
            NodeType::Cache => "cache",
            NodeType::MessageQueue => "message_queue",
            NodeType::ObjectStorage => "object_storage",
            NodeType::SearchEngine => "search_engine",
            NodeType::NotificationService => "notification_service",
            NodeType::Analytics => "analytics",
            NodeType::Logging => "logging",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for NodeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == s)
            .ok_or_else(|| CoreError::UnknownNodeType { tag: s.to_string() })
    }
}

/// Palette grouping for node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Client,
    Network,
    Compute,
    Storage,
    Messaging,
    Monitoring,
}

impl Category {
    /// Every category, in palette order.
    pub const ALL: [Category; 6] = [
        Category::Client,
        Category::Network,
        Category::Compute,
        Category::Storage,
        Category::Messaging,
        Category::Monitoring,
    ];

    /// Section heading shown above the category in the palette.
    pub fn label(self) -> &'static str {
        match self {
            Category::Client => "Clients",
            Category::Network => "Network Layer",
            Category::Compute => "Compute",
            Category::Storage => "Storage",
            Category::Messaging => "Messaging",
            Category::Monitoring => "Monitoring",
        }
    }
}

/// Transport label on an edge. Has no effect on validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    #[default]
    Http,
    Https,
    Grpc,
    Websocket,
    Async,
    Tcp,
}

impl ConnectionType {
    pub fn tag(self) -> &'static str {
        match self {
            ConnectionType::Http => "http",
            ConnectionType::Https => "https",
            ConnectionType::Grpc => "grpc",
            ConnectionType::Websocket => "websocket",
            ConnectionType::Async => "async",
            ConnectionType::Tcp => "tcp",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ConnectionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(ConnectionType::Http),
            "https" => Ok(ConnectionType::Https),
            "grpc" => Ok(ConnectionType::Grpc),
            "websocket" => Ok(ConnectionType::Websocket),
            "async" => Ok(ConnectionType::Async),
            "tcp" => Ok(ConnectionType::Tcp),
            other => Err(CoreError::UnknownConnectionType {
                tag: other.to_string(),
            }),
        }
    }
}

/// Canvas coordinates of a node's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}
