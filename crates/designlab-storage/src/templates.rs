//! Built-in starter diagrams.
//!
//! Templates are ordinary semantic graphs with fixed ids and positions. Edge
//! verdicts are computed with the same connection check the editor uses, so
//! a template never disagrees with the live policy.

use serde::{Deserialize, Serialize};

use designlab_check::connection::check_types;
use designlab_core::edge::SemanticEdge;
use designlab_core::graph::SemanticGraph;
use designlab_core::id::{EdgeId, NodeId};
use designlab_core::node::SemanticNode;
use designlab_core::registry::NodeTypeRegistry;
use designlab_core::types::{ConnectionType, NodeType, Position};

/// Difficulty bucket shown in the template picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Basic,
    Intermediate,
    Advanced,
}

/// A named starter diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub graph: SemanticGraph,
}

/// Accumulates nodes and edges for one template.
struct TemplateBuilder {
    registry: NodeTypeRegistry,
    nodes: Vec<SemanticNode>,
    edges: Vec<SemanticEdge>,
}

impl TemplateBuilder {
    fn new() -> Self {
        TemplateBuilder {
            registry: NodeTypeRegistry::standard(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    fn node(mut self, id: &str, node_type: NodeType, x: f64, y: f64) -> Self {
        self.nodes.push(SemanticNode {
            id: NodeId::from(id),
            node_type,
            label: self.registry.label(node_type).to_string(),
            config: serde_json::Map::new(),
            position: Position::new(x, y),
            created_at: 0,
        });
        self
    }

    fn connect(mut self, from: &str, to: &str, connection_type: ConnectionType) -> Self {
        let type_of = |id: &str| {
            self.nodes
                .iter()
                .find(|n| n.id.as_str() == id)
                .map(|n| n.node_type)
        };
        // Unknown ids drop the edge; the per-template edge counts in the
        // tests catch a typo here.
        let verdict = match (type_of(from), type_of(to)) {
            (Some(f), Some(t)) => check_types(&self.registry, f, t),
            _ => return self,
        };
        self.edges.push(SemanticEdge {
            id: EdgeId(format!("{}-{}", from, to)),
            from: NodeId::from(from),
            to: NodeId::from(to),
            connection_type,
            label: None,
            is_valid: verdict.valid,
            validation_message: verdict.message,
        });
        self
    }

    fn build(self, id: &str, name: &str, description: &str, category: TemplateCategory) -> DiagramTemplate {
        DiagramTemplate {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category,
            graph: SemanticGraph::from_parts(self.nodes, self.edges),
        }
    }
}

fn basic_web_app() -> DiagramTemplate {
    use ConnectionType::*;
    use NodeType::*;

    TemplateBuilder::new()
        .node("client", Client, 0.0, 120.0)
        .node("lb", LoadBalancer, 240.0, 120.0)
        .node("api", ApiServer, 480.0, 120.0)
        .node("cache", Cache, 720.0, 0.0)
        .node("db", Database, 720.0, 240.0)
        .connect("client", "lb", Https)
        .connect("lb", "api", Http)
        .connect("api", "cache", Tcp)
        .connect("api", "db", Tcp)
        .build(
            "basic-web-app",
            "Basic Web App",
            "A client talking to a load-balanced API server backed by a database and a cache.",
            TemplateCategory::Basic,
        )
}

fn scalable_web_app() -> DiagramTemplate {
    use ConnectionType::*;
    use NodeType::*;

    TemplateBuilder::new()
        .node("client", Client, 0.0, 200.0)
        .node("cdn", Cdn, 240.0, 0.0)
        .node("assets", ObjectStorage, 480.0, 0.0)
        .node("lb", LoadBalancer, 240.0, 200.0)
        .node("gateway", ApiGateway, 480.0, 200.0)
        .node("auth", AuthService, 720.0, 80.0)
        .node("api", ApiServer, 720.0, 320.0)
        .node("cache", Cache, 960.0, 200.0)
        .node("db", Database, 1200.0, 320.0)
        .node("search", SearchEngine, 960.0, 440.0)
        .node("logs", Logging, 960.0, 560.0)
        .node("archive", ObjectStorage, 1200.0, 560.0)
        .connect("client", "cdn", Https)
        .connect("cdn", "assets", Https)
        .connect("client", "lb", Https)
        .connect("lb", "gateway", Http)
        .connect("gateway", "auth", Grpc)
        .connect("gateway", "api", Http)
        .connect("api", "cache", Tcp)
        .connect("api", "db", Tcp)
        .connect("cache", "db", Tcp)
        .connect("api", "search", Http)
        .connect("api", "logs", Async)
        .connect("logs", "archive", Async)
        .build(
            "scalable-web-app",
            "Scalable Web App",
            "CDN for static assets, a gateway with authentication, caching, search and centralized logging.",
            TemplateCategory::Intermediate,
        )
}

fn event_driven_notifications() -> DiagramTemplate {
    use ConnectionType::*;
    use NodeType::*;

    TemplateBuilder::new()
        .node("client", Client, 0.0, 160.0)
        .node("gateway", ApiGateway, 240.0, 160.0)
        .node("api", ApiServer, 480.0, 160.0)
        .node("db", Database, 720.0, 0.0)
        .node("queue", MessageQueue, 720.0, 160.0)
        .node("notify", NotificationService, 960.0, 80.0)
        .node("analytics", Analytics, 960.0, 280.0)
        .node("warehouse", Database, 1200.0, 280.0)
        .node("logs", Logging, 720.0, 400.0)
        .connect("client", "gateway", Websocket)
        .connect("gateway", "api", Http)
        .connect("api", "db", Tcp)
        .connect("api", "queue", Async)
        .connect("queue", "notify", Async)
        .connect("queue", "analytics", Async)
        .connect("analytics", "warehouse", Tcp)
        .connect("api", "logs", Async)
        .build(
            "event-driven-notifications",
            "Event-Driven Notifications",
            "Requests publish events to a message queue that fans out to notification and analytics consumers.",
            TemplateCategory::Advanced,
        )
}

/// The built-in template catalog, in picker order.
pub fn builtin_templates() -> Vec<DiagramTemplate> {
    vec![basic_web_app(), scalable_web_app(), event_driven_notifications()]
}

/// Looks up a built-in template by id.
pub fn find_template(id: &str) -> Option<DiagramTemplate> {
    builtin_templates().into_iter().find(|t| t.id == id)
}
