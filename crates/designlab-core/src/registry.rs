//! NodeTypeRegistry: the static catalog of node types and their policies.
//!
//! Every [`NodeType`] has exactly one [`NodeMetadata`] entry holding its
//! display data and its [`ConnectionConstraints`]. The table is a fixed-size
//! array indexed by the enum discriminant, built at compile time and never
//! mutated. Targeted advice for forbidden pairs lives in a separate table
//! keyed by the ordered `(from, to)` pair.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Category, NodeType};

/// Outgoing-connection policy for one node type.
///
/// `cannot_connect_to` is checked before `can_connect_to`. An empty
/// `can_connect_to` list means "anything not forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConstraints {
    pub can_connect_to: &'static [NodeType],
    pub cannot_connect_to: &'static [NodeType],
}

impl ConnectionConstraints {
    pub fn allows_explicitly(&self, target: NodeType) -> bool {
        self.can_connect_to.contains(&target)
    }

    pub fn forbids(&self, target: NodeType) -> bool {
        self.cannot_connect_to.contains(&target)
    }
}

/// Display metadata and policy for a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub node_type: NodeType,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Hex stroke color, e.g. `#6366f1`.
    pub color: &'static str,
    pub category: Category,
    pub constraints: ConnectionConstraints,
    /// Roadmap route with background reading, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learn_more: Option<&'static str>,
    pub tips: &'static [&'static str],
}

use NodeType::*;

static NODE_DEFINITIONS: [NodeMetadata; 14] = [
    NodeMetadata {
        node_type: Client,
        label: "Client",
        description: "End-user device (browser, mobile app) that initiates requests to your system.",
        icon: "Monitor",
        color: "#6366f1",
        category: Category::Client,
        constraints: ConnectionConstraints {
            can_connect_to: &[Cdn, LoadBalancer, ApiGateway],
            cannot_connect_to: &[Database, Cache, MessageQueue, ObjectStorage],
        },
        learn_more: None,
        tips: &[
            "Clients should never connect directly to databases",
            "Use CDN for static assets",
            "Consider using WebSocket for real-time features",
        ],
    },
    NodeMetadata {
        node_type: Cdn,
        label: "CDN",
        description: "Content Delivery Network that caches static assets at edge locations closer to users.",
        icon: "Globe",
        color: "#8b5cf6",
        category: Category::Network,
        constraints: ConnectionConstraints {
            can_connect_to: &[LoadBalancer, ApiGateway, ObjectStorage],
            cannot_connect_to: &[Database, Cache, MessageQueue],
        },
        learn_more: Some("/roadmap/cdn"),
        tips: &[
            "Great for static assets (images, CSS, JS)",
            "Reduces latency for geographically distributed users",
            "Can cache API responses for read-heavy workloads",
        ],
    },
    NodeMetadata {
        node_type: LoadBalancer,
        label: "Load Balancer",
        description: "Distributes incoming traffic across multiple servers to ensure reliability and scalability.",
        icon: "Layers",
        color: "#0ea5e9",
        category: Category::Network,
        constraints: ConnectionConstraints {
            can_connect_to: &[ApiServer, ApiGateway, AuthService],
            cannot_connect_to: &[Database, ObjectStorage],
        },
        learn_more: Some("/roadmap/load-balancers"),
        tips: &[
            "Use health checks to route traffic to healthy instances",
            "Consider sticky sessions for stateful applications",
            "Round-robin is simplest, least-connections for varying load",
        ],
    },
    NodeMetadata {
        node_type: ApiGateway,
        label: "API Gateway",
        description: "Single entry point that handles routing, authentication, rate limiting, and request transformation.",
        icon: "Server",
        color: "#10b981",
        category: Category::Network,
        constraints: ConnectionConstraints {
            can_connect_to: &[ApiServer, AuthService, Cache, MessageQueue],
            cannot_connect_to: &[Database],
        },
        learn_more: Some("/roadmap/api-gateway"),
        tips: &[
            "Centralize cross-cutting concerns (auth, logging, rate limiting)",
            "Can aggregate multiple microservice responses",
            "Useful for API versioning",
        ],
    },
    NodeMetadata {
        node_type: ApiServer,
        label: "API Server",
        description: "Application server that processes business logic and handles API requests.",
        icon: "Cpu",
        color: "#14b8a6",
        category: Category::Compute,
        constraints: ConnectionConstraints {
            can_connect_to: &[
                Database,
                Cache,
                MessageQueue,
                ObjectStorage,
                AuthService,
                SearchEngine,
                NotificationService,
                Analytics,
                Logging,
            ],
            cannot_connect_to: &[Client, Cdn],
        },
        learn_more: Some("/roadmap/apis"),
        tips: &[
            "Keep stateless for horizontal scaling",
            "Use connection pooling for database connections",
            "Implement circuit breakers for resilience",
        ],
    },
    NodeMetadata {
        node_type: AuthService,
        label: "Auth Service",
        description: "Handles user authentication, authorization, and session management.",
        icon: "Shield",
        color: "#f59e0b",
        category: Category::Compute,
        constraints: ConnectionConstraints {
            can_connect_to: &[Database, Cache],
            cannot_connect_to: &[Client, Cdn, ObjectStorage, MessageQueue],
        },
        learn_more: None,
        tips: &[
            "Use JWT for stateless authentication",
            "Store sessions in Redis for distributed systems",
            "Implement rate limiting to prevent brute force",
        ],
    },
    NodeMetadata {
        node_type: Database,
        label: "Database",
        description: "Persistent storage for structured data (SQL or NoSQL).",
        icon: "Database",
        color: "#ef4444",
        category: Category::Storage,
        constraints: ConnectionConstraints {
            // Replication.
            can_connect_to: &[Database],
            cannot_connect_to: &[Client, Cdn, LoadBalancer],
        },
        learn_more: Some("/roadmap/database-types"),
        tips: &[
            "Use read replicas for read-heavy workloads",
            "Consider sharding for massive scale",
            "Always have backups and recovery procedures",
        ],
    },
    NodeMetadata {
        node_type: Cache,
        label: "Cache (Redis)",
        description: "In-memory data store for frequently accessed data to reduce database load.",
        icon: "Zap",
        color: "#dc2626",
        category: Category::Storage,
        constraints: ConnectionConstraints {
            can_connect_to: &[Database],
            cannot_connect_to: &[Client, Cdn, LoadBalancer],
        },
        learn_more: Some("/roadmap/caching"),
        tips: &[
            "Cache invalidation is one of the hardest problems",
            "Use TTL to prevent stale data",
            "Consider cache-aside vs write-through patterns",
        ],
    },
    NodeMetadata {
        node_type: MessageQueue,
        label: "Message Queue",
        description: "Async communication between services using publish/subscribe or point-to-point messaging.",
        icon: "MessageSquare",
        color: "#7c3aed",
        category: Category::Messaging,
        constraints: ConnectionConstraints {
            can_connect_to: &[ApiServer, NotificationService, Analytics],
            cannot_connect_to: &[Client, Cdn, Database],
        },
        learn_more: Some("/roadmap/message-queues"),
        tips: &[
            "Use for decoupling services",
            "Great for handling traffic spikes",
            "Ensure idempotent consumers",
        ],
    },
    NodeMetadata {
        node_type: ObjectStorage,
        label: "Object Storage",
        description: "Scalable storage for unstructured data like images, videos, and files.",
        icon: "HardDrive",
        color: "#f97316",
        category: Category::Storage,
        constraints: ConnectionConstraints {
            can_connect_to: &[Cdn],
            cannot_connect_to: &[Client, LoadBalancer, Database],
        },
        learn_more: None,
        tips: &[
            "Use signed URLs for secure access",
            "Enable CDN for public assets",
            "Consider lifecycle policies for cost optimization",
        ],
    },
    NodeMetadata {
        node_type: SearchEngine,
        label: "Search Engine",
        description: "Full-text search service (Elasticsearch, Algolia) for fast and relevant search results.",
        icon: "Search",
        color: "#22c55e",
        category: Category::Compute,
        constraints: ConnectionConstraints {
            can_connect_to: &[],
            cannot_connect_to: &[Client, Cdn, LoadBalancer, Database],
        },
        learn_more: None,
        tips: &[
            "Index only what you need to search",
            "Use async sync from primary database",
            "Consider relevance tuning for better results",
        ],
    },
    NodeMetadata {
        node_type: NotificationService,
        label: "Notification Service",
        description: "Handles push notifications, emails, SMS, and in-app notifications.",
        icon: "Bell",
        color: "#ec4899",
        category: Category::Messaging,
        constraints: ConnectionConstraints {
            can_connect_to: &[MessageQueue],
            cannot_connect_to: &[Client, Cdn, Database],
        },
        learn_more: None,
        tips: &[
            "Use message queue for reliability",
            "Implement retry logic with backoff",
            "Track delivery status",
        ],
    },
    NodeMetadata {
        node_type: Analytics,
        label: "Analytics",
        description: "Collects and processes metrics, logs, and user behavior data.",
        icon: "BarChart3",
        color: "#3b82f6",
        category: Category::Monitoring,
        constraints: ConnectionConstraints {
            can_connect_to: &[Database, ObjectStorage],
            cannot_connect_to: &[Client, Cdn, LoadBalancer],
        },
        learn_more: None,
        tips: &[
            "Use sampling for high-volume data",
            "Store raw events for flexibility",
            "Consider real-time vs batch processing needs",
        ],
    },
    NodeMetadata {
        node_type: Logging,
        label: "Logging",
        description: "Centralized log aggregation and monitoring (ELK, Datadog, etc.).",
        icon: "FileText",
        color: "#64748b",
        category: Category::Monitoring,
        constraints: ConnectionConstraints {
            can_connect_to: &[ObjectStorage],
            cannot_connect_to: &[Client, Cdn, Database],
        },
        learn_more: None,
        tips: &[
            "Use structured logging (JSON)",
            "Include correlation IDs for tracing",
            "Set up alerts for critical errors",
        ],
    },
];

/// Targeted advice appended to the message of a forbidden connection.
static CONNECTION_ADVICE: &[((NodeType, NodeType), &str)] = &[
    (
        (Client, Database),
        "Use an API server or API gateway as an intermediary for security.",
    ),
    (
        (Cdn, Database),
        "CDN should connect to API servers or object storage, not directly to databases.",
    ),
    (
        (Cdn, Cache),
        "CDN caches at the edge level; Redis cache is for application-level caching.",
    ),
];

/// Read-only handle to the node type catalog.
///
/// Cheap to copy; pass it to every component that needs policy lookups.
#[derive(Debug, Clone, Copy)]
pub struct NodeTypeRegistry {
    table: &'static [NodeMetadata; 14],
    advice: &'static [((NodeType, NodeType), &'static str)],
}

impl NodeTypeRegistry {
    /// The built-in catalog of the 14 system-design node types.
    pub fn standard() -> Self {
        NodeTypeRegistry {
            table: &NODE_DEFINITIONS,
            advice: CONNECTION_ADVICE,
        }
    }

    /// A catalog over a caller-supplied table, e.g. a curriculum with
    /// stricter rules. Entry `i` must describe `NodeType::ALL[i]`.
    pub fn custom(
        table: &'static [NodeMetadata; 14],
        advice: &'static [((NodeType, NodeType), &'static str)],
    ) -> Self {
        debug_assert!(NodeType::ALL
            .iter()
            .zip(table.iter())
            .all(|(ty, meta)| meta.node_type == *ty));
        NodeTypeRegistry { table, advice }
    }

    /// The full metadata table in registry order.
    pub fn definitions(&self) -> &'static [NodeMetadata; 14] {
        self.table
    }

    /// Returns the metadata for a node type.
    pub fn metadata_for(&self, node_type: NodeType) -> &'static NodeMetadata {
        &self.table[node_type as usize]
    }

    /// Looks up metadata by its snake_case tag.
    ///
    /// Returns [`CoreError::UnknownNodeType`] for tags outside the catalog.
    pub fn lookup(&self, tag: &str) -> Result<&'static NodeMetadata, CoreError> {
        let node_type: NodeType = tag.parse()?;
        Ok(self.metadata_for(node_type))
    }

    /// Display label for a node type.
    pub fn label(&self, node_type: NodeType) -> &'static str {
        self.metadata_for(node_type).label
    }

    pub fn constraints(&self, node_type: NodeType) -> &'static ConnectionConstraints {
        &self.metadata_for(node_type).constraints
    }

    pub fn all_types(&self) -> &'static [NodeType] {
        &NodeType::ALL
    }

    /// Groups metadata by category, in palette order. Empty categories are
    /// omitted.
    pub fn by_category(&self) -> IndexMap<Category, Vec<&'static NodeMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&'static NodeMetadata>> = IndexMap::new();
        for category in Category::ALL {
            let members: Vec<&'static NodeMetadata> = self
                .table
                .iter()
                .filter(|meta| meta.category == category)
                .collect();
            if !members.is_empty() {
                grouped.insert(category, members);
            }
        }
        grouped
    }

    /// Advice for a specific ordered pair, or `""` when none is recorded.
    pub fn connection_advice(&self, from: NodeType, to: NodeType) -> &'static str {
        self.advice
            .iter()
            .find(|((f, t), _)| *f == from && *t == to)
            .map(|(_, text)| *text)
            .unwrap_or("")
    }

    /// Display labels of the explicitly allowed targets of `node_type`.
    pub fn allowed_target_labels(&self, node_type: NodeType) -> Vec<&'static str> {
        self.constraints(node_type)
            .can_connect_to
            .iter()
            .map(|t| self.label(*t))
            .collect()
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn table_entries_match_their_index() {
        let registry = NodeTypeRegistry::standard();
        for ty in NodeType::ALL {
            assert_eq!(registry.metadata_for(ty).node_type, ty);
        }
    }

    #[test]
    fn client_forbids_database_and_explains_why() {
        let registry = NodeTypeRegistry::standard();
        let constraints = registry.constraints(NodeType::Client);
        assert!(constraints.forbids(NodeType::Database));
        assert!(registry
            .connection_advice(NodeType::Client, NodeType::Database)
            .contains("API"));
    }

    #[test]
    fn advice_is_keyed_by_ordered_pair() {
        let registry = NodeTypeRegistry::standard();
        assert_eq!(
            registry.connection_advice(NodeType::Database, NodeType::Client),
            ""
        );
        assert_eq!(
            registry.connection_advice(NodeType::ApiServer, NodeType::Database),
            ""
        );
    }

    #[test]
    fn no_type_both_allows_and_forbids_the_same_target() {
        let registry = NodeTypeRegistry::standard();
        for ty in NodeType::ALL {
            let c = registry.constraints(ty);
            for target in c.can_connect_to {
                assert!(!c.forbids(*target), "{ty} both allows and forbids {target}");
            }
        }
    }

    #[test]
    fn by_category_covers_every_type_once() {
        let registry = NodeTypeRegistry::standard();
        let grouped = registry.by_category();
        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, NodeType::ALL.len());
        assert_eq!(grouped.keys().next(), Some(&Category::Client));
        let storage: Vec<NodeType> = grouped[&Category::Storage]
            .iter()
            .map(|m| m.node_type)
            .collect();
        assert_eq!(
            storage,
            vec![NodeType::Database, NodeType::Cache, NodeType::ObjectStorage]
        );
    }

    #[test]
    fn lookup_by_tag() {
        let registry = NodeTypeRegistry::standard();
        assert_eq!(registry.lookup("cache").unwrap().label, "Cache (Redis)");
        assert!(matches!(
            registry.lookup("quantum_computer"),
            Err(CoreError::UnknownNodeType { .. })
        ));
    }

    #[test]
    fn search_engine_is_terminal() {
        let registry = NodeTypeRegistry::standard();
        assert!(registry.allowed_target_labels(NodeType::SearchEngine).is_empty());
        assert_eq!(
            registry.allowed_target_labels(NodeType::Cache),
            vec!["Database"]
        );
    }

    proptest! {
        #[test]
        fn tag_lookup_agrees_with_serde(i in 0usize..14) {
            let registry = NodeTypeRegistry::standard();
            let ty = NodeType::ALL[i];
            prop_assert_eq!(registry.lookup(ty.tag()).unwrap().node_type, ty);
            prop_assert_eq!(serde_json::to_value(ty).unwrap(), serde_json::json!(ty.tag()));
        }

        #[test]
        fn allowed_labels_follow_constraint_order(i in 0usize..14) {
            let registry = NodeTypeRegistry::standard();
            let ty = NodeType::ALL[i];
            let expected: Vec<&str> = registry
                .constraints(ty)
                .can_connect_to
                .iter()
                .map(|t| registry.label(*t))
                .collect();
            prop_assert_eq!(registry.allowed_target_labels(ty), expected);
        }
    }
}
