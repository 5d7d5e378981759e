//! Connection-policy checks for system-design diagrams.
//!
//! - [`connection`]: per-edge validation against the node type registry
//!   (eager, called when an edge is drawn)
//! - [`audit`]: full-graph scan reporting every finding at once
//! - [`topology`]: isolated components and islands via petgraph
//!
//! All functions are pure: they read the graph but never modify it.

pub mod audit;
pub mod connection;
pub mod diagnostics;
pub mod topology;

pub use audit::audit_graph;
pub use connection::{check_types, classify, validate_connection, ConnectionVerdict, PolicyDecision};
pub use diagnostics::{AuditFinding, GraphAudit};
pub use topology::GraphView;
