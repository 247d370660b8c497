use crate::errors::PersistenceError;
use crate::models::{Edge, GraphSnapshot, Node};

/// Durable backend behind the in-memory graph.
///
/// Each call is independently failable. Timeouts and retries belong to the
/// implementation; the engine awaits each call exactly once.
#[allow(async_fn_in_trait)]
pub trait PersistenceAdapter: Send + Sync {
    /// Persist a new node, returning the backend id (normally `node.id`).
    async fn create_node(&self, node: &Node) -> Result<String, PersistenceError>;

    /// Persist a new edge, returning the backend id (normally `edge.id`).
    async fn create_edge(&self, edge: &Edge) -> Result<String, PersistenceError>;

    async fn update_node(&self, node: &Node) -> Result<(), PersistenceError>;

    async fn update_edge(&self, edge: &Edge) -> Result<(), PersistenceError>;

    async fn delete_node(&self, node_id: &str) -> Result<(), PersistenceError>;

    async fn delete_edge(&self, edge_id: &str) -> Result<(), PersistenceError>;

    /// Keep a copy of a node that is about to be removed.
    async fn archive_node(&self, node: &Node, reason: &str) -> Result<(), PersistenceError>;

    /// Keep a copy of an edge that is about to be removed.
    async fn archive_edge(&self, edge: &Edge, reason: &str) -> Result<(), PersistenceError>;

    /// Load the authoritative subgraph of one agent.
    async fn load_graph(&self, agent_id: &str) -> Result<GraphSnapshot, PersistenceError>;
}
