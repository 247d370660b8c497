//! Reference `PersistenceAdapter` implementations.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use lattice_core::errors::PersistenceError;
use lattice_core::models::{Edge, GraphSnapshot, Node};
use lattice_core::traits::PersistenceAdapter;

/// Accepts every call and stores nothing. Use when the in-memory graph is
/// the only copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersistence;

impl PersistenceAdapter for NoopPersistence {
    async fn create_node(&self, node: &Node) -> Result<String, PersistenceError> {
        Ok(node.id.clone())
    }

    async fn create_edge(&self, edge: &Edge) -> Result<String, PersistenceError> {
        Ok(edge.id.clone())
    }

    async fn update_node(&self, _node: &Node) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn update_edge(&self, _edge: &Edge) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn delete_node(&self, _node_id: &str) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn delete_edge(&self, _edge_id: &str) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn archive_node(&self, _node: &Node, _reason: &str) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn archive_edge(&self, _edge: &Edge, _reason: &str) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn load_graph(&self, agent_id: &str) -> Result<GraphSnapshot, PersistenceError> {
        Ok(GraphSnapshot::new(agent_id))
    }
}

/// An archived entity and why it was archived.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRecord<T> {
    pub entity: T,
    pub reason: String,
}

#[derive(Debug, Default)]
struct Backend {
    nodes: HashMap<String, Node>,
    edges: HashMap<String, Edge>,
    archived_nodes: Vec<ArchiveRecord<Node>>,
    archived_edges: Vec<ArchiveRecord<Edge>>,
}

/// In-process backend with an archive. `load_graph` returns entities
/// ordered by `created_at`, then id.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    state: Mutex<Backend>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with a snapshot, for hydration.
    pub fn with_snapshot(snapshot: GraphSnapshot) -> Self {
        let backend = Backend {
            nodes: snapshot
                .nodes
                .into_iter()
                .map(|n| (n.id.clone(), n))
                .collect(),
            edges: snapshot
                .edges
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect(),
            ..Backend::default()
        };
        Self {
            state: Mutex::new(backend),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Backend>, PersistenceError> {
        self.state.lock().map_err(|_| PersistenceError::Unavailable {
            reason: "memory backend lock poisoned".to_string(),
        })
    }

    pub fn node(&self, id: &str) -> Option<Node> {
        self.lock().ok()?.nodes.get(id).cloned()
    }

    pub fn edge(&self, id: &str) -> Option<Edge> {
        self.lock().ok()?.edges.get(id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.lock().map_or(0, |b| b.nodes.len())
    }

    pub fn edge_count(&self) -> usize {
        self.lock().map_or(0, |b| b.edges.len())
    }

    pub fn archived_nodes(&self) -> Vec<ArchiveRecord<Node>> {
        self.lock()
            .map(|b| b.archived_nodes.clone())
            .unwrap_or_default()
    }

    pub fn archived_edges(&self) -> Vec<ArchiveRecord<Edge>> {
        self.lock()
            .map(|b| b.archived_edges.clone())
            .unwrap_or_default()
    }

    /// Write a node directly, bypassing the engine.
    pub fn put_node(&self, node: Node) -> Result<(), PersistenceError> {
        self.lock()?.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Write an edge directly, bypassing the engine.
    pub fn put_edge(&self, edge: Edge) -> Result<(), PersistenceError> {
        self.lock()?.edges.insert(edge.id.clone(), edge);
        Ok(())
    }
}

impl PersistenceAdapter for MemoryPersistence {
    async fn create_node(&self, node: &Node) -> Result<String, PersistenceError> {
        self.lock()?.nodes.insert(node.id.clone(), node.clone());
        Ok(node.id.clone())
    }

    async fn create_edge(&self, edge: &Edge) -> Result<String, PersistenceError> {
        self.lock()?.edges.insert(edge.id.clone(), edge.clone());
        Ok(edge.id.clone())
    }

    async fn update_node(&self, node: &Node) -> Result<(), PersistenceError> {
        let mut backend = self.lock()?;
        match backend.nodes.get_mut(&node.id) {
            Some(stored) => {
                *stored = node.clone();
                Ok(())
            }
            None => Err(PersistenceError::failed(
                "update_node",
                format!("unknown node {}", node.id),
            )),
        }
    }

    async fn update_edge(&self, edge: &Edge) -> Result<(), PersistenceError> {
        let mut backend = self.lock()?;
        match backend.edges.get_mut(&edge.id) {
            Some(stored) => {
                *stored = edge.clone();
                Ok(())
            }
            None => Err(PersistenceError::failed(
                "update_edge",
                format!("unknown edge {}", edge.id),
            )),
        }
    }

    async fn delete_node(&self, node_id: &str) -> Result<(), PersistenceError> {
        self.lock()?.nodes.remove(node_id);
        Ok(())
    }

    async fn delete_edge(&self, edge_id: &str) -> Result<(), PersistenceError> {
        self.lock()?.edges.remove(edge_id);
        Ok(())
    }

    async fn archive_node(&self, node: &Node, reason: &str) -> Result<(), PersistenceError> {
        self.lock()?.archived_nodes.push(ArchiveRecord {
            entity: node.clone(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn archive_edge(&self, edge: &Edge, reason: &str) -> Result<(), PersistenceError> {
        self.lock()?.archived_edges.push(ArchiveRecord {
            entity: edge.clone(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn load_graph(&self, agent_id: &str) -> Result<GraphSnapshot, PersistenceError> {
        let backend = self.lock()?;
        let mut nodes: Vec<Node> = backend
            .nodes
            .values()
            .filter(|n| n.belongs_to(agent_id))
            .cloned()
            .collect();
        nodes.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        let mut edges: Vec<Edge> = backend
            .edges
            .values()
            .filter(|e| e.belongs_to(agent_id))
            .cloned()
            .collect();
        edges.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(GraphSnapshot {
            agent_id: agent_id.to_string(),
            nodes,
            edges,
        })
    }
}
