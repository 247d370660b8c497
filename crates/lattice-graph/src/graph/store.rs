//! petgraph::StableGraph wrapper holding every node and edge of every agent.
//!
//! Creation order is tracked with a monotonic ordinal shared by nodes and
//! edges; per-agent listings iterate in that order.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use lattice_core::errors::{EntityKind, LatticeError, LatticeResult, ValidationError};
use lattice_core::models::{Edge, EdgeKey, GraphSnapshot, Node, Properties};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use super::adjacency::AdjacencyIndex;

/// The underlying directed multigraph.
pub type KnowledgeStableGraph = StableGraph<Node, Edge, Directed>;

#[derive(Debug, Clone, Copy)]
struct Slot<I> {
    ordinal: u64,
    index: I,
}

/// An entity removed from the store together with its creation ordinal, so
/// that a rollback can put it back where it was.
#[derive(Debug, Clone)]
pub struct Tombstone<T> {
    pub ordinal: u64,
    pub entity: T,
}

/// Outcome of rebuilding one agent's slice of the adjacency index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexRebuild {
    /// `(node, successor)` pairs in the rebuilt slice.
    pub entries: usize,
    /// The live slice differed from the derived one.
    pub drift: bool,
}

/// Indexed, multi-agent graph store.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: KnowledgeStableGraph,
    nodes: HashMap<String, Slot<NodeIndex>>,
    edges: HashMap<String, Slot<EdgeIndex>>,
    edge_keys: HashMap<EdgeKey, Vec<String>>,
    agent_nodes: HashMap<String, BTreeMap<u64, String>>,
    agent_edges: HashMap<String, BTreeMap<u64, String>>,
    adjacency: AdjacencyIndex,
    next_ordinal: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn agent_node_count(&self, agent_id: &str) -> usize {
        self.agent_nodes.get(agent_id).map_or(0, BTreeMap::len)
    }

    pub fn agent_edge_count(&self, agent_id: &str) -> usize {
        self.agent_edges.get(agent_id).map_or(0, BTreeMap::len)
    }

    /// Agents owning at least one node or edge, sorted.
    pub fn agents(&self) -> Vec<String> {
        let mut agents: Vec<String> = self
            .agent_nodes
            .iter()
            .chain(self.agent_edges.iter())
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(agent, _)| agent.clone())
            .collect();
        agents.sort();
        agents.dedup();
        agents
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        let slot = self.nodes.get(id)?;
        self.graph.node_weight(slot.index)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        let slot = self.edges.get(id)?;
        self.graph.edge_weight(slot.index)
    }

    pub fn get_node(&self, id: &str) -> LatticeResult<&Node> {
        self.node(id).ok_or_else(|| LatticeError::node_not_found(id))
    }

    pub fn get_edge(&self, id: &str) -> LatticeResult<&Edge> {
        self.edge(id).ok_or_else(|| LatticeError::edge_not_found(id))
    }

    /// Creation ordinal of a node or edge.
    pub fn ordinal(&self, id: &str) -> Option<u64> {
        self.nodes
            .get(id)
            .map(|s| s.ordinal)
            .or_else(|| self.edges.get(id).map(|s| s.ordinal))
    }

    /// Ids of the edges currently holding `key`, oldest first.
    pub fn edges_with_key(&self, key: &EdgeKey) -> &[String] {
        self.edge_keys.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// An agent's nodes in creation order.
    pub fn agent_nodes<'a>(&'a self, agent_id: &str) -> impl Iterator<Item = &'a Node> + 'a {
        self.agent_nodes
            .get(agent_id)
            .into_iter()
            .flat_map(|entries| entries.values())
            .filter_map(move |id| self.node(id))
    }

    /// An agent's edges in creation order.
    pub fn agent_edges<'a>(&'a self, agent_id: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.agent_edges
            .get(agent_id)
            .into_iter()
            .flat_map(|entries| entries.values())
            .filter_map(move |id| self.edge(id))
    }

    /// Edges leaving `node_id`, in creation order.
    pub fn outgoing_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.directed_edges(node_id, &[Direction::Outgoing])
    }

    /// Edges arriving at `node_id`, in creation order.
    pub fn incoming_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.directed_edges(node_id, &[Direction::Incoming])
    }

    /// Every edge touching `node_id`, in creation order.
    pub fn incident_edges(&self, node_id: &str) -> Vec<&Edge> {
        self.directed_edges(node_id, &[Direction::Outgoing, Direction::Incoming])
    }

    /// In-degree plus out-degree.
    pub fn degree(&self, node_id: &str) -> usize {
        let Some(slot) = self.nodes.get(node_id) else {
            return 0;
        };
        self.graph
            .edges_directed(slot.index, Direction::Outgoing)
            .count()
            + self
                .graph
                .edges_directed(slot.index, Direction::Incoming)
                .count()
    }

    fn directed_edges(&self, node_id: &str, directions: &[Direction]) -> Vec<&Edge> {
        let Some(slot) = self.nodes.get(node_id) else {
            return Vec::new();
        };
        let mut found: Vec<(u64, &Edge)> = Vec::new();
        for &direction in directions {
            for edge_ref in self.graph.edges_directed(slot.index, direction) {
                let edge = edge_ref.weight();
                let ordinal = self.edges.get(&edge.id).map_or(u64::MAX, |s| s.ordinal);
                found.push((ordinal, edge));
            }
        }
        found.sort_by_key(|(ordinal, _)| *ordinal);
        found.into_iter().map(|(_, edge)| edge).collect()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert a node with a fresh creation ordinal.
    pub fn create_node(&mut self, node: Node) -> LatticeResult<()> {
        let ordinal = self.bump();
        self.attach_node(node, ordinal)
    }

    /// Insert an edge, enforcing `(from, to, type)` uniqueness.
    pub fn create_edge(&mut self, edge: Edge) -> LatticeResult<()> {
        let key = edge.key();
        if !self.edges_with_key(&key).is_empty() {
            return Err(LatticeError::AlreadyExists {
                kind: EntityKind::Edge,
                key: key.to_string(),
            });
        }
        let ordinal = self.bump();
        self.attach_edge(edge, ordinal)
    }

    /// Insert an edge read back from a backend. Duplicate keys are tolerated
    /// here and collapsed by the optimizer's dedup pass.
    pub fn load_edge(&mut self, edge: Edge) -> LatticeResult<()> {
        let ordinal = self.bump();
        self.attach_edge(edge, ordinal)
    }

    /// Merge `properties` into a node and touch `updated_at`. Returns the prior state.
    pub fn update_node(&mut self, id: &str, properties: &Properties) -> LatticeResult<Node> {
        let slot = *self
            .nodes
            .get(id)
            .ok_or_else(|| LatticeError::node_not_found(id))?;
        let node = self
            .graph
            .node_weight_mut(slot.index)
            .ok_or_else(|| dangling(EntityKind::Node, id))?;
        let prior = node.clone();
        for (key, value) in properties {
            node.properties.insert(key.clone(), value.clone());
        }
        node.updated_at = Utc::now();
        Ok(prior)
    }

    /// Change an edge's weight and/or merge properties. Returns the prior state.
    pub fn update_edge(
        &mut self,
        id: &str,
        weight: Option<f64>,
        properties: Option<&Properties>,
    ) -> LatticeResult<Edge> {
        let slot = *self
            .edges
            .get(id)
            .ok_or_else(|| LatticeError::edge_not_found(id))?;
        let edge = self
            .graph
            .edge_weight_mut(slot.index)
            .ok_or_else(|| dangling(EntityKind::Edge, id))?;
        let prior = edge.clone();
        if let Some(weight) = weight {
            edge.weight = weight;
        }
        if let Some(properties) = properties {
            for (key, value) in properties {
                edge.properties.insert(key.clone(), value.clone());
            }
        }
        edge.updated_at = Utc::now();
        Ok(prior)
    }

    /// Overwrite a node in place. The owning agent may not change.
    pub fn replace_node(&mut self, node: Node) -> LatticeResult<Node> {
        let slot = *self
            .nodes
            .get(&node.id)
            .ok_or_else(|| LatticeError::node_not_found(&node.id))?;
        let current = self
            .graph
            .node_weight_mut(slot.index)
            .ok_or_else(|| dangling(EntityKind::Node, &node.id))?;
        if current.agent_id() != node.agent_id() {
            return Err(ValidationError::ImmutableProperty {
                key: lattice_core::constants::AGENT_ID_PROPERTY.to_string(),
            }
            .into());
        }
        Ok(std::mem::replace(current, node))
    }

    /// Overwrite an edge, moving it when its endpoints or type changed.
    /// The creation ordinal is kept.
    pub fn replace_edge(&mut self, edge: Edge) -> LatticeResult<Edge> {
        let slot = *self
            .edges
            .get(&edge.id)
            .ok_or_else(|| LatticeError::edge_not_found(&edge.id))?;
        let current = self
            .graph
            .edge_weight(slot.index)
            .ok_or_else(|| dangling(EntityKind::Edge, &edge.id))?;
        if current.agent_id() != edge.agent_id() {
            return Err(ValidationError::ImmutableProperty {
                key: lattice_core::constants::AGENT_ID_PROPERTY.to_string(),
            }
            .into());
        }
        if current.key() == edge.key() {
            let current = self
                .graph
                .edge_weight_mut(slot.index)
                .ok_or_else(|| dangling(EntityKind::Edge, &edge.id))?;
            return Ok(std::mem::replace(current, edge));
        }
        let removed = self.detach_edge(&edge.id)?;
        if let Err(e) = self.attach_edge(edge, slot.ordinal) {
            // Put the original back so a failed move leaves nothing half-done.
            self.attach_edge(removed.entity, removed.ordinal)?;
            return Err(e);
        }
        Ok(removed.entity)
    }

    pub fn delete_edge(&mut self, id: &str) -> LatticeResult<Tombstone<Edge>> {
        self.detach_edge(id)
    }

    /// Remove a node and every incident edge. Edges come back oldest first.
    pub fn delete_node(&mut self, id: &str) -> LatticeResult<(Tombstone<Node>, Vec<Tombstone<Edge>>)> {
        let slot = *self
            .nodes
            .get(id)
            .ok_or_else(|| LatticeError::node_not_found(id))?;
        let incident: Vec<String> = self
            .incident_edges(id)
            .into_iter()
            .map(|e| e.id.clone())
            .collect();
        let mut removed_edges = Vec::with_capacity(incident.len());
        for edge_id in incident {
            removed_edges.push(self.detach_edge(&edge_id)?);
        }
        let node = self
            .graph
            .remove_node(slot.index)
            .ok_or_else(|| dangling(EntityKind::Node, id))?;
        self.nodes.remove(id);
        if let Some(agent) = node.agent_id() {
            if let Some(entries) = self.agent_nodes.get_mut(agent) {
                entries.remove(&slot.ordinal);
            }
        }
        self.adjacency.remove_node(id);
        Ok((
            Tombstone {
                ordinal: slot.ordinal,
                entity: node,
            },
            removed_edges,
        ))
    }

    /// Reinsert a removed node at its original position.
    pub fn restore_node(&mut self, tombstone: Tombstone<Node>) -> LatticeResult<()> {
        self.attach_node(tombstone.entity, tombstone.ordinal)
    }

    /// Reinsert a removed edge at its original position.
    pub fn restore_edge(&mut self, tombstone: Tombstone<Edge>) -> LatticeResult<()> {
        self.attach_edge(tombstone.entity, tombstone.ordinal)
    }

    /// Edges owned by other agents that touch one of `agent_id`'s nodes,
    /// oldest first. `remove_agent` drops these along with the nodes.
    pub fn foreign_incident_edges(&self, agent_id: &str) -> Vec<Tombstone<Edge>> {
        let mut found: BTreeMap<u64, Edge> = BTreeMap::new();
        for node in self.agent_nodes(agent_id) {
            for edge in self.incident_edges(&node.id) {
                if edge.belongs_to(agent_id) {
                    continue;
                }
                if let Some(slot) = self.edges.get(&edge.id) {
                    found.entry(slot.ordinal).or_insert_with(|| edge.clone());
                }
            }
        }
        found
            .into_iter()
            .map(|(ordinal, entity)| Tombstone { ordinal, entity })
            .collect()
    }

    /// Drop every node and edge owned by `agent_id`.
    pub fn remove_agent(&mut self, agent_id: &str) -> LatticeResult<(usize, usize)> {
        let edge_ids: Vec<String> = self
            .agent_edges
            .get(agent_id)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default();
        let mut edges_removed = 0;
        for id in edge_ids {
            if self.contains_edge(&id) {
                self.detach_edge(&id)?;
                edges_removed += 1;
            }
        }
        let node_ids: Vec<String> = self
            .agent_nodes
            .get(agent_id)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default();
        let mut nodes_removed = 0;
        for id in node_ids {
            let (_, cascaded) = self.delete_node(&id)?;
            edges_removed += cascaded.len();
            nodes_removed += 1;
        }
        self.agent_nodes.remove(agent_id);
        self.agent_edges.remove(agent_id);
        Ok((nodes_removed, edges_removed))
    }

    /// Copy of one agent's subgraph in creation order.
    pub fn snapshot(&self, agent_id: &str) -> GraphSnapshot {
        GraphSnapshot {
            agent_id: agent_id.to_string(),
            nodes: self.agent_nodes(agent_id).cloned().collect(),
            edges: self.agent_edges(agent_id).cloned().collect(),
        }
    }

    // ── Index maintenance ─────────────────────────────────────────────────

    /// Recompute the adjacency entries of one agent's nodes from the edge set.
    pub fn rebuild_index(&mut self, agent_id: &str) -> IndexRebuild {
        let ids: Vec<(String, NodeIndex)> = self
            .agent_nodes
            .get(agent_id)
            .into_iter()
            .flat_map(|entries| entries.values())
            .filter_map(|id| self.nodes.get(id).map(|s| (id.clone(), s.index)))
            .collect();
        let mut result = IndexRebuild::default();
        for (id, index) in ids {
            let outgoing = self.derived_links(index, Direction::Outgoing);
            let incoming = self.derived_links(index, Direction::Incoming);
            result.entries += outgoing.len();
            if self.adjacency.replace_links(&id, outgoing, incoming) {
                result.drift = true;
            }
        }
        result
    }

    /// Whether the live adjacency index equals one derived from scratch.
    pub fn verify_index(&self) -> bool {
        let derived = AdjacencyIndex::derive(
            self.graph.node_weights().map(|n| n.id.as_str()),
            self.graph.edge_weights(),
        );
        derived == self.adjacency
    }

    fn derived_links(&self, index: NodeIndex, direction: Direction) -> BTreeMap<String, usize> {
        let mut links = BTreeMap::new();
        for edge_ref in self.graph.edges_directed(index, direction) {
            let edge = edge_ref.weight();
            let other = match direction {
                Direction::Outgoing => &edge.to_node,
                Direction::Incoming => &edge.from_node,
            };
            *links.entry(other.clone()).or_insert(0) += 1;
        }
        links
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn bump(&mut self) -> u64 {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        ordinal
    }

    fn attach_node(&mut self, node: Node, ordinal: u64) -> LatticeResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(LatticeError::AlreadyExists {
                kind: EntityKind::Node,
                key: node.id,
            });
        }
        let agent = owner(node.agent_id())?;
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.nodes.insert(id.clone(), Slot { ordinal, index });
        self.agent_nodes.entry(agent).or_default().insert(ordinal, id.clone());
        self.adjacency.add_node(&id);
        self.next_ordinal = self.next_ordinal.max(ordinal + 1);
        Ok(())
    }

    fn attach_edge(&mut self, edge: Edge, ordinal: u64) -> LatticeResult<()> {
        if self.edges.contains_key(&edge.id) {
            return Err(LatticeError::AlreadyExists {
                kind: EntityKind::Edge,
                key: edge.id,
            });
        }
        if edge.from_node == edge.to_node {
            return Err(ValidationError::SelfLoop {
                node_id: edge.from_node,
            }
            .into());
        }
        let from = self.endpoint(&edge.from_node)?;
        let to = self.endpoint(&edge.to_node)?;
        let agent = owner(edge.agent_id())?;
        let id = edge.id.clone();
        let key = edge.key();
        let (from_id, to_id) = (edge.from_node.clone(), edge.to_node.clone());
        let index = self.graph.add_edge(from, to, edge);
        self.edges.insert(id.clone(), Slot { ordinal, index });
        let holders = self.edge_keys.entry(key).or_default();
        holders.push(id.clone());
        holders.sort_by_key(|holder| {
            self.edges
                .get(holder)
                .map_or(u64::MAX, |slot| slot.ordinal)
        });
        self.agent_edges.entry(agent).or_default().insert(ordinal, id);
        self.adjacency.link(&from_id, &to_id);
        self.next_ordinal = self.next_ordinal.max(ordinal + 1);
        Ok(())
    }

    fn detach_edge(&mut self, id: &str) -> LatticeResult<Tombstone<Edge>> {
        let slot = self
            .edges
            .remove(id)
            .ok_or_else(|| LatticeError::edge_not_found(id))?;
        let edge = self
            .graph
            .remove_edge(slot.index)
            .ok_or_else(|| dangling(EntityKind::Edge, id))?;
        let key = edge.key();
        if let Some(holders) = self.edge_keys.get_mut(&key) {
            holders.retain(|holder| holder != id);
            if holders.is_empty() {
                self.edge_keys.remove(&key);
            }
        }
        if let Some(agent) = edge.agent_id() {
            if let Some(entries) = self.agent_edges.get_mut(agent) {
                entries.remove(&slot.ordinal);
            }
        }
        self.adjacency.unlink(&edge.from_node, &edge.to_node);
        Ok(Tombstone {
            ordinal: slot.ordinal,
            entity: edge,
        })
    }

    fn endpoint(&self, node_id: &str) -> LatticeResult<NodeIndex> {
        self.nodes
            .get(node_id)
            .map(|slot| slot.index)
            .ok_or_else(|| {
                ValidationError::MissingEndpoint {
                    node_id: node_id.to_string(),
                }
                .into()
            })
    }
}

fn owner(agent_id: Option<&str>) -> LatticeResult<String> {
    match agent_id {
        Some(agent) if !agent.is_empty() => Ok(agent.to_string()),
        _ => Err(ValidationError::InvalidAgentId {
            reason: "entity carries no agent_id property".to_string(),
        }
        .into()),
    }
}

fn dangling(kind: EntityKind, id: &str) -> LatticeError {
    LatticeError::Internal {
        reason: format!("{kind} {id} is indexed but missing from the graph"),
    }
}
