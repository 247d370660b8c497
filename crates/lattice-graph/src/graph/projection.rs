//! Dense per-agent view used by the analysis passes.
//!
//! Vertices are numbered `0..n` in creation order. Only edges owned by the
//! agent whose endpoints are both agent nodes are projected.

use std::collections::{BTreeSet, HashMap};

use lattice_core::models::{Edge, Node};

use super::store::GraphStore;

#[derive(Debug)]
pub struct AgentProjection<'a> {
    nodes: Vec<&'a Node>,
    edges: Vec<&'a Edge>,
    slots: HashMap<&'a str, usize>,
    out_neighbors: Vec<Vec<usize>>,
    undirected: Vec<Vec<usize>>,
    degree: Vec<usize>,
}

impl<'a> AgentProjection<'a> {
    pub fn build(store: &'a GraphStore, agent_id: &str) -> Self {
        let nodes: Vec<&Node> = store.agent_nodes(agent_id).collect();
        let slots: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.id.as_str(), slot))
            .collect();

        let n = nodes.len();
        let mut out_sets = vec![BTreeSet::new(); n];
        let mut und_sets = vec![BTreeSet::new(); n];
        let mut degree = vec![0usize; n];
        let mut edges = Vec::new();

        for edge in store.agent_edges(agent_id) {
            let (Some(&from), Some(&to)) = (
                slots.get(edge.from_node.as_str()),
                slots.get(edge.to_node.as_str()),
            ) else {
                continue;
            };
            out_sets[from].insert(to);
            und_sets[from].insert(to);
            und_sets[to].insert(from);
            degree[from] += 1;
            degree[to] += 1;
            edges.push(edge);
        }

        Self {
            nodes,
            edges,
            slots,
            out_neighbors: out_sets.into_iter().map(|s| s.into_iter().collect()).collect(),
            undirected: und_sets.into_iter().map(|s| s.into_iter().collect()).collect(),
            degree,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[&'a Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[&'a Edge] {
        &self.edges
    }

    pub fn node(&self, slot: usize) -> &'a Node {
        self.nodes[slot]
    }

    pub fn slot(&self, node_id: &str) -> Option<usize> {
        self.slots.get(node_id).copied()
    }

    /// Distinct successors, ascending slot.
    #[inline]
    pub fn out_neighbors(&self, slot: usize) -> &[usize] {
        &self.out_neighbors[slot]
    }

    /// Distinct neighbors ignoring direction, ascending slot.
    #[inline]
    pub fn neighbors(&self, slot: usize) -> &[usize] {
        &self.undirected[slot]
    }

    /// Incident edge count, parallel edges included.
    #[inline]
    pub fn degree(&self, slot: usize) -> usize {
        self.degree[slot]
    }
}
