//! Adjacency index: node id → directly reachable node ids (plus the reverse map).
//!
//! Links are reference-counted so that parallel edges of different
//! relationship types between the same pair keep the pair linked until the
//! last of them is removed. The index is never authoritative; it must equal
//! `AdjacencyIndex::derive` over the current edge set.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use lattice_core::models::Edge;

type Links = BTreeMap<String, usize>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyIndex {
    outgoing: HashMap<String, Links>,
    incoming: HashMap<String, Links>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from scratch.
    pub fn derive<'a>(
        node_ids: impl IntoIterator<Item = &'a str>,
        edges: impl IntoIterator<Item = &'a Edge>,
    ) -> Self {
        let mut index = Self::new();
        for id in node_ids {
            index.add_node(id);
        }
        for edge in edges {
            index.link(&edge.from_node, &edge.to_node);
        }
        index
    }

    pub fn add_node(&mut self, id: &str) {
        self.outgoing.entry(id.to_string()).or_default();
        self.incoming.entry(id.to_string()).or_default();
    }

    /// Drop a node and every link that still mentions it.
    pub fn remove_node(&mut self, id: &str) {
        if let Some(successors) = self.outgoing.remove(id) {
            for succ in successors.keys() {
                if let Some(preds) = self.incoming.get_mut(succ) {
                    preds.remove(id);
                }
            }
        }
        if let Some(predecessors) = self.incoming.remove(id) {
            for pred in predecessors.keys() {
                if let Some(succs) = self.outgoing.get_mut(pred) {
                    succs.remove(id);
                }
            }
        }
    }

    pub fn link(&mut self, from: &str, to: &str) {
        *self
            .outgoing
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0) += 1;
        *self
            .incoming
            .entry(to.to_string())
            .or_default()
            .entry(from.to_string())
            .or_insert(0) += 1;
    }

    pub fn unlink(&mut self, from: &str, to: &str) {
        decrement(&mut self.outgoing, from, to);
        decrement(&mut self.incoming, to, from);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.outgoing.contains_key(id)
    }

    /// Direct successors in id order.
    pub fn successors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.outgoing
            .get(id)
            .into_iter()
            .flat_map(|links| links.keys().map(String::as_str))
    }

    /// Direct predecessors in id order.
    pub fn predecessors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.incoming
            .get(id)
            .into_iter()
            .flat_map(|links| links.keys().map(String::as_str))
    }

    /// Successors and predecessors, as if edges were undirected.
    pub fn neighbors_undirected<'a>(&'a self, id: &str) -> BTreeSet<&'a str> {
        self.successors(id).chain(self.predecessors(id)).collect()
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.outgoing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty()
    }

    /// Number of distinct `(from, to)` pairs.
    pub fn link_count(&self) -> usize {
        self.outgoing.values().map(BTreeMap::len).sum()
    }

    /// The forward map as plain sets.
    pub fn as_sets(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.outgoing
            .iter()
            .map(|(id, links)| (id.clone(), links.keys().cloned().collect()))
            .collect()
    }

    /// Overwrite one node's links. Returns whether anything changed.
    pub(crate) fn replace_links(&mut self, id: &str, outgoing: Links, incoming: Links) -> bool {
        let out_changed = self.outgoing.get(id) != Some(&outgoing);
        let in_changed = self.incoming.get(id) != Some(&incoming);
        self.outgoing.insert(id.to_string(), outgoing);
        self.incoming.insert(id.to_string(), incoming);
        out_changed || in_changed
    }
}

fn decrement(map: &mut HashMap<String, Links>, key: &str, target: &str) {
    if let Some(links) = map.get_mut(key) {
        if let Some(count) = links.get_mut(target) {
            *count -= 1;
            if *count == 0 {
                links.remove(target);
            }
        }
    }
}
