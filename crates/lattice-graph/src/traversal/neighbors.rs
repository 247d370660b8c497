//! Forward breadth-first reachability.

use std::collections::{HashSet, VecDeque};

use crate::graph::GraphStore;

use super::TraversalNode;

/// Nodes reachable from `start` by following outgoing edges, in discovery order.
///
/// The start node is included at depth 0. `max_depth = None` means unbounded.
/// An unknown start yields nothing. Successors are expanded in id order, so
/// the result is deterministic.
pub fn reachable(store: &GraphStore, start: &str, max_depth: Option<usize>) -> Vec<TraversalNode> {
    let adjacency = store.adjacency();
    if !adjacency.contains(start) {
        return Vec::new();
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    let mut result = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        result.push(TraversalNode {
            node_id: current.to_string(),
            depth,
        });
        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }
        for next in adjacency.successors(current) {
            if visited.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }

    result
}

/// Ids of [`reachable`] nodes.
pub fn reachable_ids(store: &GraphStore, start: &str, max_depth: Option<usize>) -> Vec<String> {
    reachable(store, start, max_depth)
        .into_iter()
        .map(|n| n.node_id)
        .collect()
}
