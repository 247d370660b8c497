//! Weighted shortest path (Dijkstra) with edge weight as cost.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use lattice_core::models::PathResult;
use tracing::debug;

use crate::graph::GraphStore;

use super::neighbors;

/// Cheapest path from `from` to `to`.
///
/// The search is confined to nodes within `max_depth` forward hops of
/// `from`. Ties are resolved deterministically: the frontier pops by
/// `(distance, discovery sequence)` and a predecessor is only replaced by a
/// strictly cheaper route, so among equal-cost paths the one discovered
/// first wins. `from == to` yields the single-node path.
pub fn shortest(
    store: &GraphStore,
    from: &str,
    to: &str,
    max_depth: usize,
) -> Option<PathResult> {
    if !store.contains_node(from) || !store.contains_node(to) {
        return None;
    }
    if from == to {
        return Some(PathResult {
            path: vec![from.to_string()],
            distance: 0,
            weight: 0.0,
        });
    }

    let reachable: HashSet<String> = neighbors::reachable_ids(store, from, Some(max_depth))
        .into_iter()
        .collect();
    if !reachable.contains(to) {
        debug!(from, to, max_depth, "target outside search radius");
        return None;
    }

    let mut dist: HashMap<&str, f64> = HashMap::new();
    let mut prev: HashMap<&str, &str> = HashMap::new();
    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;

    dist.insert(from, 0.0);
    heap.push(Reverse((0.0f64.to_bits(), seq, from)));

    while let Some(Reverse((d_bits, _, u))) = heap.pop() {
        let d = f64::from_bits(d_bits);
        if dist.get(u).is_some_and(|&best| d > best) {
            continue;
        }
        if u == to {
            break;
        }
        // Creation order; parallel edges to the same target keep the cheapest.
        for edge in store.outgoing_edges(u) {
            let v = edge.to_node.as_str();
            if !reachable.contains(v) {
                continue;
            }
            let candidate = d + edge.weight;
            if dist.get(v).map_or(true, |&best| candidate < best) {
                dist.insert(v, candidate);
                prev.insert(v, u);
                seq += 1;
                heap.push(Reverse((candidate.to_bits(), seq, v)));
            }
        }
    }

    let weight = *dist.get(to)?;
    let mut path = vec![to.to_string()];
    let mut current = to;
    while current != from {
        current = *prev.get(current)?;
        path.push(current.to_string());
    }
    path.reverse();

    Some(PathResult {
        distance: path.len() - 1,
        path,
        weight,
    })
}
