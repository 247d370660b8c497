use std::collections::HashSet;

use lattice_core::errors::LatticeResult;
use lattice_core::models::{EdgeKey, OptimizationReport};

use crate::graph::GraphStore;

/// Keep one edge per `(from, to, type)`: the heaviest, ties going to the oldest.
pub(crate) fn collapse_duplicate_edges(
    store: &mut GraphStore,
    agent_id: &str,
    report: &mut OptimizationReport,
) -> LatticeResult<()> {
    let mut seen: HashSet<EdgeKey> = HashSet::new();
    let crowded: Vec<EdgeKey> = store
        .agent_edges(agent_id)
        .map(|edge| edge.key())
        .filter(|key| store.edges_with_key(key).len() > 1)
        .filter(|key| seen.insert(key.clone()))
        .collect();

    for key in crowded {
        let holders = store.edges_with_key(&key).to_vec();
        let Some(keep) = heaviest(store, &holders) else {
            continue;
        };
        for id in holders.iter().filter(|id| **id != keep) {
            let removed = store.delete_edge(id)?;
            report.archived_edges.push(removed.entity);
            report.duplicate_edges_removed += 1;
        }
    }
    Ok(())
}

/// `holders` is oldest first, so a strict comparison keeps the oldest on ties.
fn heaviest(store: &GraphStore, holders: &[String]) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for id in holders {
        let Some(edge) = store.edge(id) else { continue };
        if best.map_or(true, |(_, weight)| edge.weight > weight) {
            best = Some((id.as_str(), edge.weight));
        }
    }
    best.map(|(id, _)| id.to_string())
}
