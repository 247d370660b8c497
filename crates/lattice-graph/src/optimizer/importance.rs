use lattice_core::constants::IMPORTANCE_SCORE_PROPERTY;
use lattice_core::errors::LatticeResult;
use lattice_core::models::{OptimizationReport, Properties};

use crate::graph::GraphStore;

/// Set `importance_score` to the incident edge count, touching only nodes
/// whose score changed.
pub(super) fn recompute(
    store: &mut GraphStore,
    agent_id: &str,
    report: &mut OptimizationReport,
) -> LatticeResult<()> {
    let stale: Vec<(String, String)> = store
        .agent_nodes(agent_id)
        .filter_map(|node| {
            let score = store.degree(&node.id).to_string();
            let current = node.properties.get(IMPORTANCE_SCORE_PROPERTY);
            (current != Some(&score)).then(|| (node.id.clone(), score))
        })
        .collect();

    for (id, score) in stale {
        let mut update = Properties::new();
        update.insert(IMPORTANCE_SCORE_PROPERTY.to_string(), score);
        store.update_node(&id, &update)?;
        report.importance_updated += 1;
        report.updated_nodes.push(id);
    }
    Ok(())
}
