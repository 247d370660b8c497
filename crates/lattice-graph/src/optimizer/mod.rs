//! Batch maintenance for one agent's subgraph.
//!
//! Passes run in order: edge dedup, node merge, importance recompute, index
//! rebuild. A second run with no intervening mutation changes nothing.
//! Removed entities are returned in the report so the caller can archive
//! them in the backend before deleting.

mod dedup;
mod importance;
mod merge;

pub(crate) use dedup::collapse_duplicate_edges;

use lattice_core::config::OptimizerConfig;
use lattice_core::errors::LatticeResult;
use lattice_core::models::OptimizationReport;
use tracing::info;

use crate::graph::GraphStore;

pub struct GraphOptimizer {
    config: OptimizerConfig,
}

impl GraphOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, store: &mut GraphStore, agent_id: &str) -> LatticeResult<OptimizationReport> {
        let mut report = OptimizationReport::default();

        dedup::collapse_duplicate_edges(store, agent_id, &mut report)?;
        merge::merge_duplicate_nodes(
            store,
            agent_id,
            self.config.repoint_merged_edges,
            &mut report,
        )?;
        importance::recompute(store, agent_id, &mut report)?;

        let rebuild = store.rebuild_index(agent_id);
        report.index_entries_rebuilt = rebuild.entries;
        report.index_drift = rebuild.drift;

        // Entities removed later in the run are no longer updates.
        report.updated_nodes.sort();
        report.updated_nodes.dedup();
        report.updated_nodes.retain(|id| store.contains_node(id));
        report.updated_edges.sort();
        report.updated_edges.dedup();
        report.updated_edges.retain(|id| store.contains_edge(id));

        info!(
            agent_id,
            duplicate_edges_removed = report.duplicate_edges_removed,
            nodes_merged = report.nodes_merged,
            edges_repointed = report.edges_repointed,
            importance_updated = report.importance_updated,
            index_drift = report.index_drift,
            "graph optimized"
        );
        Ok(report)
    }
}
