//! Community detection over one agent's subgraph.

mod by_type;
mod label_propagation;

pub use by_type::NodeTypeDetector;
pub use label_propagation::LabelPropagationDetector;

use lattice_core::config::{CommunityConfig, CommunityStrategy};
use lattice_core::models::GraphCluster;

use crate::graph::{AgentProjection, GraphStore};

/// A community detection strategy.
pub trait CommunityDetector {
    fn name(&self) -> &'static str;

    /// Partition the projected nodes. Every node lands in exactly one cluster.
    fn detect(&self, projection: &AgentProjection<'_>) -> Vec<GraphCluster>;
}

/// Run the configured detector for `agent_id`.
pub fn find_clusters(store: &GraphStore, agent_id: &str, config: &CommunityConfig) -> Vec<GraphCluster> {
    let projection = AgentProjection::build(store, agent_id);
    match config.strategy {
        CommunityStrategy::NodeType => NodeTypeDetector.detect(&projection),
        CommunityStrategy::LabelPropagation => {
            LabelPropagationDetector::new(config.max_iterations).detect(&projection)
        }
    }
}

/// `|members| / |all nodes|`.
pub(crate) fn strength(members: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        members as f64 / total as f64
    }
}
