use serde::{Deserialize, Serialize};

use super::defaults;

/// How the in-memory graph is coupled to the persistence adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyMode {
    /// Await every adapter call and roll the in-memory mutation back on failure.
    #[default]
    Strict,
    /// Keep the in-memory mutation, record the divergence, reconcile later.
    Eventual,
}

/// Graph store limits, traversal bounds, and persistence coupling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Per-agent node quota. Default: 10_000.
    pub max_nodes_per_agent: usize,
    /// Per-agent edge quota. Default: 50_000.
    pub max_edges_per_agent: usize,
    /// Weight given to edges created without one. Default: 1.0.
    pub default_edge_weight: f64,
    /// Path search depth when the caller omits one. Default: 6.
    pub default_path_depth: usize,
    /// Largest accepted path search depth. Default: 10.
    pub max_path_depth: usize,
    /// Neighbor query depth when the caller omits one. Default: 1.
    pub default_neighbor_depth: usize,
    /// Largest accepted neighbor query depth. Default: 5.
    pub max_neighbor_depth: usize,
    /// Incident edge count above which node deletion needs confirmation. Default: 100.
    pub cascade_confirmation_threshold: usize,
    /// Whether an edge may connect nodes owned by another agent. Default: false.
    pub allow_cross_agent_edges: bool,
    /// Persistence coupling. Default: strict.
    pub consistency: ConsistencyMode,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_nodes_per_agent: defaults::DEFAULT_MAX_NODES_PER_AGENT,
            max_edges_per_agent: defaults::DEFAULT_MAX_EDGES_PER_AGENT,
            default_edge_weight: defaults::DEFAULT_EDGE_WEIGHT,
            default_path_depth: defaults::DEFAULT_PATH_DEPTH,
            max_path_depth: defaults::DEFAULT_MAX_PATH_DEPTH,
            default_neighbor_depth: defaults::DEFAULT_NEIGHBOR_DEPTH,
            max_neighbor_depth: defaults::DEFAULT_MAX_NEIGHBOR_DEPTH,
            cascade_confirmation_threshold: defaults::DEFAULT_CASCADE_CONFIRMATION_THRESHOLD,
            allow_cross_agent_edges: defaults::DEFAULT_ALLOW_CROSS_AGENT_EDGES,
            consistency: ConsistencyMode::default(),
        }
    }
}
