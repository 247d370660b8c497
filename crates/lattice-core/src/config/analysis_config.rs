use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::defaults;

/// Whether average path length and clustering are computed or estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StatsMode {
    /// BFS from every node plus local clustering over the undirected projection.
    #[default]
    Exact,
    /// Closed-form random-graph estimates derived from density and mean degree.
    Approximate,
}

/// Statistics engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub mode: StatsMode,
    /// Number of highest-degree nodes reported. Default: 5.
    pub top_centrality: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            mode: StatsMode::default(),
            top_centrality: defaults::DEFAULT_TOP_CENTRALITY,
        }
    }
}

/// Which community detector `find_clusters` uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityStrategy {
    /// One cluster per node type present.
    #[default]
    NodeType,
    /// Deterministic label propagation over the undirected projection.
    LabelPropagation,
}

/// Community detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    pub strategy: CommunityStrategy,
    /// Label propagation round limit. Default: 20.
    pub max_iterations: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            strategy: CommunityStrategy::default(),
            max_iterations: defaults::DEFAULT_LABEL_PROPAGATION_MAX_ITERATIONS,
        }
    }
}

/// Optimizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Move edges of merged duplicates onto the surviving node. Default: true.
    pub repoint_merged_edges: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            repoint_merged_edges: defaults::DEFAULT_REPOINT_MERGED_EDGES,
        }
    }
}
