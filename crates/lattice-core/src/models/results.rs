use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Edge, Node, NodeType, RelationshipType};
use crate::config::StatsMode;

/// A shortest path between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PathResult {
    /// Node ids from source to target, inclusive.
    pub path: Vec<String>,
    /// Hop count, `path.len() - 1`.
    pub distance: usize,
    /// Sum of traversed edge weights.
    pub weight: f64,
}

/// One entry of the degree-centrality ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CentralityEntry {
    pub node_id: String,
    /// In-degree plus out-degree.
    pub degree: usize,
}

/// Per-agent aggregate metrics, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub node_types: BTreeMap<NodeType, usize>,
    pub relationship_types: BTreeMap<RelationshipType, usize>,
    /// `edges / (n·(n−1)/2)` for `n > 1`, else 0.
    pub density: f64,
    /// Fraction of nodes with at least one incident edge.
    pub connectivity: f64,
    /// Highest-degree nodes, best first.
    pub centrality: Vec<CentralityEntry>,
    /// Weakly connected components.
    pub components: usize,
    pub average_path_length: f64,
    pub clustering_coefficient: f64,
    /// How the two fields above were obtained.
    pub mode: StatsMode,
}

/// A group of nodes reported by the community detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GraphCluster {
    pub id: String,
    pub nodes: Vec<String>,
    /// `|cluster| / |all nodes|`.
    pub strength: f64,
    pub center_node: String,
}

/// What one optimizer run changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptimizationReport {
    pub duplicate_edges_removed: usize,
    pub nodes_merged: usize,
    pub edges_repointed: usize,
    pub importance_updated: usize,
    pub index_entries_rebuilt: usize,
    /// The rebuilt index differed from the live one.
    pub index_drift: bool,
    /// Entities removed by the run, in removal order.
    pub archived_nodes: Vec<Node>,
    pub archived_edges: Vec<Edge>,
    /// Surviving entities whose content changed.
    pub updated_nodes: Vec<String>,
    pub updated_edges: Vec<String>,
}

impl OptimizationReport {
    /// True when the run left the graph untouched.
    pub fn is_noop(&self) -> bool {
        self.duplicate_edges_removed == 0
            && self.nodes_merged == 0
            && self.edges_repointed == 0
            && self.importance_updated == 0
            && !self.index_drift
            && self.archived_nodes.is_empty()
            && self.archived_edges.is_empty()
    }
}
