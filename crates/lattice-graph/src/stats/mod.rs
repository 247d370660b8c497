//! Per-agent statistics: counts, density, centrality, components, and
//! path-length / clustering metrics (exact or approximate).

mod approximate;
mod exact;

use std::collections::{BTreeMap, VecDeque};

use lattice_core::config::{StatsConfig, StatsMode};
use lattice_core::models::{CentralityEntry, GraphStats};
use tracing::debug;

use crate::graph::{AgentProjection, GraphStore};

/// Compute statistics for one agent's subgraph.
pub fn compute(store: &GraphStore, agent_id: &str, config: &StatsConfig) -> GraphStats {
    let projection = AgentProjection::build(store, agent_id);
    compute_projection(&projection, config)
}

pub fn compute_projection(projection: &AgentProjection<'_>, config: &StatsConfig) -> GraphStats {
    let n = projection.vertex_count();
    let e = projection.edge_count();

    let mut node_types = BTreeMap::new();
    for node in projection.nodes() {
        *node_types.entry(node.node_type).or_insert(0) += 1;
    }
    let mut relationship_types = BTreeMap::new();
    for edge in projection.edges() {
        *relationship_types.entry(edge.relationship_type).or_insert(0) += 1;
    }

    let density = density(n, e);
    let connected = (0..n).filter(|&slot| projection.degree(slot) > 0).count();
    let connectivity = if n == 0 { 0.0 } else { connected as f64 / n as f64 };

    let (average_path_length, clustering_coefficient) = match config.mode {
        StatsMode::Exact => (
            exact::average_path_length(projection),
            exact::average_clustering(projection),
        ),
        StatsMode::Approximate => (
            approximate::average_path_length(n, e),
            approximate::clustering(density),
        ),
    };

    let stats = GraphStats {
        node_count: n,
        edge_count: e,
        node_types,
        relationship_types,
        density,
        connectivity,
        centrality: top_degree(projection, config.top_centrality),
        components: weak_components(projection),
        average_path_length,
        clustering_coefficient,
        mode: config.mode,
    };
    debug!(
        nodes = n,
        edges = e,
        components = stats.components,
        "computed graph stats"
    );
    stats
}

/// `e / (n·(n−1)/2)` for `n > 1`, else 0.
pub fn density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    let max_edges = (nodes * (nodes - 1)) as f64 / 2.0;
    edges as f64 / max_edges
}

/// Highest-degree nodes, best first; ties keep creation order.
fn top_degree(projection: &AgentProjection<'_>, k: usize) -> Vec<CentralityEntry> {
    let mut ranked: Vec<usize> = (0..projection.vertex_count()).collect();
    // Stable sort keeps creation order among equal degrees.
    ranked.sort_by_key(|&slot| std::cmp::Reverse(projection.degree(slot)));
    ranked
        .into_iter()
        .take(k)
        .map(|slot| CentralityEntry {
            node_id: projection.node(slot).id.clone(),
            degree: projection.degree(slot),
        })
        .collect()
}

/// Weakly connected components; isolated nodes count as their own.
pub fn weak_components(projection: &AgentProjection<'_>) -> usize {
    let n = projection.vertex_count();
    let mut seen = vec![false; n];
    let mut components = 0;
    let mut queue = VecDeque::new();
    for start in 0..n {
        if seen[start] {
            continue;
        }
        components += 1;
        seen[start] = true;
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            for &v in projection.neighbors(u) {
                if !seen[v] {
                    seen[v] = true;
                    queue.push_back(v);
                }
            }
        }
    }
    components
}
