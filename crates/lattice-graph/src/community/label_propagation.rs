use std::collections::BTreeMap;

use lattice_core::models::GraphCluster;
use tracing::debug;

use super::{strength, CommunityDetector};
use crate::graph::AgentProjection;

/// Deterministic label propagation over the undirected projection.
///
/// Nodes are visited in creation order and adopt the most frequent label
/// among their neighbors, ties going to the smallest label. Labels start as
/// the node's slot, so ties favour older nodes.
#[derive(Debug, Clone, Copy)]
pub struct LabelPropagationDetector {
    max_iterations: usize,
}

impl LabelPropagationDetector {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }
}

impl CommunityDetector for LabelPropagationDetector {
    fn name(&self) -> &'static str {
        "label_propagation"
    }

    fn detect(&self, projection: &AgentProjection<'_>) -> Vec<GraphCluster> {
        let n = projection.vertex_count();
        let mut labels: Vec<usize> = (0..n).collect();

        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;
            let mut changed = false;
            for slot in 0..n {
                let neighbors = projection.neighbors(slot);
                if neighbors.is_empty() {
                    continue;
                }
                let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
                for &v in neighbors {
                    *counts.entry(labels[v]).or_insert(0) += 1;
                }
                // BTreeMap iterates labels ascending; keep the first maximum.
                let mut best = labels[slot];
                let mut best_count = 0;
                for (&label, &count) in &counts {
                    if count > best_count {
                        best = label;
                        best_count = count;
                    }
                }
                if best != labels[slot] {
                    labels[slot] = best;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        debug!(iterations, nodes = n, "label propagation finished");

        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (slot, &label) in labels.iter().enumerate() {
            groups.entry(label).or_default().push(slot);
        }
        let mut members: Vec<Vec<usize>> = groups.into_values().collect();
        members.sort_by_key(|slots| slots[0]);

        members
            .into_iter()
            .enumerate()
            .map(|(i, slots)| {
                let mut center = slots[0];
                for &slot in &slots {
                    if projection.degree(slot) > projection.degree(center) {
                        center = slot;
                    }
                }
                GraphCluster {
                    id: format!("community_{i}"),
                    strength: strength(slots.len(), n),
                    center_node: projection.node(center).id.clone(),
                    nodes: slots
                        .iter()
                        .map(|&slot| projection.node(slot).id.clone())
                        .collect(),
                }
            })
            .collect()
    }
}
