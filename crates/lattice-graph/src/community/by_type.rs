use std::collections::BTreeMap;

use lattice_core::models::{GraphCluster, NodeType};

use super::{strength, CommunityDetector};
use crate::graph::AgentProjection;

/// One cluster per node type present, centered on the oldest member.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeTypeDetector;

impl CommunityDetector for NodeTypeDetector {
    fn name(&self) -> &'static str {
        "node_type"
    }

    fn detect(&self, projection: &AgentProjection<'_>) -> Vec<GraphCluster> {
        let total = projection.vertex_count();
        let mut groups: BTreeMap<NodeType, Vec<String>> = BTreeMap::new();
        for node in projection.nodes() {
            groups.entry(node.node_type).or_default().push(node.id.clone());
        }
        groups
            .into_iter()
            .map(|(node_type, nodes)| GraphCluster {
                id: format!("cluster_{}", node_type.as_str().to_lowercase()),
                strength: strength(nodes.len(), total),
                center_node: nodes[0].clone(),
                nodes,
            })
            .collect()
    }
}
