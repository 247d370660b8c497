use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Edge, Node, NodeType, RelationshipType};

/// Filters for `get_graph`. Every field is optional; an empty query returns the whole agent graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GraphQuery {
    #[serde(default)]
    pub node_types: Option<Vec<NodeType>>,
    #[serde(default)]
    pub relationship_types: Option<Vec<RelationshipType>>,
    /// Restrict the view to the forward neighborhood of this node.
    #[serde(default)]
    pub start_node: Option<String>,
    /// Neighborhood depth around `start_node`.
    #[serde(default)]
    pub depth: Option<usize>,
    /// Cap on returned nodes, in creation order.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl GraphQuery {
    pub fn node_types(mut self, types: Vec<NodeType>) -> Self {
        self.node_types = Some(types);
        self
    }

    pub fn relationship_types(mut self, types: Vec<RelationshipType>) -> Self {
        self.relationship_types = Some(types);
        self
    }

    pub fn around(mut self, start_node: impl Into<String>, depth: usize) -> Self {
        self.start_node = Some(start_node.into());
        self.depth = Some(depth);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Result of `get_graph`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GraphView {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}
