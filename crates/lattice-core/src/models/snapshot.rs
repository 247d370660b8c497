use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Edge, Node};

/// Serializable copy of one agent's subgraph, as exported by the engine or
/// loaded back from a persistence backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GraphSnapshot {
    pub agent_id: String,
    /// Creation order.
    pub nodes: Vec<Node>,
    /// Creation order.
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
