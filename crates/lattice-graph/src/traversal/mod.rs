//! Bounded reachability and weighted shortest paths over the adjacency index.

pub mod neighbors;
pub mod path;

/// A node reached by a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalNode {
    pub node_id: String,
    /// Hops from the start node.
    pub depth: usize,
}
