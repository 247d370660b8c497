/// Lattice engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Property key carrying the owning agent of a node or edge.
pub const AGENT_ID_PROPERTY: &str = "agent_id";

/// Property key written by the optimizer's importance pass.
pub const IMPORTANCE_SCORE_PROPERTY: &str = "importance_score";

/// Resource name used in graph permissions.
pub const GRAPH_RESOURCE: &str = "graph";

/// Wildcard accepted for permission resource, action, and scope.
pub const WILDCARD: &str = "*";

/// Permission verbs.
pub mod actions {
    pub const CREATE: &str = "create";
    pub const READ: &str = "read";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const OPTIMIZE: &str = "optimize";
}
