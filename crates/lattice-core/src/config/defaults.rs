// Single source of truth for all default values.

// --- Graph ---
pub const DEFAULT_MAX_NODES_PER_AGENT: usize = 10_000;
pub const DEFAULT_MAX_EDGES_PER_AGENT: usize = 50_000;
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;
pub const DEFAULT_PATH_DEPTH: usize = 6;
pub const DEFAULT_MAX_PATH_DEPTH: usize = 10;
pub const DEFAULT_NEIGHBOR_DEPTH: usize = 1;
pub const DEFAULT_MAX_NEIGHBOR_DEPTH: usize = 5;
pub const DEFAULT_CASCADE_CONFIRMATION_THRESHOLD: usize = 100;
pub const DEFAULT_ALLOW_CROSS_AGENT_EDGES: bool = false;

// --- Validation ---
pub const DEFAULT_MAX_ID_LENGTH: usize = 256;
pub const DEFAULT_MAX_AGENT_ID_LENGTH: usize = 256;
pub const DEFAULT_MAX_NAME_LENGTH: usize = 256;
pub const DEFAULT_MAX_PROPERTIES: usize = 100;
pub const DEFAULT_MAX_PROPERTY_KEY_LENGTH: usize = 128;
pub const DEFAULT_MAX_PROPERTY_VALUE_LENGTH: usize = 1024;
pub const DEFAULT_MAX_QUERY_LIMIT: usize = 1000;

// --- Statistics ---
pub const DEFAULT_TOP_CENTRALITY: usize = 5;

// --- Community ---
pub const DEFAULT_LABEL_PROPAGATION_MAX_ITERATIONS: usize = 20;

// --- Optimizer ---
pub const DEFAULT_REPOINT_MERGED_EDGES: bool = true;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
