/// Field-level validation failures raised before any mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid agent id: {reason}")]
    InvalidAgentId { reason: String },

    #[error("invalid {field}: {reason}")]
    InvalidId { field: &'static str, reason: String },

    #[error("invalid node name: {reason}")]
    InvalidNodeName { reason: String },

    #[error("invalid node type: {value}")]
    InvalidNodeType { value: String },

    #[error("invalid relationship type: {value}")]
    InvalidRelationshipType { value: String },

    #[error("invalid weight {value}: must be a finite number in [0.0, 1.0]")]
    InvalidWeight { value: f64 },

    #[error("invalid properties: {reason}")]
    InvalidProperties { reason: String },

    #[error("invalid depth {depth}: must be between {min} and {max}")]
    InvalidDepth { depth: usize, min: usize, max: usize },

    #[error("invalid limit {limit}: must be between 1 and {max}")]
    InvalidLimit { limit: usize, max: usize },

    #[error("self-loop edges are not allowed: {node_id}")]
    SelfLoop { node_id: String },

    #[error("edge endpoint {node_id} does not exist")]
    MissingEndpoint { node_id: String },

    #[error("edge agent {edge_agent} does not own endpoint {node_id} (owned by {node_agent})")]
    CrossAgentEdge {
        edge_agent: String,
        node_id: String,
        node_agent: String,
    },

    #[error("property '{key}' is immutable")]
    ImmutableProperty { key: String },

    #[error("update request changes nothing")]
    EmptyUpdate,
}
