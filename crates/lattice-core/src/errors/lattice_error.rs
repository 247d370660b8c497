use std::fmt;

use serde::{Deserialize, Serialize};

use super::error_report::{ErrorCode, ErrorReport};
use super::{PersistenceError, ValidationError};

/// Result alias used across the workspace.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// The kind of graph entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Node,
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

/// Top-level engine error.
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: EntityKind, key: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("forbidden: user {user_id} lacks ({resource}, {action}) on scope {scope}")]
    Forbidden {
        user_id: String,
        resource: String,
        action: String,
        scope: String,
    },

    #[error("quota exceeded: agent {agent_id} reached the {kind} limit of {limit}")]
    QuotaExceeded {
        agent_id: String,
        kind: EntityKind,
        limit: usize,
    },

    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("internal error: {reason}")]
    Internal { reason: String },

    #[error("config error: {reason}")]
    Config { reason: String },
}

impl LatticeError {
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Node,
            id: id.into(),
        }
    }

    pub fn edge_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Edge,
            id: id.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            Self::InvalidState { .. } => ErrorCode::InvalidState,
            Self::Persistence(_) | Self::Internal { .. } => ErrorCode::InternalError,
            Self::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Duplicate edges are reported as `AlreadyExists` but belong to the validation family.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::AlreadyExists { .. })
    }

    /// Build the structured report handed to callers.
    ///
    /// Internal failures get a generic message; the cause travels in `details`.
    pub fn report(&self) -> ErrorReport {
        let (message, details) = match self {
            Self::Persistence(cause) => (
                "internal error: the graph backend rejected the operation".to_string(),
                Some(serde_json::json!({ "cause": cause.to_string() })),
            ),
            Self::Internal { reason } => (
                "internal error".to_string(),
                Some(serde_json::json!({ "cause": reason })),
            ),
            Self::NotFound { kind, id } => (
                self.to_string(),
                Some(serde_json::json!({ "kind": kind, "id": id })),
            ),
            Self::QuotaExceeded {
                agent_id,
                kind,
                limit,
            } => (
                self.to_string(),
                Some(serde_json::json!({ "agent_id": agent_id, "kind": kind, "limit": limit })),
            ),
            _ => (self.to_string(), None),
        };
        ErrorReport::new(self.code(), message, details)
    }
}
