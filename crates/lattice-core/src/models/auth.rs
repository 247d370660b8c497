//! Caller identity and granted permissions.
//!
//! # Examples
//!
//! ```
//! use lattice_core::models::{AuthorizationContext, Permission};
//!
//! let ctx = AuthorizationContext::new("user-1")
//!     .with_agent("agent-7")
//!     .grant(Permission::scoped("graph", "read", "agent-7"));
//! assert_eq!(ctx.permissions.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::constants::WILDCARD;

/// A `(resource, action, scope?)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Permission {
    pub resource: String,
    pub action: String,
    #[serde(default)]
    pub scope: Option<String>,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            scope: None,
        }
    }

    pub fn scoped(
        resource: impl Into<String>,
        action: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            scope: Some(scope.into()),
        }
    }

    /// `(*, *, *)`: satisfies every requirement.
    pub fn superuser() -> Self {
        Self::scoped(WILDCARD, WILDCARD, WILDCARD)
    }
}

/// Per-call identity supplied by the external auth component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthorizationContext {
    pub user_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl AuthorizationContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            agent_id: None,
            permissions: Vec::new(),
        }
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn grant(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }
}
