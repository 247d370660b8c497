//! Permission matching for graph operations.

use lattice_core::constants::{GRAPH_RESOURCE, WILDCARD};
use lattice_core::errors::{LatticeError, LatticeResult};
use lattice_core::models::{AuthorizationContext, Permission};
use tracing::warn;

/// Stateless evaluator: every decision is a pure function of the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEvaluator;

impl PolicyEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Whether `available` grants `required`.
    ///
    /// Resource and action match exactly or via `*`. A required scope must be
    /// equal to the available one, unless the available scope is `*`.
    pub fn satisfies(available: &Permission, required: &Permission) -> bool {
        let resource_ok = available.resource == required.resource || available.resource == WILDCARD;
        let action_ok = available.action == required.action || available.action == WILDCARD;
        let scope_ok = match (&required.scope, &available.scope) {
            (None, _) => true,
            (Some(_), Some(scope)) if scope == WILDCARD => true,
            (Some(required), Some(available)) => required == available,
            (Some(_), None) => false,
        };
        resource_ok && action_ok && scope_ok
    }

    pub fn is_authorized(&self, ctx: &AuthorizationContext, required: &Permission) -> bool {
        ctx.permissions
            .iter()
            .any(|available| Self::satisfies(available, required))
    }

    /// Require `("graph", action)` scoped to `agent_id`.
    pub fn authorize(
        &self,
        ctx: &AuthorizationContext,
        action: &str,
        agent_id: &str,
    ) -> LatticeResult<()> {
        let required = Permission::scoped(GRAPH_RESOURCE, action, agent_id);
        if self.is_authorized(ctx, &required) {
            return Ok(());
        }
        warn!(
            user_id = %ctx.user_id,
            action,
            agent_id,
            "graph operation denied"
        );
        Err(LatticeError::Forbidden {
            user_id: ctx.user_id.clone(),
            resource: GRAPH_RESOURCE.to_string(),
            action: action.to_string(),
            scope: agent_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_and_scopes() {
        let required = Permission::scoped("graph", "read", "agent-1");
        assert!(PolicyEvaluator::satisfies(
            &Permission::scoped("graph", "read", "agent-1"),
            &required
        ));
        assert!(PolicyEvaluator::satisfies(
            &Permission::scoped("*", "*", "*"),
            &required
        ));
        assert!(!PolicyEvaluator::satisfies(
            &Permission::scoped("graph", "read", "agent-2"),
            &required
        ));
        assert!(!PolicyEvaluator::satisfies(
            &Permission::new("graph", "read"),
            &required
        ));
        assert!(PolicyEvaluator::satisfies(
            &Permission::new("graph", "read"),
            &Permission::new("graph", "read")
        ));
        assert!(!PolicyEvaluator::satisfies(
            &Permission::scoped("graph", "update", "agent-1"),
            &required
        ));
    }

    #[test]
    fn authorize_reports_forbidden() {
        let ctx = AuthorizationContext::new("u1").grant(Permission::scoped("graph", "read", "a"));
        let policy = PolicyEvaluator::new();
        assert!(policy.authorize(&ctx, "read", "a").is_ok());
        let err = policy.authorize(&ctx, "delete", "a").unwrap_err();
        assert!(matches!(err, LatticeError::Forbidden { .. }));
    }
}
