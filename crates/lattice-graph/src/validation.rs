//! Request validation: field rules, structural edge checks, and per-agent quotas.
//!
//! Everything here runs before the store is touched.

use std::sync::LazyLock;

use lattice_core::config::{GraphConfig, ValidationLimits};
use lattice_core::constants::AGENT_ID_PROPERTY;
use lattice_core::errors::{EntityKind, LatticeError, LatticeResult, ValidationError};
use lattice_core::models::{Edge, Properties};
use regex::Regex;

use crate::graph::GraphStore;

/// Agent ids and property keys share one alphabet.
static IDENT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").ok());

fn is_ident(value: &str) -> bool {
    IDENT_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Validator bound to one configuration.
#[derive(Debug, Clone)]
pub struct GraphValidator {
    limits: ValidationLimits,
    graph: GraphConfig,
}

impl GraphValidator {
    pub fn new(limits: ValidationLimits, graph: GraphConfig) -> Self {
        Self { limits, graph }
    }

    pub fn validate_agent_id(&self, agent_id: &str) -> Result<(), ValidationError> {
        if agent_id.trim().is_empty() {
            return Err(ValidationError::InvalidAgentId {
                reason: "agent id cannot be empty".to_string(),
            });
        }
        if agent_id.chars().count() > self.limits.max_agent_id_length {
            return Err(ValidationError::InvalidAgentId {
                reason: format!(
                    "agent id exceeds maximum length of {} characters",
                    self.limits.max_agent_id_length
                ),
            });
        }
        if !is_ident(agent_id) {
            return Err(ValidationError::InvalidAgentId {
                reason: "agent id contains invalid characters".to_string(),
            });
        }
        Ok(())
    }

    /// Node and edge ids: non-blank, bounded, no whitespace or control characters.
    pub fn validate_id(&self, field: &'static str, id: &str) -> Result<(), ValidationError> {
        if id.trim().is_empty() {
            return Err(ValidationError::InvalidId {
                field,
                reason: "cannot be empty".to_string(),
            });
        }
        if id.chars().count() > self.limits.max_id_length {
            return Err(ValidationError::InvalidId {
                field,
                reason: format!(
                    "exceeds maximum length of {} characters",
                    self.limits.max_id_length
                ),
            });
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidId {
                field,
                reason: "contains whitespace or control characters".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_node_name(&self, name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidNodeName {
                reason: "node name cannot be empty".to_string(),
            });
        }
        if name.chars().count() > self.limits.max_name_length {
            return Err(ValidationError::InvalidNodeName {
                reason: format!(
                    "node name exceeds maximum length of {} characters",
                    self.limits.max_name_length
                ),
            });
        }
        if name.chars().any(char::is_control) {
            return Err(ValidationError::InvalidNodeName {
                reason: "node name contains control characters".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_weight(&self, weight: f64) -> Result<(), ValidationError> {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(ValidationError::InvalidWeight { value: weight });
        }
        Ok(())
    }

    pub fn validate_properties(&self, properties: &Properties) -> Result<(), ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidProperties { reason };
        if properties.len() > self.limits.max_properties {
            return Err(invalid(format!(
                "properties map exceeds maximum of {} entries",
                self.limits.max_properties
            )));
        }
        for (key, value) in properties {
            if key.trim().is_empty() {
                return Err(invalid("property key cannot be empty".to_string()));
            }
            if key.chars().count() > self.limits.max_property_key_length {
                return Err(invalid(format!(
                    "property key exceeds maximum length of {} characters",
                    self.limits.max_property_key_length
                )));
            }
            if !is_ident(key) {
                return Err(invalid(format!(
                    "property key '{key}' contains invalid characters"
                )));
            }
            if value.chars().count() > self.limits.max_property_value_length {
                return Err(invalid(format!(
                    "property value for key '{key}' exceeds maximum length of {} characters",
                    self.limits.max_property_value_length
                )));
            }
            if value.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
                return Err(invalid(format!(
                    "property value for key '{key}' contains control characters"
                )));
            }
        }
        Ok(())
    }

    /// Property updates may not touch `agent_id` and must change something.
    pub fn validate_property_update(&self, properties: &Properties) -> Result<(), ValidationError> {
        if properties.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        if properties.contains_key(AGENT_ID_PROPERTY) {
            return Err(ValidationError::ImmutableProperty {
                key: AGENT_ID_PROPERTY.to_string(),
            });
        }
        self.validate_properties(properties)
    }

    /// The map left behind by merging `update` into `existing` must still fit
    /// `max_properties`. `agent_id` is not counted.
    pub fn validate_merged_properties(
        &self,
        existing: &Properties,
        update: &Properties,
    ) -> Result<(), ValidationError> {
        let kept = existing
            .keys()
            .filter(|key| key.as_str() != AGENT_ID_PROPERTY)
            .count();
        let added = update
            .keys()
            .filter(|key| key.as_str() != AGENT_ID_PROPERTY && !existing.contains_key(*key))
            .count();
        let total = kept + added;
        if total > self.limits.max_properties {
            return Err(ValidationError::InvalidProperties {
                reason: format!(
                    "update would grow the properties map to {total} entries (maximum {})",
                    self.limits.max_properties
                ),
            });
        }
        Ok(())
    }

    pub fn validate_path_depth(&self, depth: usize) -> Result<(), ValidationError> {
        validate_range(depth, 1, self.graph.max_path_depth)
    }

    pub fn validate_neighbor_depth(&self, depth: usize) -> Result<(), ValidationError> {
        validate_range(depth, 0, self.graph.max_neighbor_depth)
    }

    pub fn validate_limit(&self, limit: usize) -> Result<(), ValidationError> {
        if limit == 0 || limit > self.limits.max_query_limit {
            return Err(ValidationError::InvalidLimit {
                limit,
                max: self.limits.max_query_limit,
            });
        }
        Ok(())
    }

    /// Structural checks for a new edge against the current store.
    ///
    /// Order: self-loop, endpoint existence, endpoint ownership, duplicate key.
    pub fn check_new_edge(&self, store: &GraphStore, edge: &Edge) -> LatticeResult<()> {
        if edge.from_node == edge.to_node {
            return Err(ValidationError::SelfLoop {
                node_id: edge.from_node.clone(),
            }
            .into());
        }
        let edge_agent = edge.agent_id().unwrap_or_default();
        for endpoint in [&edge.from_node, &edge.to_node] {
            let node = store
                .node(endpoint)
                .ok_or_else(|| ValidationError::MissingEndpoint {
                    node_id: endpoint.clone(),
                })?;
            if !self.graph.allow_cross_agent_edges && !node.belongs_to(edge_agent) {
                return Err(ValidationError::CrossAgentEdge {
                    edge_agent: edge_agent.to_string(),
                    node_id: endpoint.clone(),
                    node_agent: node.agent_id().unwrap_or_default().to_string(),
                }
                .into());
            }
        }
        let key = edge.key();
        if !store.edges_with_key(&key).is_empty() {
            return Err(LatticeError::AlreadyExists {
                kind: EntityKind::Edge,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Quotas are checked against current store counts.
    pub fn check_node_quota(&self, store: &GraphStore, agent_id: &str) -> LatticeResult<()> {
        if store.agent_node_count(agent_id) >= self.graph.max_nodes_per_agent {
            return Err(LatticeError::QuotaExceeded {
                agent_id: agent_id.to_string(),
                kind: EntityKind::Node,
                limit: self.graph.max_nodes_per_agent,
            });
        }
        Ok(())
    }

    pub fn check_edge_quota(&self, store: &GraphStore, agent_id: &str) -> LatticeResult<()> {
        if store.agent_edge_count(agent_id) >= self.graph.max_edges_per_agent {
            return Err(LatticeError::QuotaExceeded {
                agent_id: agent_id.to_string(),
                kind: EntityKind::Edge,
                limit: self.graph.max_edges_per_agent,
            });
        }
        Ok(())
    }
}

fn validate_range(depth: usize, min: usize, max: usize) -> Result<(), ValidationError> {
    if depth < min || depth > max {
        return Err(ValidationError::InvalidDepth { depth, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> GraphValidator {
        GraphValidator::new(ValidationLimits::default(), GraphConfig::default())
    }

    #[test]
    fn agent_ids() {
        let v = validator();
        assert!(v.validate_agent_id("agent-123").is_ok());
        assert!(v.validate_agent_id("test_agent.001").is_ok());
        assert!(v.validate_agent_id("").is_err());
        assert!(v.validate_agent_id("agent@123").is_err());
        assert!(v.validate_agent_id(&"a".repeat(257)).is_err());
    }

    #[test]
    fn merged_properties_respect_the_entry_limit() {
        let v = validator();
        let mut existing: Properties = (0..99).map(|i| (format!("k{i}"), "v".to_string())).collect();
        existing.insert(AGENT_ID_PROPERTY.to_string(), "agent".to_string());

        let overwrite: Properties = [("k0".to_string(), "w".to_string())].into();
        assert!(v.validate_merged_properties(&existing, &overwrite).is_ok());

        let one_more: Properties = [("new".to_string(), "w".to_string())].into();
        assert!(v.validate_merged_properties(&existing, &one_more).is_ok());

        let two_more: Properties = [
            ("new_a".to_string(), "w".to_string()),
            ("new_b".to_string(), "w".to_string()),
        ]
        .into();
        assert!(matches!(
            v.validate_merged_properties(&existing, &two_more),
            Err(ValidationError::InvalidProperties { .. })
        ));
    }

    #[test]
    fn weights() {
        let v = validator();
        assert!(v.validate_weight(0.0).is_ok());
        assert!(v.validate_weight(0.5).is_ok());
        assert!(v.validate_weight(1.0).is_ok());
        assert!(v.validate_weight(-0.1).is_err());
        assert!(v.validate_weight(1.1).is_err());
        assert!(v.validate_weight(f64::NAN).is_err());
        assert!(v.validate_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn property_values_allow_newlines_and_tabs() {
        let v = validator();
        let mut props = Properties::new();
        props.insert("note".to_string(), "line one\n\tline two".to_string());
        assert!(v.validate_properties(&props).is_ok());
        props.insert("bad".to_string(), "bell\u{7}".to_string());
        assert!(v.validate_properties(&props).is_err());
    }

    #[test]
    fn property_keys() {
        let v = validator();
        let mut props = Properties::new();
        props.insert("has space".to_string(), "x".to_string());
        assert!(matches!(
            v.validate_properties(&props),
            Err(ValidationError::InvalidProperties { .. })
        ));
    }

    #[test]
    fn depth_bounds() {
        let v = validator();
        assert!(v.validate_path_depth(0).is_err());
        assert!(v.validate_path_depth(10).is_ok());
        assert!(v.validate_path_depth(11).is_err());
        assert!(v.validate_neighbor_depth(0).is_ok());
        assert!(v.validate_neighbor_depth(6).is_err());
    }

    #[test]
    fn limit_bounds() {
        let v = validator();
        assert!(v.validate_limit(0).is_err());
        assert!(v.validate_limit(1000).is_ok());
        assert!(v.validate_limit(1001).is_err());
    }

    #[test]
    fn agent_id_is_immutable_on_update() {
        let v = validator();
        let mut props = Properties::new();
        props.insert(AGENT_ID_PROPERTY.to_string(), "other".to_string());
        assert_eq!(
            v.validate_property_update(&props),
            Err(ValidationError::ImmutableProperty {
                key: AGENT_ID_PROPERTY.to_string()
            })
        );
        assert_eq!(
            v.validate_property_update(&Properties::new()),
            Err(ValidationError::EmptyUpdate)
        );
    }
}
