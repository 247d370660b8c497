use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::node::Properties;
use crate::constants::AGENT_ID_PROPERTY;
use crate::errors::ValidationError;

/// The nine relationship types an edge can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum RelationshipType {
    Knows,
    Uses,
    LearnedFrom,
    CollaboratesWith,
    DependsOn,
    Similar,
    Opposite,
    CausedBy,
    LeadsTo,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 9] = [
        Self::Knows,
        Self::Uses,
        Self::LearnedFrom,
        Self::CollaboratesWith,
        Self::DependsOn,
        Self::Similar,
        Self::Opposite,
        Self::CausedBy,
        Self::LeadsTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Knows => "Knows",
            Self::Uses => "Uses",
            Self::LearnedFrom => "LearnedFrom",
            Self::CollaboratesWith => "CollaboratesWith",
            Self::DependsOn => "DependsOn",
            Self::Similar => "Similar",
            Self::Opposite => "Opposite",
            Self::CausedBy => "CausedBy",
            Self::LeadsTo => "LeadsTo",
        }
    }
}

impl FromStr for RelationshipType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidRelationshipType {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, typed, weighted arc between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Edge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub relationship_type: RelationshipType,
    /// In `[0.0, 1.0]`; also the traversal cost used by path finding.
    pub weight: f64,
    /// Always contains `agent_id`.
    pub properties: Properties,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(
        from_node: impl Into<String>,
        to_node: impl Into<String>,
        relationship_type: RelationshipType,
        weight: f64,
        agent_id: &str,
    ) -> Self {
        let now = Utc::now();
        let mut properties = Properties::new();
        properties.insert(AGENT_ID_PROPERTY.to_string(), agent_id.to_string());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from_node: from_node.into(),
            to_node: to_node.into(),
            relationship_type,
            weight,
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        for (key, value) in properties {
            if key != AGENT_ID_PROPERTY {
                self.properties.insert(key, value);
            }
        }
        self
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.properties.get(AGENT_ID_PROPERTY).map(String::as_str)
    }

    pub fn belongs_to(&self, agent_id: &str) -> bool {
        self.agent_id() == Some(agent_id)
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            from_node: self.from_node.clone(),
            to_node: self.to_node.clone(),
            relationship_type: self.relationship_type,
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}

/// Uniqueness key: at most one edge per `(from, to, type)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub from_node: String,
    pub to_node: String,
    pub relationship_type: RelationshipType,
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}]-> {}",
            self.from_node, self.relationship_type, self.to_node
        )
    }
}
