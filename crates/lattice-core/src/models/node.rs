use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::constants::AGENT_ID_PROPERTY;
use crate::errors::ValidationError;

/// String-to-string property map carried by nodes and edges.
pub type Properties = BTreeMap<String, String>;

/// The seven node categories of the knowledge graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum NodeType {
    Agent,
    Memory,
    Concept,
    Task,
    Tool,
    Context,
    Pattern,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        Self::Agent,
        Self::Memory,
        Self::Concept,
        Self::Task,
        Self::Tool,
        Self::Context,
        Self::Pattern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::Memory => "Memory",
            Self::Concept => "Concept",
            Self::Task => "Task",
            Self::Tool => "Tool",
            Self::Context => "Context",
            Self::Pattern => "Pattern",
        }
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidNodeType {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex of the property graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Node {
    pub id: String,
    pub node_type: NodeType,
    pub name: String,
    /// Always contains `agent_id`.
    pub properties: Properties,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Create a node with a fresh UUID owned by `agent_id`.
    pub fn new(node_type: NodeType, name: impl Into<String>, agent_id: &str) -> Self {
        let now = Utc::now();
        let mut properties = Properties::new();
        properties.insert(AGENT_ID_PROPERTY.to_string(), agent_id.to_string());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            node_type,
            name: name.into(),
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

    /// The owning agent, read from the `agent_id` property.
    pub fn agent_id(&self) -> Option<&str> {
        self.properties.get(AGENT_ID_PROPERTY).map(String::as_str)
    }

    pub fn belongs_to(&self, agent_id: &str) -> bool {
        self.agent_id() == Some(agent_id)
    }
}
