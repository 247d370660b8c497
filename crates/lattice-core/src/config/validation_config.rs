use serde::{Deserialize, Serialize};

use super::defaults;

/// Size limits enforced by the validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub max_id_length: usize,
    pub max_agent_id_length: usize,
    pub max_name_length: usize,
    pub max_properties: usize,
    pub max_property_key_length: usize,
    pub max_property_value_length: usize,
    pub max_query_limit: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_id_length: defaults::DEFAULT_MAX_ID_LENGTH,
            max_agent_id_length: defaults::DEFAULT_MAX_AGENT_ID_LENGTH,
            max_name_length: defaults::DEFAULT_MAX_NAME_LENGTH,
            max_properties: defaults::DEFAULT_MAX_PROPERTIES,
            max_property_key_length: defaults::DEFAULT_MAX_PROPERTY_KEY_LENGTH,
            max_property_value_length: defaults::DEFAULT_MAX_PROPERTY_VALUE_LENGTH,
            max_query_limit: defaults::DEFAULT_MAX_QUERY_LIMIT,
        }
    }
}
