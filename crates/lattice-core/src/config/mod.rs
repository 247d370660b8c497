//! Engine configuration, loaded from TOML with per-section defaults.
//!
//! # Examples
//!
//! ```
//! use lattice_core::config::LatticeConfig;
//!
//! let config = LatticeConfig::from_toml("[graph]\nmax_nodes_per_agent = 50\n").unwrap();
//! assert_eq!(config.graph.max_nodes_per_agent, 50);
//! assert_eq!(config.graph.max_edges_per_agent, 50_000);
//! ```

mod analysis_config;
pub mod defaults;
mod graph_config;
mod observability_config;
mod validation_config;

pub use analysis_config::{
    CommunityConfig, CommunityStrategy, OptimizerConfig, StatsConfig, StatsMode,
};
pub use graph_config::{ConsistencyMode, GraphConfig};
pub use observability_config::ObservabilityConfig;
pub use validation_config::ValidationLimits;

use serde::{Deserialize, Serialize};

use crate::errors::{LatticeError, LatticeResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub graph: GraphConfig,
    pub validation: ValidationLimits,
    pub stats: StatsConfig,
    pub community: CommunityConfig,
    pub optimizer: OptimizerConfig,
    pub observability: ObservabilityConfig,
}

impl LatticeConfig {
    /// Parse a TOML document. Missing sections and keys fall back to defaults.
    pub fn from_toml(input: &str) -> LatticeResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| LatticeError::Config {
            reason: e.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot honour.
    pub fn check(&self) -> LatticeResult<()> {
        let g = &self.graph;
        if !(0.0..=1.0).contains(&g.default_edge_weight) {
            return Err(LatticeError::Config {
                reason: format!(
                    "graph.default_edge_weight {} is outside [0.0, 1.0]",
                    g.default_edge_weight
                ),
            });
        }
        if g.default_path_depth == 0 || g.default_path_depth > g.max_path_depth {
            return Err(LatticeError::Config {
                reason: "graph.default_path_depth must be in 1..=max_path_depth".to_string(),
            });
        }
        if g.default_neighbor_depth > g.max_neighbor_depth {
            return Err(LatticeError::Config {
                reason: "graph.default_neighbor_depth exceeds max_neighbor_depth".to_string(),
            });
        }
        Ok(())
    }
}
