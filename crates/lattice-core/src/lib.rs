//! # lattice-core
//!
//! Foundation crate for the Lattice knowledge-graph engine.
//! Defines the graph data model, authorization types, query/result types,
//! errors, config, constants, and the persistence trait.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::LatticeConfig;
pub use errors::{ErrorCode, ErrorReport, LatticeError, LatticeResult};
pub use models::{
    AuthorizationContext, Edge, GraphQuery, GraphSnapshot, Node, NodeType, Permission,
    Properties, RelationshipType,
};
pub use traits::PersistenceAdapter;
