//! # lattice-graph
//!
//! The knowledge-graph engine: an indexed multi-agent store with
//! bounded traversal, weighted shortest paths, statistics, community
//! detection, batch optimization, and the authorized `GraphService`
//! facade that couples it all to a persistence backend.

pub mod community;
pub mod graph;
pub mod observability;
pub mod optimizer;
pub mod persistence;
pub mod policy;
pub mod service;
pub mod stats;
pub mod traversal;
pub mod validation;

pub use graph::{AdjacencyIndex, GraphStore};
pub use observability::init_tracing;
pub use optimizer::GraphOptimizer;
pub use persistence::{MemoryPersistence, NoopPersistence};
pub use policy::PolicyEvaluator;
pub use service::{GraphService, HydrationSummary};
pub use validation::GraphValidator;
