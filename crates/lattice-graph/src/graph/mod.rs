//! Indexed graph storage.

pub mod adjacency;
pub mod projection;
pub mod store;

pub use adjacency::AdjacencyIndex;
pub use projection::AgentProjection;
pub use store::{GraphStore, IndexRebuild, KnowledgeStableGraph, Tombstone};
