//! Graph data model and API request/response types.

pub mod auth;
pub mod edge;
pub mod node;
pub mod query;
pub mod results;
pub mod snapshot;

pub use auth::{AuthorizationContext, Permission};
pub use edge::{Edge, EdgeKey, RelationshipType};
pub use node::{Node, NodeType, Properties};
pub use query::{GraphQuery, GraphView};
pub use results::{CentralityEntry, GraphCluster, GraphStats, OptimizationReport, PathResult};
pub use snapshot::GraphSnapshot;
