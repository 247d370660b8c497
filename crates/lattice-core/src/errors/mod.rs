//! Error taxonomy for the Lattice engine.

mod error_report;
mod lattice_error;
mod persistence_error;
mod validation_error;

pub use error_report::{ErrorCode, ErrorReport};
pub use lattice_error::{EntityKind, LatticeError, LatticeResult};
pub use persistence_error::PersistenceError;
pub use validation_error::ValidationError;
