//! Tracing setup and span definitions for graph operations.

use std::sync::Once;

use lattice_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "LATTICE_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber.
///
/// `LATTICE_LOG` takes precedence over `config.log_level`. Safe to call more
/// than once, and a subscriber installed by the host is left in place.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

        let json = config.json_logs.then(|| {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .json()
        });
        let plain = (!config.json_logs).then(|| fmt::layer().with_target(true));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(json)
            .with(plain)
            .try_init();
    });
}

/// Create a span for a store mutation.
#[macro_export]
macro_rules! graph_mutation_span {
    ($operation:expr, $agent_id:expr) => {
        tracing::info_span!(
            "lattice.mutation",
            operation = $operation,
            agent_id = %$agent_id
        )
    };
}

/// Create a span for a read-only query.
#[macro_export]
macro_rules! graph_query_span {
    ($operation:expr, $agent_id:expr) => {
        tracing::debug_span!(
            "lattice.query",
            operation = $operation,
            agent_id = %$agent_id
        )
    };
}

/// Create a span for maintenance work (optimize, hydrate, reconcile).
#[macro_export]
macro_rules! graph_maintenance_span {
    ($operation:expr, $agent_id:expr) => {
        tracing::info_span!(
            "lattice.maintenance",
            operation = $operation,
            agent_id = %$agent_id
        )
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const MUTATION: &str = "lattice.mutation";
    pub const QUERY: &str = "lattice.query";
    pub const MAINTENANCE: &str = "lattice.maintenance";
}
