use lattice_core::config::ObservabilityConfig;
use lattice_graph::observability::{names, LOG_ENV};
use lattice_graph::{graph_maintenance_span, graph_mutation_span, graph_query_span, init_tracing};

#[test]
fn init_is_repeatable() {
    let config = ObservabilityConfig {
        log_level: "debug".to_string(),
        json_logs: true,
    };
    init_tracing(&config);
    init_tracing(&ObservabilityConfig::default());
    tracing::info!("subscriber installed");
}

#[test]
fn span_macros_use_the_exported_names() {
    init_tracing(&ObservabilityConfig::default());
    let agent = "agent";
    let mutation = graph_mutation_span!("create_node", agent);
    let query = graph_query_span!("get_graph", agent);
    let maintenance = graph_maintenance_span!("optimize_graph", agent);
    for (span, name) in [
        (&mutation, names::MUTATION),
        (&query, names::QUERY),
        (&maintenance, names::MAINTENANCE),
    ] {
        if let Some(meta) = span.metadata() {
            assert_eq!(meta.name(), name);
        }
    }
    assert_eq!(LOG_ENV, "LATTICE_LOG");
}
