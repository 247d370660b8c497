use lattice_core::config::{
    CommunityStrategy, ConsistencyMode, LatticeConfig, StatsMode,
};
use lattice_core::errors::ErrorCode;

#[test]
fn empty_document_yields_defaults() {
    let config = LatticeConfig::from_toml("").unwrap();
    assert_eq!(config.graph.max_nodes_per_agent, 10_000);
    assert_eq!(config.graph.max_edges_per_agent, 50_000);
    assert_eq!(config.graph.default_edge_weight, 1.0);
    assert_eq!(config.graph.default_path_depth, 6);
    assert_eq!(config.graph.max_path_depth, 10);
    assert_eq!(config.graph.default_neighbor_depth, 1);
    assert_eq!(config.graph.max_neighbor_depth, 5);
    assert_eq!(config.graph.cascade_confirmation_threshold, 100);
    assert!(!config.graph.allow_cross_agent_edges);
    assert_eq!(config.graph.consistency, ConsistencyMode::Strict);
    assert_eq!(config.stats.mode, StatsMode::Exact);
    assert_eq!(config.stats.top_centrality, 5);
    assert_eq!(config.community.strategy, CommunityStrategy::NodeType);
    assert!(config.optimizer.repoint_merged_edges);
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn sections_override_individually() {
    let toml = r#"
        [graph]
        consistency = "eventual"
        max_edges_per_agent = 12

        [stats]
        mode = "approximate"

        [community]
        strategy = "label_propagation"
        max_iterations = 7

        [observability]
        json_logs = true
    "#;
    let config = LatticeConfig::from_toml(toml).unwrap();
    assert_eq!(config.graph.consistency, ConsistencyMode::Eventual);
    assert_eq!(config.graph.max_edges_per_agent, 12);
    assert_eq!(config.graph.max_nodes_per_agent, 10_000);
    assert_eq!(config.stats.mode, StatsMode::Approximate);
    assert_eq!(config.community.strategy, CommunityStrategy::LabelPropagation);
    assert_eq!(config.community.max_iterations, 7);
    assert!(config.observability.json_logs);
    assert_eq!(config.validation.max_query_limit, 1000);
}

#[test]
fn out_of_range_values_are_config_errors() {
    let err = LatticeConfig::from_toml("[graph]\ndefault_edge_weight = 2.0\n").unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigError);

    let err = LatticeConfig::from_toml("[graph]\ndefault_path_depth = 11\n").unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigError);

    let err = LatticeConfig::from_toml("[graph]\ndefault_neighbor_depth = 9\n").unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigError);
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = LatticeConfig::from_toml("[graph\nmax = ").unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigError);

    let err = LatticeConfig::from_toml("[graph]\nconsistency = \"sometimes\"\n").unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigError);
}
