//! Statistics engine over small hand-built graphs.

use lattice_core::config::{StatsConfig, StatsMode};
use lattice_core::models::{Edge, Node, NodeType, RelationshipType};
use lattice_graph::{stats, GraphStore};

fn add_node(store: &mut GraphStore, node_type: NodeType, name: &str) -> String {
    let node = Node::new(node_type, name, "agent");
    let id = node.id.clone();
    store.create_node(node).unwrap();
    id
}

fn add_edge(store: &mut GraphStore, from: &str, to: &str, rel: RelationshipType) {
    store
        .create_edge(Edge::new(from, to, rel, 1.0, "agent"))
        .unwrap();
}

fn exact() -> StatsConfig {
    StatsConfig::default()
}

#[test]
fn density_of_four_nodes_and_three_edges() {
    let mut store = GraphStore::new();
    let ids: Vec<String> = (0..4)
        .map(|i| add_node(&mut store, NodeType::Concept, &format!("n{i}")))
        .collect();
    add_edge(&mut store, &ids[0], &ids[1], RelationshipType::Knows);
    add_edge(&mut store, &ids[1], &ids[2], RelationshipType::Knows);
    add_edge(&mut store, &ids[2], &ids[3], RelationshipType::Knows);

    let stats = stats::compute(&store, "agent", &exact());
    assert_eq!(stats.node_count, 4);
    assert_eq!(stats.edge_count, 3);
    assert!((stats.density - 0.5).abs() < 1e-12);
    assert_eq!(stats.components, 1);
    assert!((stats.connectivity - 1.0).abs() < 1e-12);
}

#[test]
fn empty_and_single_node_graphs() {
    let mut store = GraphStore::new();
    let empty = stats::compute(&store, "agent", &exact());
    assert_eq!(empty.node_count, 0);
    assert_eq!(empty.density, 0.0);
    assert_eq!(empty.components, 0);
    assert_eq!(empty.connectivity, 0.0);

    add_node(&mut store, NodeType::Agent, "solo");
    let single = stats::compute(&store, "agent", &exact());
    assert_eq!(single.density, 0.0);
    assert_eq!(single.components, 1);
    assert_eq!(single.connectivity, 0.0);
    assert_eq!(single.average_path_length, 0.0);
}

#[test]
fn components_treat_edges_as_undirected() {
    let mut store = GraphStore::new();
    let a = add_node(&mut store, NodeType::Concept, "a");
    let b = add_node(&mut store, NodeType::Concept, "b");
    let c = add_node(&mut store, NodeType::Concept, "c");
    add_node(&mut store, NodeType::Concept, "isolated");
    // b has no outgoing edge but joins a and c through incoming ones.
    add_edge(&mut store, &a, &b, RelationshipType::Knows);
    add_edge(&mut store, &c, &b, RelationshipType::Knows);

    let stats = stats::compute(&store, "agent", &exact());
    assert_eq!(stats.components, 2);
    assert!((stats.connectivity - 0.75).abs() < 1e-12);
}

#[test]
fn type_distributions_and_centrality() {
    let mut store = GraphStore::new();
    let hub = add_node(&mut store, NodeType::Agent, "hub");
    let t1 = add_node(&mut store, NodeType::Tool, "t1");
    let t2 = add_node(&mut store, NodeType::Tool, "t2");
    let m = add_node(&mut store, NodeType::Memory, "m");
    add_edge(&mut store, &hub, &t1, RelationshipType::Uses);
    add_edge(&mut store, &hub, &t2, RelationshipType::Uses);
    add_edge(&mut store, &hub, &m, RelationshipType::LearnedFrom);

    let stats = stats::compute(&store, "agent", &exact());
    assert_eq!(stats.node_types[&NodeType::Tool], 2);
    assert_eq!(stats.node_types[&NodeType::Agent], 1);
    assert_eq!(stats.relationship_types[&RelationshipType::Uses], 2);
    assert_eq!(stats.relationship_types[&RelationshipType::LearnedFrom], 1);

    assert_eq!(stats.centrality.len(), 4);
    assert_eq!(stats.centrality[0].node_id, hub);
    assert_eq!(stats.centrality[0].degree, 3);
    // Equal degrees keep creation order.
    assert_eq!(stats.centrality[1].node_id, t1);
    assert_eq!(stats.centrality[2].node_id, t2);
}

#[test]
fn centrality_is_capped_at_top_n() {
    let mut store = GraphStore::new();
    for i in 0..8 {
        add_node(&mut store, NodeType::Task, &format!("t{i}"));
    }
    let stats = stats::compute(&store, "agent", &exact());
    assert_eq!(stats.centrality.len(), 5);
}

#[test]
fn exact_path_length_and_clustering() {
    let mut store = GraphStore::new();
    let a = add_node(&mut store, NodeType::Concept, "a");
    let b = add_node(&mut store, NodeType::Concept, "b");
    let c = add_node(&mut store, NodeType::Concept, "c");
    add_edge(&mut store, &a, &b, RelationshipType::LeadsTo);
    add_edge(&mut store, &b, &c, RelationshipType::LeadsTo);

    let chain = stats::compute(&store, "agent", &exact());
    // a→b = 1, b→c = 1, a→c = 2
    assert!((chain.average_path_length - 4.0 / 3.0).abs() < 1e-12);
    assert_eq!(chain.clustering_coefficient, 0.0);

    add_edge(&mut store, &a, &c, RelationshipType::LeadsTo);
    let triangle = stats::compute(&store, "agent", &exact());
    assert!((triangle.clustering_coefficient - 1.0).abs() < 1e-12);
    assert_eq!(triangle.mode, StatsMode::Exact);
}

#[test]
fn approximate_mode_uses_closed_forms() {
    let mut store = GraphStore::new();
    let ids: Vec<String> = (0..4)
        .map(|i| add_node(&mut store, NodeType::Concept, &format!("n{i}")))
        .collect();
    add_edge(&mut store, &ids[0], &ids[1], RelationshipType::Knows);
    add_edge(&mut store, &ids[1], &ids[2], RelationshipType::Knows);
    add_edge(&mut store, &ids[2], &ids[3], RelationshipType::Knows);

    let config = StatsConfig {
        mode: StatsMode::Approximate,
        ..StatsConfig::default()
    };
    let stats = stats::compute(&store, "agent", &config);
    assert_eq!(stats.mode, StatsMode::Approximate);
    assert!((stats.clustering_coefficient - stats.density).abs() < 1e-12);
    // mean degree 1.5
    let expected = 4f64.ln() / 1.5f64.ln();
    assert!((stats.average_path_length - expected).abs() < 1e-9);
}

#[test]
fn other_agents_are_invisible() {
    let mut store = GraphStore::new();
    add_node(&mut store, NodeType::Concept, "mine");
    store
        .create_node(Node::new(NodeType::Concept, "theirs", "other"))
        .unwrap();
    let stats = stats::compute(&store, "agent", &exact());
    assert_eq!(stats.node_count, 1);
}
