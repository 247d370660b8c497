//! Community detectors.

use lattice_core::config::{CommunityConfig, CommunityStrategy};
use lattice_core::models::{Edge, Node, NodeType, RelationshipType};
use lattice_graph::community::{self, CommunityDetector, LabelPropagationDetector};
use lattice_graph::graph::AgentProjection;
use lattice_graph::GraphStore;

fn add_node(store: &mut GraphStore, node_type: NodeType, name: &str) -> String {
    let node = Node::new(node_type, name, "agent");
    let id = node.id.clone();
    store.create_node(node).unwrap();
    id
}

fn link(store: &mut GraphStore, from: &str, to: &str) {
    store
        .create_edge(Edge::new(from, to, RelationshipType::Similar, 1.0, "agent"))
        .unwrap();
}

#[test]
fn node_type_clusters_cover_every_node() {
    let mut store = GraphStore::new();
    let t1 = add_node(&mut store, NodeType::Tool, "t1");
    let m1 = add_node(&mut store, NodeType::Memory, "m1");
    let t2 = add_node(&mut store, NodeType::Tool, "t2");
    let _m2 = add_node(&mut store, NodeType::Memory, "m2");

    let clusters = community::find_clusters(&store, "agent", &CommunityConfig::default());
    assert_eq!(clusters.len(), 2);

    let tools = clusters.iter().find(|c| c.id == "cluster_tool").unwrap();
    assert_eq!(tools.nodes, vec![t1.clone(), t2]);
    assert_eq!(tools.center_node, t1);
    assert!((tools.strength - 0.5).abs() < 1e-12);

    let memories = clusters.iter().find(|c| c.id == "cluster_memory").unwrap();
    assert_eq!(memories.center_node, m1);

    let total: usize = clusters.iter().map(|c| c.nodes.len()).sum();
    assert_eq!(total, 4);
}

#[test]
fn empty_agent_has_no_clusters() {
    let store = GraphStore::new();
    assert!(community::find_clusters(&store, "agent", &CommunityConfig::default()).is_empty());
}

#[test]
fn label_propagation_separates_disconnected_triangles() {
    let mut store = GraphStore::new();
    let left: Vec<String> = (0..3)
        .map(|i| add_node(&mut store, NodeType::Concept, &format!("l{i}")))
        .collect();
    let right: Vec<String> = (0..3)
        .map(|i| add_node(&mut store, NodeType::Concept, &format!("r{i}")))
        .collect();
    for group in [&left, &right] {
        link(&mut store, &group[0], &group[1]);
        link(&mut store, &group[1], &group[2]);
        link(&mut store, &group[2], &group[0]);
    }

    let config = CommunityConfig {
        strategy: CommunityStrategy::LabelPropagation,
        ..CommunityConfig::default()
    };
    let clusters = community::find_clusters(&store, "agent", &config);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].id, "community_0");

    let mut first = clusters[0].nodes.clone();
    first.sort();
    let mut expected = left.clone();
    expected.sort();
    assert_eq!(first, expected);
    assert!((clusters[1].strength - 0.5).abs() < 1e-12);
}

#[test]
fn label_propagation_is_deterministic_and_isolates_singletons() {
    let mut store = GraphStore::new();
    let hub = add_node(&mut store, NodeType::Agent, "hub");
    let spokes: Vec<String> = (0..3)
        .map(|i| add_node(&mut store, NodeType::Task, &format!("s{i}")))
        .collect();
    let loner = add_node(&mut store, NodeType::Task, "loner");
    for spoke in &spokes {
        link(&mut store, &hub, spoke);
    }

    let projection = AgentProjection::build(&store, "agent");
    let detector = LabelPropagationDetector::new(20);
    let first = detector.detect(&projection);
    let second = detector.detect(&projection);
    assert_eq!(first, second);

    assert_eq!(first.len(), 2);
    assert_eq!(first[0].center_node, hub);
    assert_eq!(first[0].nodes.len(), 4);
    assert_eq!(first[1].nodes, vec![loner]);
}
