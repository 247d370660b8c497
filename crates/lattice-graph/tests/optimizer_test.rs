//! Optimizer passes: edge dedup, node merge, importance, idempotence.

use lattice_core::config::OptimizerConfig;
use lattice_core::constants::IMPORTANCE_SCORE_PROPERTY;
use lattice_core::models::{Edge, Node, NodeType, Properties, RelationshipType};
use lattice_graph::{GraphOptimizer, GraphStore};

fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn add_node(store: &mut GraphStore, name: &str, properties: Properties) -> String {
    let node = Node::new(NodeType::Concept, name, "agent").with_properties(properties);
    let id = node.id.clone();
    store.create_node(node).unwrap();
    id
}

fn add_edge(
    store: &mut GraphStore,
    from: &str,
    to: &str,
    relationship: RelationshipType,
    weight: f64,
) -> String {
    let edge = Edge::new(from, to, relationship, weight, "agent");
    let id = edge.id.clone();
    store.create_edge(edge).unwrap();
    id
}

fn optimizer() -> GraphOptimizer {
    GraphOptimizer::new(OptimizerConfig::default())
}

#[test]
fn second_run_is_a_noop() {
    let mut store = GraphStore::new();
    let a = add_node(&mut store, "a", Properties::new());
    let a2 = add_node(&mut store, "a", Properties::new());
    let b = add_node(&mut store, "b", Properties::new());
    add_edge(&mut store, &a, &b, RelationshipType::Knows, 0.5);
    add_edge(&mut store, &a2, &b, RelationshipType::Uses, 0.5);

    let first = optimizer().run(&mut store, "agent").unwrap();
    assert!(!first.is_noop());

    let second = optimizer().run(&mut store, "agent").unwrap();
    assert!(second.is_noop(), "second run changed the graph: {second:?}");
    assert!(second.updated_nodes.is_empty());
    assert!(store.verify_index());
}

#[test]
fn duplicate_edges_collapse_to_the_heaviest() {
    let mut store = GraphStore::new();
    let a = add_node(&mut store, "a", Properties::new());
    let b = add_node(&mut store, "b", Properties::new());

    let light = Edge::new(&a, &b, RelationshipType::Knows, 0.3, "agent");
    let heavy = Edge::new(&a, &b, RelationshipType::Knows, 0.9, "agent");
    let tied = Edge::new(&a, &b, RelationshipType::Knows, 0.9, "agent");
    let (light_id, heavy_id, tied_id) = (light.id.clone(), heavy.id.clone(), tied.id.clone());
    store.load_edge(light).unwrap();
    store.load_edge(heavy).unwrap();
    store.load_edge(tied).unwrap();

    let report = optimizer().run(&mut store, "agent").unwrap();
    assert_eq!(report.duplicate_edges_removed, 2);
    assert!(store.contains_edge(&heavy_id));
    assert!(!store.contains_edge(&light_id));
    assert!(!store.contains_edge(&tied_id));

    let archived: Vec<&str> = report.archived_edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(archived, vec![light_id.as_str(), tied_id.as_str()]);
}

#[test]
fn merge_repoints_edges_and_drops_loops() {
    let mut store = GraphStore::new();
    let a = add_node(&mut store, "x", props(&[("color", "red")]));
    let b = add_node(&mut store, "y", Properties::new());
    let dup = add_node(&mut store, "x", props(&[("color", "blue"), ("size", "l")]));

    let out = add_edge(&mut store, &dup, &b, RelationshipType::Uses, 0.5);
    let back = add_edge(&mut store, &b, &dup, RelationshipType::Knows, 0.5);
    let looped = add_edge(&mut store, &a, &dup, RelationshipType::Similar, 0.5);

    let report = optimizer().run(&mut store, "agent").unwrap();
    assert_eq!(report.nodes_merged, 1);
    assert_eq!(report.edges_repointed, 2);
    assert!(!store.contains_node(&dup));
    assert!(!store.contains_edge(&looped));
    assert_eq!(report.archived_nodes.len(), 1);
    assert_eq!(report.archived_nodes[0].id, dup);
    assert!(report.archived_edges.iter().any(|e| e.id == looped));

    let moved_out = store.get_edge(&out).unwrap();
    assert_eq!(moved_out.from_node, a);
    assert_eq!(moved_out.to_node, b);
    let moved_back = store.get_edge(&back).unwrap();
    assert_eq!(moved_back.to_node, a);

    let primary = store.get_node(&a).unwrap();
    assert_eq!(primary.properties.get("color").map(String::as_str), Some("blue"));
    assert_eq!(primary.properties.get("size").map(String::as_str), Some("l"));
    assert_eq!(primary.agent_id(), Some("agent"));
    assert!(report.updated_nodes.contains(&a));
    assert!(report.updated_edges.contains(&out));
    assert!(store.verify_index());
}

#[test]
fn merge_collision_keeps_the_heavier_edge() {
    let mut store = GraphStore::new();
    let a = add_node(&mut store, "x", Properties::new());
    let b = add_node(&mut store, "y", Properties::new());
    let dup = add_node(&mut store, "x", Properties::new());
    let existing = add_edge(&mut store, &a, &b, RelationshipType::Uses, 0.4);
    let incoming = add_edge(&mut store, &dup, &b, RelationshipType::Uses, 0.8);

    let report = optimizer().run(&mut store, "agent").unwrap();
    assert_eq!(report.duplicate_edges_removed, 1);
    assert!(!store.contains_edge(&existing));
    let survivor = store.get_edge(&incoming).unwrap();
    assert_eq!(survivor.from_node, a);
    assert_eq!(store.agent_edge_count("agent"), 1);
}

#[test]
fn merge_without_repoint_archives_duplicate_edges() {
    let mut store = GraphStore::new();
    let a = add_node(&mut store, "x", Properties::new());
    let b = add_node(&mut store, "y", Properties::new());
    let dup = add_node(&mut store, "x", Properties::new());
    let doomed = add_edge(&mut store, &dup, &b, RelationshipType::Uses, 0.5);

    let config = OptimizerConfig {
        repoint_merged_edges: false,
    };
    let report = GraphOptimizer::new(config).run(&mut store, "agent").unwrap();
    assert_eq!(report.nodes_merged, 1);
    assert_eq!(report.edges_repointed, 0);
    assert!(!store.contains_edge(&doomed));
    assert_eq!(report.archived_edges.len(), 1);
    assert_eq!(report.archived_edges[0].id, doomed);
    assert_eq!(store.degree(&a), 0);
}

#[test]
fn importance_tracks_degree() {
    let mut store = GraphStore::new();
    let hub = add_node(&mut store, "hub", Properties::new());
    let leaf = add_node(&mut store, "leaf", Properties::new());
    let lonely = add_node(&mut store, "lonely", Properties::new());
    add_edge(&mut store, &hub, &leaf, RelationshipType::Knows, 0.5);
    add_edge(&mut store, &leaf, &hub, RelationshipType::DependsOn, 0.5);

    let report = optimizer().run(&mut store, "agent").unwrap();
    assert_eq!(report.importance_updated, 3);

    let score = |id: &str| {
        store
            .get_node(id)
            .unwrap()
            .properties
            .get(IMPORTANCE_SCORE_PROPERTY)
            .cloned()
    };
    assert_eq!(score(&hub).as_deref(), Some("2"));
    assert_eq!(score(&leaf).as_deref(), Some("2"));
    assert_eq!(score(&lonely).as_deref(), Some("0"));
}

#[test]
fn other_agents_are_untouched() {
    let mut store = GraphStore::new();
    let mine = add_node(&mut store, "x", Properties::new());
    let twin = Node::new(NodeType::Concept, "x", "other");
    let twin_id = twin.id.clone();
    store.create_node(twin).unwrap();

    let report = optimizer().run(&mut store, "agent").unwrap();
    assert_eq!(report.nodes_merged, 0);
    assert!(store.contains_node(&mine));
    assert!(store.contains_node(&twin_id));
    assert!(store
        .get_node(&twin_id)
        .unwrap()
        .properties
        .get(IMPORTANCE_SCORE_PROPERTY)
        .is_none());
}
