use std::collections::HashMap;

use chrono::Utc;
use lattice_core::constants::AGENT_ID_PROPERTY;
use lattice_core::errors::LatticeResult;
use lattice_core::models::{Edge, NodeType, OptimizationReport};
use tracing::debug;

use crate::graph::GraphStore;

/// Fold nodes sharing `(name, node_type)` into the oldest of them.
///
/// Duplicate properties are applied in creation order, so the newest value
/// of a conflicting key wins; `agent_id` is never touched. With `repoint`
/// the duplicates' edges move to the survivor, otherwise they are removed
/// together with the duplicate.
pub(super) fn merge_duplicate_nodes(
    store: &mut GraphStore,
    agent_id: &str,
    repoint: bool,
    report: &mut OptimizationReport,
) -> LatticeResult<()> {
    let mut slots: HashMap<(String, NodeType), usize> = HashMap::new();
    let mut groups: Vec<Vec<String>> = Vec::new();
    for node in store.agent_nodes(agent_id) {
        let key = (node.name.clone(), node.node_type);
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(node.id.clone());
    }

    for group in groups.into_iter().filter(|g| g.len() > 1) {
        let primary_id = &group[0];
        let mut primary = store.get_node(primary_id)?.clone();
        let original = primary.properties.clone();

        for duplicate_id in &group[1..] {
            let duplicate = store.get_node(duplicate_id)?;
            for (key, value) in &duplicate.properties {
                if key != AGENT_ID_PROPERTY {
                    primary.properties.insert(key.clone(), value.clone());
                }
            }

            if repoint {
                let incident: Vec<Edge> = store
                    .incident_edges(duplicate_id)
                    .into_iter()
                    .cloned()
                    .collect();
                for edge in incident {
                    repoint_edge(store, edge, duplicate_id, primary_id, report)?;
                }
            }

            let (removed, cascaded) = store.delete_node(duplicate_id)?;
            report
                .archived_edges
                .extend(cascaded.into_iter().map(|t| t.entity));
            report.archived_nodes.push(removed.entity);
            report.nodes_merged += 1;
            debug!(primary = %primary_id, duplicate = %duplicate_id, "merged duplicate node");
        }

        if primary.properties != original {
            primary.updated_at = Utc::now();
            store.replace_node(primary)?;
            report.updated_nodes.push(primary_id.clone());
        }
    }
    Ok(())
}

/// Move one endpoint of `edge` from `duplicate` to `primary`.
///
/// Edges that would loop are dropped. On a key collision the heavier edge
/// survives, the older one on equal weight.
fn repoint_edge(
    store: &mut GraphStore,
    edge: Edge,
    duplicate: &str,
    primary: &str,
    report: &mut OptimizationReport,
) -> LatticeResult<()> {
    let mut moved = edge.clone();
    if moved.from_node == duplicate {
        moved.from_node = primary.to_string();
    }
    if moved.to_node == duplicate {
        moved.to_node = primary.to_string();
    }

    if moved.from_node == moved.to_node {
        let removed = store.delete_edge(&edge.id)?;
        report.archived_edges.push(removed.entity);
        return Ok(());
    }

    if let Some(existing_id) = store.edges_with_key(&moved.key()).first().cloned() {
        let existing = store.get_edge(&existing_id)?;
        let keep_existing = existing.weight > moved.weight
            || (existing.weight == moved.weight
                && store.ordinal(&existing_id) < store.ordinal(&edge.id));
        let loser = if keep_existing { &edge.id } else { &existing_id };
        let removed = store.delete_edge(loser)?;
        report.archived_edges.push(removed.entity);
        report.duplicate_edges_removed += 1;
        if keep_existing {
            return Ok(());
        }
    }

    moved.updated_at = Utc::now();
    store.replace_edge(moved)?;
    report.edges_repointed += 1;
    report.updated_edges.push(edge.id);
    Ok(())
}
