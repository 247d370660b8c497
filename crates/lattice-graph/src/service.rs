//! GraphService: the authorized, validated entry point to the engine.
//!
//! Every operation runs policy, then validation, then the store, then (for
//! mutations) the persistence adapter. Mutations take `&mut self`, so one
//! service instance is a single writer.

use std::collections::{BTreeMap, HashSet};

use lattice_core::config::{ConsistencyMode, LatticeConfig};
use lattice_core::constants::actions;
use lattice_core::errors::{LatticeError, LatticeResult, PersistenceError, ValidationError};
use lattice_core::models::{
    AuthorizationContext, Edge, GraphCluster, GraphQuery, GraphSnapshot, GraphStats, GraphView,
    Node, NodeType, OptimizationReport, PathResult, Properties, RelationshipType,
};
use lattice_core::traits::PersistenceAdapter;
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::community;
use crate::graph::{GraphStore, Tombstone};
use crate::optimizer::{self, GraphOptimizer};
use crate::policy::PolicyEvaluator;
use crate::stats;
use crate::traversal::{neighbors, path};
use crate::validation::GraphValidator;

/// Archive reason for entities removed by a node deletion.
pub const ARCHIVE_REASON_DELETE: &str = "node_deleted";
/// Archive reason for entities removed by the optimizer.
pub const ARCHIVE_REASON_OPTIMIZE: &str = "optimized";

/// What `hydrate` loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationSummary {
    pub nodes_loaded: usize,
    pub edges_loaded: usize,
    /// Entities rejected because they violate store invariants.
    pub skipped: usize,
    /// Duplicate `(from, to, type)` edges collapsed after loading.
    pub duplicates_collapsed: usize,
}

/// How to take back an in-memory mutation whose persistence failed.
enum Undo {
    RemoveNode(String),
    RemoveEdge(String),
    RestoreNode(Node),
    RestoreEdge(Edge),
    Reinsert {
        node: Option<Tombstone<Node>>,
        edges: Vec<Tombstone<Edge>>,
    },
    Agent {
        snapshot: GraphSnapshot,
        foreign: Vec<Tombstone<Edge>>,
    },
}

/// A multi-call persistence sequence that stopped part way.
struct PartialWrite {
    cause: PersistenceError,
    /// Adapter calls that succeeded before `cause`.
    completed: usize,
}

pub struct GraphService<P: PersistenceAdapter> {
    config: LatticeConfig,
    store: GraphStore,
    validator: GraphValidator,
    policy: PolicyEvaluator,
    optimizer: GraphOptimizer,
    adapter: P,
    /// Entity id → owning agent, for eventual-mode persistence failures.
    divergent: BTreeMap<String, String>,
}

impl<P: PersistenceAdapter> GraphService<P> {
    pub fn new(config: LatticeConfig, adapter: P) -> Self {
        let validator = GraphValidator::new(config.validation.clone(), config.graph.clone());
        let optimizer = GraphOptimizer::new(config.optimizer.clone());
        Self {
            config,
            store: GraphStore::new(),
            validator,
            policy: PolicyEvaluator::new(),
            optimizer,
            adapter,
            divergent: BTreeMap::new(),
        }
    }

    pub fn with_defaults(adapter: P) -> Self {
        Self::new(LatticeConfig::default(), adapter)
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Read-only access to the in-memory graph.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn adapter(&self) -> &P {
        &self.adapter
    }

    /// Ids whose persistence failed in eventual mode and have not been reconciled.
    pub fn divergent(&self) -> Vec<String> {
        self.divergent.keys().cloned().collect()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    #[instrument(skip(self, ctx, name, properties), fields(user_id = %ctx.user_id))]
    pub async fn create_node(
        &mut self,
        ctx: &AuthorizationContext,
        node_type: NodeType,
        name: &str,
        properties: Properties,
        agent_id: &str,
    ) -> LatticeResult<String> {
        self.policy.authorize(ctx, actions::CREATE, agent_id)?;
        self.validator.validate_agent_id(agent_id)?;
        self.validator.validate_node_name(name)?;
        self.validator.validate_properties(&properties)?;
        self.validator.check_node_quota(&self.store, agent_id)?;

        let node = Node::new(node_type, name, agent_id).with_properties(properties);
        let id = node.id.clone();
        self.store.create_node(node.clone())?;

        let outcome = self.adapter.create_node(&node).await.map(|_| ());
        self.settle(outcome, Undo::RemoveNode(id.clone()), "create_node", &id, agent_id)?;
        info!(node_id = %id, agent_id, %node_type, "node created");
        Ok(id)
    }

    pub fn get_node(&self, ctx: &AuthorizationContext, node_id: &str) -> LatticeResult<Node> {
        let node = self.resolve_node(node_id)?;
        self.policy
            .authorize(ctx, actions::READ, node.agent_id().unwrap_or_default())?;
        Ok(node.clone())
    }

    #[instrument(skip(self, ctx, properties), fields(user_id = %ctx.user_id))]
    pub async fn update_node(
        &mut self,
        ctx: &AuthorizationContext,
        node_id: &str,
        properties: Properties,
    ) -> LatticeResult<()> {
        let agent_id = self.node_owner(node_id)?;
        self.policy.authorize(ctx, actions::UPDATE, &agent_id)?;
        self.validator.validate_property_update(&properties)?;
        let existing = &self.store.get_node(node_id)?.properties;
        self.validator
            .validate_merged_properties(existing, &properties)?;

        let prior = self.store.update_node(node_id, &properties)?;
        let current = self.store.get_node(node_id)?.clone();
        let outcome = self.adapter.update_node(&current).await;
        self.settle(outcome, Undo::RestoreNode(prior), "update_node", node_id, &agent_id)?;
        info!(node_id, agent_id = %agent_id, keys = properties.len(), "node updated");
        Ok(())
    }

    /// Delete a node and its incident edges, refusing when more edges than
    /// the configured threshold would go with it.
    pub async fn delete_node(&mut self, ctx: &AuthorizationContext, node_id: &str) -> LatticeResult<()> {
        self.delete_node_checked(ctx, node_id, false).await
    }

    /// Delete a node regardless of how many edges cascade with it.
    pub async fn delete_node_confirmed(
        &mut self,
        ctx: &AuthorizationContext,
        node_id: &str,
    ) -> LatticeResult<()> {
        self.delete_node_checked(ctx, node_id, true).await
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    async fn delete_node_checked(
        &mut self,
        ctx: &AuthorizationContext,
        node_id: &str,
        confirmed: bool,
    ) -> LatticeResult<()> {
        let agent_id = self.node_owner(node_id)?;
        self.policy.authorize(ctx, actions::DELETE, &agent_id)?;

        let incident = self.store.degree(node_id);
        let threshold = self.config.graph.cascade_confirmation_threshold;
        if !confirmed && incident > threshold {
            return Err(LatticeError::InvalidState {
                reason: format!(
                    "node {node_id} has {incident} incident edges (threshold {threshold}); \
                     deletion requires confirmation"
                ),
            });
        }

        let (node, edges) = self.store.delete_node(node_id)?;
        let removed_edges: Vec<Edge> = edges.iter().map(|t| t.entity.clone()).collect();
        let outcome = self
            .persist_removal(Some(&node.entity), &removed_edges, ARCHIVE_REASON_DELETE)
            .await;
        self.settle_sequence(
            outcome,
            Undo::Reinsert {
                node: Some(node),
                edges,
            },
            "delete_node",
            node_id,
            &agent_id,
        )?;
        info!(node_id, agent_id = %agent_id, cascaded = removed_edges.len(), "node deleted");
        Ok(())
    }

    // ── Edges ─────────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, ctx, weight, properties), fields(user_id = %ctx.user_id))]
    pub async fn create_edge(
        &mut self,
        ctx: &AuthorizationContext,
        from_node: &str,
        to_node: &str,
        relationship_type: RelationshipType,
        weight: Option<f64>,
        properties: Option<Properties>,
        agent_id: &str,
    ) -> LatticeResult<String> {
        self.policy.authorize(ctx, actions::CREATE, agent_id)?;
        self.validator.validate_agent_id(agent_id)?;
        self.validator.validate_id("from_node", from_node)?;
        self.validator.validate_id("to_node", to_node)?;
        let weight = weight.unwrap_or(self.config.graph.default_edge_weight);
        self.validator.validate_weight(weight)?;
        let properties = properties.unwrap_or_default();
        self.validator.validate_properties(&properties)?;

        let edge = Edge::new(from_node, to_node, relationship_type, weight, agent_id)
            .with_properties(properties);
        self.validator.check_new_edge(&self.store, &edge)?;
        self.validator.check_edge_quota(&self.store, agent_id)?;

        let id = edge.id.clone();
        self.store.create_edge(edge.clone())?;
        let outcome = self.adapter.create_edge(&edge).await.map(|_| ());
        self.settle(outcome, Undo::RemoveEdge(id.clone()), "create_edge", &id, agent_id)?;
        info!(edge_id = %id, agent_id, %relationship_type, "edge created");
        Ok(id)
    }

    pub fn get_edge(&self, ctx: &AuthorizationContext, edge_id: &str) -> LatticeResult<Edge> {
        self.validator.validate_id("edge_id", edge_id)?;
        let edge = self.store.get_edge(edge_id)?;
        self.policy
            .authorize(ctx, actions::READ, edge.agent_id().unwrap_or_default())?;
        Ok(edge.clone())
    }

    #[instrument(skip(self, ctx, properties), fields(user_id = %ctx.user_id))]
    pub async fn update_edge(
        &mut self,
        ctx: &AuthorizationContext,
        edge_id: &str,
        weight: Option<f64>,
        properties: Option<Properties>,
    ) -> LatticeResult<()> {
        self.validator.validate_id("edge_id", edge_id)?;
        let agent_id = self
            .store
            .get_edge(edge_id)?
            .agent_id()
            .unwrap_or_default()
            .to_string();
        self.policy.authorize(ctx, actions::UPDATE, &agent_id)?;
        if weight.is_none() && properties.is_none() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if let Some(weight) = weight {
            self.validator.validate_weight(weight)?;
        }
        if let Some(properties) = &properties {
            self.validator.validate_property_update(properties)?;
            let existing = &self.store.get_edge(edge_id)?.properties;
            self.validator
                .validate_merged_properties(existing, properties)?;
        }

        let prior = self
            .store
            .update_edge(edge_id, weight, properties.as_ref())?;
        let current = self.store.get_edge(edge_id)?.clone();
        let outcome = self.adapter.update_edge(&current).await;
        self.settle(outcome, Undo::RestoreEdge(prior), "update_edge", edge_id, &agent_id)?;
        info!(edge_id, agent_id = %agent_id, "edge updated");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn delete_edge(&mut self, ctx: &AuthorizationContext, edge_id: &str) -> LatticeResult<()> {
        self.validator.validate_id("edge_id", edge_id)?;
        let agent_id = self
            .store
            .get_edge(edge_id)?
            .agent_id()
            .unwrap_or_default()
            .to_string();
        self.policy.authorize(ctx, actions::DELETE, &agent_id)?;

        let removed = self.store.delete_edge(edge_id)?;
        let outcome = self.adapter.delete_edge(edge_id).await;
        self.settle(
            outcome,
            Undo::Reinsert {
                node: None,
                edges: vec![removed],
            },
            "delete_edge",
            edge_id,
            &agent_id,
        )?;
        info!(edge_id, agent_id = %agent_id, "edge deleted");
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Filtered view of one agent's graph.
    ///
    /// `limit` caps nodes in creation order; edges are kept only when both
    /// endpoints made it into the view.
    pub fn get_graph(
        &self,
        ctx: &AuthorizationContext,
        agent_id: &str,
        query: &GraphQuery,
    ) -> LatticeResult<GraphView> {
        let _span = crate::graph_query_span!("get_graph", agent_id).entered();
        self.validator.validate_agent_id(agent_id)?;
        self.policy.authorize(ctx, actions::READ, agent_id)?;
        if let Some(limit) = query.limit {
            self.validator.validate_limit(limit)?;
        }

        let neighborhood: Option<HashSet<String>> = match &query.start_node {
            Some(start) => {
                self.resolve_node(start)?;
                let depth = query.depth.unwrap_or(self.config.graph.default_neighbor_depth);
                self.validator.validate_neighbor_depth(depth)?;
                Some(
                    neighbors::reachable_ids(&self.store, start, Some(depth))
                        .into_iter()
                        .collect(),
                )
            }
            None => None,
        };

        let limit = query.limit.unwrap_or(usize::MAX);
        let nodes: Vec<Node> = self
            .store
            .agent_nodes(agent_id)
            .filter(|n| neighborhood.as_ref().map_or(true, |set| set.contains(&n.id)))
            .filter(|n| {
                query
                    .node_types
                    .as_ref()
                    .map_or(true, |types| types.contains(&n.node_type))
            })
            .take(limit)
            .cloned()
            .collect();

        let included: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edges: Vec<Edge> = self
            .store
            .agent_edges(agent_id)
            .filter(|e| {
                query
                    .relationship_types
                    .as_ref()
                    .map_or(true, |types| types.contains(&e.relationship_type))
            })
            .filter(|e| included.contains(e.from_node.as_str()) && included.contains(e.to_node.as_str()))
            .cloned()
            .collect();

        debug!(nodes = nodes.len(), edges = edges.len(), "graph view assembled");
        Ok(GraphView { nodes, edges })
    }

    /// Zero or one cheapest path from `from_node` to `to_node`.
    pub fn find_path(
        &self,
        ctx: &AuthorizationContext,
        from_node: &str,
        to_node: &str,
        max_depth: Option<usize>,
    ) -> LatticeResult<Vec<PathResult>> {
        let depth = max_depth.unwrap_or(self.config.graph.default_path_depth);
        self.validator.validate_path_depth(depth)?;
        let from_agent = self.node_owner(from_node)?;
        let to_agent = self.node_owner(to_node)?;
        let _span = crate::graph_query_span!("find_path", from_agent).entered();
        self.policy.authorize(ctx, actions::READ, &from_agent)?;
        if to_agent != from_agent {
            self.policy.authorize(ctx, actions::READ, &to_agent)?;
        }

        let found = path::shortest(&self.store, from_node, to_node, depth);
        debug!(from_node, to_node, depth, found = found.is_some(), "path search");
        Ok(found.into_iter().collect())
    }

    /// Nodes within `depth` forward hops, the start node included.
    pub fn get_neighbors(
        &self,
        ctx: &AuthorizationContext,
        node_id: &str,
        depth: Option<usize>,
    ) -> LatticeResult<Vec<Node>> {
        let depth = depth.unwrap_or(self.config.graph.default_neighbor_depth);
        self.validator.validate_neighbor_depth(depth)?;
        let agent_id = self.node_owner(node_id)?;
        let _span = crate::graph_query_span!("get_neighbors", agent_id).entered();
        self.policy.authorize(ctx, actions::READ, &agent_id)?;

        Ok(neighbors::reachable(&self.store, node_id, Some(depth))
            .into_iter()
            .filter_map(|hit| self.store.node(&hit.node_id).cloned())
            .collect())
    }

    pub fn get_stats(&self, ctx: &AuthorizationContext, agent_id: &str) -> LatticeResult<GraphStats> {
        let _span = crate::graph_query_span!("get_stats", agent_id).entered();
        self.validator.validate_agent_id(agent_id)?;
        self.policy.authorize(ctx, actions::READ, agent_id)?;
        Ok(stats::compute(&self.store, agent_id, &self.config.stats))
    }

    pub fn find_clusters(
        &self,
        ctx: &AuthorizationContext,
        agent_id: &str,
    ) -> LatticeResult<Vec<GraphCluster>> {
        let _span = crate::graph_query_span!("find_clusters", agent_id).entered();
        self.validator.validate_agent_id(agent_id)?;
        self.policy.authorize(ctx, actions::READ, agent_id)?;
        Ok(community::find_clusters(
            &self.store,
            agent_id,
            &self.config.community,
        ))
    }

    /// Serializable copy of one agent's graph.
    pub fn snapshot(&self, ctx: &AuthorizationContext, agent_id: &str) -> LatticeResult<GraphSnapshot> {
        self.validator.validate_agent_id(agent_id)?;
        self.policy.authorize(ctx, actions::READ, agent_id)?;
        Ok(self.store.snapshot(agent_id))
    }

    // ── Maintenance ───────────────────────────────────────────────────────

    /// Run the optimizer and mirror its removals and updates to the backend.
    pub async fn optimize_graph(
        &mut self,
        ctx: &AuthorizationContext,
        agent_id: &str,
    ) -> LatticeResult<OptimizationReport> {
        self.validator.validate_agent_id(agent_id)?;
        self.policy.authorize(ctx, actions::OPTIMIZE, agent_id)?;
        let span = crate::graph_maintenance_span!("optimize_graph", agent_id);
        self.optimize_agent(agent_id).instrument(span).await
    }

    async fn optimize_agent(&mut self, agent_id: &str) -> LatticeResult<OptimizationReport> {
        let before = Undo::Agent {
            snapshot: self.store.snapshot(agent_id),
            foreign: self.store.foreign_incident_edges(agent_id),
        };
        let report = match self.optimizer.run(&mut self.store, agent_id) {
            Ok(report) => report,
            Err(e) => {
                error!(agent_id, error = %e, "optimizer failed; restoring agent graph");
                self.undo(before);
                return Err(e);
            }
        };
        let outcome = self.persist_optimization(&report).await;
        self.settle_sequence(outcome, before, "optimize_graph", agent_id, agent_id)?;
        Ok(report)
    }

    /// Replace the cached subgraph of `agent_id` with the backend's copy.
    ///
    /// Nodes of other agents, edges with missing endpoints, self-loops and
    /// out-of-range weights are skipped. Duplicate edge keys are collapsed.
    pub async fn hydrate(&mut self, agent_id: &str) -> LatticeResult<HydrationSummary> {
        self.validator.validate_agent_id(agent_id)?;
        let span = crate::graph_maintenance_span!("hydrate", agent_id);
        self.load_agent(agent_id).instrument(span).await
    }

    /// Hydrate `agent_id` and forget its recorded divergences.
    pub async fn reconcile(&mut self, agent_id: &str) -> LatticeResult<HydrationSummary> {
        let summary = self.hydrate(agent_id).await?;
        let before = self.divergent.len();
        self.divergent.retain(|_, owner| owner != agent_id);
        info!(
            agent_id,
            cleared = before - self.divergent.len(),
            "agent graph reconciled"
        );
        Ok(summary)
    }

    async fn load_agent(&mut self, agent_id: &str) -> LatticeResult<HydrationSummary> {
        let snapshot = self.adapter.load_graph(agent_id).await.map_err(|cause| {
            error!(agent_id, %cause, "failed to load agent graph");
            LatticeError::from(cause)
        })?;

        let foreign = self.store.foreign_incident_edges(agent_id);
        self.store.remove_agent(agent_id)?;
        let mut summary = HydrationSummary::default();

        for node in snapshot.nodes {
            if !node.belongs_to(agent_id) || self.store.contains_node(&node.id) {
                warn!(node_id = %node.id, "skipping foreign or duplicate node");
                summary.skipped += 1;
                continue;
            }
            self.store.create_node(node)?;
            summary.nodes_loaded += 1;
        }

        for edge in snapshot.edges {
            let sound = edge.belongs_to(agent_id)
                && self.validator.validate_weight(edge.weight).is_ok()
                && edge.from_node != edge.to_node
                && self.store.contains_node(&edge.from_node)
                && self.store.contains_node(&edge.to_node)
                && !self.store.contains_edge(&edge.id);
            if !sound {
                warn!(edge_id = %edge.id, "skipping edge that violates graph invariants");
                summary.skipped += 1;
                continue;
            }
            self.store.load_edge(edge)?;
            summary.edges_loaded += 1;
        }
        self.reattach_foreign(foreign)?;

        let mut collapsed = OptimizationReport::default();
        optimizer::collapse_duplicate_edges(&mut self.store, agent_id, &mut collapsed)?;
        summary.duplicates_collapsed = collapsed.duplicate_edges_removed;
        if summary.duplicates_collapsed > 0 {
            warn!(
                agent_id,
                collapsed = summary.duplicates_collapsed,
                "backend held duplicate edges"
            );
        }

        info!(
            agent_id,
            nodes = summary.nodes_loaded,
            edges = summary.edges_loaded,
            skipped = summary.skipped,
            "agent graph hydrated"
        );
        Ok(summary)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn resolve_node(&self, node_id: &str) -> LatticeResult<&Node> {
        self.validator.validate_id("node_id", node_id)?;
        self.store.get_node(node_id)
    }

    fn node_owner(&self, node_id: &str) -> LatticeResult<String> {
        Ok(self
            .resolve_node(node_id)?
            .agent_id()
            .unwrap_or_default()
            .to_string())
    }

    /// Archive then delete, edges first.
    async fn persist_removal(
        &self,
        node: Option<&Node>,
        edges: &[Edge],
        reason: &str,
    ) -> Result<(), PartialWrite> {
        let mut completed = 0;
        self.archive_and_delete(node, edges, reason, &mut completed)
            .await
            .map_err(|cause| PartialWrite { cause, completed })
    }

    async fn archive_and_delete(
        &self,
        node: Option<&Node>,
        edges: &[Edge],
        reason: &str,
        completed: &mut usize,
    ) -> Result<(), PersistenceError> {
        for edge in edges {
            self.adapter.archive_edge(edge, reason).await?;
            *completed += 1;
            self.adapter.delete_edge(&edge.id).await?;
            *completed += 1;
        }
        if let Some(node) = node {
            self.adapter.archive_node(node, reason).await?;
            *completed += 1;
            self.adapter.delete_node(&node.id).await?;
            *completed += 1;
        }
        Ok(())
    }

    async fn persist_optimization(&self, report: &OptimizationReport) -> Result<(), PartialWrite> {
        let mut completed = 0;
        self.mirror_optimization(report, &mut completed)
            .await
            .map_err(|cause| PartialWrite { cause, completed })
    }

    async fn mirror_optimization(
        &self,
        report: &OptimizationReport,
        completed: &mut usize,
    ) -> Result<(), PersistenceError> {
        self.archive_and_delete(None, &report.archived_edges, ARCHIVE_REASON_OPTIMIZE, completed)
            .await?;
        for node in &report.archived_nodes {
            self.archive_and_delete(Some(node), &[], ARCHIVE_REASON_OPTIMIZE, completed)
                .await?;
        }
        for id in &report.updated_nodes {
            if let Some(node) = self.store.node(id) {
                self.adapter.update_node(node).await?;
                *completed += 1;
            }
        }
        for id in &report.updated_edges {
            if let Some(edge) = self.store.edge(id) {
                self.adapter.update_edge(edge).await?;
                *completed += 1;
            }
        }
        Ok(())
    }

    /// `settle` for a multi-call sequence. When the backend already applied
    /// part of it, a strict rollback cannot undo those calls, so the entity is
    /// also recorded as divergent until `reconcile` runs.
    fn settle_sequence(
        &mut self,
        outcome: Result<(), PartialWrite>,
        undo: Undo,
        operation: &'static str,
        entity_id: &str,
        agent_id: &str,
    ) -> LatticeResult<()> {
        let Err(PartialWrite { cause, completed }) = outcome else {
            return Ok(());
        };
        if completed > 0 && self.config.graph.consistency == ConsistencyMode::Strict {
            warn!(
                operation,
                entity_id,
                agent_id,
                completed,
                "backend applied part of the sequence; marking divergent"
            );
            self.divergent
                .insert(entity_id.to_string(), agent_id.to_string());
        }
        self.settle(Err(cause), undo, operation, entity_id, agent_id)
    }

    /// Apply the consistency policy to a persistence outcome.
    fn settle(
        &mut self,
        outcome: Result<(), PersistenceError>,
        undo: Undo,
        operation: &'static str,
        entity_id: &str,
        agent_id: &str,
    ) -> LatticeResult<()> {
        let Err(cause) = outcome else {
            return Ok(());
        };
        match self.config.graph.consistency {
            ConsistencyMode::Strict => {
                error!(operation, entity_id, agent_id, %cause, "persistence failed; rolling back");
                self.undo(undo);
                Err(cause.into())
            }
            ConsistencyMode::Eventual => {
                warn!(operation, entity_id, agent_id, %cause, "persistence failed; cache diverges from backend");
                self.divergent
                    .insert(entity_id.to_string(), agent_id.to_string());
                Ok(())
            }
        }
    }

    fn undo(&mut self, undo: Undo) {
        let result = match undo {
            Undo::RemoveNode(id) => self.store.delete_node(&id).map(|_| ()),
            Undo::RemoveEdge(id) => self.store.delete_edge(&id).map(|_| ()),
            Undo::RestoreNode(node) => self.store.replace_node(node).map(|_| ()),
            Undo::RestoreEdge(edge) => self.store.replace_edge(edge).map(|_| ()),
            Undo::Reinsert { node, edges } => self.reinsert(node, edges),
            Undo::Agent { snapshot, foreign } => self.restore_agent(snapshot, foreign),
        };
        if let Err(e) = result {
            error!(error = %e, "rollback failed; verify the graph index");
        }
    }

    fn reinsert(&mut self, node: Option<Tombstone<Node>>, edges: Vec<Tombstone<Edge>>) -> LatticeResult<()> {
        if let Some(node) = node {
            self.store.restore_node(node)?;
        }
        for edge in edges {
            self.store.restore_edge(edge)?;
        }
        Ok(())
    }

    fn restore_agent(
        &mut self,
        snapshot: GraphSnapshot,
        foreign: Vec<Tombstone<Edge>>,
    ) -> LatticeResult<()> {
        let _span = crate::graph_mutation_span!("restore_agent", snapshot.agent_id).entered();
        self.store.remove_agent(&snapshot.agent_id)?;
        // Foreign edges the failed run repointed are put back as they were.
        for edge in &foreign {
            if self.store.contains_edge(&edge.entity.id) {
                self.store.delete_edge(&edge.entity.id)?;
            }
        }
        for node in snapshot.nodes {
            self.store.create_node(node)?;
        }
        for edge in snapshot.edges {
            self.store.load_edge(edge)?;
        }
        self.reattach_foreign(foreign)?;
        Ok(())
    }

    /// Put back other agents' edges that were dropped with an agent's nodes.
    /// Edges whose endpoint did not come back are left out.
    fn reattach_foreign(&mut self, foreign: Vec<Tombstone<Edge>>) -> LatticeResult<usize> {
        let mut restored = 0;
        for edge in foreign {
            let sound = self.store.contains_node(&edge.entity.from_node)
                && self.store.contains_node(&edge.entity.to_node)
                && !self.store.contains_edge(&edge.entity.id);
            if !sound {
                warn!(edge_id = %edge.entity.id, "cross-agent edge cannot be re-attached; dropped");
                continue;
            }
            self.store.restore_edge(edge)?;
            restored += 1;
        }
        Ok(restored)
    }
}
