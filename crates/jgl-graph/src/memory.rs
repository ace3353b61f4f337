//! In-memory implementation of [`GraphStore`] and [`AnalyticsBackend`] for
//! testing. Nodes are matched on label + properties like a Cypher `MERGE`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use jgl_core::analytics::{CommunityStats, LeidenParams, MemoryEstimate, ProjectionHandle};
use jgl_core::intent::{NodeIntent, RelType, RelationshipIntent, ValueUpdate, VALUE_PROPERTY};
use jgl_core::{StoreError, StoreResult};
use tokio::sync::RwLock;

use crate::locks::IdentityLocks;
use crate::store::{AnalyticsBackend, GraphStore};

pub struct MemoryStore {
    nodes: RwLock<Vec<NodeIntent>>,
    /// (from index, to index, type) into `nodes`
    edges: RwLock<Vec<(usize, usize, RelType)>>,
    projections: RwLock<HashSet<String>>,
    statements: AtomicUsize,
    fail_on_label: Option<String>,
    delay: Option<Duration>,
    drop_error: Option<String>,
    leiden_stats: Option<CommunityStats>,
    /// Yield between the existence check and the insert of a node merge.
    split_merge: bool,
    locks: Option<IdentityLocks>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
            edges: RwLock::new(Vec::new()),
            projections: RwLock::new(HashSet::new()),
            statements: AtomicUsize::new(0),
            fail_on_label: None,
            delay: None,
            drop_error: None,
            leiden_stats: Some(CommunityStats {
                community_count: 1,
                modularity: 0.0,
                node_properties_written: 0,
            }),
            split_merge: false,
            locks: None,
        }
    }

    /// Reject every node upsert with this label.
    pub fn failing_on(mut self, label: &str) -> Self {
        self.fail_on_label = Some(label.to_string());
        self
    }

    /// Sleep before every statement, like a network round trip.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make `drop_projection` fail with a non-"not found" error.
    pub fn with_drop_error(mut self, message: &str) -> Self {
        self.drop_error = Some(message.to_string());
        self
    }

    /// Let other tasks run between a node merge's check and its insert, the
    /// way a store without uniqueness constraints behaves.
    pub fn with_split_merge(mut self) -> Self {
        self.split_merge = true;
        self
    }

    /// Serialize node merges per identity like [`crate::GraphClient`].
    pub fn with_identity_locks(mut self) -> Self {
        self.locks = Some(IdentityLocks::default());
        self
    }

    pub fn with_stats(mut self, stats: Option<CommunityStats>) -> Self {
        self.leiden_stats = stats;
        self
    }

    pub async fn add_projection(&self, name: &str) {
        self.projections.write().await.insert(name.to_string());
    }

    pub async fn has_projection(&self, name: &str) -> bool {
        self.projections.read().await.contains(name)
    }

    pub async fn nodes(&self) -> Vec<NodeIntent> {
        self.nodes.read().await.clone()
    }

    pub async fn node_count(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn edge_count(&self) -> usize {
        self.edges.read().await.len()
    }

    /// Stored nodes equal to `node`.
    pub async fn copies(&self, node: &NodeIntent) -> usize {
        self.nodes.read().await.iter().filter(|n| *n == node).count()
    }

    pub async fn contains(&self, node: &NodeIntent) -> bool {
        self.nodes.read().await.contains(node)
    }

    pub async fn has_edge(&self, from: &NodeIntent, to: &NodeIntent) -> bool {
        let nodes = self.nodes.read().await;
        let position = |n: &NodeIntent| nodes.iter().position(|m| m == n);
        match (position(from), position(to)) {
            (Some(a), Some(b)) => self.edges.read().await.iter().any(|&(f, t, _)| f == a && t == b),
            _ => false,
        }
    }

    /// Store calls issued so far, failed ones included.
    pub fn statement_count(&self) -> usize {
        self.statements.load(Ordering::SeqCst)
    }

    async fn round_trip(&self) {
        self.statements.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn merge_node(&self, node: &NodeIntent) -> StoreResult<()> {
        self.round_trip().await;
        if self.fail_on_label.as_deref() == Some(node.label.as_str()) {
            return Err(StoreError::Query(format!("rejected label {}", node.label)));
        }

        let _guard = match &self.locks {
            Some(locks) => Some(locks.lock(node).await),
            None => None,
        };

        if !self.split_merge {
            let mut nodes = self.nodes.write().await;
            if !nodes.contains(node) {
                nodes.push(node.clone());
            }
            return Ok(());
        }

        let exists = self.nodes.read().await.contains(node);
        tokio::task::yield_now().await;
        if !exists {
            self.nodes.write().await.push(node.clone());
        }
        Ok(())
    }

    async fn merge_relationship(&self, rel: &RelationshipIntent) -> StoreResult<()> {
        self.round_trip().await;
        let nodes = self.nodes.read().await;
        let from = nodes.iter().position(|n| n == &rel.from);
        let to = nodes.iter().position(|n| n == &rel.to);

        let (Some(from), Some(to)) = (from, to) else {
            return Err(StoreError::MissingEndpoint {
                from: rel.from.identity(),
                to: rel.to.identity(),
            });
        };

        let mut edges = self.edges.write().await;
        if !edges.contains(&(from, to, rel.rel_type)) {
            edges.push((from, to, rel.rel_type));
        }
        Ok(())
    }

    async fn set_value(&self, update: &ValueUpdate) -> StoreResult<()> {
        self.round_trip().await;
        let mut nodes = self.nodes.write().await;
        let node = nodes
            .iter_mut()
            .find(|n| **n == update.node)
            .ok_or_else(|| StoreError::NodeNotFound(update.node.identity()))?;
        node.properties.insert(VALUE_PROPERTY.to_string(), update.value.clone());
        Ok(())
    }
}

#[async_trait]
impl AnalyticsBackend for MemoryStore {
    async fn drop_projection(&self, name: &str) -> StoreResult<()> {
        self.round_trip().await;
        if let Some(message) = &self.drop_error {
            return Err(StoreError::Query(message.clone()));
        }
        if self.projections.write().await.remove(name) {
            Ok(())
        } else {
            Err(StoreError::ProjectionNotFound(name.to_string()))
        }
    }

    async fn create_projection(&self, name: &str, _rel_type: RelType) -> StoreResult<ProjectionHandle> {
        self.round_trip().await;
        let mut projections = self.projections.write().await;
        if !projections.insert(name.to_string()) {
            return Err(StoreError::Query(format!("A graph with name '{name}' already exists.")));
        }
        Ok(ProjectionHandle {
            name: name.to_string(),
            node_count: self.nodes.read().await.len() as i64,
            // undirected: each edge is projected in both directions
            relationship_count: 2 * self.edges.read().await.len() as i64,
        })
    }

    async fn estimate_leiden(&self, name: &str, _params: &LeidenParams) -> StoreResult<MemoryEstimate> {
        self.round_trip().await;
        if !self.has_projection(name).await {
            return Err(StoreError::Query(format!("Graph with name `{name}` does not exist")));
        }
        Ok(MemoryEstimate {
            node_count: self.nodes.read().await.len() as i64,
            relationship_count: 2 * self.edges.read().await.len() as i64,
            required_memory: "[1 KiB ... 2 KiB]".to_string(),
        })
    }

    async fn write_leiden(&self, name: &str, _params: &LeidenParams) -> StoreResult<CommunityStats> {
        self.round_trip().await;
        if !self.has_projection(name).await {
            return Err(StoreError::Query(format!("Graph with name `{name}` does not exist")));
        }
        self.leiden_stats
            .clone()
            .ok_or_else(|| StoreError::NoRecord(format!("gds.leiden.write('{name}')")))
    }
}
