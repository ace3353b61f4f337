//! Store seams used by the writer and the analytics trigger, and their
//! Neo4j / Graph Data Science implementation on [`GraphClient`].

use std::collections::HashMap;

use async_trait::async_trait;
use jgl_core::analytics::{CommunityStats, LeidenParams, MemoryEstimate, ProjectionHandle};
use jgl_core::intent::{NodeIntent, RelType, RelationshipIntent, ValueUpdate};
use jgl_core::{StoreError, StoreResult};
use neo4rs::{BoltType, Query};
use tracing::debug;

use crate::client::get_field;
use crate::cypher;
use crate::GraphClient;

/// Idempotent upserts against a shared graph store.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Match-or-create a node on its full label + property tuple. Concurrent
    /// calls with the same tuple must leave exactly one node.
    async fn merge_node(&self, node: &NodeIntent) -> StoreResult<()>;

    /// Match both endpoints and match-or-create the edge between them.
    /// Fails with [`StoreError::MissingEndpoint`] when an endpoint is absent.
    async fn merge_relationship(&self, rel: &RelationshipIntent) -> StoreResult<()>;

    /// Set `value` on an existing node.
    async fn set_value(&self, update: &ValueUpdate) -> StoreResult<()>;
}

/// In-memory projection catalog and community detection.
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Drop a projection. Fails with [`StoreError::ProjectionNotFound`] when
    /// no projection has that name.
    async fn drop_projection(&self, name: &str) -> StoreResult<()>;

    /// Project all labels with one undirected relationship type.
    async fn create_projection(&self, name: &str, rel_type: RelType) -> StoreResult<ProjectionHandle>;

    async fn estimate_leiden(&self, name: &str, params: &LeidenParams) -> StoreResult<MemoryEstimate>;

    /// Run Leiden in write mode.
    async fn write_leiden(&self, name: &str, params: &LeidenParams) -> StoreResult<CommunityStats>;
}

fn statement_error(err: cypher::InvalidIdentifier) -> StoreError {
    StoreError::Query(err.to_string())
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn merge_node(&self, node: &NodeIntent) -> StoreResult<()> {
        let stmt = cypher::merge_node(node).map_err(statement_error)?;
        let _guard = self.locks.lock(node).await;
        debug!(statement = %stmt.text, "Merging node");
        self.execute(stmt.into_query()).await
    }

    async fn merge_relationship(&self, rel: &RelationshipIntent) -> StoreResult<()> {
        let stmt = cypher::merge_relationship(rel).map_err(statement_error)?;
        debug!(from = %rel.from, to = %rel.to, rel_type = %rel.rel_type, "Merging relationship");

        let merged: i64 = self.query_scalar(stmt.into_query(), "merged").await?.unwrap_or(0);
        if merged == 0 {
            return Err(StoreError::MissingEndpoint {
                from: rel.from.identity(),
                to: rel.to.identity(),
            });
        }
        Ok(())
    }

    async fn set_value(&self, update: &ValueUpdate) -> StoreResult<()> {
        let stmt = cypher::set_value(update).map_err(statement_error)?;
        debug!(node = %update.node, value = %update.value, "Setting value");

        let updated: i64 = self.query_scalar(stmt.into_query(), "updated").await?.unwrap_or(0);
        if updated == 0 {
            return Err(StoreError::NodeNotFound(update.node.identity()));
        }
        Ok(())
    }
}

/// Leiden configuration map, sent as a single bound parameter.
fn leiden_config(params: &LeidenParams) -> HashMap<String, BoltType> {
    let mut config: HashMap<String, BoltType> = HashMap::new();
    config.insert("writeProperty".into(), params.write_property.clone().into());
    config.insert("randomSeed".into(), params.random_seed.into());
    config.insert("concurrency".into(), i64::from(params.concurrency).into());
    config.insert(
        "includeIntermediateCommunities".into(),
        params.include_intermediate_communities.into(),
    );
    if let Some(weight) = &params.relationship_weight_property {
        config.insert("relationshipWeightProperty".into(), weight.clone().into());
    }
    config
}

#[async_trait]
impl AnalyticsBackend for GraphClient {
    async fn drop_projection(&self, name: &str) -> StoreResult<()> {
        // failIfMissing=false: a missing graph yields no rows instead of an error
        let query = Query::new(
            "CALL gds.graph.drop($graphName, false)
             YIELD graphName
             RETURN graphName"
                .to_string(),
        )
        .param("graphName", name);

        if self.query(query).await?.is_empty() {
            return Err(StoreError::ProjectionNotFound(name.to_string()));
        }
        Ok(())
    }

    async fn create_projection(&self, name: &str, rel_type: RelType) -> StoreResult<ProjectionHandle> {
        let mut rel_config: HashMap<String, BoltType> = HashMap::new();
        rel_config.insert("type".into(), rel_type.as_str().into());
        rel_config.insert("orientation".into(), "UNDIRECTED".into());
        let mut relationships: HashMap<String, BoltType> = HashMap::new();
        relationships.insert(rel_type.as_str().to_string(), rel_config.into());

        let query = Query::new(
            "CALL gds.graph.project($graphName, '*', $relationships)
             YIELD graphName, nodeCount, relationshipCount
             RETURN graphName, nodeCount, relationshipCount"
                .to_string(),
        )
        .param("graphName", name)
        .param("relationships", relationships);

        let rows = self.query(query).await?;
        let row = rows
            .first()
            .ok_or_else(|| StoreError::NoRecord(format!("gds.graph.project('{name}')")))?;

        Ok(ProjectionHandle {
            name: get_field(row, "graphName")?,
            node_count: get_field(row, "nodeCount")?,
            relationship_count: get_field(row, "relationshipCount")?,
        })
    }

    async fn estimate_leiden(&self, name: &str, params: &LeidenParams) -> StoreResult<MemoryEstimate> {
        let query = Query::new(
            "CALL gds.leiden.write.estimate($graphName, $config)
             YIELD nodeCount, relationshipCount, requiredMemory
             RETURN nodeCount, relationshipCount, requiredMemory"
                .to_string(),
        )
        .param("graphName", name)
        .param("config", leiden_config(params));

        let rows = self.query(query).await?;
        let row = rows
            .first()
            .ok_or_else(|| StoreError::NoRecord(format!("gds.leiden.write.estimate('{name}')")))?;

        Ok(MemoryEstimate {
            node_count: get_field(row, "nodeCount")?,
            relationship_count: get_field(row, "relationshipCount")?,
            required_memory: get_field(row, "requiredMemory")?,
        })
    }

    async fn write_leiden(&self, name: &str, params: &LeidenParams) -> StoreResult<CommunityStats> {
        let query = Query::new(
            "CALL gds.leiden.write($graphName, $config)
             YIELD communityCount, modularity, nodePropertiesWritten
             RETURN communityCount, modularity, nodePropertiesWritten"
                .to_string(),
        )
        .param("graphName", name)
        .param("config", leiden_config(params));

        let rows = self.query(query).await?;
        let row = rows
            .first()
            .ok_or_else(|| StoreError::NoRecord(format!("gds.leiden.write('{name}')")))?;

        Ok(CommunityStats {
            community_count: get_field(row, "communityCount")?,
            modularity: get_field(row, "modularity")?,
            node_properties_written: get_field(row, "nodePropertiesWritten")?,
        })
    }
}
