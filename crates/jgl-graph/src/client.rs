//! Neo4j connection client.

use std::sync::Arc;

use anyhow::{Context, Result};
use jgl_core::{StoreError, StoreResult};
use neo4rs::{ConfigBuilder, Graph, Query, Row};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::locks::IdentityLocks;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Size of the bolt connection pool shared by all document tasks.
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
            max_connections: 8,
            fetch_size: 200,
        }
    }
}

/// Client for Neo4j graph operations.
///
/// Clones share the connection pool and the node upsert locks.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    pub(crate) locks: Arc<IdentityLocks>,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs builds its pool lazily, so a `RETURN 1` ping forces the bolt
    /// handshake and an unreachable server fails here instead of on the first
    /// document.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections.max(1))
            .fetch_size(config.fetch_size)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        debug!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self {
            graph,
            locks: Arc::new(IdentityLocks::default()),
        })
    }

    /// Execute a Cypher statement that returns no results.
    pub async fn execute(&self, query: Query) -> StoreResult<()> {
        self.graph.run(query).await.map_err(query_error)
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> StoreResult<Vec<Row>> {
        let mut result = self.graph.execute(query).await.map_err(query_error)?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.map_err(query_error)? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar<T: DeserializeOwned>(&self, query: Query, field: &str) -> StoreResult<Option<T>> {
        let rows = self.query(query).await?;
        match rows.first() {
            Some(row) => Ok(Some(get_field(row, field)?)),
            None => Ok(None),
        }
    }

    /// Get node and relationship counts for status display.
    pub async fn get_counts(&self) -> StoreResult<GraphCounts> {
        let node_query = Query::new("MATCH (n) RETURN count(n) as count".to_string());
        let rel_query = Query::new("MATCH ()-[r]->() RETURN count(r) as count".to_string());

        let node_count: i64 = self.query_scalar(node_query, "count").await?.unwrap_or(0);
        let rel_count: i64 = self.query_scalar(rel_query, "count").await?.unwrap_or(0);

        Ok(GraphCounts {
            nodes: node_count as usize,
            relationships: rel_count as usize,
        })
    }
}

/// Read a typed column from a row.
pub(crate) fn get_field<T: DeserializeOwned>(row: &Row, field: &str) -> StoreResult<T> {
    row.get(field).map_err(|e| StoreError::Decode {
        field: field.to_string(),
        message: format!("{:?}", e),
    })
}

pub(crate) fn query_error(err: neo4rs::Error) -> StoreError {
    StoreError::Query(err.to_string())
}

/// Node and relationship counts.
#[derive(Debug, Clone)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}
