//! # JGL Graph
//!
//! Neo4j side of JGL: applies mapped JSON documents as idempotent upserts,
//! fans ingestion out across documents, and triggers Graph Data Science
//! community detection over the result.

pub mod analytics;
pub mod client;
pub mod cypher;
pub mod ingest;
pub mod locks;
pub mod store;
pub mod writer;

#[cfg(test)]
mod memory;

pub use analytics::AnalyticsTrigger;
pub use client::{GraphClient, GraphConfig, GraphCounts};
pub use ingest::{IngestOptions, IngestResult, IngestSummary, IngestionCoordinator};
pub use locks::IdentityLocks;
pub use store::{AnalyticsBackend, GraphStore};
pub use writer::{GraphWriter, WriteSummary};
