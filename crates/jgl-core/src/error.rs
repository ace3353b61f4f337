//! Centralized error types for JGL.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure reported by the graph store for a single statement.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Neo4j query failed: {0}")]
    Query(String),

    #[error("Relationship endpoints not found in store: {from} -> {to}")]
    MissingEndpoint { from: String, to: String },

    #[error("Node not found in store: {0}")]
    NodeNotFound(String),

    #[error("Projection not found: {0}")]
    ProjectionNotFound(String),

    #[error("Query returned no record: {0}")]
    NoRecord(String),

    #[error("Failed to decode field '{field}': {message}")]
    Decode { field: String, message: String },
}

/// Failure while applying a document's intents.
///
/// `index` is the position of the failing intent in the document's sequence.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Store rejected intent #{index}: {source}")]
    Store {
        index: usize,
        #[source]
        source: StoreError,
    },

    #[error("Invalid identifier at intent #{index}: {identifier:?}")]
    InvalidIdentifier { index: usize, identifier: String },

    #[error("Relationship intent #{index} references a node that was not acknowledged: {node}")]
    UnacknowledgedEndpoint { index: usize, node: String },
}

impl WriteError {
    /// Position of the intent that aborted the document.
    pub fn index(&self) -> usize {
        match self {
            Self::Store { index, .. }
            | Self::InvalidIdentifier { index, .. }
            | Self::UnacknowledgedEndpoint { index, .. } => *index,
        }
    }
}

/// Per-document ingestion failure. Never aborts sibling documents.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("Document timed out after {0:?}")]
    Timeout(Duration),

    #[error("Document task failed: {0}")]
    Task(String),
}

/// Failure of the post-ingestion analytics phase.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Failed to create projection '{name}': {source}")]
    Projection {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("Invalid analytics parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Community detection on '{0}' returned no record")]
    NoRecord(String),

    #[error("Analytics request failed: {0}")]
    Store(#[from] StoreError),
}

impl AnalyticsError {
    /// Create an invalid parameter error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }
}

/// Result type for single store statements.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for intent application.
pub type WriteResult<T> = Result<T, WriteError>;
