//! Document ingestion pipeline.
//!
//! Each document runs in its own task: load, map, write. Tasks are admitted
//! through a semaphore so the store connection pool is not flooded, and every
//! task yields a result value, so one failing document never aborts the
//! batch. Results come back in input order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use jgl_core::document::{discover_documents, DocumentSource};
use jgl_core::{map_document, IngestError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{info, info_span, warn, Instrument};

use crate::store::GraphStore;
use crate::writer::{GraphWriter, WriteSummary};

/// Fan-out settings for a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Maximum number of documents in flight.
    pub concurrency: usize,
    /// Per-document deadline in seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout_secs: None,
        }
    }
}

impl IngestOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Outcome of one successfully ingested document.
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub document: String,
    pub intents: usize,
    pub written: WriteSummary,
    pub elapsed: Duration,
}

pub type IngestResult = Result<IngestSummary, IngestError>;

pub struct IngestionCoordinator<S: GraphStore + 'static> {
    store: Arc<S>,
    concurrency: usize,
    timeout: Option<Duration>,
}

impl<S: GraphStore + 'static> IngestionCoordinator<S> {
    pub fn new(store: Arc<S>, options: &IngestOptions) -> Self {
        Self {
            store,
            concurrency: options.concurrency.max(1),
            timeout: options.timeout(),
        }
    }

    /// Override the per-document deadline.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ingest a batch. One result per source, in input order.
    pub async fn ingest(&self, sources: Vec<DocumentSource>) -> Vec<IngestResult> {
        let total = sources.len();
        info!(documents = total, concurrency = self.concurrency, "Starting ingestion");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let handles: Vec<_> = sources
            .into_iter()
            .map(|source| {
                let span = info_span!("document", name = %source.name());
                tokio::spawn(
                    run_document(Arc::clone(&self.store), Arc::clone(&semaphore), source, self.timeout)
                        .instrument(span),
                )
            })
            .collect();

        let results: Vec<IngestResult> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap_or_else(|e| Err(IngestError::Task(e.to_string()))))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(documents = total, succeeded = total - failed, failed, "Ingestion complete");
        results
    }

    /// Ingest already-parsed documents, named by position.
    pub async fn ingest_values(&self, documents: Vec<Value>) -> Vec<IngestResult> {
        let sources = documents
            .into_iter()
            .enumerate()
            .map(|(i, value)| DocumentSource::Value {
                name: format!("document-{i}"),
                value,
            })
            .collect();
        self.ingest(sources).await
    }

    /// Ingest every `*.json` file in a directory.
    ///
    /// Only discovery failures are returned as `Err`; per-file failures are
    /// in the paired results.
    pub async fn ingest_directory(&self, dir: &Path) -> std::io::Result<Vec<(PathBuf, IngestResult)>> {
        info!(dir = %dir.display(), "Processing directory");
        let paths = discover_documents(dir).await?;
        let sources = paths.iter().cloned().map(DocumentSource::File).collect();
        let results = self.ingest(sources).await;
        Ok(paths.into_iter().zip(results).collect())
    }
}

async fn run_document<S: GraphStore + 'static>(
    store: Arc<S>,
    semaphore: Arc<Semaphore>,
    source: DocumentSource,
    timeout: Option<Duration>,
) -> IngestResult {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| IngestError::Task(e.to_string()))?;

    let work = ingest_document(store.as_ref(), source);
    let result = match timeout {
        // dropping the future stops further intents; committed writes stay
        Some(limit) => tokio::time::timeout(limit, work)
            .await
            .unwrap_or(Err(IngestError::Timeout(limit))),
        None => work.await,
    };

    if let Err(e) = &result {
        warn!(error = %e, "Document failed");
    }
    result
}

async fn ingest_document<S: GraphStore + ?Sized>(store: &S, source: DocumentSource) -> IngestResult {
    let started = Instant::now();
    let document = source.name();
    info!("Processing document");

    let value = source.load().await?;
    let intents = map_document(&value);
    let written = GraphWriter::new(store).apply_all(&intents).await?;

    info!(
        intents = intents.len(),
        nodes = written.nodes,
        relationships = written.relationships,
        "Document ingested"
    );
    Ok(IngestSummary {
        document,
        intents: intents.len(),
        written,
        elapsed: started.elapsed(),
    })
}
