//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jgl_core::analytics::LeidenParams;
use jgl_graph::{GraphClient, GraphConfig};
use tracing::debug;

use crate::config::Settings;

pub mod analyze;
pub mod ingest;
pub mod map;
pub mod status;

/// How long to wait for the first bolt handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON Graph Loader - JSON documents to Neo4j, plus Leiden communities
#[derive(Parser)]
#[command(name = "jgl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "JGL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest every *.json file of a directory into Neo4j
    Ingest(ingest::IngestArgs),

    /// Project the graph and run Leiden community detection
    Analyze(analyze::AnalyzeArgs),

    /// Print the write plan for one document without touching the store
    Map(map::MapArgs),

    /// Show node and relationship counts
    Status,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(self.config.as_deref())?;
        debug!(
            uri = %settings.graph.uri,
            database = %settings.graph.database,
            projection = %settings.analytics.projection,
            "Settings loaded"
        );

        match self.command {
            Commands::Ingest(args) => ingest::execute(args, settings).await,
            Commands::Analyze(args) => analyze::execute(args, settings).await,
            Commands::Map(args) => map::execute(args).await,
            Commands::Status => status::execute(&settings.graph).await,
        }
    }
}

/// Leiden flags shared by `ingest --analyze` and `analyze`.
#[derive(Args, Debug, Default)]
pub struct LeidenArgs {
    /// Name of the in-memory projection
    #[arg(long)]
    pub projection: Option<String>,

    /// Node property receiving the community id
    #[arg(long)]
    pub write_property: Option<String>,

    /// Random seed for reproducible communities
    #[arg(long)]
    pub seed: Option<i64>,

    /// Parallelism requested from the analytics engine
    #[arg(long)]
    pub leiden_concurrency: Option<u32>,

    /// Relationship property used as weight
    #[arg(long)]
    pub weight_property: Option<String>,

    /// Also write intermediate communities
    #[arg(long)]
    pub intermediate: bool,
}

impl LeidenArgs {
    /// Apply flags over configured values.
    pub fn apply(self, projection: &mut String, params: &mut LeidenParams) {
        if let Some(name) = self.projection {
            *projection = name;
        }
        if let Some(write_property) = self.write_property {
            params.write_property = write_property;
        }
        if let Some(seed) = self.seed {
            params.random_seed = seed;
        }
        if let Some(concurrency) = self.leiden_concurrency {
            params.concurrency = concurrency;
        }
        if self.weight_property.is_some() {
            params.relationship_weight_property = self.weight_property;
        }
        if self.intermediate {
            params.include_intermediate_communities = true;
        }
    }
}

/// Connect to Neo4j, failing fast when the server is unreachable.
pub async fn connect(config: &GraphConfig) -> Result<GraphClient> {
    tokio::time::timeout(CONNECT_TIMEOUT, GraphClient::connect(config))
        .await
        .with_context(|| format!("Timed out connecting to Neo4j at {}", config.uri))?
}
