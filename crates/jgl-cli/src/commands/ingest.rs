//! `jgl ingest` - load a directory of JSON documents.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use jgl_graph::IngestionCoordinator;

use super::{analyze, connect, LeidenArgs};
use crate::config::Settings;
use crate::output;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory containing *.json documents
    pub dir: PathBuf,

    /// Maximum documents in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-document timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Run community detection after ingestion
    #[arg(long)]
    pub analyze: bool,

    #[command(flatten)]
    pub leiden: LeidenArgs,
}

pub async fn execute(args: IngestArgs, mut settings: Settings) -> Result<()> {
    if let Some(concurrency) = args.concurrency {
        settings.ingest.concurrency = concurrency;
    }
    if args.timeout.is_some() {
        settings.ingest.timeout_secs = args.timeout;
    }
    args.leiden
        .apply(&mut settings.analytics.projection, &mut settings.analytics.leiden);

    let client = Arc::new(connect(&settings.graph).await?);
    let coordinator = IngestionCoordinator::new(Arc::clone(&client), &settings.ingest);

    println!("{} {}", "Ingesting".bold(), args.dir.display().to_string().cyan());
    let results = coordinator
        .ingest_directory(&args.dir)
        .await
        .with_context(|| format!("Failed to list documents in {}", args.dir.display()))?;

    output::print_ingest_report(&results);
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();

    // the analytics pass covers whatever was committed, failed documents included
    if args.analyze {
        println!();
        analyze::run(client.as_ref(), &settings.analytics, false).await?;
    }

    if failed > 0 {
        bail!("{} of {} documents failed", failed, results.len());
    }
    Ok(())
}
