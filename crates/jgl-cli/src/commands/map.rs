//! `jgl map` - dry run of the mapping for one document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jgl_core::intent::PlanStats;
use jgl_core::{map_document, DocumentSource};

use crate::output;

#[derive(Args, Debug)]
pub struct MapArgs {
    /// JSON document to map
    pub file: PathBuf,

    /// Print intents as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: MapArgs) -> Result<()> {
    let value = DocumentSource::File(args.file.clone())
        .load()
        .await
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let intents = map_document(&value);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&intents)?);
    } else {
        output::print_intents(&intents);
        output::print_plan_stats(&PlanStats::of(&intents));
    }
    Ok(())
}
