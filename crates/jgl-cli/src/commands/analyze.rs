//! `jgl analyze` - projection and Leiden community detection.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use jgl_graph::{AnalyticsBackend, AnalyticsTrigger};

use super::{connect, LeidenArgs};
use crate::config::{AnalyticsSettings, Settings};
use crate::output;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Print the memory estimate before running
    #[arg(long)]
    pub estimate: bool,

    #[command(flatten)]
    pub leiden: LeidenArgs,
}

pub async fn execute(args: AnalyzeArgs, mut settings: Settings) -> Result<()> {
    args.leiden
        .apply(&mut settings.analytics.projection, &mut settings.analytics.leiden);

    let client = connect(&settings.graph).await?;
    run(&client, &settings.analytics, args.estimate).await
}

/// Project the graph, optionally estimate, then run Leiden.
pub async fn run<B: AnalyticsBackend + ?Sized>(
    backend: &B,
    settings: &AnalyticsSettings,
    estimate: bool,
) -> Result<()> {
    let params = &settings.leiden;
    params.validate()?;

    println!("{} '{}'", "Projecting".bold(), settings.projection.cyan());
    let trigger = AnalyticsTrigger::new(backend);
    let handle = trigger.project(&settings.projection).await?;
    output::print_projection(&handle);

    if estimate {
        let estimate = trigger.estimate(&handle, params).await?;
        output::print_estimate(&estimate);
    }

    let stats = trigger.run_community_detection(&handle, params).await?;
    output::print_community_stats(&stats, &params.write_property);
    Ok(())
}
