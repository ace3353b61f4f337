//! `jgl status` - store counts.

use anyhow::Result;
use colored::Colorize;
use jgl_graph::GraphConfig;

use super::connect;

pub async fn execute(config: &GraphConfig) -> Result<()> {
    let client = connect(config).await?;
    let counts = client.get_counts().await?;

    println!("{}", "Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  Endpoint:      {}", config.uri.dimmed());
    println!("  Database:      {}", config.database.cyan());
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
    println!("{}", "─".repeat(40));

    Ok(())
}
