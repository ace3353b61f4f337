//! Terminal output formatting.

use std::path::PathBuf;

use colored::Colorize;
use jgl_core::analytics::{CommunityStats, MemoryEstimate, ProjectionHandle};
use jgl_core::intent::{Intent, PlanStats};
use jgl_graph::IngestResult;

/// Print one line per document, then totals.
pub fn print_ingest_report(results: &[(PathBuf, IngestResult)]) {
    if results.is_empty() {
        println!("{}", "No JSON documents found.".dimmed());
        return;
    }

    println!("{:<40} {:<8} {:>8} {:>8} {:>10}", "Document", "Status", "Nodes", "Rels", "Time");
    println!("{}", "─".repeat(78));

    let mut nodes = 0;
    let mut relationships = 0;
    let mut failed = 0;

    for (path, result) in results {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match result {
            Ok(summary) => {
                nodes += summary.written.nodes;
                relationships += summary.written.relationships;
                println!(
                    "{:<40} {:<8} {:>8} {:>8} {:>9}ms",
                    truncate(&name, 38),
                    "ok".green(),
                    summary.written.nodes,
                    summary.written.relationships,
                    summary.elapsed.as_millis()
                );
            }
            Err(e) => {
                failed += 1;
                println!("{:<40} {:<8} {}", truncate(&name, 38), "failed".red(), e.to_string().dimmed());
            }
        }
    }

    println!("{}", "─".repeat(78));
    let summary = format!(
        "{} documents, {} failed, {} node upserts, {} relationship upserts",
        results.len(),
        failed,
        nodes,
        relationships
    );
    if failed > 0 {
        println!("{}", summary.yellow());
    } else {
        println!("{}", summary.green());
    }
}

pub fn print_projection(handle: &ProjectionHandle) {
    println!(
        "  Projection {}: {} nodes, {} relationships",
        handle.name.cyan(),
        handle.node_count,
        handle.relationship_count
    );
}

pub fn print_estimate(estimate: &MemoryEstimate) {
    println!("{}", "Memory Estimation".bold());
    println!("  Nodes:           {}", estimate.node_count);
    println!("  Relationships:   {}", estimate.relationship_count);
    println!("  Required memory: {}", estimate.required_memory.yellow());
}

pub fn print_community_stats(stats: &CommunityStats, write_property: &str) {
    println!("\n{}", "Leiden complete:".green().bold());
    println!("  Communities:     {}", stats.community_count.to_string().cyan());
    println!("  Modularity:      {:.4}", stats.modularity);
    println!(
        "  Nodes written:   {} ({})",
        stats.node_properties_written,
        write_property.dimmed()
    );
}

pub fn print_intents(intents: &[Intent]) {
    for (i, intent) in intents.iter().enumerate() {
        let kind = match intent {
            Intent::Node(_) => intent.kind().cyan(),
            Intent::Relationship(_) => intent.kind().yellow(),
            Intent::SetValue(_) => intent.kind().magenta(),
        };
        println!("{:>5} {:<13} {}", i.to_string().dimmed(), kind, intent);
    }
}

pub fn print_plan_stats(stats: &PlanStats) {
    println!(
        "\n{} nodes, {} relationships, {} value updates",
        stats.nodes.to_string().bold(),
        stats.relationships.to_string().bold(),
        stats.value_updates.to_string().bold()
    );
}

/// Truncate a string to `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short.json", 38), "short.json");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }
}
