// Colored terminal output for cluster scores and embedding coverage.

use colored::Colorize;

use crate::coverage::{CoverageReport, SeedCoverage};
use crate::scoring::classifier::{ClusterScore, Verdict};

use super::{format_mean, truncate_chars, verdict_counts};

/// Display per-cluster scores as a table, optionally limited to one verdict.
pub fn display_scores(scores: &[ClusterScore], only: Option<Verdict>) {
    let shown: Vec<&ClusterScore> = scores
        .iter()
        .filter(|s| only.map_or(true, |v| s.verdict == v))
        .collect();

    if shown.is_empty() {
        println!("No clusters to show.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Cluster Scores ({} of {} clusters) ===", shown.len(), scores.len()).bold()
    );
    println!();

    println!(
        "  {:<24} {:>7}  {:>7}  {:>7}  {:>7}  {:<11}",
        "Cluster".dimmed(),
        "Members".dimmed(),
        "Domain".dimmed(),
        "General".dimmed(),
        "Margin".dimmed(),
        "Verdict".dimmed(),
    );
    println!("  {}", "-".repeat(72).dimmed());

    for score in shown {
        let margin = score
            .margin()
            .map(|m| format!("{m:+.3}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:>3}/{:<3}  {:>7}  {:>7}  {:>7}  {:<11}",
            truncate_chars(&score.id, 21),
            score.scored_members,
            score.members,
            format_mean(score.domain_mean),
            format_mean(score.general_mean),
            margin,
            colorize_verdict(score.verdict),
        );
    }

    println!();

    for (verdict, count) in verdict_counts(scores) {
        if count > 0 {
            println!("  {:>6} {}", count, colorize_verdict(verdict));
        }
    }
}

/// Display how much of the inputs have embeddings.
pub fn display_coverage(report: &CoverageReport) {
    println!("\n{}", "=== Embedding Coverage ===".bold());
    println!();

    match report.dim {
        Some(dim) => println!(
            "  Embeddings: {} tokens, {}-dim",
            report.embedding_tokens, dim
        ),
        None => println!("  Embeddings: {}", "empty table".red()),
    }

    display_seed_coverage("Domain seeds", &report.domain_seeds);
    display_seed_coverage("General seeds", &report.general_seeds);

    println!(
        "  Cluster members: {}/{} embedded ({:.1}%) across {} clusters",
        report.embedded_members,
        report.members,
        report.member_ratio() * 100.0,
        report.clusters,
    );

    if !report.unscorable_clusters.is_empty() {
        println!(
            "  {} {} clusters have no embedded member and will be excluded",
            "!".yellow(),
            report.unscorable_clusters.len()
        );
        let preview = report
            .unscorable_clusters
            .iter()
            .take(10)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        println!("      {}", preview.dimmed());
    }

    if report.seeds_unusable() {
        println!(
            "\n  {} A seed list has no embedded tokens; no cluster can be selected.",
            "!!".red().bold()
        );
    }
    println!();
}

fn display_seed_coverage(label: &str, seeds: &SeedCoverage) {
    println!("  {}: {}/{} embedded", label, seeds.embedded, seeds.total);
    if !seeds.missing.is_empty() {
        println!("      Missing: {}", seeds.missing.join(", ").dimmed());
    }
}

/// Colorize a verdict label.
fn colorize_verdict(verdict: Verdict) -> colored::ColoredString {
    match verdict {
        Verdict::Domain => verdict.as_str().green().bold(),
        Verdict::General => verdict.as_str().normal(),
        Verdict::Tie => verdict.as_str().yellow(),
        Verdict::NoEvidence => verdict.as_str().dimmed(),
    }
}
