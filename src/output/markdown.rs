// Markdown report for a filtering run.
//
// Written next to the JSON output when `filter --report` is given. The
// report is meant for reviewing seed lists: it shows every cluster's two
// means and pair counts, so a reviewer can spot clusters decided on thin
// evidence or seed lists that barely overlap the embedding vocabulary.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::coverage::CoverageReport;
use crate::scoring::classifier::ClusterScore;

use super::{format_mean, verdict_counts};

/// Render the report as a markdown string.
pub fn render_report(scores: &[ClusterScore], coverage: &CoverageReport) -> String {
    let mut md = String::new();
    let kept = scores.iter().filter(|s| s.verdict.is_kept()).count();

    let _ = writeln!(md, "# Glossary Cluster Filter Report");
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "Generated {}. {} of {} clusters selected as economics-related.",
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        kept,
        scores.len()
    );
    let _ = writeln!(md);

    let _ = writeln!(md, "## Verdicts");
    let _ = writeln!(md);
    let _ = writeln!(md, "| Verdict | Clusters |");
    let _ = writeln!(md, "|---|---:|");
    for (verdict, count) in verdict_counts(scores) {
        let _ = writeln!(md, "| {verdict} | {count} |");
    }
    let _ = writeln!(md);

    let _ = writeln!(md, "## Coverage");
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "- Embedding table: {} tokens, dimension {}",
        coverage.embedding_tokens,
        coverage
            .dim
            .map(|d| d.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    );
    let _ = writeln!(
        md,
        "- Domain seeds embedded: {}/{}",
        coverage.domain_seeds.embedded, coverage.domain_seeds.total
    );
    let _ = writeln!(
        md,
        "- General seeds embedded: {}/{}",
        coverage.general_seeds.embedded, coverage.general_seeds.total
    );
    let _ = writeln!(
        md,
        "- Cluster members embedded: {}/{}",
        coverage.embedded_members, coverage.members
    );
    let _ = writeln!(md);

    let _ = writeln!(md, "## Clusters");
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "| Cluster | Embedded | Domain mean | General mean | Pairs (d/g) | Verdict |"
    );
    let _ = writeln!(md, "|---|---:|---:|---:|---:|---|");
    for s in scores {
        let _ = writeln!(
            md,
            "| {} | {}/{} | {} | {} | {}/{} | {} |",
            s.id.replace('|', "\\|"),
            s.scored_members,
            s.members,
            format_mean(s.domain_mean),
            format_mean(s.general_mean),
            s.domain_pairs,
            s.general_pairs,
            s.verdict
        );
    }

    md
}

/// Write the markdown report to `path`, creating parent directories.
pub fn generate_report(
    scores: &[ClusterScore],
    coverage: &CoverageReport,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, render_report(scores, coverage))
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
