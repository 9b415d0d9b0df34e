// Filtering pipeline: the full `glossex filter` run.
//
// Loads the four inputs named in the config, scores every cluster, keeps
// the domain ones, and writes them back out in the clusters file format.
// Scoring costs (members x seeds) cosine evaluations per cluster, so the
// progress bar ticks once per scored cluster.

use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::clusters::ClusterSet;
use crate::config::Config;
use crate::coverage::{self, CoverageReport};
use crate::embeddings::EmbeddingTable;
use crate::output;
use crate::scoring::classifier::{self, Classification, ClusterScore};
use crate::seeds::SeedList;

/// Everything the classifier needs, loaded and validated.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub clusters: ClusterSet,
    pub embeddings: EmbeddingTable,
    pub domain_seeds: SeedList,
    pub general_seeds: SeedList,
}

impl Inputs {
    /// Load all inputs from the configured paths.
    ///
    /// Fails fast on the first missing or malformed file.
    pub fn load(config: &Config) -> Result<Self> {
        config.require_inputs()?;

        let domain_seeds = SeedList::load(&config.domain_seeds_path)?;
        let general_seeds = SeedList::load(&config.general_seeds_path)?;
        let clusters = ClusterSet::load(&config.clusters_path)?;
        let embeddings = EmbeddingTable::load(&config.embeddings_path)?;

        info!(
            clusters = clusters.len(),
            embeddings = embeddings.len(),
            dim = embeddings.dim().unwrap_or(0),
            domain_seeds = domain_seeds.len(),
            general_seeds = general_seeds.len(),
            "Inputs loaded"
        );

        Ok(Self {
            clusters,
            embeddings,
            domain_seeds,
            general_seeds,
        })
    }

    pub fn coverage(&self) -> CoverageReport {
        coverage::analyze(
            &self.clusters,
            &self.embeddings,
            &self.domain_seeds,
            &self.general_seeds,
        )
    }

    pub fn score(&self) -> Vec<ClusterScore> {
        classifier::score_all(
            &self.clusters,
            &self.embeddings,
            &self.domain_seeds,
            &self.general_seeds,
        )
    }
}

/// Result of a filtering pass.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Per-cluster detail, in input order
    pub scores: Vec<ClusterScore>,
    /// Clusters classified as domain terms
    pub kept: ClusterSet,
    pub coverage: CoverageReport,
}

/// Score and select clusters from already-loaded inputs. No file I/O.
pub fn classify_inputs(inputs: &Inputs, show_progress: bool) -> FilterOutcome {
    let coverage = inputs.coverage();
    if coverage.domain_seeds.embedded == 0 {
        warn!("No domain seed has an embedding; every cluster will be excluded");
    }
    if coverage.general_seeds.embedded == 0 {
        warn!("No general seed has an embedding; every cluster will be excluded");
    }
    if !coverage.unscorable_clusters.is_empty() {
        warn!(
            count = coverage.unscorable_clusters.len(),
            "Clusters with no embedded member will be excluded"
        );
    }

    let pb = if show_progress {
        let pb = ProgressBar::new(inputs.clusters.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Scoring [{bar:30}] {pos}/{len} ({eta})")
                .expect("valid template"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let Classification { kept, scores } = classifier::classify_detailed(
        &inputs.clusters,
        &inputs.embeddings,
        &inputs.domain_seeds,
        &inputs.general_seeds,
        || pb.inc(1),
    );

    pb.finish_and_clear();

    FilterOutcome {
        scores,
        kept,
        coverage,
    }
}

/// Run the full pipeline: load, classify, write the output file and,
/// optionally, a markdown report.
pub fn run(
    config: &Config,
    report_path: Option<&Path>,
    show_progress: bool,
) -> Result<FilterOutcome> {
    let inputs = Inputs::load(config)?;
    let outcome = classify_inputs(&inputs, show_progress);

    output::write_clusters(&outcome.kept, &config.output_path)?;
    info!(path = %config.output_path.display(), "Filtered clusters written");

    if let Some(path) = report_path {
        output::markdown::generate_report(&outcome.scores, &outcome.coverage, path)?;
        info!(path = %path.display(), "Report written");
    }

    Ok(outcome)
}
