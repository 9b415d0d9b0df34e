use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use glossex::config::Config;
use glossex::output;
use glossex::pipeline::filter::{self, Inputs};
use glossex::scoring::classifier::Verdict;

/// Glossex: keep the term clusters that belong to the economics domain.
///
/// Compares every cluster member's embedding against a domain seed list
/// and a general-language seed list, and keeps clusters that lean domain.
#[derive(Parser)]
#[command(name = "glossex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Input file overrides. Unset flags fall back to GLOSSEX_* env vars,
/// then to the default data/ layout.
#[derive(Args, Debug)]
struct InputArgs {
    /// Clusters JSON (cluster id -> member tokens)
    #[arg(long)]
    clusters: Option<PathBuf>,

    /// Embeddings JSON (token -> vector)
    #[arg(long)]
    embeddings: Option<PathBuf>,

    /// Domain seed list, one token per line
    #[arg(long)]
    domain_seeds: Option<PathBuf>,

    /// General seed list, one token per line
    #[arg(long)]
    general_seeds: Option<PathBuf>,
}

impl InputArgs {
    fn apply(self, config: &mut Config) {
        if let Some(p) = self.clusters {
            config.clusters_path = p;
        }
        if let Some(p) = self.embeddings {
            config.embeddings_path = p;
        }
        if let Some(p) = self.domain_seeds {
            config.domain_seeds_path = p;
        }
        if let Some(p) = self.general_seeds {
            config.general_seeds_path = p;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify clusters and write the economics-related ones
    Filter {
        #[command(flatten)]
        inputs: InputArgs,

        /// Where to write the filtered clusters JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write a markdown report of every cluster's scores
        #[arg(long)]
        report: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Show each cluster's domain and general means and its verdict
    Explain {
        #[command(flatten)]
        inputs: InputArgs,

        /// Only show clusters with this verdict (domain, general, tie, no-evidence)
        #[arg(long)]
        only: Option<Verdict>,

        /// Print scores as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show how many seeds and cluster members have embeddings
    Coverage {
        #[command(flatten)]
        inputs: InputArgs,

        /// Print the coverage report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("glossex=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            inputs,
            output: output_path,
            report,
            quiet,
        } => {
            let mut config = Config::load()?;
            inputs.apply(&mut config);
            if let Some(p) = output_path {
                config.output_path = p;
            }

            info!(output = %config.output_path.display(), "Filtering clusters");
            let outcome = filter::run(&config, report.as_deref(), !quiet)?;

            if let Some(path) = &report {
                println!("{}", format!("Report written to {}", path.display()).dimmed());
            }
            println!("{}", output::summary_line(outcome.kept.len()));
        }

        Commands::Explain { inputs, only, json } => {
            let mut config = Config::load()?;
            inputs.apply(&mut config);

            let inputs = Inputs::load(&config)?;
            let scores = inputs.score();

            if json {
                let shown: Vec<_> = scores
                    .iter()
                    .filter(|s| only.map_or(true, |v| s.verdict == v))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                output::terminal::display_scores(&scores, only);
            }
        }

        Commands::Coverage { inputs, json } => {
            let mut config = Config::load()?;
            inputs.apply(&mut config);

            let report = Inputs::load(&config)?.coverage();

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::terminal::display_coverage(&report);
            }
        }
    }

    Ok(())
}
