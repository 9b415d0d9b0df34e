use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Default input/output locations, relative to the working directory.
pub const DEFAULT_CLUSTERS_PATH: &str = "data/processed/clusters.json";
pub const DEFAULT_EMBEDDINGS_PATH: &str = "data/processed/lemma_embeddings.json";
pub const DEFAULT_DOMAIN_SEEDS_PATH: &str = "data/seeds/economics.txt";
pub const DEFAULT_GENERAL_SEEDS_PATH: &str = "data/seeds/general.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/final_terms.json";

/// File locations for a filtering run.
///
/// Every path comes from an env var with a default matching the usual
/// `data/` layout. A .env file is loaded at startup via dotenvy, and CLI
/// flags override whatever is loaded here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON object of cluster id -> member tokens
    pub clusters_path: PathBuf,
    /// JSON object of token -> embedding vector
    pub embeddings_path: PathBuf,
    /// Newline-delimited domain (economics) seed tokens
    pub domain_seeds_path: PathBuf,
    /// Newline-delimited general-language seed tokens
    pub general_seeds_path: PathBuf,
    /// Where the filtered clusters are written
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clusters_path: PathBuf::from(DEFAULT_CLUSTERS_PATH),
            embeddings_path: PathBuf::from(DEFAULT_EMBEDDINGS_PATH),
            domain_seeds_path: PathBuf::from(DEFAULT_DOMAIN_SEEDS_PATH),
            general_seeds_path: PathBuf::from(DEFAULT_GENERAL_SEEDS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            clusters_path: path_var("GLOSSEX_CLUSTERS", defaults.clusters_path),
            embeddings_path: path_var("GLOSSEX_EMBEDDINGS", defaults.embeddings_path),
            domain_seeds_path: path_var("GLOSSEX_DOMAIN_SEEDS", defaults.domain_seeds_path),
            general_seeds_path: path_var("GLOSSEX_GENERAL_SEEDS", defaults.general_seeds_path),
            output_path: path_var("GLOSSEX_OUTPUT", defaults.output_path),
        })
    }

    /// Check that every input file exists.
    /// Call this before a run so a missing file is reported by name and
    /// env var instead of as a bare I/O error.
    pub fn require_inputs(&self) -> Result<()> {
        let inputs = [
            ("GLOSSEX_CLUSTERS", &self.clusters_path),
            ("GLOSSEX_EMBEDDINGS", &self.embeddings_path),
            ("GLOSSEX_DOMAIN_SEEDS", &self.domain_seeds_path),
            ("GLOSSEX_GENERAL_SEEDS", &self.general_seeds_path),
        ];
        for (var, path) in inputs {
            if !path.exists() {
                anyhow::bail!(
                    "Input file not found: {}\n\
                     Set {var} in your .env file or pass the matching flag.",
                    path.display()
                );
            }
        }
        Ok(())
    }
}

fn path_var(name: &str, default: PathBuf) -> PathBuf {
    env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_data_layout() {
        let config = Config::default();
        assert_eq!(config.clusters_path, PathBuf::from(DEFAULT_CLUSTERS_PATH));
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn test_require_inputs_names_missing_file() {
        let config = Config {
            clusters_path: PathBuf::from("/nonexistent/glossex/clusters.json"),
            ..Config::default()
        };
        let err = config.require_inputs().unwrap_err().to_string();
        assert!(err.contains("/nonexistent/glossex/clusters.json"), "{err}");
        assert!(err.contains("GLOSSEX_CLUSTERS"), "{err}");
    }
}
