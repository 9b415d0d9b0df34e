// Embedding table: the lookup every similarity score goes through.
//
// Embeddings arrive as a JSON object mapping each token (a lemma or a
// multi-word phrase) to a dense vector. They are produced upstream; this
// module only loads them, checks that every vector has the same dimension,
// and answers "does this token have a vector?" with an Option.
//
// A token without a vector is normal (rare words, phrases the embedder
// skipped), so lookups never fail. A table whose vectors disagree on
// dimension is a broken input file and is rejected up front.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Token → vector lookup with a single, validated dimension.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    vectors: HashMap<String, Vec<f64>>,
    dim: Option<usize>,
}

impl EmbeddingTable {
    /// Build a table from raw token → vector pairs.
    ///
    /// Fails if any vector is empty or if two vectors have different
    /// lengths. The error names the offending token so the upstream
    /// producer can be fixed.
    pub fn from_map(vectors: HashMap<String, Vec<f64>>) -> Result<Self> {
        let mut dim: Option<(usize, &str)> = None;

        for (token, vector) in &vectors {
            if vector.is_empty() {
                anyhow::bail!("Embedding for {token:?} is an empty vector");
            }
            if let Some(bad) = vector.iter().position(|v| !v.is_finite()) {
                anyhow::bail!("Embedding for {token:?} has a non-finite value at index {bad}");
            }
            match dim {
                None => dim = Some((vector.len(), token.as_str())),
                Some((expected, first)) if expected != vector.len() => {
                    anyhow::bail!(
                        "Embedding dimension mismatch: {first:?} has {expected} values \
                         but {token:?} has {}",
                        vector.len()
                    );
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            dim: dim.map(|(d, _)| d),
            vectors,
        })
    }

    /// Read and validate an embedding table from a JSON file.
    ///
    /// The file must be an object of `token: [number, ...]`. Anything else
    /// (a string where a vector should be, a nested object) is a parse error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read embeddings from {}", path.display()))?;
        let vectors: HashMap<String, Vec<f64>> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed embeddings file {}", path.display()))?;
        let table = Self::from_map(vectors)
            .with_context(|| format!("Invalid embeddings in {}", path.display()))?;

        debug!(
            tokens = table.len(),
            dim = table.dim().unwrap_or(0),
            "Loaded embedding table"
        );

        Ok(table)
    }

    /// Look up a token's vector. `None` means "no embedding"; callers skip it.
    pub fn get(&self, token: &str) -> Option<&[f64]> {
        self.vectors.get(token).map(Vec::as_slice)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }

    /// Vector dimension, or `None` for an empty table.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, Vec<f64>)]) -> Result<EmbeddingTable> {
        EmbeddingTable::from_map(
            pairs
                .iter()
                .map(|(t, v)| (t.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_lookup_present_and_absent() {
        let t = table(&[("tax", vec![1.0, 0.0]), ("cat", vec![0.0, 1.0])]).unwrap();
        assert_eq!(t.get("tax"), Some(&[1.0, 0.0][..]));
        assert!(t.get("dog").is_none());
        assert!(t.contains("cat"));
        assert_eq!(t.dim(), Some(2));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_empty_table_has_no_dim() {
        let t = table(&[]).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.dim(), None);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = table(&[("a", vec![1.0, 0.0]), ("b", vec![1.0, 0.0, 0.0])]).unwrap_err();
        assert!(
            err.to_string().contains("dimension mismatch"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_empty_vector_rejected() {
        let err = table(&[("a", vec![])]).unwrap_err();
        assert!(err.to_string().contains("empty vector"));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let err = table(&[("a", vec![1.0, f64::NAN])]).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }
}
