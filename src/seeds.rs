// Seed lists: the reference vocabularies clusters are compared against.
//
// Two lists drive every decision: domain seeds (economics terms like
// "inflation", "tariff") and general seeds (everyday words). Each is a
// plain text file with one token per line.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::embeddings::EmbeddingTable;

/// A deduplicated, order-preserving list of seed tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedList {
    tokens: Vec<String>,
}

impl SeedList {
    /// Build a seed list, dropping repeats. The first occurrence keeps its
    /// position so reports list seeds in file order.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let tokens = tokens
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| seen.insert(t.clone()))
            .collect();
        Self { tokens }
    }

    /// Parse newline-delimited text. Lines are trimmed; blank lines skipped.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Read a seed list from a newline-delimited file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed list {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Vectors of the seeds present in the table, in list order.
    /// Seeds without an embedding are left out.
    pub fn resolve<'a>(&self, embeddings: &'a EmbeddingTable) -> Vec<&'a [f64]> {
        self.tokens
            .iter()
            .filter_map(|t| embeddings.get(t))
            .collect()
    }

    /// Seeds with no embedding, as reported by `coverage`.
    pub fn missing<'s>(&'s self, embeddings: &EmbeddingTable) -> Vec<&'s str> {
        self.tokens
            .iter()
            .filter(|t| !embeddings.contains(t))
            .map(String::as_str)
            .collect()
    }
}
