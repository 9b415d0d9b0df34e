// Embedding coverage: how much of the inputs the classifier can actually see.
//
// A seed or member without an embedding silently drops out of scoring.
// That is correct behavior, but when most of a seed list is missing the
// results quietly degrade, so `glossex coverage` makes the gaps visible.

use serde::Serialize;

use crate::clusters::ClusterSet;
use crate::embeddings::EmbeddingTable;
use crate::seeds::SeedList;

/// Embedding coverage for one seed list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedCoverage {
    pub total: usize,
    pub embedded: usize,
    pub missing: Vec<String>,
}

impl SeedCoverage {
    pub fn measure(seeds: &SeedList, embeddings: &EmbeddingTable) -> Self {
        let missing: Vec<String> = seeds
            .missing(embeddings)
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            total: seeds.len(),
            embedded: seeds.len() - missing.len(),
            missing,
        }
    }
}

/// Coverage across the whole run's inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub embedding_tokens: usize,
    pub dim: Option<usize>,
    pub domain_seeds: SeedCoverage,
    pub general_seeds: SeedCoverage,
    pub clusters: usize,
    pub members: usize,
    pub embedded_members: usize,
    /// Clusters where no member has an embedding; these can never be kept.
    pub unscorable_clusters: Vec<String>,
}

impl CoverageReport {
    /// Fraction of cluster members that have an embedding (0.0 when empty).
    pub fn member_ratio(&self) -> f64 {
        if self.members == 0 {
            0.0
        } else {
            self.embedded_members as f64 / self.members as f64
        }
    }

    /// True if one of the seed lists has no embedded token at all, which
    /// means every cluster will be excluded.
    pub fn seeds_unusable(&self) -> bool {
        self.domain_seeds.embedded == 0 || self.general_seeds.embedded == 0
    }
}

/// Measure coverage of seeds and cluster members against the table.
pub fn analyze(
    clusters: &ClusterSet,
    embeddings: &EmbeddingTable,
    domain_seeds: &SeedList,
    general_seeds: &SeedList,
) -> CoverageReport {
    let mut embedded_members = 0;
    let mut unscorable_clusters = Vec::new();

    for cluster in clusters {
        let embedded = cluster
            .members
            .iter()
            .filter(|m| embeddings.contains(m))
            .count();
        if embedded == 0 {
            unscorable_clusters.push(cluster.id.clone());
        }
        embedded_members += embedded;
    }

    CoverageReport {
        embedding_tokens: embeddings.len(),
        dim: embeddings.dim(),
        domain_seeds: SeedCoverage::measure(domain_seeds, embeddings),
        general_seeds: SeedCoverage::measure(general_seeds, embeddings),
        clusters: clusters.len(),
        members: clusters.member_count(),
        embedded_members,
        unscorable_clusters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clusters::Cluster;
    use std::collections::HashMap;

    #[test]
    fn test_analyze_counts_gaps() {
        let table = EmbeddingTable::from_map(HashMap::from([
            ("tax".to_string(), vec![1.0, 0.0]),
            ("cat".to_string(), vec![0.0, 1.0]),
        ]))
        .unwrap();
        let clusters = ClusterSet::from_clusters(vec![
            Cluster::new("a", ["tax", "levy"]),
            Cluster::new("b", ["ghost"]),
        ])
        .unwrap();

        let report = analyze(
            &clusters,
            &table,
            &SeedList::new(["tax", "tariff"]),
            &SeedList::new(["cat"]),
        );

        assert_eq!(report.embedding_tokens, 2);
        assert_eq!(report.dim, Some(2));
        assert_eq!(report.domain_seeds.embedded, 1);
        assert_eq!(report.domain_seeds.missing, vec!["tariff"]);
        assert_eq!(report.general_seeds.missing, Vec::<String>::new());
        assert_eq!(report.members, 3);
        assert_eq!(report.embedded_members, 1);
        assert_eq!(report.unscorable_clusters, vec!["b"]);
        assert!((report.member_ratio() - 1.0 / 3.0).abs() < 1e-12);
        assert!(!report.seeds_unusable());
    }

    #[test]
    fn test_empty_seed_list_is_unusable() {
        let report = analyze(
            &ClusterSet::new(),
            &EmbeddingTable::default(),
            &SeedList::new(["tax"]),
            &SeedList::default(),
        );
        assert!(report.seeds_unusable());
        assert_eq!(report.member_ratio(), 0.0);
    }
}
