// Cluster classifier: decides which clusters are domain (economics) terms.
//
// For every cluster, each member that has an embedding is compared against
// every embedded domain seed and every embedded general seed. The cosine
// scores on each side are averaged (unweighted, one vote per pair) and the
// cluster is kept only if the domain mean is strictly higher:
//
//   keep  <=>  mean(domain pairs) > mean(general pairs)
//
// A cluster with no scorable pair on either side is dropped: with zero
// evidence there is nothing to compare. Exact ties are dropped as well.
// The decision is all-or-nothing per cluster; kept clusters keep every
// member, including members that had no embedding.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::clusters::{Cluster, ClusterSet};
use crate::embeddings::EmbeddingTable;
use crate::seeds::SeedList;

use super::similarity::cosine_similarity;

/// Outcome of scoring one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Domain mean beat the general mean. The cluster is kept.
    Domain,
    /// General mean was higher.
    General,
    /// Both means were exactly equal. Ties are discarded.
    Tie,
    /// No (member, seed) pair could be scored on at least one side.
    NoEvidence,
}

impl Verdict {
    /// Decide from the two side means.
    pub fn from_means(domain: Option<f64>, general: Option<f64>) -> Self {
        match (domain, general) {
            (Some(d), Some(g)) if d > g => Verdict::Domain,
            (Some(d), Some(g)) if d == g => Verdict::Tie,
            (Some(_), Some(_)) => Verdict::General,
            _ => Verdict::NoEvidence,
        }
    }

    pub fn is_kept(self) -> bool {
        self == Verdict::Domain
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Domain => "domain",
            Verdict::General => "general",
            Verdict::Tie => "tie",
            Verdict::NoEvidence => "no-evidence",
        }
    }

    pub const ALL: [Verdict; 4] = [
        Verdict::Domain,
        Verdict::General,
        Verdict::Tie,
        Verdict::NoEvidence,
    ];
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "domain" => Ok(Verdict::Domain),
            "general" => Ok(Verdict::General),
            "tie" => Ok(Verdict::Tie),
            "no-evidence" => Ok(Verdict::NoEvidence),
            other => Err(format!(
                "unknown verdict {other:?} (expected domain, general, tie or no-evidence)"
            )),
        }
    }
}

/// Per-cluster scoring detail, kept for reports and `explain`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterScore {
    pub id: String,
    /// Members in the cluster
    pub members: usize,
    /// Members that had an embedding
    pub scored_members: usize,
    /// (member, domain seed) pairs averaged into `domain_mean`
    pub domain_pairs: usize,
    /// (member, general seed) pairs averaged into `general_mean`
    pub general_pairs: usize,
    pub domain_mean: Option<f64>,
    pub general_mean: Option<f64>,
    pub verdict: Verdict,
}

impl ClusterScore {
    /// Domain mean minus general mean, when both exist.
    pub fn margin(&self) -> Option<f64> {
        Some(self.domain_mean? - self.general_mean?)
    }
}

/// Both seed lists resolved to vectors once, shared by every cluster.
#[derive(Debug, Clone)]
pub struct ResolvedSeeds<'a> {
    pub domain: Vec<&'a [f64]>,
    pub general: Vec<&'a [f64]>,
}

impl<'a> ResolvedSeeds<'a> {
    pub fn resolve(
        embeddings: &'a EmbeddingTable,
        domain_seeds: &SeedList,
        general_seeds: &SeedList,
    ) -> Self {
        Self {
            domain: domain_seeds.resolve(embeddings),
            general: general_seeds.resolve(embeddings),
        }
    }
}

/// Running sum of similarity scores for one side.
#[derive(Debug, Default, Clone, Copy)]
struct SideScores {
    sum: f64,
    count: usize,
}

impl SideScores {
    fn add_all(&mut self, member: &[f64], seeds: &[&[f64]]) {
        for seed in seeds {
            self.sum += cosine_similarity(member, seed);
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Score a single cluster against the resolved seed vectors.
pub fn score_cluster(
    cluster: &Cluster,
    embeddings: &EmbeddingTable,
    seeds: &ResolvedSeeds<'_>,
) -> ClusterScore {
    let mut domain = SideScores::default();
    let mut general = SideScores::default();
    let mut scored_members = 0;

    for member in &cluster.members {
        let Some(vector) = embeddings.get(member) else {
            continue;
        };
        scored_members += 1;
        domain.add_all(vector, &seeds.domain);
        general.add_all(vector, &seeds.general);
    }

    let domain_mean = domain.mean();
    let general_mean = general.mean();

    ClusterScore {
        id: cluster.id.clone(),
        members: cluster.members.len(),
        scored_members,
        domain_pairs: domain.count,
        general_pairs: general.count,
        domain_mean,
        general_mean,
        verdict: Verdict::from_means(domain_mean, general_mean),
    }
}

/// Score every cluster, returning results in input order.
pub fn score_all(
    clusters: &ClusterSet,
    embeddings: &EmbeddingTable,
    domain_seeds: &SeedList,
    general_seeds: &SeedList,
) -> Vec<ClusterScore> {
    score_all_with(clusters, embeddings, domain_seeds, general_seeds, || {})
}

/// Like `score_all`, calling `on_scored` once after each cluster is scored.
/// Used to drive a progress bar; with the `parallel` feature the callback
/// runs on worker threads, so it must be `Sync`.
pub fn score_all_with<F>(
    clusters: &ClusterSet,
    embeddings: &EmbeddingTable,
    domain_seeds: &SeedList,
    general_seeds: &SeedList,
    on_scored: F,
) -> Vec<ClusterScore>
where
    F: Fn() + Sync + Send,
{
    let seeds = ResolvedSeeds::resolve(embeddings, domain_seeds, general_seeds);
    debug!(
        domain_seeds = seeds.domain.len(),
        general_seeds = seeds.general.len(),
        "Resolved seed vectors"
    );

    let score = |cluster: &Cluster| {
        let result = score_cluster(cluster, embeddings, &seeds);
        on_scored();
        result
    };

    #[cfg(feature = "parallel")]
    let scores: Vec<ClusterScore> = {
        use rayon::prelude::*;
        clusters.as_slice().par_iter().map(score).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let scores: Vec<ClusterScore> = clusters.iter().map(score).collect();

    scores
}

/// Keep the clusters whose scores put them in the domain.
///
/// `scores` must come from `score_all` over the same `clusters`.
pub fn select(clusters: &ClusterSet, scores: &[ClusterScore]) -> ClusterSet {
    let mut kept = ClusterSet::new();

    for (cluster, score) in clusters.iter().zip(scores) {
        debug_assert_eq!(cluster.id, score.id);
        debug!(
            cluster = %cluster.id,
            domain_mean = ?score.domain_mean,
            general_mean = ?score.general_mean,
            verdict = %score.verdict,
            "Scored cluster"
        );
        if score.verdict.is_kept() {
            kept.push(cluster.clone());
        }
    }

    kept
}

/// Kept clusters together with the per-cluster detail behind the decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Clusters classified as domain terms, in input order
    pub kept: ClusterSet,
    /// One score per input cluster, in input order
    pub scores: Vec<ClusterScore>,
}

/// Classify every cluster and keep the scores, reporting progress through
/// `on_scored` (called once per cluster).
pub fn classify_detailed<F>(
    clusters: &ClusterSet,
    embeddings: &EmbeddingTable,
    domain_seeds: &SeedList,
    general_seeds: &SeedList,
    on_scored: F,
) -> Classification
where
    F: Fn() + Sync + Send,
{
    let scores = score_all_with(clusters, embeddings, domain_seeds, general_seeds, on_scored);
    let kept = select(clusters, &scores);

    info!(
        clusters = clusters.len(),
        kept = kept.len(),
        "Classification complete"
    );

    Classification { kept, scores }
}

/// Return the subset of `clusters` classified as domain terms.
///
/// Members and seeds without an embedding are skipped. The result keeps
/// input order and every kept cluster's full member list.
pub fn classify(
    clusters: &ClusterSet,
    embeddings: &EmbeddingTable,
    domain_seeds: &SeedList,
    general_seeds: &SeedList,
) -> ClusterSet {
    classify_detailed(clusters, embeddings, domain_seeds, general_seeds, || {}).kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table() -> EmbeddingTable {
        EmbeddingTable::from_map(HashMap::from([
            ("tax".to_string(), vec![1.0, 0.0]),
            ("rate".to_string(), vec![0.9, 0.1]),
            ("cat".to_string(), vec![0.0, 1.0]),
            ("dog".to_string(), vec![0.0, 1.0]),
        ]))
        .unwrap()
    }

    #[test]
    fn test_verdict_from_means() {
        assert_eq!(Verdict::from_means(Some(0.9), Some(0.1)), Verdict::Domain);
        assert_eq!(Verdict::from_means(Some(0.1), Some(0.9)), Verdict::General);
        assert_eq!(Verdict::from_means(Some(0.5), Some(0.5)), Verdict::Tie);
        assert_eq!(Verdict::from_means(None, Some(0.5)), Verdict::NoEvidence);
        assert_eq!(Verdict::from_means(Some(0.5), None), Verdict::NoEvidence);
        assert_eq!(Verdict::from_means(None, None), Verdict::NoEvidence);
    }

    #[test]
    fn test_verdict_parse_roundtrips_display() {
        for v in Verdict::ALL {
            assert_eq!(v.to_string().parse::<Verdict>(), Ok(v));
        }
        assert_eq!("NO_EVIDENCE".parse::<Verdict>(), Ok(Verdict::NoEvidence));
        assert!("economics".parse::<Verdict>().is_err());
    }

    #[test]
    fn test_score_cluster_counts_pairs() {
        let t = table();
        let domain = SeedList::new(["tax", "missing"]);
        let general = SeedList::new(["cat", "dog"]);
        let seeds = ResolvedSeeds::resolve(&t, &domain, &general);
        let cluster = Cluster::new("c", ["rate", "unknown", "tax"]);

        let score = score_cluster(&cluster, &t, &seeds);
        assert_eq!(score.members, 3);
        assert_eq!(score.scored_members, 2);
        assert_eq!(score.domain_pairs, 2);
        assert_eq!(score.general_pairs, 4);
        assert_eq!(score.verdict, Verdict::Domain);
        assert!(score.margin().unwrap() > 0.0);
    }

    #[test]
    fn test_score_cluster_without_seeds_has_no_evidence() {
        let t = table();
        let seeds = ResolvedSeeds::resolve(&t, &SeedList::new(["tax"]), &SeedList::default());
        let score = score_cluster(&Cluster::new("c", ["rate"]), &t, &seeds);
        assert_eq!(score.general_mean, None);
        assert_eq!(score.margin(), None);
        assert_eq!(score.verdict, Verdict::NoEvidence);
    }

    #[test]
    fn test_kept_cluster_retains_unembedded_members() {
        let t = table();
        let clusters =
            ClusterSet::from_clusters(vec![Cluster::new("c1", ["rate", "ghost"])]).unwrap();
        let kept = classify(&clusters, &t, &SeedList::new(["tax"]), &SeedList::new(["cat"]));
        assert_eq!(kept.get("c1").unwrap().members, vec!["rate", "ghost"]);
    }

    #[test]
    fn test_on_scored_called_once_per_cluster() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let t = table();
        let clusters = ClusterSet::from_clusters(vec![
            Cluster::new("a", ["rate"]),
            Cluster::new("b", ["ghost"]),
            Cluster::new("c", ["dog"]),
        ])
        .unwrap();
        let ticks = AtomicUsize::new(0);

        let result = classify_detailed(
            &clusters,
            &t,
            &SeedList::new(["tax"]),
            &SeedList::new(["cat"]),
            || {
                ticks.fetch_add(1, Ordering::Relaxed);
            },
        );

        assert_eq!(ticks.load(Ordering::Relaxed), 3);
        assert_eq!(result.scores.len(), 3);
        assert_eq!(result.kept.ids(), vec!["a"]);
        assert_eq!(
            result.kept,
            classify(&clusters, &t, &SeedList::new(["tax"]), &SeedList::new(["cat"]))
        );
    }
}
