// Term clusters: groups of related tokens produced by upstream clustering.
//
// On disk a cluster set is a JSON object: `{"17": ["tax", "levy"], ...}`.
// Document order matters for reproducible output, so the set is kept as
// an ordered Vec rather than a HashMap, and (de)serialized by hand to
// preserve that order both ways.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One cluster: its id and its member tokens, in upstream order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub id: String,
    pub members: Vec<String>,
}

impl Cluster {
    pub fn new<I, S>(id: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// An ordered set of clusters with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from clusters, rejecting duplicate ids.
    pub fn from_clusters(clusters: Vec<Cluster>) -> Result<Self> {
        let mut seen = HashSet::new();
        for cluster in &clusters {
            if !seen.insert(cluster.id.as_str()) {
                anyhow::bail!("Duplicate cluster id {:?}", cluster.id);
            }
        }
        Ok(Self { clusters })
    }

    /// Read a cluster set from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read clusters from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed clusters file {}", path.display()))
    }

    /// Append a cluster. Callers build result sets from an already
    /// validated input, so ids stay unique.
    pub(crate) fn push(&mut self, cluster: Cluster) {
        self.clusters.push(cluster);
    }

    pub fn get(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    pub fn as_slice(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.clusters.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Total member count across all clusters.
    pub fn member_count(&self) -> usize {
        self.clusters.iter().map(|c| c.members.len()).sum()
    }
}

impl<'a> IntoIterator for &'a ClusterSet {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

impl Serialize for ClusterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.clusters.len()))?;
        for cluster in &self.clusters {
            map.serialize_entry(&cluster.id, &cluster.members)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClusterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClusterSetVisitor;

        impl<'de> Visitor<'de> for ClusterSetVisitor {
            type Value = ClusterSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping cluster ids to arrays of tokens")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ClusterSet, A::Error> {
                let mut seen = HashSet::new();
                let mut clusters = Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((id, members)) = access.next_entry::<String, Vec<String>>()? {
                    if !seen.insert(id.clone()) {
                        return Err(de::Error::custom(format!("duplicate cluster id {id:?}")));
                    }
                    clusters.push(Cluster { id, members });
                }

                Ok(ClusterSet { clusters })
            }
        }

        deserializer.deserialize_map(ClusterSetVisitor)
    }
}
