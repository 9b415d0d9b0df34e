// Scoring: cosine similarity and the cluster keep/discard decision.

pub mod classifier;
pub mod similarity;
