// Glossex: embedding-based domain filtering for glossary term clusters.
//
// This is the library root. The core is `scoring` (cosine similarity and
// the keep/discard rule); the other modules load inputs, report on them,
// and write results.

pub mod clusters;
pub mod config;
pub mod coverage;
pub mod embeddings;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod seeds;
