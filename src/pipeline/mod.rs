// Pipelines: load inputs from disk, run the classifier, write results.

pub mod filter;
