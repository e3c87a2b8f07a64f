//! ipabot-text
//!
//! Text analysis for the matcher: normalization, rule-table stemming,
//! keyword extraction and token-set similarity.
pub mod analyzer;
pub mod similarity;
pub mod stem;

pub use analyzer::Analyzer;
pub use similarity::{best_pattern_similarity, jaccard, similarity, PatternScore};
pub use stem::Stemmer;
