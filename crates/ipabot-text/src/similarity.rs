//! Token-set similarity over normalized strings.
//!
//! Scores are not probabilities: the containment bonus is added on top of the
//! Jaccard ratio, so a string compared with itself scores 1.2.
use std::collections::HashSet;

pub const CONTAINMENT_BONUS: f32 = 0.2;

/// |A ∩ B| / |A ∪ B| over space-separated tokens; 0 when both are empty.
pub fn jaccard(a: &str, b: &str) -> f32 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f32 / union as f32
}

pub fn similarity(a: &str, b: &str) -> f32 {
    let base = jaccard(a, b);
    if a.contains(b) || b.contains(a) {
        base + CONTAINMENT_BONUS
    } else {
        base
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternScore {
    pub index: usize,
    pub score: f32,
}

/// Highest similarity between `query` and any pattern. Ties keep the
/// earliest pattern. `None` when there are no patterns.
pub fn best_pattern_similarity<S: AsRef<str>>(query: &str, patterns: &[S]) -> Option<PatternScore> {
    let mut best: Option<PatternScore> = None;
    for (index, pattern) in patterns.iter().enumerate() {
        let score = similarity(query, pattern.as_ref());
        if best.map_or(true, |b| score > b.score) {
            best = Some(PatternScore { index, score });
        }
    }
    best
}
