//! Flattened, pre-analyzed view of the dataset built once at load time.
use std::collections::HashSet;

use ipabot_core::types::{Dataset, ItemKey};
use ipabot_text::{best_pattern_similarity, Analyzer, PatternScore};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct IndexedItem {
    pub key: ItemKey,
    /// Patterns as written in the dataset.
    pub patterns: Vec<String>,
    /// Non-empty normalized patterns, with `pattern_slots[i]` the index of
    /// `normalized_patterns[i]` in `patterns`.
    normalized_patterns: Vec<String>,
    pattern_slots: Vec<usize>,
    pub intent: Option<String>,
    normalized_intent: Option<String>,
    /// Stemmed tokens of each keyword; a keyword matches when all of its
    /// tokens occur in the query.
    keyword_terms: Vec<Vec<String>>,
    pub responses: Vec<String>,
    pub diagram: Option<String>,
}

impl IndexedItem {
    /// Index into `patterns` of the first pattern equal to `query`.
    pub fn exact_pattern(&self, query: &str) -> Option<usize> {
        self.normalized_patterns
            .iter()
            .position(|p| p == query)
            .map(|i| self.pattern_slots[i])
    }

    pub fn best_pattern(&self, query: &str) -> Option<PatternScore> {
        best_pattern_similarity(query, self.normalized_patterns.as_slice())
            .map(|best| PatternScore { index: self.pattern_slots[best.index], score: best.score })
    }

    /// `(slot in patterns, normalized form)` for every pattern that survives
    /// normalization.
    pub fn scorable_patterns(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.pattern_slots.iter().copied().zip(self.normalized_patterns.iter().map(String::as_str))
    }

    pub fn normalized_intent(&self) -> Option<&str> {
        self.normalized_intent.as_deref()
    }

    pub fn keyword_count(&self) -> usize {
        self.keyword_terms.len()
    }

    pub fn keyword_hits(&self, query_keywords: &HashSet<String>) -> usize {
        self.keyword_terms
            .iter()
            .filter(|terms| !terms.is_empty() && terms.iter().all(|t| query_keywords.contains(t)))
            .count()
    }

    /// Matched keywords as a fraction of the item's keywords; 0 without keywords.
    pub fn keyword_ratio(&self, hits: usize) -> f32 {
        if self.keyword_terms.is_empty() {
            0.0
        } else {
            hits as f32 / self.keyword_terms.len() as f32
        }
    }
}

/// All servable items in topic, subtopic, item order.
#[derive(Debug, Clone, Default)]
pub struct QnaIndex {
    items: Vec<IndexedItem>,
}

impl QnaIndex {
    pub fn build(dataset: &Dataset, analyzer: &Analyzer) -> Self {
        let mut items = Vec::with_capacity(dataset.item_count());
        for (topic, t) in &dataset.topics {
            for (subtopic, s) in &t.subtopics {
                for (ordinal, qna) in s.items.iter().enumerate() {
                    let key = ItemKey::new(topic.as_str(), subtopic.as_str(), ordinal);
                    if qna.responses.is_empty() {
                        warn!(item = %key, "skipping item without responses");
                        continue;
                    }

                    let mut normalized_patterns = Vec::with_capacity(qna.patterns.len());
                    let mut pattern_slots = Vec::with_capacity(qna.patterns.len());
                    for (slot, p) in qna.patterns.iter().enumerate() {
                        let n = analyzer.normalize(p);
                        if !n.is_empty() {
                            normalized_patterns.push(n);
                            pattern_slots.push(slot);
                        }
                    }
                    let normalized_intent = qna
                        .intent
                        .as_deref()
                        .map(|i| analyzer.normalize(i))
                        .filter(|i| !i.is_empty());
                    let keyword_terms =
                        qna.keywords.iter().map(|k| analyzer.extract_keywords(k)).collect();

                    items.push(IndexedItem {
                        key,
                        patterns: qna.patterns.clone(),
                        normalized_patterns,
                        pattern_slots,
                        intent: qna.intent.clone(),
                        normalized_intent,
                        keyword_terms,
                        responses: qna.responses.clone(),
                        diagram: qna.diagram.clone(),
                    });
                }
            }
        }
        info!(items = items.len(), topics = dataset.topics.len(), "qna index built");
        Self { items }
    }

    pub fn items(&self) -> &[IndexedItem] {
        &self.items
    }

    pub fn get(&self, position: usize) -> Option<&IndexedItem> {
        self.items.get(position)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
