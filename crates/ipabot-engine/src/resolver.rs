use std::collections::HashSet;

use ipabot_core::config::{MatchSettings, Settings};
use ipabot_core::traits::AnswerEngine;
use ipabot_core::types::{
    Answer, Dataset, Fallback, FormattedAnswer, MatchPhase, MatchResult, TopicSuggestion,
};
use ipabot_core::Result;
use ipabot_text::{similarity, Analyzer};
use tracing::debug;

use crate::cache::ResponseCache;
use crate::format::format_match;
use crate::index::{IndexedItem, QnaIndex};
use crate::session::SessionContext;

/// A phase's pick, by position in the index.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    position: usize,
    phase: MatchPhase,
    confidence: f32,
    pattern_index: Option<usize>,
}

/// One chat's matcher: the analyzed dataset plus its session context and
/// response cache.
///
/// Phases run in order until one accepts:
/// 1. cache hit on the normalized query
/// 2. exact: a normalized pattern equals the query; first in dataset order wins
/// 3. semantic: `pattern*w_p + intent*w_i + keywords*w_k`, times the context
///    bonus for the last matched topic, accepted at `similarity_threshold`
/// 4. keyword: most matched keywords, accepted at `min_keyword_match`
/// 5. fallback: topic/subtopic suggestions ranked by keyword overlap
pub struct ChatEngine {
    analyzer: Analyzer,
    index: QnaIndex,
    settings: MatchSettings,
    not_understood: String,
    generic_suggestions: Vec<String>,
    session: SessionContext,
    cache: ResponseCache,
    scoring_runs: usize,
    last_match: Option<MatchResult>,
}

impl ChatEngine {
    pub fn new(dataset: &Dataset, settings: &Settings) -> Self {
        let analyzer = Analyzer::from_settings(&settings.text);
        let index = QnaIndex::build(dataset, &analyzer);
        let not_understood = dataset
            .fallback_responses
            .first()
            .cloned()
            .unwrap_or_else(|| settings.messages.not_understood.clone());
        Self {
            analyzer,
            index,
            settings: settings.matching.clone(),
            not_understood,
            generic_suggestions: settings.messages.generic_suggestions.clone(),
            session: SessionContext::new(),
            cache: ResponseCache::new(),
            scoring_runs: 0,
            last_match: None,
        }
    }

    pub fn answer(&mut self, raw: &str) -> Result<Answer> {
        let query = self.analyzer.normalize(raw);
        if let Some(cached) = self.cache.get(&query) {
            debug!(query = %query, "cache hit");
            return Ok(Answer::Matched(cached.clone()));
        }
        if query.is_empty() {
            debug!("query is empty after normalization");
            return Ok(Answer::NotUnderstood(self.generic_fallback()));
        }

        self.scoring_runs += 1;
        let query_keywords: HashSet<String> =
            self.analyzer.extract_keywords(&query).into_iter().collect();

        let candidate = self
            .exact_phase(&query)
            .or_else(|| self.semantic_phase(&query, &query_keywords))
            .or_else(|| self.keyword_phase(&query_keywords));

        match candidate {
            Some(c) => Ok(Answer::Matched(self.accept(c, query))),
            None => {
                debug!(query = %query, "no phase accepted");
                Ok(Answer::NotUnderstood(self.fallback(&query_keywords)))
            }
        }
    }

    fn exact_phase(&self, query: &str) -> Option<Candidate> {
        self.index.items().iter().enumerate().find_map(|(position, item)| {
            item.exact_pattern(query).map(|pattern_index| Candidate {
                position,
                phase: MatchPhase::Exact,
                confidence: 1.0,
                pattern_index: Some(pattern_index),
            })
        })
    }

    fn semantic_phase(&self, query: &str, query_keywords: &HashSet<String>) -> Option<Candidate> {
        let s = &self.settings;
        let mut best: Option<Candidate> = None;
        for (position, item) in self.index.items().iter().enumerate() {
            let pattern = item.best_pattern(query);
            let pattern_score = pattern.map_or(0.0, |p| p.score);
            let intent_score =
                item.normalized_intent().map_or(0.0, |intent| similarity(query, intent));
            let keyword_score = item.keyword_ratio(item.keyword_hits(query_keywords));

            let mut score = pattern_score * s.pattern_weight
                + intent_score * s.intent_weight
                + keyword_score * s.keyword_weight;
            if self.session.last_topic.as_deref() == Some(item.key.topic.as_str()) {
                score *= s.context_bonus;
            }

            if best.map_or(true, |b| score > b.confidence) {
                best = Some(Candidate {
                    position,
                    phase: MatchPhase::Semantic,
                    confidence: score,
                    pattern_index: pattern.map(|p| p.index),
                });
            }
        }
        debug!(
            best = ?best.map(|b| b.confidence),
            threshold = s.similarity_threshold,
            "semantic phase"
        );
        best.filter(|b| b.confidence >= s.similarity_threshold)
    }

    /// Acceptance compares the matched keyword count with `min_keyword_match`;
    /// the reported confidence is the matched fraction.
    fn keyword_phase(&self, query_keywords: &HashSet<String>) -> Option<Candidate> {
        let mut best: Option<(usize, usize)> = None;
        for (position, item) in self.index.items().iter().enumerate() {
            let hits = item.keyword_hits(query_keywords);
            if best.map_or(true, |(_, h)| hits > h) {
                best = Some((position, hits));
            }
        }
        debug!(
            best_hits = ?best.map(|(_, h)| h),
            required = self.settings.min_keyword_match,
            "keyword phase"
        );
        let (position, hits) = best?;
        if hits == 0 || hits < self.settings.min_keyword_match {
            return None;
        }
        let item = self.index.get(position)?;
        Some(Candidate {
            position,
            phase: MatchPhase::Keyword,
            confidence: item.keyword_ratio(hits),
            pattern_index: None,
        })
    }

    /// Candidates come from the index, whose items all carry responses.
    fn accept(&mut self, candidate: Candidate, query: String) -> FormattedAnswer {
        let item = &self.index.items()[candidate.position];
        debug_assert!(!item.responses.is_empty(), "indexed item {} has no responses", item.key);

        let response_index = self.session.choose_response(
            &item.key,
            item.responses.len(),
            self.settings.rotation,
            candidate.pattern_index,
        );
        let follow_ups = follow_ups_for(item, &query, candidate.pattern_index, &self.settings);

        let matched = MatchResult {
            key: item.key.clone(),
            phase: candidate.phase,
            response: item.responses[response_index].clone(),
            response_index,
            diagram: item.diagram.clone(),
            intent: item.intent.clone(),
            confidence: candidate.confidence,
            pattern_index: candidate.pattern_index,
            patterns: item.patterns.clone(),
        };
        debug!(
            item = %matched.key,
            phase = ?matched.phase,
            confidence = matched.confidence,
            response = response_index,
            "match accepted"
        );

        self.session.record(&matched, &follow_ups);
        let formatted = format_match(&matched, follow_ups);
        self.cache.insert(query, formatted.clone());
        self.last_match = Some(matched);
        formatted
    }

    fn fallback(&self, query_keywords: &HashSet<String>) -> Fallback {
        let mut totals: Vec<(TopicSuggestion, usize)> = Vec::new();
        for item in self.index.items() {
            let hits = item.keyword_hits(query_keywords);
            if hits == 0 {
                continue;
            }
            let existing = totals.iter_mut().find(|(label, _)| {
                label.topic == item.key.topic && label.subtopic == item.key.subtopic
            });
            match existing {
                Some((_, total)) => *total += hits,
                None => {
                    let label = TopicSuggestion {
                        topic: item.key.topic.clone(),
                        subtopic: item.key.subtopic.clone(),
                    };
                    totals.push((label, hits));
                }
            }
        }
        if totals.is_empty() {
            return self.generic_fallback();
        }

        // stable: equal totals keep dataset order
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        let topics = totals
            .into_iter()
            .take(self.settings.suggestion_limit)
            .map(|(label, _)| label)
            .collect();
        Fallback { message: self.not_understood.clone(), topics, hints: Vec::new() }
    }

    fn generic_fallback(&self) -> Fallback {
        Fallback {
            message: self.not_understood.clone(),
            topics: Vec::new(),
            hints: self.generic_suggestions.clone(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn clear_chat(&mut self) {
        self.session.reset();
        self.last_match = None;
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Empty the cache and answer `raw` again from scratch.
    pub fn rerun(&mut self, raw: &str) -> Result<Answer> {
        self.clear_cache();
        self.answer(raw)
    }

    /// How many queries went through the scoring phases (cache hits and
    /// empty queries do not count).
    pub fn scoring_runs(&self) -> usize {
        self.scoring_runs
    }

    /// The most recent accepted match computed by the phases (not refreshed
    /// by cache hits).
    pub fn last_match(&self) -> Option<&MatchResult> {
        self.last_match.as_ref()
    }

    pub fn item_count(&self) -> usize {
        self.index.len()
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.analyzer.normalize(raw)
    }
}

/// Unused patterns of the matched item, skipping the matched one, patterns
/// with no content words, and any too close to what was just asked.
fn follow_ups_for(
    item: &IndexedItem,
    query: &str,
    matched_pattern: Option<usize>,
    settings: &MatchSettings,
) -> Vec<String> {
    item.scorable_patterns()
        .filter(|(slot, _)| Some(*slot) != matched_pattern)
        .filter(|(_, normalized)| {
            similarity(query, normalized) < settings.follow_up_similarity_cutoff
        })
        .map(|(slot, _)| item.patterns[slot].clone())
        .take(settings.follow_up_limit)
        .collect()
}

impl AnswerEngine for ChatEngine {
    fn answer(&mut self, query: &str) -> Result<Answer> {
        ChatEngine::answer(self, query)
    }

    fn clear_chat(&mut self) {
        ChatEngine::clear_chat(self)
    }
}
