use std::collections::HashMap;

use ipabot_core::config::RotationPolicy;
use ipabot_core::types::{ItemKey, MatchResult};

/// Per-chat conversational state.
///
/// Updated by the resolver after every accepted match, reset by an explicit
/// "clear chat". Never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub last_topic: Option<String>,
    pub last_subtopic: Option<String>,
    pub follow_ups: Vec<String>,
    last_response_indices: HashMap<ItemKey, usize>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last_response_index(&self, key: &ItemKey) -> Option<usize> {
        self.last_response_indices.get(key).copied()
    }

    /// Pick which of `count` responses to serve for `key` and remember it.
    /// `count` must be non-zero.
    pub fn choose_response(
        &mut self,
        key: &ItemKey,
        count: usize,
        policy: RotationPolicy,
        pattern_index: Option<usize>,
    ) -> usize {
        let index = match policy {
            RotationPolicy::PatternIndex => pattern_index.unwrap_or(0).min(count.saturating_sub(1)),
            RotationPolicy::RoundRobin => self
                .last_response_indices
                .get(key)
                .map_or(0, |last| (last + 1) % count),
        };
        self.last_response_indices.insert(key.clone(), index);
        index
    }

    pub fn record(&mut self, matched: &MatchResult, follow_ups: &[String]) {
        self.last_topic = Some(matched.key.topic.clone());
        self.last_subtopic = Some(matched.key.subtopic.clone());
        self.follow_ups = follow_ups.to_vec();
    }
}
