//! Normalized query -> formatted answer memo.
//!
//! Only accepted matches are stored. Entries never expire; the cache grows for
//! the lifetime of the session and is emptied only by `clear`.
use std::collections::HashMap;

use ipabot_core::types::FormattedAnswer;

#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: HashMap<String, FormattedAnswer>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, normalized_query: &str) -> Option<&FormattedAnswer> {
        self.entries.get(normalized_query)
    }

    pub fn insert(&mut self, normalized_query: String, answer: FormattedAnswer) {
        self.entries.insert(normalized_query, answer);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
