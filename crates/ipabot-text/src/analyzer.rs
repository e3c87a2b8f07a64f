use std::collections::HashSet;

use ipabot_core::config::TextSettings;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::stem::Stemmer;

/// Normalizer + keyword extractor configured from [`TextSettings`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    stop_words: HashSet<String>,
    min_keyword_len: usize,
    stemmer: Stemmer,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::from_settings(&TextSettings::default())
    }
}

impl Analyzer {
    pub fn from_settings(settings: &TextSettings) -> Self {
        let stop_words = settings
            .stop_words
            .iter()
            .flat_map(|w| fold(w).split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();
        Self {
            stop_words,
            min_keyword_len: settings.min_keyword_len,
            stemmer: Stemmer::from_settings(&settings.stemmer),
        }
    }

    pub fn stemmer(&self) -> &Stemmer {
        &self.stemmer
    }

    /// Lowercase, strip diacritics and punctuation, drop question/filler
    /// words, collapse whitespace. Idempotent.
    pub fn normalize(&self, text: &str) -> String {
        fold(text)
            .split_whitespace()
            .filter(|w| !self.stop_words.contains(*w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Stemmed keywords of `text`, in order, keeping only those longer than
    /// `min_keyword_len` chars. Duplicates are kept.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split(' ')
            .map(|w| self.stemmer.stem(w))
            .filter(|k| k.chars().count() > self.min_keyword_len)
            .collect()
    }

    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word)
    }
}

/// Lowercase, decompose, drop combining marks and anything that is neither a
/// word character nor whitespace.
fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}
