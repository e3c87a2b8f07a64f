//! Rule-table stemmer for Indonesian words.
//!
//! Order of operations: irregular lookup, then at most one suffix, then at
//! most one prefix. Stems of `min_stem_len` chars or fewer are rejected and
//! the original word is returned.
use std::collections::HashMap;

use ipabot_core::config::StemmerSettings;

#[derive(Debug, Clone)]
pub struct Stemmer {
    irregular: HashMap<String, String>,
    suffixes: Vec<String>,
    prefixes: Vec<String>,
    min_stem_len: usize,
}

impl Default for Stemmer {
    fn default() -> Self {
        Self::from_settings(&StemmerSettings::default())
    }
}

impl Stemmer {
    /// Irregular entries whose stem would be longer than the word are dropped,
    /// so stemming never lengthens a word.
    pub fn from_settings(settings: &StemmerSettings) -> Self {
        let irregular = settings
            .irregular
            .iter()
            .filter(|(word, stem)| !stem.is_empty() && stem.chars().count() <= word.chars().count())
            .map(|(word, stem)| (word.clone(), stem.clone()))
            .collect();
        Self {
            irregular,
            suffixes: settings.suffixes.iter().filter(|s| !s.is_empty()).cloned().collect(),
            prefixes: settings.prefixes.iter().filter(|p| !p.is_empty()).cloned().collect(),
            min_stem_len: settings.min_stem_len,
        }
    }

    pub fn stem(&self, word: &str) -> String {
        if let Some(stem) = self.irregular.get(word) {
            return stem.clone();
        }

        let mut stem = word;
        if let Some(suffix) = self.suffixes.iter().find(|s| stem.ends_with(s.as_str())) {
            stem = &stem[..stem.len() - suffix.len()];
        }
        if let Some(prefix) = self.prefixes.iter().find(|p| stem.starts_with(p.as_str())) {
            stem = &stem[prefix.len()..];
        }

        if stem.is_empty() || stem.chars().count() <= self.min_stem_len {
            word.to_string()
        } else {
            stem.to_string()
        }
    }
}
