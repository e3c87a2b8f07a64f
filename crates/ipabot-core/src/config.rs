//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `ipabot.toml` +
//! `ipabot.<env>.toml` + `APP_*` env vars (`__` separates nested keys).
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("ipabot.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("ipabot.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("ipabot.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("ipabot.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Build from an explicit figment layered over the defaults.
    pub fn from_figment(overrides: Figment) -> Self {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(overrides);
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub text: TextSettings,
    pub matching: MatchSettings,
    pub messages: MessageSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let m = &self.matching;
        if m.similarity_threshold.is_nan() || m.similarity_threshold <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "matching.similarity_threshold must be positive, got {}",
                m.similarity_threshold
            )));
        }
        if m.context_bonus.is_nan() || m.context_bonus < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "matching.context_bonus must be >= 1.0, got {}",
                m.context_bonus
            )));
        }
        for (name, w) in [
            ("pattern_weight", m.pattern_weight),
            ("intent_weight", m.intent_weight),
            ("keyword_weight", m.keyword_weight),
        ] {
            if w.is_nan() || w < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "matching.{} must not be negative, got {}",
                    name, w
                )));
            }
        }
        if self.data.root_key.trim().is_empty() {
            return Err(Error::InvalidConfig("data.root_key must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dataset_path: String,
    pub root_key: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { dataset_path: "dataseek.json".to_string(), root_key: "ipa_smp".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Question and filler words removed as whole words during normalization.
    pub stop_words: Vec<String>,
    /// Extracted keywords must be strictly longer than this (in chars).
    pub min_keyword_len: usize,
    pub stemmer: StemmerSettings,
}

impl Default for TextSettings {
    fn default() -> Self {
        let stop_words = [
            "apa", "apakah", "itu", "bagaimana", "mengapa", "kenapa", "jelaskan", "sebutkan",
            "tolong", "dong", "sih", "yang", "adalah", "coba",
        ];
        Self {
            stop_words: stop_words.iter().map(|s| s.to_string()).collect(),
            min_keyword_len: 2,
            stemmer: StemmerSettings::default(),
        }
    }
}

/// Rule tables for the affix stripper. Suffixes and prefixes are tried in
/// order; the first hit wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StemmerSettings {
    pub irregular: BTreeMap<String, String>,
    pub suffixes: Vec<String>,
    pub prefixes: Vec<String>,
    /// Stems this short or shorter are rejected in favour of the original word.
    pub min_stem_len: usize,
}

impl Default for StemmerSettings {
    fn default() -> Self {
        let irregular = [
            ("pernapasan", "napas"),
            ("bernapas", "napas"),
            ("pencernaan", "cerna"),
            ("peredaran", "edar"),
            ("tumbuhan", "tumbuh"),
            ("makanan", "makan"),
            ("gerakan", "gerak"),
            ("perubahan", "ubah"),
            ("pemuaian", "muai"),
            ("penguapan", "uap"),
            ("percepatan", "cepat"),
            ("kecepatan", "cepat"),
        ];
        Self {
            irregular: irregular.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            suffixes: ["nya", "lah", "kah", "pun", "kan", "an"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            prefixes: ["ber", "ter", "me", "pe", "di", "se"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_stem_len: 2,
        }
    }
}

/// Rule for picking which of an item's responses to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Serve the response at the matched pattern's index, clamped.
    PatternIndex,
    /// Serve the response after the one last served for this item.
    RoundRobin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub similarity_threshold: f32,
    /// Minimum number of matched keywords for the keyword phase to accept.
    pub min_keyword_match: usize,
    pub context_bonus: f32,
    pub pattern_weight: f32,
    pub intent_weight: f32,
    pub keyword_weight: f32,
    pub follow_up_limit: usize,
    pub follow_up_similarity_cutoff: f32,
    pub suggestion_limit: usize,
    pub rotation: RotationPolicy,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            min_keyword_match: 2,
            context_bonus: 1.2,
            pattern_weight: 0.6,
            intent_weight: 0.3,
            keyword_weight: 0.1,
            follow_up_limit: 3,
            follow_up_similarity_cutoff: 0.7,
            suggestion_limit: 3,
            rotation: RotationPolicy::RoundRobin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
    pub greeting: String,
    pub not_understood: String,
    pub processing_error: String,
    pub load_failure: String,
    pub generic_suggestions: Vec<String>,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            greeting: "Halo! Saya chatbot IPA SMP. Tanyakan materi Biologi, Fisika, atau Kimia!"
                .to_string(),
            not_understood: "Maaf, saya tidak mengerti. Coba gunakan kata kunci seperti \
                             'fotosintesis' atau 'hukum Newton'!"
                .to_string(),
            processing_error:
                "Maaf, terjadi kesalahan saat memproses pertanyaan. Silakan coba lagi.".to_string(),
            load_failure: "Maaf, sedang ada gangguan teknis. Coba lagi nanti!".to_string(),
            generic_suggestions: ["fotosintesis", "hukum Newton", "perubahan wujud zat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.matching.similarity_threshold, 0.85);
        assert_eq!(settings.matching.min_keyword_match, 2);
        assert_eq!(settings.matching.rotation, RotationPolicy::RoundRobin);
    }

    #[test]
    fn toml_overrides_are_layered_over_defaults() {
        let overrides = Figment::new().merge(Toml::string(
            r#"
            [matching]
            similarity_threshold = 0.5
            rotation = "pattern_index"
            "#,
        ));
        let settings = Config::from_figment(overrides).settings().expect("settings");
        assert_eq!(settings.matching.similarity_threshold, 0.5);
        assert_eq!(settings.matching.rotation, RotationPolicy::PatternIndex);
        // untouched keys keep their defaults
        assert_eq!(settings.matching.context_bonus, 1.2);
        assert_eq!(settings.data.root_key, "ipa_smp");
    }

    #[test]
    fn rejects_context_penalty() {
        let overrides = Figment::new().merge(Toml::string("[matching]\ncontext_bonus = 0.5\n"));
        let err = Config::from_figment(overrides).settings().unwrap_err();
        assert!(err.to_string().contains("context_bonus"));
    }

    #[test]
    fn rejects_non_positive_threshold_and_negative_weights() {
        let mut settings = Settings::default();
        settings.matching.similarity_threshold = 0.0;
        assert!(settings.validate().unwrap_err().to_string().contains("similarity_threshold"));

        let mut settings = Settings::default();
        settings.matching.intent_weight = -0.1;
        assert!(settings.validate().unwrap_err().to_string().contains("intent_weight"));
    }

    #[test]
    fn rejects_nan_bonus_and_weights() {
        let mut settings = Settings::default();
        settings.matching.context_bonus = f32::NAN;
        assert!(settings.validate().unwrap_err().to_string().contains("context_bonus"));

        let mut settings = Settings::default();
        settings.matching.keyword_weight = f32::NAN;
        assert!(settings.validate().unwrap_err().to_string().contains("keyword_weight"));

        let mut settings = Settings::default();
        settings.matching.similarity_threshold = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn get_reads_nested_key() {
        let config = Config::from_figment(Figment::new());
        let limit: usize = config.get("matching.follow_up_limit").expect("key");
        assert_eq!(limit, 3);
    }
}
