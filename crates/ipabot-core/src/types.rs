//! Domain types shared by the text analyzer, the match resolver and hosts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The whole Q&A knowledge base: topic name -> topic.
///
/// Maps keep document order, which is the iteration order the resolver uses
/// for tie-breaks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub topics: IndexMap<String, Topic>,
    #[serde(default)]
    pub fallback_responses: Vec<String>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Number of QnA items across every topic and subtopic.
    pub fn item_count(&self) -> usize {
        self.topics
            .values()
            .flat_map(|t| t.subtopics.values())
            .map(|s| s.items.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub subtopics: IndexMap<String, Subtopic>,
}

/// Ordered QnA items of one subtopic. Stored in documents as a bare array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subtopic {
    pub items: Vec<QnaItem>,
}

/// One answerable question.
///
/// - `patterns`: trigger phrases, in order; the index of the matching pattern
///   may select the response
/// - `keywords`: domain terms used by the keyword and fallback phases
/// - `intent`: optional short summary, an auxiliary similarity signal
/// - `responses`: answer texts; must be non-empty to be servable
/// - `diagram`: optional image reference passed through to the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QnaItem {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub responses: Vec<String>,
    #[serde(default)]
    pub diagram: Option<String>,
}

/// Stable identity of a QnA item: its topic, subtopic and position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub topic: String,
    pub subtopic: String,
    pub ordinal: usize,
}

impl ItemKey {
    pub fn new(topic: impl Into<String>, subtopic: impl Into<String>, ordinal: usize) -> Self {
        Self { topic: topic.into(), subtopic: subtopic.into(), ordinal }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.topic, self.subtopic, self.ordinal)
    }
}

/// Which resolver phase accepted a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Exact,
    Semantic,
    Keyword,
}

/// Transient record produced by an accepted match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub key: ItemKey,
    pub phase: MatchPhase,
    pub response: String,
    pub response_index: usize,
    pub diagram: Option<String>,
    pub intent: Option<String>,
    pub confidence: f32,
    /// Index of the pattern that matched, when the phase scores patterns.
    pub pattern_index: Option<usize>,
    pub patterns: Vec<String>,
}

/// A topic/subtopic label suggested when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSuggestion {
    pub topic: String,
    pub subtopic: String,
}

impl fmt::Display for TopicSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.topic, self.subtopic)
    }
}

/// The record handed across the output boundary for a matched query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedAnswer {
    pub topic: String,
    pub subtopic: String,
    pub response_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagram: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub follow_ups: Vec<String>,
}

/// The "not understood" reply.
///
/// `topics` holds ranked suggestions drawn from keyword overlap; when it is
/// empty `hints` carries the generic suggestion list instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fallback {
    pub message: String,
    pub topics: Vec<TopicSuggestion>,
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    Matched(FormattedAnswer),
    NotUnderstood(Fallback),
}

impl Answer {
    pub fn is_match(&self) -> bool {
        matches!(self, Answer::Matched(_))
    }

    pub fn as_matched(&self) -> Option<&FormattedAnswer> {
        match self {
            Answer::Matched(a) => Some(a),
            Answer::NotUnderstood(_) => None,
        }
    }

    pub fn as_fallback(&self) -> Option<&Fallback> {
        match self {
            Answer::Matched(_) => None,
            Answer::NotUnderstood(f) => Some(f),
        }
    }
}
