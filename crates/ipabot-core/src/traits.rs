use crate::types::{Answer, Dataset};

/// Anything able to supply the Q&A dataset once at startup.
pub trait DatasetSource {
    fn load(&self) -> anyhow::Result<Dataset>;
}

/// The query side of a chat session.
pub trait AnswerEngine {
    fn answer(&mut self, query: &str) -> crate::Result<Answer>;
    /// Forget conversational context (last topic, rotation state).
    fn clear_chat(&mut self);
}
