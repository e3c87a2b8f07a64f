//! The call boundary between a host and an [`AnswerEngine`].
use ipabot_core::config::MessageSettings;
use ipabot_core::traits::AnswerEngine;
use ipabot_core::types::Answer;
use tracing::warn;

use crate::format::render_plain;

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Answer(Answer),
    /// Matching failed; carries the user-facing "try again" text.
    Error(String),
}

impl Reply {
    pub fn render_plain(&self) -> String {
        match self {
            Reply::Answer(answer) => render_plain(answer),
            Reply::Error(message) => message.clone(),
        }
    }
}

pub struct ChatSession<E: AnswerEngine> {
    engine: E,
    processing_error: String,
}

impl<E: AnswerEngine> ChatSession<E> {
    pub fn new(engine: E, messages: &MessageSettings) -> Self {
        Self { engine, processing_error: messages.processing_error.clone() }
    }

    /// One user turn. Blank input is ignored; engine errors never escape.
    pub fn send(&mut self, input: &str) -> Option<Reply> {
        if input.trim().is_empty() {
            return None;
        }
        match self.engine.answer(input) {
            Ok(answer) => Some(Reply::Answer(answer)),
            Err(e) => {
                warn!("query failed: {}", e);
                Some(Reply::Error(self.processing_error.clone()))
            }
        }
    }

    pub fn clear(&mut self) {
        self.engine.clear_chat();
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
