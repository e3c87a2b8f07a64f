//! ipabot-engine
//!
//! Phased query matching over a flattened QnA index: exact pattern, weighted
//! semantic score, keyword overlap, then a topic-suggestion fallback. Session
//! context and the response cache live on the engine instance, one per chat.
pub mod cache;
pub mod chat;
pub mod format;
pub mod index;
pub mod resolver;
pub mod session;

pub use cache::ResponseCache;
pub use chat::{ChatSession, Reply};
pub use format::render_plain;
pub use index::{IndexedItem, QnaIndex};
pub use resolver::ChatEngine;
pub use session::SessionContext;
