//! Shapes accepted matches into the boundary record and renders answers as
//! plain text for hosts without markup.
use ipabot_core::types::{Answer, FormattedAnswer, MatchResult};

pub fn format_match(matched: &MatchResult, follow_ups: Vec<String>) -> FormattedAnswer {
    FormattedAnswer {
        topic: matched.key.topic.clone(),
        subtopic: matched.key.subtopic.clone(),
        response_text: matched.response.clone(),
        diagram: matched.diagram.clone(),
        follow_ups,
    }
}

pub fn render_plain(answer: &Answer) -> String {
    let mut lines = Vec::new();
    match answer {
        Answer::Matched(a) => {
            lines.push(format!("[{} - {}]", a.topic, a.subtopic));
            lines.push(a.response_text.clone());
            if let Some(diagram) = &a.diagram {
                lines.push(format!("Diagram: {}", diagram));
            }
            if !a.follow_ups.is_empty() {
                lines.push("Pertanyaan terkait:".to_string());
                lines.extend(a.follow_ups.iter().map(|q| format!("  - {}", q)));
            }
        }
        Answer::NotUnderstood(f) => {
            lines.push(f.message.clone());
            if !f.topics.is_empty() {
                lines.push("Mungkin maksud Anda:".to_string());
                lines.extend(f.topics.iter().map(|t| format!("  - {}", t)));
            } else if !f.hints.is_empty() {
                lines.push(format!("Coba tanyakan: {}", f.hints.join(", ")));
            }
        }
    }
    lines.join("\n")
}
