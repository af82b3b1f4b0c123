//! Response filtering and formatting
//!
//! Flags questions that stray from basketball and tidies model output
//! before it is shown or stored.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::context::NEW_CONVERSATION;

/// Confidence attached to answers for off-topic questions
pub const OFF_TOPIC_CONFIDENCE: f32 = 0.3;

pub const OFF_TOPIC_WARNING: &str = "The question may not be about basketball";

const BASKETBALL_KEYWORDS: &[&str] = &[
    "баскетбол",
    "basketball",
    "nba",
    "гравець",
    "player",
    "команда",
    "team",
    "матч",
    "game",
    "очки",
    "points",
    "кидок",
    "shot",
    "euroleague",
    "фінал",
    "championship",
    "coach",
    "тренер",
    "training",
    "тренування",
];

/// A model response after filtering, with relevance metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredResponse {
    pub original: String,
    pub filtered: String,
    pub is_relevant: bool,
    pub confidence: f32,
    pub warnings: Vec<String>,
}

fn blank_lines() -> &'static Regex {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    BLANK_LINES.get_or_init(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"))
}

/// Whether the text mentions any basketball keyword (case-insensitive)
pub fn is_domain_related(text: &str) -> bool {
    let text = text.to_lowercase();
    BASKETBALL_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Trim the response, collapse blank-line runs and score its relevance
/// against the question that produced it
pub fn filter_response(response: &str, user_question: &str) -> FilteredResponse {
    let is_relevant = is_domain_related(user_question);
    let (confidence, warnings) = if is_relevant {
        (1.0, Vec::new())
    } else {
        (OFF_TOPIC_CONFIDENCE, vec![OFF_TOPIC_WARNING.to_string()])
    };

    let filtered = blank_lines()
        .replace_all(response.trim(), "\n\n")
        .into_owned();

    FilteredResponse {
        original: response.to_string(),
        filtered,
        is_relevant,
        confidence,
        warnings,
    }
}

/// Prefix a response with the conversation summary, unless the conversation is new
pub fn add_context_prefix(response: &str, summary: &str) -> String {
    if summary.is_empty() || summary == NEW_CONVERSATION {
        response.to_string()
    } else {
        format!("[Context: {}]\n\n{}", summary, response)
    }
}
