//! Context management for chat completions
//!
//! Keeps a bounded history of conversation turns and selects the newest
//! turns that fit within a token budget before each completion request.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ContextError;

pub const DEFAULT_MAX_MESSAGES: usize = 10;
pub const DEFAULT_MAX_TOKENS: usize = 3000;

/// Summary returned for a conversation without any turns
pub const NEW_CONVERSATION: &str = "New conversation";

/// Summary label when turns exist but none mention a known topic
pub const GENERAL_CONVERSATION: &str = "general conversation";

const MAX_SUMMARY_TOPICS: usize = 3;

/// Keyword to topic label, checked in this order
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("гравець", "players"),
    ("команда", "teams"),
    ("матч", "games"),
    ("статистика", "statistics"),
    ("кидок", "shots"),
    ("очки", "points"),
    ("nba", "NBA"),
    ("euroleague", "Euroleague"),
    ("player", "players"),
    ("team", "teams"),
    ("game", "games"),
    ("statistics", "statistics"),
    ("points", "points"),
];

/// Message role in conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(ContextError::InvalidRole(s.to_string())),
        }
    }
}

/// A single role-tagged message kept in history
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A turn as forwarded to the completion API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: Role,
    pub content: String,
}

/// Approximate cost model for message content
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> usize;
}

/// Four characters per token, rounded down
#[derive(Debug, Clone, Copy, Default)]
pub struct CharHeuristic;

impl CharHeuristic {
    pub const CHARS_PER_TOKEN: usize = 4;
}

impl TokenEstimator for CharHeuristic {
    fn estimate(&self, text: &str) -> usize {
        text.chars().count() / Self::CHARS_PER_TOKEN
    }
}

/// Bounded, time-ordered history of one conversation
pub struct ContextManager {
    max_messages: usize,
    max_tokens: usize,
    history: VecDeque<Turn>,
    estimator: Arc<dyn TokenEstimator>,
}

impl ContextManager {
    /// Create a manager; a capacity of zero is raised to one
    pub fn new(max_messages: usize, max_tokens: usize) -> Self {
        let max_messages = max_messages.max(1);
        Self {
            max_messages,
            max_tokens,
            history: VecDeque::with_capacity(max_messages),
            estimator: Arc::new(CharHeuristic),
        }
    }

    /// Replace the token cost model
    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Turns from oldest to newest
    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.history.iter()
    }

    /// Estimated cost of a piece of text under this manager's cost model
    pub fn estimate_tokens(&self, text: &str) -> usize {
        self.estimator.estimate(text)
    }

    /// Append a turn stamped with the current time
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.append_at(role, content.into(), Utc::now());
    }

    fn append_at(&mut self, role: Role, content: String, timestamp: DateTime<Utc>) {
        // Wall clock may step backwards; history order is insertion order.
        let timestamp = match self.history.back() {
            Some(last) if last.timestamp > timestamp => last.timestamp,
            _ => timestamp,
        };

        self.history.push_back(Turn {
            role,
            content,
            timestamp,
        });

        while self.history.len() > self.max_messages {
            if let Some(evicted) = self.history.pop_front() {
                debug!(
                    "Evicted {} turn from {} (capacity {})",
                    evicted.role, evicted.timestamp, self.max_messages
                );
            }
        }
    }

    /// Select the newest turns whose total estimated cost fits `max_tokens`
    ///
    /// Scans from newest to oldest and stops at the first turn that would
    /// overflow the budget, so older turns behind it are never considered.
    /// The result is in chronological order.
    pub fn build_api_context(&self) -> Vec<ApiMessage> {
        let mut selected = Vec::new();
        let mut tokens_used = 0;

        for turn in self.history.iter().rev() {
            let cost = self.estimator.estimate(&turn.content);
            if tokens_used + cost > self.max_tokens {
                debug!(
                    "Token budget reached: {} used, next turn costs {}, budget {}",
                    tokens_used, cost, self.max_tokens
                );
                break;
            }
            tokens_used += cost;
            selected.push(ApiMessage {
                role: turn.role,
                content: turn.content.clone(),
            });
        }

        selected.reverse();
        selected
    }

    /// Drop turns older than `age`; returns how many were removed
    pub fn prune_older_than(&mut self, age: Duration) -> usize {
        self.prune_older_than_at(Utc::now(), age)
    }

    fn prune_older_than_at(&mut self, now: DateTime<Utc>, age: Duration) -> usize {
        // A cutoff before the representable range means nothing is stale.
        let Some(cutoff) = now.checked_sub_signed(age) else {
            return 0;
        };
        let before = self.history.len();
        self.history.retain(|turn| turn.timestamp > cutoff);

        let removed = before - self.history.len();
        if removed > 0 {
            debug!("Pruned {} turns older than {}", removed, cutoff);
        }
        removed
    }

    /// Short label naming up to three topics discussed so far
    pub fn summarize(&self) -> String {
        if self.history.is_empty() {
            return NEW_CONVERSATION.to_string();
        }

        let topics = self.topics();
        if topics.is_empty() {
            format!("Discussed: {}", GENERAL_CONVERSATION)
        } else {
            format!("Discussed: {}", topics.join(", "))
        }
    }

    /// Distinct topic labels in the order they first appear
    fn topics(&self) -> Vec<&'static str> {
        let mut topics: Vec<&'static str> = Vec::new();

        for turn in &self.history {
            let content = turn.content.to_lowercase();
            for &(keyword, label) in TOPIC_KEYWORDS {
                if content.contains(keyword) && !topics.contains(&label) {
                    topics.push(label);
                    if topics.len() == MAX_SUMMARY_TOPICS {
                        return topics;
                    }
                }
            }
        }

        topics
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for ContextManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES, DEFAULT_MAX_TOKENS)
    }
}
