//! One conversation's request cycle
//!
//! Records the user turn, forwards the bounded context to the provider and
//! stores the filtered reply.

use anyhow::Result;
use chrono::Duration;
use tracing::{debug, warn};

use super::context::Role;
use super::filter::{filter_response, FilteredResponse};
use super::registry::ContextRegistry;
use crate::ai::CompletionProvider;
use crate::config::ContextConfig;

pub struct ChatSession<'a> {
    registry: &'a ContextRegistry,
    provider: &'a CompletionProvider,
    conversation_id: String,
    max_age: Duration,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        registry: &'a ContextRegistry,
        provider: &'a CompletionProvider,
        conversation_id: impl Into<String>,
        config: &ContextConfig,
    ) -> Self {
        Self {
            registry,
            provider,
            conversation_id: conversation_id.into(),
            max_age: Duration::hours(i64::from(config.prune_after_hours)),
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Answer one user message
    ///
    /// On failure the user turn stays in history and no assistant turn is
    /// recorded.
    pub async fn exchange(&self, message: &str) -> Result<FilteredResponse> {
        let id = self.conversation_id.as_str();

        self.registry.prune_older_than(id, self.max_age);
        self.registry.append(id, Role::User, message);

        let context = self.registry.get_bounded_context(id);
        if context.is_empty() {
            anyhow::bail!("Message is too long for the context budget");
        }
        debug!("Sending {} turns for conversation {}", context.len(), id);

        let response = match self.provider.complete(&context).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Completion failed for conversation {}: {}", id, e);
                return Err(e.into());
            }
        };

        let filtered = filter_response(&response, message);
        self.registry.append(id, Role::Assistant, filtered.filtered.clone());
        Ok(filtered)
    }

    pub fn summary(&self) -> String {
        self.registry.summarize(&self.conversation_id)
    }

    /// Turns and estimated tokens the next request would carry
    pub fn context_size(&self) -> (usize, usize) {
        let context = self.registry.get_bounded_context(&self.conversation_id);
        let tokens = context
            .iter()
            .map(|m| self.registry.estimate_tokens(&m.content))
            .sum();
        (context.len(), tokens)
    }

    pub fn reset(&self) {
        self.registry.reset(&self.conversation_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ContextConfig {
        ContextConfig {
            max_messages: 4,
            max_tokens: 100,
            prune_after_hours: 24,
        }
    }

    #[tokio::test]
    async fn test_exchange_records_both_turns() {
        let config = config();
        let registry = ContextRegistry::from_config(&config);
        let provider = CompletionProvider::Echo;
        let session = ChatSession::new(&registry, &provider, "s1", &config);

        let reply = session.exchange("How many points did Jordan score?").await.unwrap();
        assert_eq!(reply.filtered, "You wrote: How many points did Jordan score?");
        assert!(reply.is_relevant);

        let context = registry.get_bounded_context("s1");
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].role, Role::User);
        assert_eq!(context[1].role, Role::Assistant);
        assert_eq!(session.summary(), "Discussed: points");
    }

    #[tokio::test]
    async fn test_off_topic_reply_is_flagged() {
        let config = config();
        let registry = ContextRegistry::from_config(&config);
        let provider = CompletionProvider::Echo;
        let session = ChatSession::new(&registry, &provider, "s2", &config);

        let reply = session.exchange("Recommend a pasta recipe").await.unwrap();
        assert!(!reply.is_relevant);
        assert_eq!(reply.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_message_is_rejected() {
        let config = config();
        let registry = ContextRegistry::from_config(&config);
        let provider = CompletionProvider::Echo;
        let session = ChatSession::new(&registry, &provider, "s3", &config);

        assert!(session.exchange(&"x".repeat(1000)).await.is_err());
        assert_eq!(registry.turn_count("s3"), 1);
    }

    #[tokio::test]
    async fn test_huge_prune_window_keeps_history() {
        let config = ContextConfig {
            prune_after_hours: u32::MAX,
            ..config()
        };
        let registry = ContextRegistry::from_config(&config);
        let provider = CompletionProvider::Echo;
        let session = ChatSession::new(&registry, &provider, "s5", &config);

        session.exchange("points").await.unwrap();
        session.exchange("more points").await.unwrap();
        assert_eq!(registry.turn_count("s5"), 4);
    }

    #[tokio::test]
    async fn test_reset_and_context_size() {
        let config = config();
        let registry = ContextRegistry::from_config(&config);
        let provider = CompletionProvider::Echo;
        let session = ChatSession::new(&registry, &provider, "s4", &config);

        session.exchange("team news").await.unwrap();
        let (turns, tokens) = session.context_size();
        assert_eq!(turns, 2);
        // "team news" = 9 chars, "You wrote: team news" = 20 chars
        assert_eq!(tokens, 2 + 5);

        session.reset();
        assert_eq!(session.context_size(), (0, 0));
        assert_eq!(session.summary(), "New conversation");
    }
}
