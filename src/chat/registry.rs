//! Registry of live conversations
//!
//! Maps a conversation id to its bounded history. Each history sits behind
//! its own mutex, so turns for one conversation are applied in the order
//! their locks are taken while distinct conversations proceed in parallel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use dashmap::DashMap;
use tracing::debug;

use super::context::{ApiMessage, CharHeuristic, ContextManager, Role, TokenEstimator};
use crate::config::ContextConfig;
use crate::error::ContextError;

type SharedContext = Arc<Mutex<ContextManager>>;

/// Process-wide store of conversation histories
pub struct ContextRegistry {
    conversations: DashMap<String, SharedContext>,
    max_messages: usize,
    max_tokens: usize,
    estimator: Arc<dyn TokenEstimator>,
}

impl ContextRegistry {
    pub fn new(max_messages: usize, max_tokens: usize) -> Self {
        Self {
            conversations: DashMap::new(),
            max_messages,
            max_tokens,
            estimator: Arc::new(CharHeuristic),
        }
    }

    pub fn from_config(config: &ContextConfig) -> Self {
        Self::new(config.max_messages, config.max_tokens)
    }

    /// Token cost model handed to every new history
    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn estimate_tokens(&self, text: &str) -> usize {
        self.estimator.estimate(text)
    }

    /// Get the history for `id`, creating an empty one on a miss
    fn conversation(&self, id: &str) -> SharedContext {
        if let Some(entry) = self.conversations.get(id) {
            return Arc::clone(entry.value());
        }

        let entry = self.conversations.entry(id.to_string()).or_insert_with(|| {
            debug!("Created conversation {}", id);
            Arc::new(Mutex::new(
                ContextManager::new(self.max_messages, self.max_tokens)
                    .with_estimator(Arc::clone(&self.estimator)),
            ))
        });
        Arc::clone(entry.value())
    }

    pub fn append(&self, id: &str, role: Role, content: impl Into<String>) {
        let conversation = self.conversation(id);
        lock(&conversation).append(role, content);
    }

    /// Append a turn whose role arrives as text, such as a transcript line
    ///
    /// Unknown roles are rejected before the conversation is touched.
    pub fn append_with_role(
        &self,
        id: &str,
        role: &str,
        content: impl Into<String>,
    ) -> Result<Role, ContextError> {
        let role: Role = role.parse()?;
        self.append(id, role, content);
        Ok(role)
    }

    /// Token-budgeted context for the next completion request
    pub fn get_bounded_context(&self, id: &str) -> Vec<ApiMessage> {
        let conversation = self.conversation(id);
        let context = lock(&conversation).build_api_context();
        context
    }

    pub fn summarize(&self, id: &str) -> String {
        let conversation = self.conversation(id);
        let summary = lock(&conversation).summarize();
        summary
    }

    pub fn prune_older_than(&self, id: &str, age: Duration) -> usize {
        let conversation = self.conversation(id);
        let removed = lock(&conversation).prune_older_than(age);
        removed
    }

    /// Number of turns currently held for `id` (zero when unknown)
    pub fn turn_count(&self, id: &str) -> usize {
        match self.conversations.get(id) {
            Some(entry) => {
                let count = lock(entry.value()).len();
                count
            }
            None => 0,
        }
    }

    /// Remove a conversation entirely; unknown ids are ignored
    pub fn reset(&self, id: &str) -> bool {
        let removed = self.conversations.remove(id).is_some();
        if removed {
            debug!("Reset conversation {}", id);
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.conversations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::from_config(&ContextConfig::default())
    }
}

/// A panic mid-append leaves the deque itself consistent, so keep using it.
fn lock(conversation: &Mutex<ContextManager>) -> MutexGuard<'_, ContextManager> {
    conversation.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_lookup_miss_creates_empty_history() {
        let registry = ContextRegistry::new(10, 3000);
        assert!(registry.get_bounded_context("court-1").is_empty());
        assert!(registry.contains("court-1"));
        assert_eq!(registry.summarize("court-2"), "New conversation");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_conversations_are_independent() {
        let registry = ContextRegistry::new(10, 3000);
        registry.append("a", Role::User, "Who leads the NBA in assists?");
        registry.append("b", Role::User, "hello");

        assert_eq!(registry.turn_count("a"), 1);
        assert_eq!(registry.turn_count("b"), 1);
        assert_eq!(registry.summarize("a"), "Discussed: NBA");
        assert_eq!(registry.summarize("b"), "Discussed: general conversation");
    }

    #[test]
    fn test_text_roles_are_parsed_or_rejected() {
        let registry = ContextRegistry::new(10, 3000);
        assert_eq!(
            registry.append_with_role("t", "Assistant", "The Celtics won"),
            Ok(Role::Assistant)
        );
        assert_eq!(
            registry.append_with_role("t", "coach", "Run the floor"),
            Err(ContextError::InvalidRole("coach".to_string()))
        );
        assert_eq!(
            registry.append_with_role("fresh", "system", "ignored"),
            Err(ContextError::InvalidRole("system".to_string()))
        );

        let context = registry.get_bounded_context("t");
        assert_eq!(context.len(), 1);
        assert_eq!(context[0].role, Role::Assistant);
        assert!(!registry.contains("fresh"));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let registry = ContextRegistry::new(10, 3000);
        assert!(!registry.reset("missing"));

        registry.append("game", Role::User, "first");
        assert!(registry.reset("game"));
        assert!(!registry.reset("game"));
        assert!(!registry.contains("game"));
        assert_eq!(registry.turn_count("game"), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reset_starts_fresh_history() {
        let registry = ContextRegistry::new(10, 3000);
        registry.append("s", Role::User, "old team talk");
        registry.reset("s");
        registry.append("s", Role::User, "new start");

        let context = registry.get_bounded_context("s");
        assert_eq!(context.len(), 1);
        assert_eq!(context[0].content, "new start");
    }

    #[test]
    fn test_capacity_applies_per_conversation() {
        let registry = ContextRegistry::new(2, 3000);
        for i in 0..5 {
            registry.append("s", Role::User, format!("turn {}", i));
        }
        let context = registry.get_bounded_context("s");
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].content, "turn 3");
        assert_eq!(context[1].content, "turn 4");
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let registry = Arc::new(ContextRegistry::new(1000, 100_000));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..50 {
                        registry.append("shared", Role::User, format!("{}-{}", worker, i));
                        registry.append(&format!("own-{}", worker), Role::User, "x");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.turn_count("shared"), 400);
        for worker in 0..8 {
            assert_eq!(registry.turn_count(&format!("own-{}", worker)), 50);
        }
    }
}
