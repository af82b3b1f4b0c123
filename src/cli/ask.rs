//! Ask command - one question, one answer
//!
//! Runs a single exchange in a throwaway conversation, optionally seeded
//! with earlier turns given as `ROLE=TEXT`.

use anyhow::{Context, Result};

use super::chat::{clear_thinking, print_ai_message, print_error, print_thinking};
use crate::ai::CompletionProvider;
use crate::chat::{ChatSession, ContextRegistry};
use crate::config::Config;

pub async fn run(config: Config, question: &str, turns: &[String]) -> Result<()> {
    let registry = ContextRegistry::from_config(&config.context);
    let provider = CompletionProvider::from_config_or_echo(&config.ai)?;
    let session = ChatSession::new(
        &registry,
        &provider,
        uuid::Uuid::new_v4().to_string(),
        &config.context,
    );

    for turn in turns {
        let (role, content) = turn
            .split_once('=')
            .with_context(|| format!("Expected ROLE=TEXT for --turn, got '{}'", turn))?;
        registry
            .append_with_role(session.conversation_id(), role, content)
            .with_context(|| format!("Invalid --turn '{}'", turn))?;
    }

    print_thinking();
    match session.exchange(question).await {
        Ok(response) => {
            clear_thinking();
            print_ai_message(&response.filtered, &response);
            Ok(())
        }
        Err(e) => {
            clear_thinking();
            print_error(&format!("AI error: {:#}", e));
            Err(e)
        }
    }
}
