//! Completion provider selection
//!
//! Wraps the configured backend behind one `complete` call taking the
//! bounded context. The echo backend answers offline.

use tracing::{info, warn};

use super::claude::ClaudeClient;
use super::openai::OpenAiClient;
use crate::chat::{ApiMessage, Role};
use crate::config::{AiConfig, ProviderKind};
use crate::error::CompletionError;

/// System prompt sent ahead of every conversation
pub const BASKETBALL_ASSISTANT: &str = r#"You are Courtside, a basketball expert assistant.

You can help with:
- Players, teams and their statistics
- Game results, schedules and history
- Rules, tactics and training advice
- NBA, Euroleague and international basketball

Guidelines:
- Stay focused on basketball; politely steer other topics back to the game
- Be accurate with numbers and say when you are unsure
- Keep answers concise and well structured
- Answer in the language the user writes in"#;

pub enum CompletionProvider {
    OpenAi(OpenAiClient),
    Claude(ClaudeClient),
    Echo,
}

impl CompletionProvider {
    pub fn from_config(ai: &AiConfig) -> Result<Self, CompletionError> {
        match ai.provider {
            ProviderKind::OpenAi => Ok(Self::OpenAi(OpenAiClient::from_config(ai, &ai.openai)?)),
            ProviderKind::Claude => Ok(Self::Claude(ClaudeClient::from_config(ai, &ai.claude)?)),
            ProviderKind::Echo => Ok(Self::Echo),
        }
    }

    /// Like `from_config`, but fall back to echo when no API key is set
    pub fn from_config_or_echo(ai: &AiConfig) -> Result<Self, CompletionError> {
        match Self::from_config(ai) {
            Err(CompletionError::MissingApiKey(var)) => {
                warn!("{} not set, answering in offline echo mode", var);
                Ok(Self::Echo)
            }
            other => {
                if let Ok(provider) = &other {
                    info!("Using provider: {}", provider.name());
                }
                other
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(_) => "OpenAI",
            Self::Claude(_) => "Claude",
            Self::Echo => "Echo (offline)",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi(client) => client.model(),
            Self::Claude(client) => client.model(),
            Self::Echo => "echo",
        }
    }

    /// Send the bounded context and return the reply text
    pub async fn complete(&self, messages: &[ApiMessage]) -> Result<String, CompletionError> {
        match self {
            Self::OpenAi(client) => client.complete(BASKETBALL_ASSISTANT, messages).await,
            Self::Claude(client) => client.complete(BASKETBALL_ASSISTANT, messages).await,
            Self::Echo => Ok(echo_reply(messages)),
        }
    }
}

fn echo_reply(messages: &[ApiMessage]) -> String {
    let last_user = messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default();
    format!("You wrote: {}", last_user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_repeats_last_user_message() {
        let messages = vec![
            ApiMessage {
                role: Role::User,
                content: "first".to_string(),
            },
            ApiMessage {
                role: Role::User,
                content: "second".to_string(),
            },
            ApiMessage {
                role: Role::Assistant,
                content: "reply".to_string(),
            },
        ];
        let reply = CompletionProvider::Echo.complete(&messages).await.unwrap();
        assert_eq!(reply, "You wrote: second");
        assert_eq!(CompletionProvider::Echo.complete(&[]).await.unwrap(), "You wrote: ");
    }

    #[test]
    fn test_missing_key_falls_back_to_echo() {
        let mut ai = AiConfig::default();
        ai.openai.api_key_env = "COURTSIDE_TEST_NO_SUCH_KEY".to_string();

        assert!(matches!(
            CompletionProvider::from_config(&ai),
            Err(CompletionError::MissingApiKey(_))
        ));
        let provider = CompletionProvider::from_config_or_echo(&ai).unwrap();
        assert_eq!(provider.name(), "Echo (offline)");
    }

    #[test]
    fn test_echo_needs_no_key() {
        let ai = AiConfig {
            provider: ProviderKind::Echo,
            ..AiConfig::default()
        };
        assert!(matches!(CompletionProvider::from_config(&ai), Ok(CompletionProvider::Echo)));
    }
}
