//! Claude API Client
//!
//! Implements the Anthropic Messages API for the assistant. The system
//! prompt travels in its own field rather than as a message.

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chat::ApiMessage;
use crate::config::{AiConfig, ProviderConfig};
use crate::error::CompletionError;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const PROVIDER: &str = "Claude";

/// Claude API Client
pub struct ClaudeClient {
    client: Client,
    api_key: String,
    url: String,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
}

/// Request body for Claude API
#[derive(Debug, Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ApiMessage],
    system: &'a str,
}

/// Response from Claude API
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Error response from Claude API
#[derive(Debug, Deserialize)]
struct ClaudeError {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl ClaudeClient {
    /// Create a new Claude client
    pub fn new(api_key: String, timeout_secs: u64) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            url: CLAUDE_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs,
        })
    }

    /// Create client from config, reading the key from the configured env var
    pub fn from_config(ai: &AiConfig, provider: &ProviderConfig) -> Result<Self, CompletionError> {
        let api_key = std::env::var(&provider.api_key_env)
            .map_err(|_| CompletionError::MissingApiKey(provider.api_key_env.clone()))?;

        let mut client = Self::new(api_key, ai.timeout_secs)?
            .with_model(&provider.model)
            .with_max_tokens(ai.max_response_tokens);
        if let Some(url) = &provider.base_url {
            client.url = format!("{}/v1/messages", url.trim_end_matches('/'));
        }
        Ok(client)
    }

    /// Set the model to use
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set max tokens for response
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Complete a conversation
    pub async fn complete(&self, system: &str, messages: &[ApiMessage]) -> Result<String, CompletionError> {
        let request = ClaudeRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages,
            system,
        };

        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::from_reqwest(e, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::from_reqwest(e, self.timeout_secs))?;

        if !status.is_success() {
            // Try to parse as Claude error
            let message = match serde_json::from_str::<ClaudeError>(&body) {
                Ok(err) => format!("{}: {}", err.error.error_type, err.error.message),
                Err(_) => body,
            };
            return Err(CompletionError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        parse_completion(&body)
    }
}

/// Extract text from content blocks
fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let response: ClaudeResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;

    let text = response
        .content
        .into_iter()
        .filter_map(|block| block.text)
        .collect::<Vec<String>>()
        .join("");

    if text.is_empty() {
        return Err(CompletionError::Malformed("no text content blocks".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    #[test]
    fn test_request_serialization() {
        let messages = vec![ApiMessage {
            role: Role::User,
            content: "Hello".to_string(),
        }];
        let request = ClaudeRequest {
            model: DEFAULT_MODEL,
            max_tokens: 128,
            messages: &messages,
            system: "You are a coach",
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system"], "You are a coach");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello");
    }

    #[test]
    fn test_parse_joins_text_blocks() {
        let body = r#"{"id":"msg_1","type":"message","role":"assistant",
            "content":[{"type":"text","text":"Curry "},{"type":"text","text":"shot 402 threes."}],
            "model":"claude","stop_reason":"end_turn","usage":{"input_tokens":1,"output_tokens":2}}"#;
        assert_eq!(parse_completion(body).unwrap(), "Curry shot 402 threes.");
    }

    #[test]
    fn test_parse_rejects_empty_content() {
        assert!(matches!(
            parse_completion(r#"{"content":[]}"#),
            Err(CompletionError::Malformed(_))
        ));
    }
}
