//! OpenAI Chat Completions client
//!
//! Sends the bounded conversation context with a system prompt and
//! returns the first choice's text.

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chat::ApiMessage;
use crate::config::{AiConfig, ProviderConfig};
use crate::error::CompletionError;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const PROVIDER: &str = "OpenAI";

/// OpenAI API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    url: String,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    message: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(format!("Courtside/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            url: OPENAI_API_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            timeout_secs,
        })
    }

    /// Build a client from config, reading the key from the configured env var
    pub fn from_config(ai: &AiConfig, provider: &ProviderConfig) -> Result<Self, CompletionError> {
        let api_key = std::env::var(&provider.api_key_env)
            .map_err(|_| CompletionError::MissingApiKey(provider.api_key_env.clone()))?;

        let mut client = Self::new(api_key, ai.timeout_secs)?
            .with_model(&provider.model)
            .with_max_tokens(ai.max_response_tokens);
        if let Some(url) = &provider.base_url {
            client.url = format!("{}/v1/chat/completions", url.trim_end_matches('/'));
        }
        Ok(client)
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, system: &str, messages: &[ApiMessage]) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: build_messages(system, messages),
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
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
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        parse_completion(&body)
    }
}

fn build_messages<'a>(system: &'a str, messages: &'a [ApiMessage]) -> Vec<ChatMessage<'a>> {
    std::iter::once(ChatMessage {
        role: "system",
        content: system,
    })
    .chain(messages.iter().map(|m| ChatMessage {
        role: m.role.as_str(),
        content: &m.content,
    }))
    .collect()
}

fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CompletionError::Malformed("no message content in choices".to_string()))
}
