//! Error types shared across the assistant

use thiserror::Error;

/// Errors raised by the conversation context layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A role string other than `user` or `assistant`
    #[error("invalid argument: unrecognized role '{0}' (expected 'user' or 'assistant')")]
    InvalidRole(String),
}

/// Failures of the external completion API
///
/// Every variant is recoverable: the caller reports it and keeps the
/// conversation alive.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{0} environment variable not set")]
    MissingApiKey(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Classify a reqwest failure, separating timeouts from other transport errors
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ContextError::InvalidRole("system".to_string());
        assert!(err.to_string().contains("'system'"));

        let err = CompletionError::Api {
            provider: "OpenAI",
            status: 429,
            message: "Rate limit reached".to_string(),
        };
        assert_eq!(err.to_string(), "OpenAI API error (429): Rate limit reached");
        assert_eq!(CompletionError::Timeout(10).to_string(), "request timed out after 10s");
    }
}
