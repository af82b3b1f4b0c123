//! AI provider integrations

pub mod claude;
pub mod openai;
pub mod provider;

pub use provider::CompletionProvider;
