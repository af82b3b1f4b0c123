//! Courtside - a basketball AI chat assistant
//!
//! The core is [`chat::ContextRegistry`]: per-conversation bounded
//! histories that yield a token-budgeted context for each completion call.

pub mod ai;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod stats;
