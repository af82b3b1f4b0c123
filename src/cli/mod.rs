//! CLI command implementations

pub mod ask;
pub mod chat;
pub mod info;
pub mod stats;
