//! Conversation state for the basketball assistant

pub mod context;
pub mod filter;
pub mod registry;
pub mod session;

pub use context::{ApiMessage, ContextManager, Role};
pub use filter::{add_context_prefix, filter_response, FilteredResponse};
pub use registry::ContextRegistry;
pub use session::ChatSession;
