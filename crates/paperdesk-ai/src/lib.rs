//! paperdesk AI: chat provider abstraction and the chat exchange over a research session.

pub mod error;
pub mod exchange;
pub mod provider;

pub use error::{AiError, Result};
pub use exchange::{ChatExchange, not_configured_message};
pub use provider::{AnthropicProvider, ChatProvider, compose_message};
