use tracing::warn;

use paperdesk_core::{ContextBuilder, ExchangeState, ResearchSession, Role};

use crate::provider::{ChatProvider, compose_message};

/// Reply given in place of a model answer when `key_env` holds no credential.
pub fn not_configured_message(key_env: &str) -> String {
    format!("Anthropic API not configured. Please set {key_env} in your environment or .env file.")
}

/// Runs one user → assistant round trip against a research session.
pub struct ChatExchange<'a> {
    provider: Option<&'a dyn ChatProvider>,
    context: ContextBuilder,
    key_env: &'a str,
}

impl<'a> ChatExchange<'a> {
    /// `provider` is `None` when the variable named by `key_env` is unset.
    pub fn new(
        provider: Option<&'a dyn ChatProvider>,
        context: ContextBuilder,
        key_env: &'a str,
    ) -> Self {
        Self {
            provider,
            context,
            key_env,
        }
    }

    /// Appends the user turn, asks the provider, and appends exactly one
    /// assistant turn: the reply, or a description of what went wrong.
    /// Returns the assistant turn's content.
    pub async fn submit(&self, session: &mut ResearchSession, message: &str) -> String {
        session.conversation.append(Role::User, message);
        session.state = ExchangeState::AwaitingResponse;

        let context = self.context.build(&session.results);
        let reply = match self.provider {
            None => not_configured_message(self.key_env),
            Some(provider) => match provider.complete(&compose_message(&context, message)).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(provider = provider.name(), "chat request failed: {e}");
                    format!("Error calling the language model: {e}")
                }
            },
        };

        session.conversation.append(Role::Assistant, reply.clone());
        session.state = ExchangeState::Idle;
        reply
    }
}
