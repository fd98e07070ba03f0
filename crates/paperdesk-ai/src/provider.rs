use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use paperdesk_core::config::AiConfig;

use crate::error::{AiError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A hosted model that answers one composed message with one text reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, message: &str) -> Result<String>;
}

/// `"{context}\n\n{message}"`, or just the message when there is no context.
pub fn compose_message(context: &str, message: &str) -> String {
    if context.is_empty() {
        message.to_string()
    } else {
        format!("{context}\n\n{message}")
    }
}

// ─── Anthropic Messages API ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, config: &AiConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AiError::MissingCredentials(config.api_key_env.clone()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a provider from `config.api_key()`; `None` when no key is set.
    pub fn from_config(config: &paperdesk_core::AppConfig) -> Option<Result<Self>> {
        config.api_key().map(|key| Self::new(key, &config.ai))
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, message: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [RequestMessage {
                role: "user",
                content: message,
            }],
        };
        debug!(model = %self.model, chars = message.len(), "sending chat request");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&text).map_err(|e| AiError::Api {
            status: status.as_u16(),
            message: format!("invalid response body: {e}"),
        })?;
        extract_text(parsed).ok_or(AiError::EmptyResponse)
    }
}

fn extract_text(response: MessagesResponse) -> Option<String> {
    let chunks: Vec<String> = response
        .content
        .into_iter()
        .filter_map(|block| block.text)
        .collect();
    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ChatExchange;
    use mockito::{Matcher, Server};
    use paperdesk_core::{ContextBuilder, ExchangeState, ResearchSession, Role};
    use tokio::net::TcpListener;

    fn provider(base_url: &str) -> AnthropicProvider {
        let config = AiConfig {
            base_url: base_url.to_string(),
            ..AiConfig::default()
        };
        AnthropicProvider::new("test-key".to_string(), &config).unwrap()
    }

    #[test]
    fn compose_prefixes_context() {
        assert_eq!(compose_message("", "hi"), "hi");
        assert_eq!(compose_message("ctx", "hi"), "ctx\n\nhi");
    }

    #[test]
    fn blank_key_is_missing_credentials() {
        let result = AnthropicProvider::new("  ".to_string(), &AiConfig::default());
        assert!(matches!(result, Err(AiError::MissingCredentials(env)) if env == "ANTHROPIC_API_KEY"));
    }

    #[tokio::test]
    async fn complete_returns_joined_text_blocks() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "max_tokens": 1000,
                "messages": [{"role": "user", "content": "What is new?"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content":[{"type":"text","text":"First."},{"type":"text","text":"Second."}]}"#,
            )
            .create_async()
            .await;

        let reply = provider(&server.url()).complete("What is new?").await.unwrap();
        assert_eq!(reply, "First.\nSecond.");
    }

    #[tokio::test]
    async fn error_status_carries_api_message() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body(r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).complete("hi").await.unwrap_err();
        match err {
            AiError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid x-api-key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn no_text_blocks_is_empty_response() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).complete("hi").await.unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    /// Accepts connections and never answers them.
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn unanswered_request_times_out() {
        let config = AiConfig {
            base_url: silent_server().await,
            timeout_secs: 1,
            ..AiConfig::default()
        };
        let provider = AnthropicProvider::new("test-key".to_string(), &config).unwrap();

        let err = provider.complete("hi").await.unwrap_err();
        assert!(matches!(&err, AiError::Http(e) if e.is_timeout()), "got {err}");

        let mut session = ResearchSession::new();
        let exchange = ChatExchange::new(
            Some(&provider as &dyn ChatProvider),
            ContextBuilder::default(),
            &config.api_key_env,
        );
        let reply = exchange.submit(&mut session, "hi").await;

        assert!(reply.starts_with("Error calling the language model:"));
        let turns = session.conversation.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, reply);
        assert_eq!(session.state, ExchangeState::Idle);
    }
}
