use anyhow::{Context, Result};
use tracing::warn;

use paperdesk_ai::{AnthropicProvider, ChatExchange, ChatProvider};
use paperdesk_core::{AppConfig, ContextBuilder, TopicStore};
use paperdesk_science::{ArxivClient, PaperRepository};

/// Everything a command needs: config, the paper repository and the chat provider.
pub struct Desk {
    pub config: AppConfig,
    pub repo: PaperRepository<ArxivClient>,
    provider: Option<AnthropicProvider>,
}

impl Desk {
    pub fn open(config: AppConfig) -> Result<Self> {
        let client =
            ArxivClient::from_config(&config.search).context("failed to build arXiv client")?;
        let repo = PaperRepository::new(client, TopicStore::new(config.papers_dir()));

        let provider = match AnthropicProvider::from_config(&config) {
            Some(Ok(provider)) => Some(provider),
            Some(Err(e)) => {
                warn!("chat provider unavailable: {e}");
                None
            }
            None => None,
        };

        Ok(Self {
            config,
            repo,
            provider,
        })
    }

    pub fn store(&self) -> &TopicStore {
        self.repo.store()
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn exchange(&self) -> ChatExchange<'_> {
        let provider = self.provider.as_ref().map(|p| p as &dyn ChatProvider);
        ChatExchange::new(
            provider,
            ContextBuilder::from(&self.config.context),
            &self.config.ai.api_key_env,
        )
    }
}
