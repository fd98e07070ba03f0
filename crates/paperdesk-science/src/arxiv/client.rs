use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use paperdesk_core::config::SearchConfig;

use crate::arxiv::parser::parse_atom_response;
use crate::arxiv::types::{ArxivEntry, ArxivSearchQuery};
use crate::error::Result;
use crate::http::HttpClient;
use crate::repository::PaperSearch;

pub struct ArxivClient {
    client: HttpClient,
    base_url: String,
}

impl ArxivClient {
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(Duration::from_secs(config.timeout_secs), &config.user_agent)?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn with_params(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(timeout, "paperdesk/0.1")?,
            base_url: base_url.to_string(),
        })
    }

    pub async fn query(&self, query: &ArxivSearchQuery) -> Result<Vec<ArxivEntry>> {
        let params = query.to_params();
        debug!(url = %self.base_url, query = %query.query, "querying arXiv");

        let xml = self.client.get(&self.base_url, &params).await?;
        let mut entries = parse_atom_response(&xml)?;
        entries.truncate(query.max_results as usize);
        Ok(entries)
    }
}

#[async_trait]
impl PaperSearch for ArxivClient {
    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<ArxivEntry>> {
        self.query(&ArxivSearchQuery::new(query, max_results)).await
    }
}
