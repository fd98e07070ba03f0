use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use paperdesk_core::{PaperRecord, StoredPaper, TopicStore};

use crate::arxiv::ArxivEntry;
use crate::error::Result;
use crate::normalize::normalize;

/// A paper index that can be searched by free text.
#[async_trait]
pub trait PaperSearch: Send + Sync {
    fn name(&self) -> &str;

    /// Up to `max_results` hits, most relevant first.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<ArxivEntry>>;
}

/// What a search produced. `error` carries the message to show the user.
#[derive(Debug, Default, Serialize)]
pub struct SearchOutcome {
    pub papers: Vec<PaperRecord>,
    pub saved_to: Option<PathBuf>,
    pub error: Option<String>,
}

/// Search → normalize → persist, with every failure turned into a message.
pub struct PaperRepository<S> {
    source: S,
    store: TopicStore,
}

impl<S: PaperSearch> PaperRepository<S> {
    pub fn new(source: S, store: TopicStore) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &TopicStore {
        &self.store
    }

    pub async fn search(&self, topic: &str, max_results: u32) -> SearchOutcome {
        let max_results = max_results.max(1);
        let entries = match self.source.search(topic, max_results).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(topic, source = self.source.name(), "search failed: {e}");
                return SearchOutcome {
                    error: Some(format!("Error searching papers: {e}")),
                    ..Default::default()
                };
            }
        };

        let mut seen = HashSet::new();
        let papers: Vec<PaperRecord> = entries
            .iter()
            .map(normalize)
            .filter(|paper| !paper.id.is_empty() && seen.insert(paper.id.clone()))
            .take(max_results as usize)
            .collect();

        info!(topic, found = papers.len(), "search finished");

        match self.store.save(topic, &papers) {
            Ok(path) => SearchOutcome {
                papers,
                saved_to: Some(path),
                error: None,
            },
            Err(e) => {
                warn!(topic, "could not save papers: {e}");
                SearchOutcome {
                    papers,
                    saved_to: None,
                    error: Some(format!("Error saving papers: {e}")),
                }
            }
        }
    }

    /// Looks a paper up in the saved topic buckets.
    pub fn get_paper(&self, paper_id: &str) -> paperdesk_core::Result<Option<StoredPaper>> {
        self.store.find_by_id(paper_id)
    }

    pub fn list_topics(&self) -> paperdesk_core::Result<Vec<String>> {
        self.store.list_topics()
    }
}
