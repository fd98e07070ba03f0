use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::ArxivId;

/// One `<entry>` of an arXiv Atom feed, cleaned up but not yet normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivEntry {
    pub arxiv_id: ArxivId,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub primary_category: String,
    pub pdf_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivSearchQuery {
    pub query: String,
    pub max_results: u32,
    pub start: u32,
}

impl ArxivSearchQuery {
    pub fn new(query: impl Into<String>, max_results: u32) -> Self {
        Self {
            query: query.into(),
            max_results: max_results.max(1),
            start: 0,
        }
    }

    /// Query-string pairs for the `/api/query` endpoint. The free-text query
    /// is passed through as `search_query`, ranked by relevance; reqwest does
    /// the encoding.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search_query", self.query.trim().to_string()),
            ("start", self.start.to_string()),
            ("max_results", self.max_results.to_string()),
            ("sortBy", "relevance".to_string()),
            ("sortOrder", "descending".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_for_topic_search() {
        let query = ArxivSearchQuery::new(" quantum computing ", 5);
        assert_eq!(
            query.to_params(),
            vec![
                ("search_query", "quantum computing".to_string()),
                ("start", "0".to_string()),
                ("max_results", "5".to_string()),
                ("sortBy", "relevance".to_string()),
                ("sortOrder", "descending".to_string()),
            ]
        );
    }

    #[test]
    fn max_results_is_at_least_one() {
        assert_eq!(ArxivSearchQuery::new("x", 0).max_results, 1);
    }
}
