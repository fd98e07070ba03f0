use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScienceError};

// YYMM.NNNN or YYMM.NNNNN, optional version
static NEW_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}\.\d{4,5})(?:v(\d+))?$").unwrap());

// archive(.SUBJ)/YYMMNNN, optional version
static OLD_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z\-]+(?:\.[A-Z]{2})?/\d{7})(?:v(\d+))?$").unwrap());

const URL_PREFIXES: [&str; 6] = [
    "https://arxiv.org/abs/",
    "http://arxiv.org/abs/",
    "https://arxiv.org/pdf/",
    "http://arxiv.org/pdf/",
    "arXiv:",
    "arxiv:",
];

/// An arXiv identifier split into its stable part and optional version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArxivId {
    /// Version-less id, e.g. `2106.01234` or `hep-th/9901001`.
    pub id: String,
    pub version: Option<u32>,
}

impl ArxivId {
    /// Accepts bare ids, `arXiv:` prefixes and abs/pdf URLs.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let stripped = URL_PREFIXES
            .iter()
            .find_map(|prefix| input.strip_prefix(prefix))
            .map(|rest| rest.trim_end_matches(".pdf"))
            .unwrap_or(input);

        let caps = NEW_FORMAT
            .captures(stripped)
            .or_else(|| OLD_FORMAT.captures(stripped))
            .ok_or_else(|| ScienceError::InvalidArxivId(input.to_string()))?;

        let id = caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ScienceError::InvalidArxivId(input.to_string()))?;
        let version = caps.get(2).and_then(|v| v.as_str().parse::<u32>().ok());

        Ok(Self { id, version })
    }

    /// Identifier used as the paper key: stable across new versions.
    pub fn short_id(&self) -> &str {
        &self.id
    }

    pub fn versioned(&self) -> String {
        match self.version {
            Some(v) => format!("{}v{v}", self.id),
            None => self.id.clone(),
        }
    }

    pub fn pdf_url(&self) -> String {
        format!("https://arxiv.org/pdf/{}", self.versioned())
    }
}

impl fmt::Display for ArxivId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.versioned())
    }
}
