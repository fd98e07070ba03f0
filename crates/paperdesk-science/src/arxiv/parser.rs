use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::warn;

use crate::arxiv::types::ArxivEntry;
use crate::error::{Result, ScienceError};
use crate::identifiers::ArxivId;

const API_ERROR_MARKER: &str = "arxiv.org/api/errors";

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
    #[serde(rename = "category", default)]
    categories: Vec<AtomCategory>,
    #[serde(rename = "arxiv:primary_category", alias = "primary_category")]
    primary_category: Option<AtomCategory>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AtomCategory {
    #[serde(rename = "@term")]
    term: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@type")]
    link_type: Option<String>,
    #[serde(rename = "@title")]
    title: Option<String>,
}

/// Parses an arXiv API response. An error entry in the feed becomes `ApiError`.
///
/// Entries without a usable arXiv id are skipped; every other defect in an
/// entry leaves the affected field empty.
pub fn parse_atom_response(xml: &str) -> Result<Vec<ArxivEntry>> {
    let feed: AtomFeed =
        from_str(xml).map_err(|e| ScienceError::Parse(format!("invalid atom xml: {e}")))?;

    if let Some(error) = feed.entries.iter().find(|e| e.id.contains(API_ERROR_MARKER)) {
        return Err(ScienceError::ApiError(
            "arXiv".to_string(),
            clean_text(&error.summary),
        ));
    }

    Ok(feed.entries.into_iter().filter_map(parse_entry).collect())
}

fn parse_entry(entry: AtomEntry) -> Option<ArxivEntry> {
    let arxiv_id = match ArxivId::parse(entry.id.trim()) {
        Ok(id) => id,
        Err(_) => {
            warn!(id = %entry.id, "skipping entry with invalid arXiv id");
            return None;
        }
    };

    let published = entry
        .published
        .as_deref()
        .and_then(|value| parse_rfc3339(value, &arxiv_id));

    let authors = entry
        .authors
        .into_iter()
        .map(|author| clean_text(&author.name))
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>();

    let categories = entry
        .categories
        .into_iter()
        .filter_map(|category| clean_optional(category.term))
        .collect::<Vec<_>>();

    let primary_category = entry
        .primary_category
        .and_then(|category| clean_optional(category.term))
        .or_else(|| categories.first().cloned())
        .unwrap_or_default();

    let pdf_url = entry
        .links
        .iter()
        .find(|link| {
            link.link_type.as_deref() == Some("application/pdf")
                || link.title.as_deref() == Some("pdf")
        })
        .and_then(|link| link.href.as_deref())
        .map(normalize_arxiv_url)
        .unwrap_or_else(|| arxiv_id.pdf_url());

    Some(ArxivEntry {
        title: clean_text(&entry.title),
        summary: clean_text(&entry.summary),
        arxiv_id,
        authors,
        published,
        categories,
        primary_category,
        pdf_url,
    })
}

fn parse_rfc3339(value: &str, id: &ArxivId) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(%id, value, "unparsable published date: {e}");
            None
        }
    }
}

/// Collapses the line breaks and indentation arXiv puts inside titles and abstracts.
fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| clean_text(&v)).filter(|v| !v.is_empty())
}

fn normalize_arxiv_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("http://arxiv.org/") {
        return format!("https://arxiv.org/{rest}");
    }
    url.to_string()
}
