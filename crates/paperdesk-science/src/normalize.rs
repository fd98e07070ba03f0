use paperdesk_core::PaperRecord;

use crate::arxiv::ArxivEntry;

/// Converts one arXiv hit into a [`PaperRecord`].
///
/// Never fails: missing provider fields come through as empty strings or lists.
pub fn normalize(entry: &ArxivEntry) -> PaperRecord {
    PaperRecord {
        id: entry.arxiv_id.short_id().to_string(),
        title: entry.title.clone(),
        authors: entry.authors.clone(),
        authors_str: entry.authors.join(", "),
        summary: entry.summary.clone(),
        pdf_url: entry.pdf_url.clone(),
        published: entry
            .published
            .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        categories: entry.categories.clone(),
        primary_category: entry.primary_category.clone(),
    }
}
