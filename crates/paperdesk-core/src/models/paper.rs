use serde::{Deserialize, Serialize};

/// A normalized search hit, as held in memory for the current result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub authors: Vec<String>,

    /// `authors` joined with `", "` for display.
    #[serde(default)]
    pub authors_str: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub pdf_url: String,

    /// Calendar date, `YYYY-MM-DD`.
    #[serde(default)]
    pub published: String,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub primary_category: String,
}

impl PaperRecord {
    /// Year part of `published`, if any.
    pub fn year(&self) -> Option<&str> {
        self.published
            .split('-')
            .next()
            .map(str::trim)
            .filter(|year| !year.is_empty())
    }

    /// The subset of fields written to a topic bucket.
    pub fn to_stored(&self) -> StoredPaper {
        StoredPaper {
            title: self.title.clone(),
            authors: self.authors.clone(),
            summary: self.summary.clone(),
            pdf_url: self.pdf_url.clone(),
            published: self.published.clone(),
        }
    }
}

/// Persisted projection of a [`PaperRecord`].
///
/// Categories are not part of the on-disk schema; files written by earlier
/// versions are read by external tooling with exactly these five keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPaper {
    pub title: String,

    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub pdf_url: String,

    #[serde(default)]
    pub published: String,
}

impl StoredPaper {
    /// Lifts a stored entry back into a record. Fields missing from the
    /// projection come back empty.
    pub fn into_record(self, id: impl Into<String>) -> PaperRecord {
        PaperRecord {
            id: id.into(),
            authors_str: self.authors.join(", "),
            title: self.title,
            authors: self.authors,
            summary: self.summary,
            pdf_url: self.pdf_url,
            published: self.published,
            categories: Vec::new(),
            primary_category: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PaperRecord {
        PaperRecord {
            id: "2106.01234".to_string(),
            title: "Quantum Supremacy Revisited".to_string(),
            authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
            authors_str: "Ada Lovelace, Alan Turing".to_string(),
            summary: "We revisit.".to_string(),
            pdf_url: "https://arxiv.org/pdf/2106.01234v1".to_string(),
            published: "2021-06-02".to_string(),
            categories: vec!["quant-ph".to_string(), "cs.ET".to_string()],
            primary_category: "quant-ph".to_string(),
        }
    }

    #[test]
    fn stored_projection_drops_categories() {
        let json = serde_json::to_value(record().to_stored()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["authors", "pdf_url", "published", "summary", "title"]);
    }

    #[test]
    fn into_record_restores_display_authors() {
        let restored = record().to_stored().into_record("2106.01234");
        assert_eq!(restored.authors_str, "Ada Lovelace, Alan Turing");
        assert_eq!(restored.title, "Quantum Supremacy Revisited");
        assert!(restored.categories.is_empty());
        assert!(restored.primary_category.is_empty());
    }

    #[test]
    fn year_is_prefix_of_published() {
        assert_eq!(record().year(), Some("2021"));

        let mut undated = record();
        undated.published.clear();
        assert_eq!(undated.year(), None);
    }
}
