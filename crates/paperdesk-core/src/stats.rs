//! Descriptive statistics over a result set.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::PaperRecord;

const TOP_N: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaperStats {
    pub total: usize,
    pub avg_authors: f64,
    pub most_common_year: Option<String>,
    /// Papers per publication year, ascending by year.
    pub timeline: BTreeMap<String, usize>,
    pub top_authors: Vec<(String, usize)>,
    pub top_categories: Vec<(String, usize)>,
}

impl PaperStats {
    pub fn compute(records: &[PaperRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let author_total: usize = records.iter().map(|paper| paper.authors.len()).sum();

        let mut timeline = BTreeMap::new();
        for year in records.iter().filter_map(PaperRecord::year) {
            *timeline.entry(year.to_string()).or_insert(0usize) += 1;
        }

        // Years iterate ascending; a later year only wins on a strictly larger count.
        let most_common_year = timeline
            .iter()
            .fold(None::<(&String, usize)>, |best, (year, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((year, count)),
            })
            .map(|(year, _)| year.clone());

        Self {
            total: records.len(),
            avg_authors: author_total as f64 / records.len() as f64,
            most_common_year,
            timeline,
            top_authors: top_counts(records.iter().flat_map(|p| p.authors.iter())),
            top_categories: top_counts(records.iter().flat_map(|p| p.categories.iter())),
        }
    }
}

/// Counts values and keeps the `TOP_N` most frequent; ties keep first-seen order.
fn top_counts<'a>(values: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut order: Vec<&String> = Vec::new();
    let mut counts: HashMap<&String, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|value| (value.clone(), counts[value]))
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_N);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(published: &str, authors: &[&str], categories: &[&str]) -> PaperRecord {
        let authors: Vec<String> = authors.iter().map(|a| a.to_string()).collect();
        PaperRecord {
            id: format!("{published}-{}", authors.len()),
            title: "t".to_string(),
            authors_str: authors.join(", "),
            authors,
            summary: String::new(),
            pdf_url: String::new(),
            published: published.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            primary_category: categories.first().map(|c| c.to_string()).unwrap_or_default(),
        }
    }

    #[test]
    fn empty_set_has_zero_stats() {
        let stats = PaperStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.avg_authors, 0.0);
        assert_eq!(stats.most_common_year, None);
        assert!(stats.timeline.is_empty());
        assert!(stats.top_authors.is_empty());
    }

    #[test]
    fn computes_counts_and_averages() {
        let records = vec![
            paper("2021-06-02", &["Ada", "Alan"], &["cs.AI", "cs.LG"]),
            paper("2023-01-10", &["Ada"], &["cs.LG"]),
            paper("2021-11-30", &["Grace", "Ada", "Alan"], &["quant-ph"]),
        ];
        let stats = PaperStats::compute(&records);

        assert_eq!(stats.total, 3);
        assert!((stats.avg_authors - 2.0).abs() < f64::EPSILON);
        assert_eq!(stats.most_common_year.as_deref(), Some("2021"));
        assert_eq!(
            stats.timeline.into_iter().collect::<Vec<_>>(),
            vec![("2021".to_string(), 2), ("2023".to_string(), 1)]
        );
        assert_eq!(stats.top_authors[0], ("Ada".to_string(), 3));
        assert_eq!(stats.top_authors[1], ("Alan".to_string(), 2));
        assert_eq!(stats.top_categories[0], ("cs.LG".to_string(), 2));
    }

    #[test]
    fn year_ties_go_to_earliest() {
        let records = vec![paper("2024-01-01", &["A"], &[]), paper("2019-01-01", &["B"], &[])];
        let stats = PaperStats::compute(&records);
        assert_eq!(stats.most_common_year.as_deref(), Some("2019"));
    }

    #[test]
    fn top_lists_are_capped() {
        let names: Vec<String> = (0..15).map(|i| format!("Author {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let stats = PaperStats::compute(&[paper("2020-01-01", &refs, &[])]);

        assert_eq!(stats.top_authors.len(), 10);
        assert_eq!(stats.top_authors[0].0, "Author 0");
    }
}
