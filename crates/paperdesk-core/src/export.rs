//! CSV projection of a result set.

use chrono::{DateTime, Local};

use crate::models::PaperRecord;

const COLUMNS: [&str; 9] = [
    "id",
    "title",
    "authors",
    "authors_str",
    "summary",
    "pdf_url",
    "published",
    "categories",
    "primary_category",
];

const LIST_SEPARATOR: &str = "; ";

pub fn to_csv(records: &[PaperRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, COLUMNS.iter().map(|column| column.to_string()));

    for paper in records {
        push_row(
            &mut out,
            [
                paper.id.clone(),
                paper.title.clone(),
                paper.authors.join(LIST_SEPARATOR),
                paper.authors_str.clone(),
                paper.summary.clone(),
                paper.pdf_url.clone(),
                paper.published.clone(),
                paper.categories.join(LIST_SEPARATOR),
                paper.primary_category.clone(),
            ],
        );
    }
    out
}

/// `research_papers_20240131_154500.csv`
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("research_papers_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let row = fields
        .into_iter()
        .map(|field| escape_field(&field))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&row);
    out.push('\n');
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn paper() -> PaperRecord {
        PaperRecord {
            id: "1706.03762".to_string(),
            title: "Attention Is All You Need".to_string(),
            authors: vec!["Ashish Vaswani".to_string(), "Noam Shazeer".to_string()],
            authors_str: "Ashish Vaswani, Noam Shazeer".to_string(),
            summary: "The \"dominant\" models,\nrevisited.".to_string(),
            pdf_url: "https://arxiv.org/pdf/1706.03762v7".to_string(),
            published: "2017-06-12".to_string(),
            categories: vec!["cs.CL".to_string(), "cs.LG".to_string()],
            primary_category: "cs.CL".to_string(),
        }
    }

    #[test]
    fn header_only_for_empty_set() {
        assert_eq!(
            to_csv(&[]),
            "id,title,authors,authors_str,summary,pdf_url,published,categories,primary_category\n"
        );
    }

    #[test]
    fn one_row_per_paper_with_quoting() {
        let csv = to_csv(&[paper()]);
        let body = csv.split_once('\n').map(|(_, rest)| rest).unwrap();

        assert!(body.starts_with("1706.03762,Attention Is All You Need,Ashish Vaswani; Noam Shazeer,"));
        assert!(body.contains(",\"Ashish Vaswani, Noam Shazeer\","));
        assert!(body.contains("\"The \"\"dominant\"\" models,\nrevisited.\""));
        assert!(body.ends_with(",2017-06-12,cs.CL; cs.LG,cs.CL\n"));
    }

    #[test]
    fn file_name_uses_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 1, 31, 15, 45, 0).single().unwrap();
        assert_eq!(export_file_name(now), "research_papers_20240131_154500.csv");
    }
}
