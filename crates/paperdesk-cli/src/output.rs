use anyhow::Result;

use paperdesk_core::{PaperRecord, PaperStats, StoredPaper, display_name};

pub fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

pub fn print_papers(papers: &[PaperRecord]) {
    for (i, paper) in papers.iter().enumerate() {
        println!("[{}] {}", i + 1, paper.title);
        println!("    Authors:    {}", paper.authors_str);
        println!("    Published:  {}", paper.published);
        if !paper.categories.is_empty() {
            println!("    Categories: {}", paper.categories.join(", "));
        }
        println!("    Paper ID:   {}", paper.id);
        println!("    PDF:        {}", paper.pdf_url);
        println!();
    }
}

pub fn print_stored(id: &str, paper: &StoredPaper) {
    println!("{}", paper.title);
    println!("  Paper ID:  {id}");
    println!("  Authors:   {}", paper.authors.join(", "));
    println!("  Published: {}", paper.published);
    println!("  PDF:       {}", paper.pdf_url);
    println!();
    println!("{}", paper.summary);
}

pub fn print_topics(topics: &[String]) {
    if topics.is_empty() {
        println!("No saved topics yet.");
        return;
    }
    for topic in topics {
        println!("  {topic:<30}  {}", display_name(topic));
    }
}

pub fn print_stats(stats: &PaperStats) {
    println!("Paper analysis:");
    println!("  Total papers:      {}", stats.total);
    println!("  Avg authors:       {:.1}", stats.avg_authors);
    println!(
        "  Most common year:  {}",
        stats.most_common_year.as_deref().unwrap_or("N/A")
    );

    if !stats.timeline.is_empty() {
        println!("\nPublication timeline:");
        for (year, count) in &stats.timeline {
            println!("  {year}  {}", bar(*count));
        }
    }
    print_ranking("Top authors", &stats.top_authors);
    print_ranking("Research categories", &stats.top_categories);
}

fn print_ranking(heading: &str, ranking: &[(String, usize)]) {
    if ranking.is_empty() {
        return;
    }
    println!("\n{heading}:");
    for (name, count) in ranking {
        println!("  {name:<30}  {}", bar(*count));
    }
}

fn bar(count: usize) -> String {
    format!("{} {count}", "█".repeat(count))
}
