use std::fmt::Write as _;

use crate::config::ContextConfig;
use crate::models::PaperRecord;

const HEADER: &str = "Here are some recent papers I found:\n\n";
const ELLIPSIS: &str = "...";

/// Turns the head of a result set into a short prompt prefix for the chat model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBuilder {
    pub limit: usize,
    pub summary_chars: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self {
            limit: 3,
            summary_chars: 200,
        }
    }
}

impl From<&ContextConfig> for ContextBuilder {
    fn from(config: &ContextConfig) -> Self {
        Self {
            limit: config.paper_limit,
            summary_chars: config.summary_chars,
        }
    }
}

impl ContextBuilder {
    pub fn new(limit: usize, summary_chars: usize) -> Self {
        Self {
            limit,
            summary_chars,
        }
    }

    pub fn build(&self, records: &[PaperRecord]) -> String {
        if records.is_empty() {
            return String::new();
        }

        let mut context = String::from(HEADER);
        for paper in records.iter().take(self.limit) {
            let _ = writeln!(context, "- {} by {}", paper.title, paper.authors_str);
            let _ = writeln!(
                context,
                "  Summary: {}{ELLIPSIS}",
                truncate_chars(&paper.summary, self.summary_chars)
            );
            context.push('\n');
        }
        context
    }
}

/// First `max` chars of `text`, never splitting a code point.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
