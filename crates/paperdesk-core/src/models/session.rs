use serde::Serialize;

use crate::models::conversation::ConversationSession;
use crate::models::paper::PaperRecord;

/// Where a chat exchange currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// State of one interactive session: the latest result set and the chat log.
///
/// Created when a session starts and passed by `&mut` into every operation
/// that changes it.
#[derive(Debug, Default, Serialize)]
pub struct ResearchSession {
    pub topic: Option<String>,
    pub results: Vec<PaperRecord>,
    pub conversation: ConversationSession,
    pub state: ExchangeState,
}

impl ResearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current result set. Empty results leave the previous set
    /// in place, the same way a failed search does.
    pub fn replace_results(&mut self, topic: &str, results: Vec<PaperRecord>) -> bool {
        if results.is_empty() {
            return false;
        }
        self.topic = Some(topic.to_string());
        self.results = results;
        true
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
        self.state = ExchangeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str) -> PaperRecord {
        PaperRecord {
            id: id.to_string(),
            title: format!("Paper {id}"),
            authors: Vec::new(),
            authors_str: String::new(),
            summary: String::new(),
            pdf_url: String::new(),
            published: String::new(),
            categories: Vec::new(),
            primary_category: String::new(),
        }
    }

    #[test]
    fn replace_results_ignores_empty_set() {
        let mut session = ResearchSession::new();
        assert!(session.replace_results("graphs", vec![paper("1")]));
        assert!(!session.replace_results("trees", Vec::new()));

        assert_eq!(session.topic.as_deref(), Some("graphs"));
        assert_eq!(session.results.len(), 1);
    }

    #[test]
    fn clear_conversation_resets_state() {
        let mut session = ResearchSession::new();
        session.conversation.append(crate::Role::User, "hello");
        session.state = ExchangeState::AwaitingResponse;

        session.clear_conversation();
        assert!(session.conversation.is_empty());
        assert_eq!(session.state, ExchangeState::Idle);
    }
}
