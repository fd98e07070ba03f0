use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// Append-only chat log. `clear` is the only way to drop turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationSession {
    turns: Vec<ConversationTurn>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(ConversationTurn {
            role,
            content: content.into(),
        });
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_insertion_order() {
        let mut session = ConversationSession::new();
        session.append(Role::User, "first");
        session.append(Role::Assistant, "second");
        session.append(Role::User, "third");

        let contents: Vec<_> = session.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(session.last().map(|t| t.role), Some(Role::User));
    }

    #[test]
    fn clear_empties_any_log() {
        let mut session = ConversationSession::new();
        session.clear();
        assert!(session.is_empty());

        for i in 0..5 {
            session.append(Role::User, format!("q{i}"));
        }
        session.clear();
        assert!(session.turns().is_empty());
        assert_eq!(session.len(), 0);
    }

    #[test]
    fn role_serializes_lowercase() {
        let turn = ConversationTurn {
            role: Role::Assistant,
            content: "hi".to_string(),
        };
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
