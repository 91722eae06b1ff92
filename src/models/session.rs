//! Chat sessions and messages.

use serde::{Deserialize, Serialize};

use super::answer::{AnswerResult, Confidence, SourceRef};

/// Characters of the first user message used for the auto-generated title.
pub const TITLE_PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Assistant => write!(f, "Assistant"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
    #[serde(default)]
    pub confidence: Confidence,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            confidence: Confidence::Unknown,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn assistant(answer: AnswerResult) -> Self {
        Self {
            role: Role::Assistant,
            content: answer.answer,
            sources: answer.sources,
            confidence: answer.confidence,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub title: String,
    pub created_at: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            title: "New Chat".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            messages: Vec::new(),
        }
    }

    /// Title derived from the first user message: first 30 chars, with an
    /// ellipsis when cut.
    pub fn title_from_message(message: &str) -> String {
        if message.chars().count() > TITLE_PREVIEW_CHARS {
            let head: String = message.chars().take(TITLE_PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            message.to_string()
        }
    }

    /// Render the transcript as plain text, one `Role: content` line per
    /// message.
    pub fn export_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary row for session listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub title: String,
    pub created_at: String,
    pub message_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_short_message() {
        assert_eq!(ChatSession::title_from_message("hello"), "hello");
    }

    #[test]
    fn test_title_truncated_at_30() {
        let msg = "a".repeat(45);
        let title = ChatSession::title_from_message(&msg);
        assert_eq!(title, format!("{}...", "a".repeat(30)));
    }

    #[test]
    fn test_export_text() {
        let mut session = ChatSession::new();
        session.messages.push(ChatMessage::user("hi"));
        session.messages.push(ChatMessage::assistant(AnswerResult {
            answer: "hello".to_string(),
            sources: Vec::new(),
            confidence: Confidence::High,
        }));
        assert_eq!(session.export_text(), "User: hi\nAssistant: hello");
    }

    #[test]
    fn test_message_roundtrip_preserves_confidence() {
        let msg = ChatMessage::assistant(AnswerResult {
            answer: "ok".to_string(),
            sources: Vec::new(),
            confidence: Confidence::Low,
        });
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.confidence, Confidence::Low);
    }

    #[test]
    fn test_missing_confidence_defaults_to_unknown() {
        let json = r#"{"role":"assistant","content":"x","timestamp":"t"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.confidence, Confidence::Unknown);
    }
}
