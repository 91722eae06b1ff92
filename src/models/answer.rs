//! Answer results produced by the synthesizer.

use serde::{Deserialize, Serialize};

/// Maximum characters of chunk content carried into a source reference.
pub const SOURCE_PREVIEW_CHARS: usize = 200;

/// Coarse groundedness label for an answer. Derived from string heuristics
/// over the model output, not a calibrated score; treat as best-effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
    #[default]
    Unknown,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Low => write!(f, "low"),
            Confidence::Unknown => write!(f, "unknown"),
        }
    }
}

/// A contributing chunk, truncated for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Display name of the owning document.
    pub source: String,
    /// Chunk content truncated to [`SOURCE_PREVIEW_CHARS`], with a trailing
    /// "..." when truncated.
    pub content: String,
}

impl SourceRef {
    pub fn new(source: impl Into<String>, content: &str) -> Self {
        let truncated = if content.chars().count() > SOURCE_PREVIEW_CHARS {
            let head: String = content.chars().take(SOURCE_PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            content.to_string()
        };
        Self {
            source: source.into(),
            content: truncated,
        }
    }
}

/// The synthesizer's output: answer text, contributing sources in retrieval
/// order, and a confidence label. Transient unless the caller persists it
/// as part of a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub confidence: Confidence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_ref_short_content_unchanged() {
        let s = SourceRef::new("a.pdf", "short text");
        assert_eq!(s.content, "short text");
    }

    #[test]
    fn test_source_ref_truncates_to_200_chars() {
        let long = "x".repeat(450);
        let s = SourceRef::new("a.pdf", &long);
        assert_eq!(s.content.chars().count(), SOURCE_PREVIEW_CHARS + 3);
        assert!(s.content.ends_with("..."));
    }

    #[test]
    fn test_source_ref_exact_boundary_not_truncated() {
        let exact = "y".repeat(SOURCE_PREVIEW_CHARS);
        let s = SourceRef::new("a.pdf", &exact);
        assert_eq!(s.content, exact);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Confidence::High).unwrap(),
            "\"high\""
        );
        assert_eq!(serde_json::to_string(&Confidence::Low).unwrap(), "\"low\"");
    }
}
