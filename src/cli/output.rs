use std::fmt::Write as FmtWrite;

use clap::ValueEnum;

use crate::app::{ModelsInfo, UploadReport};
use crate::models::{ChatMessage, ChatSession, DocumentRecord, SessionSummary};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Snapshot of the backend state for the status command.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub driver: String,
    pub location: String,
    pub connected: bool,
    pub chunks: u64,
    pub documents: usize,
    pub sessions: usize,
    pub model: String,
    pub api_key_set: bool,
}

pub trait Formatter {
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_upload(&self, report: &UploadReport) -> String;
    fn format_documents(&self, documents: &[DocumentRecord]) -> String;
    fn format_sessions(&self, sessions: &[SessionSummary]) -> String;
    fn format_session(&self, session_id: &str, session: &ChatSession) -> String;
    fn format_reply(&self, session_id: &str, reply: &ChatMessage) -> String;
    fn format_models(&self, info: &ModelsInfo) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();

        let store_status = if status.connected {
            "[CONNECTED]"
        } else {
            "[DISCONNECTED]"
        };
        writeln!(output, "Vector Store:  {} {}", status.driver, store_status).unwrap();
        writeln!(output, "  Location:    {}", status.location).unwrap();
        if status.connected {
            writeln!(output, "  Chunks:      {}", status.chunks).unwrap();
        }
        writeln!(output, "Documents:     {}", status.documents).unwrap();
        writeln!(output, "Sessions:      {}", status.sessions).unwrap();

        let key_status = if status.api_key_set {
            "[SET]"
        } else {
            "[MISSING]"
        };
        writeln!(output, "Model:         {}", status.model).unwrap();
        writeln!(output, "  API Key:     {}", key_status).unwrap();
        output
    }

    fn format_upload(&self, report: &UploadReport) -> String {
        let mut output = String::new();
        writeln!(output, "Upload Complete").unwrap();
        writeln!(output, "---------------").unwrap();
        writeln!(output, "File:     {}", report.filename).unwrap();
        writeln!(output, "Document: {}", report.document_id).unwrap();
        writeln!(output, "Chunks:   {}", report.chunks_count).unwrap();
        output
    }

    fn format_documents(&self, documents: &[DocumentRecord]) -> String {
        if documents.is_empty() {
            return "No documents uploaded.\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "Documents").unwrap();
        writeln!(output, "---------").unwrap();
        for doc in documents {
            writeln!(output, "{}", doc.id).unwrap();
            writeln!(output, "  Name:     {}", doc.name).unwrap();
            writeln!(output, "  Uploaded: {}", doc.uploaded_at).unwrap();
            writeln!(output, "  Chunks:   {}", doc.chunks_count).unwrap();
        }
        output
    }

    fn format_sessions(&self, sessions: &[SessionSummary]) -> String {
        if sessions.is_empty() {
            return "No chat sessions.\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "Sessions").unwrap();
        writeln!(output, "--------").unwrap();
        for session in sessions {
            writeln!(output, "{}", session.session_id).unwrap();
            writeln!(output, "  Title:    {}", session.title).unwrap();
            writeln!(output, "  Created:  {}", session.created_at).unwrap();
            writeln!(output, "  Messages: {}", session.message_count).unwrap();
        }
        output
    }

    fn format_session(&self, session_id: &str, session: &ChatSession) -> String {
        let mut output = String::new();
        writeln!(output, "{} ({})", session.title, session_id).unwrap();
        writeln!(output, "Created: {}\n", session.created_at).unwrap();
        for message in &session.messages {
            writeln!(output, "{}: {}", message.role, message.content).unwrap();
        }
        output
    }

    fn format_reply(&self, session_id: &str, reply: &ChatMessage) -> String {
        let mut output = String::new();
        writeln!(output, "{}", reply.content).unwrap();
        writeln!(output).unwrap();
        if !reply.sources.is_empty() {
            writeln!(output, "Sources:").unwrap();
            for (i, source) in reply.sources.iter().enumerate() {
                writeln!(output, "  {}. {}", i + 1, source.source).unwrap();
            }
        }
        writeln!(output, "Confidence: {}", reply.confidence).unwrap();
        writeln!(output, "Session:    {}", session_id).unwrap();
        output
    }

    fn format_models(&self, info: &ModelsInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Models").unwrap();
        writeln!(output, "------").unwrap();
        for model in &info.available_models {
            let marker = if *model == info.current_model {
                "*"
            } else {
                " "
            };
            writeln!(output, "{} {}", marker, model).unwrap();
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap()
        } else {
            serde_json::to_string(value).unwrap()
        }
    }
}

impl Formatter for JsonFormatter {
    fn format_status(&self, status: &StatusInfo) -> String {
        self.render(&serde_json::json!({
            "vector_store": {
                "driver": status.driver,
                "location": status.location,
                "connected": status.connected,
                "chunks": status.chunks,
            },
            "documents": status.documents,
            "sessions": status.sessions,
            "model": {
                "name": status.model,
                "api_key_set": status.api_key_set,
            }
        }))
    }

    fn format_upload(&self, report: &UploadReport) -> String {
        self.render(&serde_json::json!({
            "document_id": report.document_id,
            "filename": report.filename,
            "chunks_count": report.chunks_count,
        }))
    }

    fn format_documents(&self, documents: &[DocumentRecord]) -> String {
        self.render(&serde_json::json!({ "documents": documents }))
    }

    fn format_sessions(&self, sessions: &[SessionSummary]) -> String {
        self.render(&serde_json::json!({ "sessions": sessions }))
    }

    fn format_session(&self, session_id: &str, session: &ChatSession) -> String {
        self.render(&serde_json::json!({
            "session_id": session_id,
            "title": session.title,
            "created_at": session.created_at,
            "messages": session.messages,
        }))
    }

    fn format_reply(&self, session_id: &str, reply: &ChatMessage) -> String {
        self.render(&serde_json::json!({
            "session_id": session_id,
            "answer": reply.content,
            "sources": reply.sources,
            "confidence": reply.confidence,
        }))
    }

    fn format_models(&self, info: &ModelsInfo) -> String {
        self.render(&serde_json::json!({
            "available_models": info.available_models,
            "current_model": info.current_model,
        }))
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({ "message": message }).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({ "error": error }).to_string()
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerResult, Confidence, SourceRef};

    #[test]
    fn test_text_reply_lists_sources_in_order() {
        let reply = ChatMessage::assistant(AnswerResult {
            answer: "Based on the context, yes.".to_string(),
            sources: vec![
                SourceRef::new("a.pdf", "first"),
                SourceRef::new("b.pdf", "second"),
            ],
            confidence: Confidence::High,
        });
        let out = TextFormatter.format_reply("sess-1", &reply);
        let a = out.find("1. a.pdf").unwrap();
        let b = out.find("2. b.pdf").unwrap();
        assert!(a < b);
        assert!(out.contains("Confidence: high"));
    }

    #[test]
    fn test_json_reply_is_valid_json() {
        let reply = ChatMessage::assistant(AnswerResult {
            answer: "ok".to_string(),
            sources: Vec::new(),
            confidence: Confidence::Low,
        });
        let out = JsonFormatter::new(false).format_reply("sess-1", &reply);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["confidence"], "low");
        assert_eq!(parsed["session_id"], "sess-1");
    }

    #[test]
    fn test_empty_documents_message() {
        assert_eq!(TextFormatter.format_documents(&[]), "No documents uploaded.\n");
    }
}
