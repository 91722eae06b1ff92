use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Denormalized summary of an uploaded document. The vector store is the
/// source of truth for chunk content; this record owns the chunks via
/// `doc_id` and tracks the stored upload on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    /// Original filename, used as the display source for chunks.
    pub name: String,
    /// RFC 3339 upload timestamp.
    pub uploaded_at: String,
    pub chunks_count: usize,
    /// Where the uploaded file was copied to, if it is still on disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

impl DocumentRecord {
    pub fn new(name: impl Into<String>, chunks_count: usize, file_path: Option<PathBuf>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            uploaded_at: chrono::Utc::now().to_rfc3339(),
            chunks_count,
            file_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = DocumentRecord::new("report.pdf", 4, None);
        assert!(!doc.id.is_empty());
        assert_eq!(doc.name, "report.pdf");
        assert_eq!(doc.chunks_count, 4);
        assert!(!doc.uploaded_at.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = DocumentRecord::new("a.pdf", 0, None);
        let b = DocumentRecord::new("a.pdf", 0, None);
        assert_ne!(a.id, b.id);
    }
}
