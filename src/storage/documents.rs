//! JSON-file persisted document registry.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::StorageError;
use crate::models::DocumentRecord;

/// Registry of uploaded documents, persisted to a JSON file on every
/// mutation. The in-memory list is the working copy; the file is the
/// durable one.
pub struct DocumentRegistry {
    path: PathBuf,
    documents: Vec<DocumentRecord>,
}

impl DocumentRegistry {
    /// Load the registry from `path`, starting empty if the file is missing
    /// or unreadable.
    pub fn load(path: PathBuf) -> Self {
        let documents = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(docs) => docs,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not parse documents file, starting empty");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        info!(path = %path.display(), count = documents.len(), "loaded document registry");
        Self { path, documents }
    }

    fn save(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.documents)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// All documents, newest upload first.
    pub fn list(&self) -> Vec<DocumentRecord> {
        let mut docs = self.documents.clone();
        docs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        docs
    }

    pub fn get(&self, doc_id: &str) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| d.id == doc_id)
    }

    pub fn add(&mut self, document: DocumentRecord) -> Result<(), StorageError> {
        self.documents.push(document);
        self.save()
    }

    /// Remove a document record, returning it if present.
    pub fn remove(&mut self, doc_id: &str) -> Result<Option<DocumentRecord>, StorageError> {
        let position = self.documents.iter().position(|d| d.id == doc_id);
        let removed = position.map(|i| self.documents.remove(i));
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.documents.clear();
        self.save()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(dir: &tempfile::TempDir) -> DocumentRegistry {
        DocumentRegistry::load(dir.path().join("documents.json"))
    }

    #[test]
    fn test_starts_empty_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(registry(&dir).is_empty());
    }

    #[test]
    fn test_add_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut reg = registry(&dir);
        reg.add(DocumentRecord::new("report.pdf", 3, None)).unwrap();

        let reloaded = registry(&dir);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.list()[0].name, "report.pdf");
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut reg = registry(&dir);
        let doc = DocumentRecord::new("a.pdf", 1, None);
        let id = doc.id.clone();
        reg.add(doc).unwrap();

        let removed = reg.remove(&id).unwrap();
        assert!(removed.is_some());
        assert!(registry(&dir).is_empty());
    }

    #[test]
    fn test_remove_unknown_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut reg = registry(&dir);
        assert!(reg.remove("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut reg = registry(&dir);
        let mut old = DocumentRecord::new("old.pdf", 1, None);
        old.uploaded_at = "2024-01-01T00:00:00Z".to_string();
        let mut new = DocumentRecord::new("new.pdf", 1, None);
        new.uploaded_at = "2025-06-01T00:00:00Z".to_string();
        reg.add(old).unwrap();
        reg.add(new).unwrap();

        let listed = reg.list();
        assert_eq!(listed[0].name, "new.pdf");
        assert_eq!(listed[1].name, "old.pdf");
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(DocumentRegistry::load(path).is_empty());
    }
}
