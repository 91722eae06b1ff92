//! Chunk records, the unit of retrieval.

use serde::{Deserialize, Serialize};

use crate::error::VectorStoreError;

/// A bounded slice of a document's extracted text, stored in the vector
/// index. Immutable after ingest; removed when its owning document is
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Globally unique id, `"<doc_id>-chunk-<index>"`.
    pub id: String,
    pub doc_id: String,
    pub content: String,
    /// Display name of the owning document.
    pub source: String,
    /// Position within the document, contiguous from 0.
    pub chunk_index: u32,
}

impl ChunkRecord {
    /// Derive the chunk id for a document and position.
    pub fn chunk_id(doc_id: &str, chunk_index: u32) -> String {
        format!("{doc_id}-chunk-{chunk_index}")
    }

    /// Build a validated chunk record. Rejects empty content and empty ids
    /// at the boundary rather than letting malformed records reach the
    /// store.
    pub fn new(
        doc_id: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        chunk_index: u32,
    ) -> Result<Self, VectorStoreError> {
        let doc_id = doc_id.into();
        let content = content.into();

        if doc_id.is_empty() {
            return Err(VectorStoreError::InvalidChunk("empty doc_id".to_string()));
        }
        if content.is_empty() {
            return Err(VectorStoreError::InvalidChunk(format!(
                "empty content for doc {doc_id} chunk {chunk_index}"
            )));
        }

        Ok(Self {
            id: Self::chunk_id(&doc_id, chunk_index),
            doc_id,
            content,
            source: source.into(),
            chunk_index,
        })
    }
}

/// A chunk record with its similarity distance, produced transiently per
/// query and never persisted. Smaller distance means a closer match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk: ChunkRecord,
    pub distance: f32,
}
