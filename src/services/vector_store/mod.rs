//! Vector store abstraction layer.
//!
//! A trait-based abstraction over the vector index backends: a local
//! SQLite-backed store (default, fully in-process) and a remote Qdrant
//! server. Both embed chunk content and query text themselves through the
//! deterministic [`TextEmbedder`](crate::services::TextEmbedder); callers
//! never handle raw vectors.
//!
//! Document filters are applied as pre-filters: the candidate set is
//! restricted *before* ranking, so a filtered query returns the best
//! `top_k` matching chunks rather than whatever survives of an unfiltered
//! ranking.

mod qdrant;
mod sqlite;

pub use qdrant::QdrantStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error::VectorStoreError;
use crate::models::{ChunkRecord, RetrievedChunk, VectorDriver, VectorStoreConfig};
use crate::utils::retry::{RetryConfig, with_retry};

/// Durable storage of chunk records with similarity search and
/// document-scoped deletion.
///
/// Implementations serialize their own access; a `delete_document` that
/// completes before a `query` starts is visible to that query.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and store a batch of chunks. No-op on empty input. The batch
    /// is atomic-by-convention: on failure the whole call errs and the
    /// caller may retry at batch granularity; no subset is silently lost.
    async fn ingest(&self, chunks: Vec<ChunkRecord>) -> Result<(), VectorStoreError>;

    /// Return up to `top_k` chunks nearest to `text`, closest first. A
    /// non-empty `doc_ids` restricts candidates to those documents (OR
    /// across the set); `None` or empty searches the full corpus. Returns
    /// fewer than `top_k` when the (filtered) corpus is smaller.
    async fn query(
        &self,
        text: &str,
        top_k: u32,
        doc_ids: Option<&[String]>,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError>;

    /// Remove every chunk belonging to `doc_id`. Deleting an unknown
    /// document is a no-op, not an error.
    async fn delete_document(&self, doc_id: &str) -> Result<(), VectorStoreError>;

    /// Remove all chunks unconditionally.
    async fn clear(&self) -> Result<(), VectorStoreError>;

    /// Number of stored chunks.
    async fn count(&self) -> Result<u64, VectorStoreError>;
}

/// Create a vector store backend based on configuration.
pub async fn create_store(
    config: &VectorStoreConfig,
) -> Result<Box<dyn VectorStore>, VectorStoreError> {
    match config.driver {
        VectorDriver::Sqlite => {
            let path = config.path.clone().ok_or_else(|| {
                VectorStoreError::ConnectionError("sqlite store path not configured".to_string())
            })?;
            let store = SqliteStore::open(&path)?;
            Ok(Box::new(store))
        }
        VectorDriver::Qdrant => {
            // Transient connection failures at startup are retried; once the
            // store is handed out, operations on it are single-shot.
            let store = with_retry(&RetryConfig::default(), || async {
                let store = QdrantStore::new(config)?;
                store.ensure_collection().await?;
                Ok::<_, VectorStoreError>(store)
            })
            .await?;
            Ok(Box::new(store))
        }
    }
}
