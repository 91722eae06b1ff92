//! Retrieval over the vector store with a dynamic result-count policy.

use std::sync::Arc;

use tracing::debug;

use crate::error::VectorStoreError;
use crate::models::RetrievedChunk;
use crate::services::vector_store::VectorStore;

/// Default result count for unfiltered queries.
pub const DEFAULT_TOP_K: u32 = 5;
/// Hard cap on results regardless of how many documents are in scope.
pub const MAX_TOP_K: u32 = 20;

/// Compute the result count for a query: recall scales with the number of
/// documents in scope (5 per document), capped at [`MAX_TOP_K`].
pub fn dynamic_top_k(doc_ids: Option<&[String]>) -> u32 {
    match doc_ids {
        Some(ids) if !ids.is_empty() => ((ids.len() as u32) * 5).min(MAX_TOP_K),
        _ => DEFAULT_TOP_K,
    }
}

/// Read-only wrapper around the vector store query path.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Retrieve chunks relevant to `query`, nearest first. An empty result
    /// is a valid outcome, not an error; downstream treats it as a
    /// low-confidence answer.
    pub async fn retrieve(
        &self,
        query: &str,
        doc_ids: Option<&[String]>,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError> {
        let top_k = dynamic_top_k(doc_ids);
        let chunks = self.store.query(query, top_k, doc_ids).await?;
        debug!(
            top_k,
            retrieved = chunks.len(),
            filtered = doc_ids.map(|ids| ids.len()).unwrap_or(0),
            "retrieved chunks"
        );
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChunkRecord;
    use crate::services::vector_store::SqliteStore;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("doc{i}")).collect()
    }

    #[test]
    fn test_top_k_unfiltered() {
        assert_eq!(dynamic_top_k(None), 5);
        assert_eq!(dynamic_top_k(Some(&[])), 5);
    }

    #[test]
    fn test_top_k_scales_with_filter() {
        assert_eq!(dynamic_top_k(Some(&ids(1))), 5);
        assert_eq!(dynamic_top_k(Some(&ids(3))), 15);
    }

    #[test]
    fn test_top_k_capped_at_20() {
        assert_eq!(dynamic_top_k(Some(&ids(4))), 20);
        assert_eq!(dynamic_top_k(Some(&ids(5))), 20);
        assert_eq!(dynamic_top_k(Some(&ids(50))), 20);
    }

    #[tokio::test]
    async fn test_retrieve_empty_corpus_returns_empty() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let retriever = Retriever::new(store);
        let chunks = retriever.retrieve("anything", None).await.unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_respects_filter() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        store
            .ingest(vec![
                ChunkRecord::new("A", "rust async runtimes", "a.pdf", 0).unwrap(),
                ChunkRecord::new("B", "rust async executors", "b.pdf", 0).unwrap(),
            ])
            .await
            .unwrap();

        let retriever = Retriever::new(store);
        let filter = vec!["A".to_string()];
        let chunks = retriever.retrieve("async rust", Some(&filter)).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk.doc_id, "A");
    }
}
