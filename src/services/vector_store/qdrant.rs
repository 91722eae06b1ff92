//! Qdrant-backed vector store.
//!
//! Remote alternative to the SQLite store for corpora that outgrow a local
//! scan. The `doc_id` filter is passed to Qdrant as a search filter, which
//! the engine applies during candidate selection (a pre-filter), so
//! filtered searches still return a full `top_k` of in-scope results.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter,
    PointStruct, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::VectorStore;
use crate::error::VectorStoreError;
use crate::models::{ChunkRecord, RetrievedChunk, VectorStoreConfig};
use crate::services::embedder::{EMBEDDING_DIM, TextEmbedder};

pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    embedder: TextEmbedder,
}

impl QdrantStore {
    pub fn new(config: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            embedder: TextEmbedder::new(),
        })
    }

    /// Create the collection if it does not exist yet.
    pub async fn ensure_collection(&self) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;
        if exists {
            return Ok(());
        }

        let create = CreateCollectionBuilder::new(&self.collection)
            .vectors_config(VectorParamsBuilder::new(EMBEDDING_DIM as u64, Distance::Cosine));

        self.client
            .create_collection(create)
            .await
            .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;
        info!(collection = %self.collection, "created qdrant collection");
        Ok(())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Qdrant point ids must be UUIDs or integers; derive a stable v5 UUID from
/// the chunk id and keep the real id in the payload.
fn point_id(chunk_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, chunk_id.as_bytes()).to_string()
}

fn payload_str(payload: &HashMap<String, qdrant_client::qdrant::Value>, key: &str) -> String {
    payload
        .get(key)
        .and_then(|v| match &v.kind {
            Some(qdrant_client::qdrant::value::Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn payload_int(payload: &HashMap<String, qdrant_client::qdrant::Value>, key: &str) -> i64 {
    payload
        .get(key)
        .and_then(|v| match &v.kind {
            Some(qdrant_client::qdrant::value::Kind::IntegerValue(n)) => Some(*n),
            _ => None,
        })
        .unwrap_or_default()
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn ingest(&self, chunks: Vec<ChunkRecord>) -> Result<(), VectorStoreError> {
        if chunks.is_empty() {
            debug!("ingest called with no chunks, skipping");
            return Ok(());
        }

        let count = chunks.len();
        let points: Vec<PointStruct> = chunks
            .into_iter()
            .map(|chunk| {
                let vector = self.embedder.embed(&chunk.content);
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("chunk_id".to_string(), chunk.id.clone().into());
                payload.insert("doc_id".to_string(), chunk.doc_id.into());
                payload.insert("source".to_string(), chunk.source.into());
                payload.insert("chunk_index".to_string(), (chunk.chunk_index as i64).into());
                payload.insert("content".to_string(), chunk.content.into());

                PointStruct::new(point_id(&chunk.id), vector, payload)
            })
            .collect();

        let upsert = UpsertPointsBuilder::new(&self.collection, points);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| VectorStoreError::IngestError(e.to_string()))?;

        info!(chunks = count, "ingested chunk batch");
        Ok(())
    }

    async fn query(
        &self,
        text: &str,
        top_k: u32,
        doc_ids: Option<&[String]>,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError> {
        let query_vector = self.embedder.embed(text);

        let mut search =
            SearchPointsBuilder::new(&self.collection, query_vector, u64::from(top_k))
                .with_payload(true);

        if let Some(ids) = doc_ids.filter(|ids| !ids.is_empty()) {
            let conditions: Vec<Condition> = ids
                .iter()
                .map(|id| Condition::matches("doc_id", id.clone()))
                .collect();
            search = search.filter(Filter::should(conditions));
        }

        let results = self
            .client
            .search_points(search)
            .await
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;

        let retrieved: Vec<RetrievedChunk> = results
            .result
            .into_iter()
            .map(|point| {
                let payload = point.payload;
                RetrievedChunk {
                    chunk: ChunkRecord {
                        id: payload_str(&payload, "chunk_id"),
                        doc_id: payload_str(&payload, "doc_id"),
                        source: payload_str(&payload, "source"),
                        chunk_index: payload_int(&payload, "chunk_index") as u32,
                        content: payload_str(&payload, "content"),
                    },
                    // Qdrant reports cosine similarity; convert to distance
                    // so smaller is better across backends
                    distance: 1.0 - point.score,
                }
            })
            .collect();

        debug!(
            results = retrieved.len(),
            top_k, "similarity query completed"
        );
        Ok(retrieved)
    }

    async fn delete_document(&self, doc_id: &str) -> Result<(), VectorStoreError> {
        let filter = Filter::must([Condition::matches("doc_id", doc_id.to_string())]);
        let delete = DeletePointsBuilder::new(&self.collection).points(filter);

        self.client
            .delete_points(delete)
            .await
            .map_err(|e| VectorStoreError::DeleteError(e.to_string()))?;

        info!(doc_id, "deleted document chunks");
        Ok(())
    }

    async fn clear(&self) -> Result<(), VectorStoreError> {
        self.client
            .delete_collection(&self.collection)
            .await
            .map_err(|e| VectorStoreError::DeleteError(e.to_string()))?;
        self.ensure_collection().await?;
        info!("cleared vector store");
        Ok(())
    }

    async fn count(&self) -> Result<u64, VectorStoreError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;
        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_is_stable() {
        let a = point_id("doc1-chunk-0");
        let b = point_id("doc1-chunk-0");
        assert_eq!(a, b);
        assert_ne!(a, point_id("doc1-chunk-1"));
        // Valid UUID shape
        assert_eq!(a.len(), 36);
    }
}
