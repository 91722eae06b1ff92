//! Local SQLite-backed vector store.
//!
//! Chunks live in a single `chunks` table with their embedding serialized
//! as little-endian f32 bytes. Queries pre-filter by `doc_id` in SQL, then
//! rank the surviving candidates by exact cosine distance. A linear scan is
//! deliberate: corpora here are a handful of uploaded documents, and exact
//! scoring keeps ranking deterministic.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{Connection, params, params_from_iter};
use tracing::{debug, info};

use super::VectorStore;
use crate::error::VectorStoreError;
use crate::models::{ChunkRecord, RetrievedChunk};
use crate::services::embedder::{TextEmbedder, cosine_distance};

pub struct SqliteStore {
    // The connection mutex serializes ingest/query/delete, which also gives
    // read-after-write visibility within the process.
    conn: Mutex<Connection>,
    embedder: TextEmbedder,
}

impl SqliteStore {
    /// Open or create the store at the given path. Parent directories are
    /// created as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VectorStoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;
        }

        let conn = Connection::open(path)
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;
        Self::init(conn)
    }

    /// Open an in-memory store, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self, VectorStoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, VectorStoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS chunks (
                id          TEXT PRIMARY KEY,
                doc_id      TEXT NOT NULL,
                source      TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                content     TEXT NOT NULL,
                embedding   BLOB NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_chunks_doc_id ON chunks(doc_id);",
        )
        .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
            embedder: TextEmbedder::new(),
        })
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, VectorStoreError> {
        self.conn
            .lock()
            .map_err(|_| VectorStoreError::ConnectionError("store lock poisoned".to_string()))
    }
}

fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for v in vector {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[async_trait]
impl VectorStore for SqliteStore {
    async fn ingest(&self, chunks: Vec<ChunkRecord>) -> Result<(), VectorStoreError> {
        if chunks.is_empty() {
            debug!("ingest called with no chunks, skipping");
            return Ok(());
        }

        let count = chunks.len();
        let mut conn = self.lock_conn()?;
        // One transaction per batch: either every chunk lands or none does.
        let tx = conn
            .transaction()
            .map_err(|e| VectorStoreError::IngestError(e.to_string()))?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO chunks
                     (id, doc_id, source, chunk_index, content, embedding)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .map_err(|e| VectorStoreError::IngestError(e.to_string()))?;

            for chunk in &chunks {
                let embedding = encode_embedding(&self.embedder.embed(&chunk.content));
                stmt.execute(params![
                    chunk.id,
                    chunk.doc_id,
                    chunk.source,
                    chunk.chunk_index,
                    chunk.content,
                    embedding,
                ])
                .map_err(|e| VectorStoreError::IngestError(e.to_string()))?;
            }
        }
        tx.commit()
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
        let filter = doc_ids.filter(|ids| !ids.is_empty());

        let conn = self.lock_conn()?;
        // Pre-filter in SQL so ranking only ever sees in-scope candidates
        let mut candidates: Vec<RetrievedChunk> = match filter {
            Some(ids) => {
                let placeholders = vec!["?"; ids.len()].join(", ");
                let sql = format!(
                    "SELECT id, doc_id, source, chunk_index, content, embedding
                     FROM chunks WHERE doc_id IN ({placeholders})"
                );
                let mut stmt = conn
                    .prepare(&sql)
                    .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;
                let rows = stmt
                    .query_map(params_from_iter(ids.iter()), |row| {
                        row_to_retrieved(row, &query_vector)
                    })
                    .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;
                rows.collect::<Result<_, _>>()
                    .map_err(|e| VectorStoreError::SearchError(e.to_string()))?
            }
            None => {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, doc_id, source, chunk_index, content, embedding FROM chunks",
                    )
                    .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;
                let rows = stmt
                    .query_map([], |row| row_to_retrieved(row, &query_vector))
                    .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;
                rows.collect::<Result<_, _>>()
                    .map_err(|e| VectorStoreError::SearchError(e.to_string()))?
            }
        };

        // Stable tie-break on chunk id keeps ranking deterministic
        candidates.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        candidates.truncate(top_k as usize);

        debug!(
            results = candidates.len(),
            top_k, "similarity query completed"
        );
        Ok(candidates)
    }

    async fn delete_document(&self, doc_id: &str) -> Result<(), VectorStoreError> {
        let conn = self.lock_conn()?;
        let removed = conn
            .execute("DELETE FROM chunks WHERE doc_id = ?1", params![doc_id])
            .map_err(|e| VectorStoreError::DeleteError(e.to_string()))?;
        info!(doc_id, removed, "deleted document chunks");
        Ok(())
    }

    async fn clear(&self) -> Result<(), VectorStoreError> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM chunks", [])
            .map_err(|e| VectorStoreError::DeleteError(e.to_string()))?;
        info!("cleared vector store");
        Ok(())
    }

    async fn count(&self) -> Result<u64, VectorStoreError> {
        let conn = self.lock_conn()?;
        conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get::<_, u64>(0))
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))
    }
}

fn row_to_retrieved(
    row: &rusqlite::Row<'_>,
    query_vector: &[f32],
) -> Result<RetrievedChunk, rusqlite::Error> {
    let embedding: Vec<u8> = row.get(5)?;
    let distance = cosine_distance(query_vector, &decode_embedding(&embedding));
    Ok(RetrievedChunk {
        chunk: ChunkRecord {
            id: row.get(0)?,
            doc_id: row.get(1)?,
            source: row.get(2)?,
            chunk_index: row.get(3)?,
            content: row.get(4)?,
        },
        distance,
    })
}
