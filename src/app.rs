//! Application state and request-level operations.
//!
//! [`App`] is the explicit state object every operation goes through: the
//! vector store, the document registry, the chat sessions, and the live
//! model handle all hang off it. It is loaded once at startup and passed to
//! handlers; nothing here lives in module-level globals.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::client::{AVAILABLE_MODELS, GeminiClient, ModelHandle, validate_model_id};
use crate::error::AppError;
use crate::extract;
use crate::models::{
    ChatMessage, ChatSession, ChunkRecord, Config, DocumentRecord, SessionSummary,
};
use crate::services::{AnswerSynthesizer, Retriever, TextChunker, VectorStore, create_store};
use crate::storage::{DocumentRegistry, SessionStore};

/// Result of a successful document upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub document_id: String,
    pub filename: String,
    pub chunks_count: usize,
}

/// Available models and the currently active one.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsInfo {
    pub available_models: Vec<String>,
    pub current_model: String,
}

pub struct App {
    config: Config,
    store: Arc<dyn VectorStore>,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
    model: Arc<ModelHandle>,
    documents: DocumentRegistry,
    sessions: SessionStore,
    chunker: TextChunker,
}

impl App {
    /// Load application state from configuration: open the vector store,
    /// build the generative client, and read the persisted registries.
    pub async fn load(config: Config) -> Result<Self, AppError> {
        let mut store_config = config.vector_store.clone();
        if store_config.path.is_none() {
            store_config.path = Some(config.storage.index_file()?);
        }
        let store: Arc<dyn VectorStore> = Arc::from(create_store(&store_config).await?);

        validate_model_id(&config.generation.model)?;
        let client = GeminiClient::new(&config.generation.model, &config.generation)?;
        let model = Arc::new(ModelHandle::new(Arc::new(client)));

        Self::with_parts(config, store, model)
    }

    /// Assemble state from pre-built parts. Used by `load` and by tests
    /// that substitute an in-memory store or a stub model.
    pub fn with_parts(
        config: Config,
        store: Arc<dyn VectorStore>,
        model: Arc<ModelHandle>,
    ) -> Result<Self, AppError> {
        let documents = DocumentRegistry::load(config.storage.documents_file()?);
        let sessions = SessionStore::load(config.storage.sessions_file()?);
        let chunker = TextChunker::new(&config.chunking);
        let retriever = Retriever::new(store.clone());
        let synthesizer = AnswerSynthesizer::new(model.clone());

        Ok(Self {
            config,
            store,
            retriever,
            synthesizer,
            model,
            documents,
            sessions,
            chunker,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- Document ingestion ---

    /// Chunk `text`, ingest the chunks, and register the document.
    ///
    /// Chunks are trimmed before storage and whitespace-only chunks are
    /// dropped; indices stay contiguous from 0 over the kept chunks.
    pub async fn ingest_text(
        &mut self,
        name: &str,
        text: &str,
        stored_file: Option<PathBuf>,
    ) -> Result<UploadReport, AppError> {
        let doc_id = uuid::Uuid::new_v4().to_string();

        let chunks: Vec<ChunkRecord> = self
            .chunker
            .split(text)?
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .enumerate()
            .map(|(i, content)| ChunkRecord::new(&doc_id, content, name, i as u32))
            .collect::<Result<_, _>>()?;

        let chunks_count = chunks.len();
        self.store.ingest(chunks).await?;

        let mut document = DocumentRecord::new(name, chunks_count, stored_file);
        document.id = doc_id.clone();
        self.documents.add(document)?;

        info!(doc_id, name, chunks = chunks_count, "ingested document");
        Ok(UploadReport {
            document_id: doc_id,
            filename: name.to_string(),
            chunks_count,
        })
    }

    /// Upload a PDF: extract its text, ingest it, and keep a copy of the
    /// file in the uploads directory.
    pub async fn upload_pdf(&mut self, path: &Path) -> Result<UploadReport, AppError> {
        let filename = display_name(path);
        let text = extract::extract_text(path)?;
        let stored = self.stash_upload(path, &filename)?;
        self.ingest_text(&filename, &text, Some(stored)).await
    }

    /// Upload an image: OCR its text, then ingest like a PDF. An image
    /// with no detectable text is rejected before anything is stored.
    pub async fn upload_image(&mut self, path: &Path, lang: &str) -> Result<UploadReport, AppError> {
        let filename = display_name(path);
        let text = extract::ocr_image(path, lang).await;
        if text.is_empty() {
            return Err(AppError::InvalidRequest(format!(
                "no text could be extracted from {filename}"
            )));
        }
        let stored = self.stash_upload(path, &filename)?;
        self.ingest_text(&filename, &text, Some(stored)).await
    }

    /// Copy an uploaded file into the uploads directory under a unique
    /// name.
    fn stash_upload(&self, path: &Path, filename: &str) -> Result<PathBuf, AppError> {
        let uploads = self.config.storage.uploads_dir()?;
        std::fs::create_dir_all(&uploads)
            .map_err(|e| AppError::Storage(e.into()))?;
        let target = uploads.join(format!("{}_{filename}", uuid::Uuid::new_v4()));
        std::fs::copy(path, &target)
            .map_err(|e| AppError::Storage(e.into()))?;
        Ok(target)
    }

    // --- Documents ---

    pub fn documents(&self) -> Vec<DocumentRecord> {
        self.documents.list()
    }

    /// Delete a document: its chunks, its registry entry, and its stored
    /// file. Cleanup is best-effort per sub-resource; a failed half is
    /// logged and the rest proceeds, so callers get at-least-once rather
    /// than transactional semantics.
    pub async fn delete_document(&mut self, doc_id: &str) -> Result<DocumentRecord, AppError> {
        if self.documents.get(doc_id).is_none() {
            return Err(AppError::NotFound(format!("document {doc_id}")));
        }

        if let Err(e) = self.store.delete_document(doc_id).await {
            error!(doc_id, error = %e, "failed to delete chunks, continuing with cleanup");
        }

        let removed = self
            .documents
            .remove(doc_id)?
            .ok_or_else(|| AppError::NotFound(format!("document {doc_id}")))?;

        if let Some(ref file_path) = removed.file_path {
            if file_path.exists() {
                if let Err(e) = std::fs::remove_file(file_path) {
                    error!(doc_id, path = %file_path.display(), error = %e, "failed to delete stored file");
                }
            } else {
                warn!(doc_id, path = %file_path.display(), "stored file already gone");
            }
        }

        info!(doc_id, name = removed.name, "deleted document");
        Ok(removed)
    }

    // --- Sessions ---

    pub fn create_session(&mut self) -> Result<String, AppError> {
        Ok(self.sessions.create()?)
    }

    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions.list()
    }

    pub fn session(&self, session_id: &str) -> Result<&ChatSession, AppError> {
        self.sessions
            .get(session_id)
            .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))
    }

    pub fn rename_session(&mut self, session_id: &str, title: &str) -> Result<(), AppError> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidRequest("title must not be empty".to_string()));
        }
        if !self.sessions.rename(session_id, title)? {
            return Err(AppError::NotFound(format!("session {session_id}")));
        }
        Ok(())
    }

    pub fn delete_session(&mut self, session_id: &str) -> Result<(), AppError> {
        if !self.sessions.delete(session_id)? {
            return Err(AppError::NotFound(format!("session {session_id}")));
        }
        Ok(())
    }

    /// Plain-text transcript of a session.
    pub fn export_session(&self, session_id: &str) -> Result<String, AppError> {
        Ok(self.session(session_id)?.export_text())
    }

    // --- Chat ---

    /// Run one chat turn: record the user message, retrieve grounding
    /// chunks (optionally scoped to `doc_ids`), synthesize an answer, and
    /// record it. Empty retrieval produces a graceful low-confidence
    /// answer, never an error; a model failure propagates after the user
    /// message has already been persisted.
    pub async fn chat(
        &mut self,
        session_id: &str,
        message: &str,
        doc_ids: Option<Vec<String>>,
    ) -> Result<ChatMessage, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::InvalidRequest("message must not be empty".to_string()));
        }
        if !self.sessions.contains(session_id) {
            return Err(AppError::NotFound(format!("session {session_id}")));
        }

        self.sessions
            .append_message(session_id, ChatMessage::user(message))?;

        let chunks = self
            .retriever
            .retrieve(message, doc_ids.as_deref())
            .await?;
        let answer = self.synthesizer.synthesize(message, &chunks).await?;

        let reply = ChatMessage::assistant(answer);
        self.sessions.append_message(session_id, reply.clone())?;

        info!(
            session_id,
            confidence = %reply.confidence,
            sources = reply.sources.len(),
            "chat turn completed"
        );
        Ok(reply)
    }

    // --- Models ---

    pub async fn models(&self) -> ModelsInfo {
        ModelsInfo {
            available_models: AVAILABLE_MODELS.iter().map(|m| m.to_string()).collect(),
            current_model: self.model.current_model_id().await,
        }
    }

    /// Swap the live generative model. Builds the new client first and
    /// republishes the handle only on success; swapping to the already
    /// current model is a no-op. Returns whether anything changed.
    pub async fn set_model(&self, model_id: &str) -> Result<bool, AppError> {
        validate_model_id(model_id)?;
        if self.model.current_model_id().await == model_id {
            return Ok(false);
        }

        let client = GeminiClient::new(model_id, &self.config.generation)?;
        self.model.publish(Arc::new(client)).await;
        Ok(true)
    }

    // --- Admin ---

    /// Clear the vector index, the document registry, and all sessions.
    pub async fn clear_all(&mut self) -> Result<(), AppError> {
        self.store.clear().await?;
        self.documents.clear()?;
        self.sessions.clear()?;
        info!("cleared all document and chat data");
        Ok(())
    }

    /// Number of chunks currently in the vector index.
    pub async fn chunk_count(&self) -> Result<u64, AppError> {
        Ok(self.store.count().await?)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
