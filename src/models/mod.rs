mod answer;
mod chunk;
mod config;
mod document;
mod session;

pub use answer::{AnswerResult, Confidence, SOURCE_PREVIEW_CHARS, SourceRef};
pub use chunk::{ChunkRecord, RetrievedChunk};
pub use config::{
    ChunkingConfig, Config, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_COLLECTION,
    DEFAULT_MODEL, DEFAULT_QDRANT_URL, GenerationConfig, StorageConfig, VectorDriver,
    VectorStoreConfig,
};
pub use document::DocumentRecord;
pub use session::{ChatMessage, ChatSession, Role, SessionSummary, TITLE_PREVIEW_CHARS};
