//! Error types for the document chat backend.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors related to chunking configuration and execution.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("invalid chunk size: {0} (must be greater than 0)")]
    InvalidChunkSize(usize),

    #[error("invalid overlap: {overlap} (must be less than chunk size {chunk_size})")]
    InvalidOverlap { overlap: usize, chunk_size: usize },
}

/// Errors related to text extraction from uploaded files.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    PdfError(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),
}

/// Errors related to vector store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to vector store: {0}")]
    ConnectionError(String),

    #[error("collection error: {0}")]
    CollectionError(String),

    #[error("ingest error: {0}")]
    IngestError(String),

    #[error("search error: {0}")]
    SearchError(String),

    #[error("delete error: {0}")]
    DeleteError(String),

    #[error("invalid chunk record: {0}")]
    InvalidChunk(String),
}

impl Retryable for VectorStoreError {
    fn is_retryable(&self) -> bool {
        match self {
            // Connection errors are always retryable
            VectorStoreError::ConnectionError(_) => true,
            // Write and read errors might be transient
            VectorStoreError::CollectionError(msg)
            | VectorStoreError::IngestError(msg)
            | VectorStoreError::SearchError(msg)
            | VectorStoreError::DeleteError(msg) => {
                let msg_lower = msg.to_lowercase();
                msg_lower.contains("timeout")
                    || msg_lower.contains("connection")
                    || msg_lower.contains("unavailable")
                    || msg_lower.contains("locked")
                    || msg_lower.contains("too many")
            }
            // Malformed records are never retryable
            VectorStoreError::InvalidChunk(_) => false,
        }
    }
}

/// Errors related to generative model calls.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model API key not configured: {0}")]
    MissingApiKey(String),

    #[error("model request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("model API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("invalid model response: {0}")]
    InvalidResponse(String),

    #[error("model request timed out")]
    Timeout,

    #[error("unknown model: {0}")]
    UnknownModel(String),
}

impl Retryable for GenerationError {
    fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Timeout => true,
            // Rate limits and server-side failures are transient
            GenerationError::ApiError { status, .. } => {
                matches!(status, 429 | 500 | 502 | 503 | 504)
            }
            GenerationError::RequestError(e) => e.is_timeout() || e.is_connect(),
            GenerationError::MissingApiKey(_)
            | GenerationError::InvalidResponse(_)
            | GenerationError::UnknownModel(_) => false,
        }
    }
}

/// Errors related to JSON-file persistence of documents and sessions.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("path error: {0}")]
    PathError(String),
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("chunking error: {0}")]
    Chunk(#[from] ChunkError),

    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_store_retryable() {
        assert!(VectorStoreError::ConnectionError("refused".into()).is_retryable());
        assert!(VectorStoreError::IngestError("database is locked".into()).is_retryable());
        assert!(!VectorStoreError::IngestError("constraint violation".into()).is_retryable());
        assert!(!VectorStoreError::InvalidChunk("empty content".into()).is_retryable());
    }

    #[test]
    fn test_generation_retryable() {
        assert!(
            GenerationError::ApiError {
                status: 429,
                message: "quota".into()
            }
            .is_retryable()
        );
        assert!(
            !GenerationError::ApiError {
                status: 400,
                message: "bad request".into()
            }
            .is_retryable()
        );
        assert!(GenerationError::Timeout.is_retryable());
        assert!(!GenerationError::UnknownModel("gpt-99".into()).is_retryable());
    }
}
