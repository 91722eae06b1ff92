mod chunker;
mod embedder;
mod retriever;
mod synthesizer;
pub mod vector_store;

pub use chunker::{TextChunker, split_text};
pub use embedder::{EMBEDDING_DIM, TextEmbedder, cosine_distance};
pub use retriever::{DEFAULT_TOP_K, MAX_TOP_K, Retriever, dynamic_top_k};
pub use synthesizer::{AnswerSynthesizer, NO_CONTEXT_ANSWER};
pub use vector_store::{QdrantStore, SqliteStore, VectorStore, create_store};
