//! Deterministic text embedding.
//!
//! Embeds text with the feature-hashing trick: each lowercased token is
//! hashed into one of [`EMBEDDING_DIM`] buckets with a hash-derived sign,
//! and the resulting count vector is L2-normalized. SHA-256 keeps the
//! mapping stable across processes and platforms, unlike the std hasher's
//! per-process seed. Both store backends embed through this function at
//! ingest and query time; callers never supply vectors.

use sha2::{Digest, Sha256};

/// Fixed embedding dimension.
pub const EMBEDDING_DIM: usize = 384;

#[derive(Debug, Clone, Default)]
pub struct TextEmbedder;

impl TextEmbedder {
    pub fn new() -> Self {
        Self
    }

    /// Embed text into a fixed-length unit vector. Empty or tokenless text
    /// embeds to the zero vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; EMBEDDING_DIM];

        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let hash = u64::from_le_bytes(
                digest[..8]
                    .try_into()
                    .unwrap_or([0u8; 8]),
            );
            let bucket = (hash % EMBEDDING_DIM as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Cosine distance between two embeddings; smaller is closer. Zero vectors
/// are maximally distant from everything.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension() {
        let embedder = TextEmbedder::new();
        assert_eq!(embedder.embed("hello world").len(), EMBEDDING_DIM);
    }

    #[test]
    fn test_deterministic() {
        let embedder = TextEmbedder::new();
        assert_eq!(embedder.embed("cats are mammals"), embedder.embed("cats are mammals"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = TextEmbedder::new();
        assert!(embedder.embed("").iter().all(|v| *v == 0.0));
        assert!(embedder.embed("  \n  ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_normalized() {
        let embedder = TextEmbedder::new();
        let v = embedder.embed("the quick brown fox");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_insensitive() {
        let embedder = TextEmbedder::new();
        assert_eq!(embedder.embed("Mammals"), embedder.embed("mammals"));
    }

    #[test]
    fn test_shared_tokens_are_closer() {
        let embedder = TextEmbedder::new();
        let query = embedder.embed("mammals");
        let related = embedder.embed("cats are mammals");
        let unrelated = embedder.embed("open source software licensing");
        assert!(cosine_distance(&query, &related) < cosine_distance(&query, &unrelated));
    }

    #[test]
    fn test_cosine_distance_identity() {
        let embedder = TextEmbedder::new();
        let v = embedder.embed("identical text");
        assert!(cosine_distance(&v, &v).abs() < 1e-5);
    }
}
