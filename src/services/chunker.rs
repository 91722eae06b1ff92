//! Sliding-window text chunking with overlap.

use crate::error::ChunkError;
use crate::models::ChunkingConfig;

/// Splits extracted document text into overlapping fixed-size windows.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            overlap: config.overlap,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&ChunkingConfig::default())
    }

    /// Split `text` into overlapping chunks of `chunk_size` characters.
    ///
    /// Emits full windows advancing by `chunk_size - overlap`, then one
    /// final chunk covering whatever the last window left uncovered. The
    /// step is always positive, so progress is guaranteed for any valid
    /// overlap. Pure function of its inputs.
    pub fn split(&self, text: &str) -> Result<Vec<String>, ChunkError> {
        split_text(text, self.chunk_size, self.overlap)
    }
}

/// Split `text` into overlapping chunks.
///
/// Offsets are in characters, matching how chunk sizes are configured.
/// Chunks are not trimmed; whitespace handling is the caller's concern.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::InvalidChunkSize(chunk_size));
    }
    if overlap >= chunk_size {
        return Err(ChunkError::InvalidOverlap {
            overlap,
            chunk_size,
        });
    }

    if text.is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let step = chunk_size - overlap;

    let mut chunks = Vec::new();
    let mut start = 0;

    // Full windows while a complete chunk still fits strictly inside the
    // text; the remainder becomes the final chunk.
    while start + chunk_size < total {
        chunks.push(chars[start..start + chunk_size].iter().collect());
        start += step;
    }

    let covered = if chunks.is_empty() {
        0
    } else {
        // End of the last emitted window
        start - step + chunk_size
    };
    chunks.push(chars[covered..].iter().collect());

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(split_text("", 100, 10).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_chunk_size() {
        let err = split_text("abc", 0, 0).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidChunkSize(0)));
    }

    #[test]
    fn test_overlap_equal_to_chunk_size_rejected() {
        let err = split_text("abc", 10, 10).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidOverlap { .. }));
    }

    #[test]
    fn test_overlap_greater_than_chunk_size_rejected() {
        assert!(split_text("abc", 10, 15).is_err());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_text("hello", 100, 10).unwrap();
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn test_text_exactly_chunk_size() {
        let text = "a".repeat(100);
        let chunks = split_text(&text, 100, 10).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 100);
    }

    #[test]
    fn test_2500_chars_with_1000_150() {
        let text = "a".repeat(2500);
        let chunks = split_text(&text, 1000, 150).unwrap();
        let lengths: Vec<usize> = chunks.iter().map(String::len).collect();
        assert_eq!(lengths, vec![1000, 1000, 650]);
    }

    #[test]
    fn test_consecutive_chunks_share_overlap() {
        let text: String = (0..500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = split_text(&text, 100, 30).unwrap();
        for pair in chunks.windows(2) {
            // Final pair may share less
            if pair[1].len() == 100 {
                assert_eq!(&pair[0][100 - 30..], &pair[1][..30]);
            }
        }
    }

    #[test]
    fn test_full_coverage_no_gaps() {
        let text: String = (0..2317).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        for (chunk_size, overlap) in [(1000, 150), (100, 0), (64, 63), (7, 3)] {
            let chunks = split_text(&text, chunk_size, overlap).unwrap();
            let step = chunk_size - overlap;
            let mut rebuilt = String::new();
            for (i, chunk) in chunks.iter().enumerate() {
                if i + 2 < chunks.len() {
                    // Drop the part the next window repeats
                    rebuilt.extend(chunk.chars().take(step));
                } else {
                    // Last window and the tail are disjoint
                    rebuilt.push_str(chunk);
                }
            }
            assert_eq!(rebuilt, text, "chunk_size={chunk_size} overlap={overlap}");
        }
    }

    #[test]
    fn test_forward_progress_with_maximal_overlap() {
        // overlap = chunk_size - 1 is the worst case; must terminate
        let text = "b".repeat(300);
        let chunks = split_text(&text, 10, 9).unwrap();
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(60);
        let first = split_text(&text, 128, 32).unwrap();
        let second = split_text(&text, 128, 32).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_chunker_uses_config() {
        let chunker = TextChunker::new(&ChunkingConfig {
            chunk_size: 1000,
            overlap: 150,
        });
        let text = "c".repeat(2500);
        let chunks = chunker.split(&text).unwrap();
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_multibyte_text_counts_chars() {
        let text = "é".repeat(250);
        let chunks = split_text(&text, 100, 0).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 100);
        assert_eq!(chunks[2].chars().count(), 50);
    }
}
