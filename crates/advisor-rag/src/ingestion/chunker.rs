//! Overlapping text chunking for document ingestion

use crate::config::ChunkingConfig;

/// Splits text into fixed-size character windows with overlap between
/// consecutive chunks so sentences cut at a boundary stay retrievable.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a chunker from the configured size and overlap
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size.max(1),
            chunk_overlap: config.chunk_overlap.min(config.chunk_size.saturating_sub(1)),
        }
    }

    /// Chunk a document; blank input yields no chunks
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();

        if text.trim().is_empty() {
            return Vec::new();
        }

        if chars.len() <= self.chunk_size {
            return vec![text.trim().to_string()];
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            let piece = piece.trim();
            if !piece.is_empty() {
                chunks.push(piece.to_string());
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}
