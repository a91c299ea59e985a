//! Text chunking.
//!
//! This module provides the [`Chunker`] trait and [`FixedSizeChunker`], which
//! splits text into fixed-size, overlapping character windows.

use crate::config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, RagConfig};
use crate::document::TextChunk;
use crate::error::{RagError, Result};

/// A strategy for splitting text into chunks.
pub trait Chunker: Send + Sync {
    /// Split `text` into ordered chunks.
    ///
    /// Returns an empty `Vec` if the text is empty. No returned chunk has
    /// empty trimmed text.
    fn chunk(&self, text: &str) -> Vec<TextChunk>;
}

/// Splits text into fixed-size windows by character count with configurable overlap.
///
/// Window `i` starts at `i * (chunk_size - chunk_overlap)`, so consecutive
/// windows share exactly `chunk_overlap` characters. When the overlap is not
/// smaller than the chunk size the cursor advances by one character.
///
/// Chunk IDs are generated as `chunk-{window_index}`. Windows whose text is
/// pure whitespace are dropped after windowing, so IDs may skip numbers.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(700, 100)?;
/// let chunks = chunker.chunk(&text);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, chunk_overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: maximum number of characters per chunk
    /// * `chunk_overlap`: number of overlapping characters between consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size` is zero.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Create a chunker using the chunking parameters of `config`.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// The maximum number of characters per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The number of characters shared by consecutive chunks.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap).max(1)
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, text: &str) -> Vec<TextChunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte position of every character boundary, including the end of the text.
        let boundaries: Vec<usize> =
            text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let char_count = boundaries.len() - 1;
        let step = self.step();

        let mut chunks = Vec::new();
        let mut cursor = 0;
        let mut window_index = 0;

        while cursor < char_count {
            let end = cursor.saturating_add(self.chunk_size).min(char_count);
            let window = &text[boundaries[cursor]..boundaries[end]];

            chunks.push(TextChunk {
                id: format!("chunk-{window_index}"),
                text: window.trim().to_string(),
                start_index: cursor,
                end_index: end,
            });

            window_index += 1;
            cursor = cursor.saturating_add(step);
        }

        chunks.retain(|chunk| !chunk.text.is_empty());
        chunks
    }
}

/// Chunk `text` with a one-off [`FixedSizeChunker`].
///
/// # Errors
///
/// Returns [`RagError::ConfigError`] if `chunk_size` is zero.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<TextChunk>> {
    Ok(FixedSizeChunker::new(chunk_size, chunk_overlap)?.chunk(text))
}
