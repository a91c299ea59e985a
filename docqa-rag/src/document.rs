//! Data types for loaded documents, chunks, vector records and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The decoded text of a source document plus any non-fatal load warnings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LoadedDocument {
    /// The decoded document text.
    pub text: String,
    /// Degradation notices produced while loading, in the order they occurred.
    pub warnings: Vec<String>,
}

/// A bounded, overlapping window of a source text.
///
/// `start_index` and `end_index` are character offsets of the untrimmed
/// window, so `0 <= start_index < end_index <= text.chars().count()` holds for
/// the source text, while [`text`](TextChunk::text) is the trimmed content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextChunk {
    /// Identifier derived from emission order (`chunk-0`, `chunk-1`, ...).
    pub id: String,
    /// The window's text with leading and trailing whitespace removed.
    pub text: String,
    /// Offset of the first character of the window.
    pub start_index: usize,
    /// Offset one past the last character of the window.
    pub end_index: usize,
}

/// An embedding stored in a [`VectorStore`](crate::vectorstore::VectorStore).
///
/// `id` is the store's primary key and the join key with the originating
/// [`TextChunk`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    /// Unique identifier within a store.
    pub id: String,
    /// The vector embedding for [`text`](VectorRecord::text).
    pub embedding: Vec<f32>,
    /// The text the embedding was computed from.
    pub text: String,
    /// Arbitrary metadata, e.g. chunk offsets and the source path.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// A [`VectorRecord`] paired with its similarity to a query vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorSearchResult {
    /// The matched record.
    #[serde(flatten)]
    pub record: VectorRecord,
    /// Cosine similarity in `[-1, 1]`; `0` when either vector has zero magnitude.
    pub score: f32,
}

/// The assembled answer context for a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QueryOutcome {
    /// Ranked results formatted as `#<rank> (score=<score>):\n<text>` blocks.
    pub context: String,
    /// Ranked result texts, in the same order as `context`.
    pub top_matches: Vec<String>,
}
