//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{VectorRecord, VectorSearchResult};
use crate::error::Result;

/// Number of results [`VectorStore::search`] callers ask for when they have
/// no preference of their own.
pub const DEFAULT_SEARCH_TOP_K: usize = 5;

/// A storage backend for vector embeddings with similarity search.
///
/// Records are keyed by [`VectorRecord::id`]. Upserting a record whose id is
/// already present replaces it in place; otherwise it is appended.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.upsert(records).await?;
/// let results = store.search(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace records by id.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()>;

    /// Return the `top_k` records most similar to `embedding`.
    ///
    /// Results are ordered by descending score; records with equal scores
    /// keep the store's order.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>>;

    /// Number of records currently held.
    async fn len(&self) -> usize;

    /// Whether the store holds no records.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
