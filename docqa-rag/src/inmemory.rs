//! In-memory vector store using cosine similarity.
//!
//! This module provides [`InMemoryVectorStore`], a process-lifetime vector
//! store backed by an insertion-ordered `Vec` and an id index, protected by a
//! `tokio::sync::RwLock`. Nothing is persisted.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{VectorRecord, VectorSearchResult};
use crate::error::Result;
use crate::vectorstore::VectorStore;

#[derive(Debug, Default)]
struct Records {
    ordered: Vec<VectorRecord>,
    positions: HashMap<String, usize>,
}

/// An in-memory vector store using cosine similarity for search.
///
/// Records keep their insertion order; replacing a record keeps its original
/// position, which makes tie ordering in [`search`](VectorStore::search)
/// deterministic.
///
/// Each `upsert` and `search` call is atomic. Pipelines that share one store
/// and need a consistent view across several calls must serialize those
/// calls themselves.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.upsert(records).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: RwLock<Records>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the record stored under `id`.
    pub async fn get(&self, id: &str) -> Option<VectorRecord> {
        let records = self.records.read().await;
        records.positions.get(id).map(|&pos| records.ordered[pos].clone())
    }

    /// Return a snapshot of all records in store order.
    pub async fn records(&self) -> Vec<VectorRecord> {
        self.records.read().await.ordered.clone()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Only the shared prefix of the two vectors is compared. Sums are kept in
/// `f64`, so any finite `f32` input yields a score in `[-1, 1]`. Returns 0.0
/// if either prefix has zero magnitude or a component is not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        debug!(left = a.len(), right = b.len(), "comparing embeddings of different lengths");
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !score.is_finite() {
        debug!("non-finite similarity score; treating as 0.0");
        return 0.0;
    }
    score.clamp(-1.0, 1.0) as f32
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()> {
        let mut store = self.records.write().await;
        for record in records {
            let existing = store.positions.get(&record.id).copied();
            match existing {
                Some(pos) => store.ordered[pos] = record,
                None => {
                    let pos = store.ordered.len();
                    store.positions.insert(record.id.clone(), pos);
                    store.ordered.push(record);
                }
            }
        }
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
        let store = self.records.read().await;

        let mut scored: Vec<(usize, f32)> = store
            .ordered
            .iter()
            .enumerate()
            .map(|(pos, record)| (pos, cosine_similarity(embedding, &record.embedding)))
            .collect();

        // Scores are always finite; `sort_by` is stable, so equal scores keep store order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(pos, score)| VectorSearchResult { record: store.ordered[pos].clone(), score })
            .collect())
    }

    async fn len(&self) -> usize {
        self.records.read().await.ordered.len()
    }
}
