//! Embedding gateway trait for turning text batches into vectors.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use crate::document::VectorRecord;
use crate::error::{RagError, Result};

/// A remote service that converts text into embedding vectors.
///
/// Implementations return exactly one vector per input text, in input order.
/// Any transport failure or non-success response is returned as
/// [`RagError::EmbeddingError`]; the pipeline never retries, so retry policy
/// (if any) belongs to the implementation.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::EmbeddingGateway;
///
/// let vectors = gateway.embed("text-embedding-3-small", &["hello", "world"]).await?;
/// assert_eq!(vectors.len(), 2);
/// ```
#[async_trait]
pub trait EmbeddingGateway: Send + Sync {
    /// Embed a batch of texts with the given model.
    async fn embed(&self, model: &str, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// A short name identifying the backend in logs and errors.
    fn name(&self) -> &str;
}

/// A text waiting to be embedded, with the identity and metadata its
/// [`VectorRecord`] will carry.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingInput {
    /// Identifier for the resulting record.
    pub id: String,
    /// The text to embed.
    pub text: String,
    /// Metadata copied onto the resulting record.
    pub metadata: HashMap<String, Value>,
}

impl EmbeddingInput {
    /// Create an input without metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new() }
    }

    /// Attach metadata to the input.
    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Embed `inputs` in one gateway call and join the vectors back by position.
///
/// An empty batch performs no call and yields no records.
///
/// # Errors
///
/// Propagates gateway failures unchanged, and returns
/// [`RagError::EmbeddingError`] if the gateway returned a different number of
/// vectors than it was given texts.
pub async fn embed_records(
    gateway: &dyn EmbeddingGateway,
    model: &str,
    inputs: Vec<EmbeddingInput>,
) -> Result<Vec<VectorRecord>> {
    if inputs.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<&str> = inputs.iter().map(|input| input.text.as_str()).collect();
    debug!(gateway = gateway.name(), model, batch_size = texts.len(), "embedding batch");
    let embeddings = gateway.embed(model, &texts).await?;

    if embeddings.len() != inputs.len() {
        error!(
            gateway = gateway.name(),
            expected = inputs.len(),
            received = embeddings.len(),
            "embedding count mismatch"
        );
        return Err(RagError::EmbeddingError {
            provider: gateway.name().to_string(),
            message: format!(
                "expected {} embeddings, received {}",
                inputs.len(),
                embeddings.len()
            ),
        });
    }

    Ok(inputs
        .into_iter()
        .zip(embeddings)
        .map(|(input, embedding)| VectorRecord {
            id: input.id,
            embedding,
            text: input.text,
            metadata: input.metadata,
        })
        .collect())
}
