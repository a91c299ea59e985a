//! Retrieval pipeline orchestrator.
//!
//! A [`RagPipeline`] is built from a single document: the document is loaded,
//! chunked, embedded in one batched gateway call and upserted into a vector
//! store. Queries then embed the question, search the store and assemble the
//! ranked matches into a context string for a downstream generator.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{RagPipeline, RagConfig};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .gateway(Arc::new(my_gateway))
//!     .embedding_model("text-embedding-3-small")
//!     .build_from_document("handbook.txt")
//!     .await?;
//!
//! let outcome = pipeline.query("How do I reset my password?").await?;
//! println!("{}", outcome.context);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::RagConfig;
use crate::document::{QueryOutcome, VectorSearchResult};
use crate::embedding::{EmbeddingGateway, EmbeddingInput, embed_records};
use crate::error::{RagError, Result};
use crate::inmemory::InMemoryVectorStore;
use crate::loader::DocumentLoader;
use crate::vectorstore::VectorStore;

/// Per-query overrides for [`RagPipeline::query_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Number of ranked matches to return. Defaults to the pipeline's `top_k`.
    pub top_k: Option<usize>,
    /// Embedding model for the question. Defaults to the model the pipeline
    /// was built with.
    pub embedding_model: Option<String>,
}

impl QueryOptions {
    /// Override the number of ranked matches.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Override the embedding model used for the question.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }
}

/// A retrieval pipeline bound to a populated vector store.
///
/// Construct one via [`RagPipeline::builder()`] or
/// [`RagPipeline::from_document`]. Configuration is fixed at build time;
/// queries only read the store, so a pipeline can be shared behind an `Arc`.
pub struct RagPipeline {
    config: RagConfig,
    gateway: Arc<dyn EmbeddingGateway>,
    vector_store: Arc<dyn VectorStore>,
    embedding_model: String,
    source: PathBuf,
    warnings: Vec<String>,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .field("gateway", &self.gateway.name())
            .field("embedding_model", &self.embedding_model)
            .field("source", &self.source)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Build a pipeline from `path` with default configuration and a fresh
    /// in-memory store.
    ///
    /// # Errors
    ///
    /// See [`RagPipelineBuilder::build_from_document`].
    pub async fn from_document(
        path: impl AsRef<Path>,
        embedding_model: impl Into<String>,
        gateway: Arc<dyn EmbeddingGateway>,
    ) -> Result<Self> {
        Self::builder()
            .gateway(gateway)
            .embedding_model(embedding_model)
            .build_from_document(path)
            .await
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// The embedding model the document was embedded with.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// The path of the document this pipeline was built from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Non-fatal warnings produced while loading the document.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Answer-context retrieval with the configured `top_k` and model.
    ///
    /// # Errors
    ///
    /// See [`query_with`](RagPipeline::query_with).
    pub async fn query(&self, question: &str) -> Result<QueryOutcome> {
        self.query_with(question, QueryOptions::default()).await
    }

    /// Query the pipeline: embed the question → search → assemble context.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error unchanged if embedding fails, and
    /// [`RagError::RetrievalError`] if the gateway produced no vector for
    /// the question.
    pub async fn query_with(&self, question: &str, options: QueryOptions) -> Result<QueryOutcome> {
        let model = options.embedding_model.as_deref().unwrap_or(&self.embedding_model);
        let top_k = options.top_k.unwrap_or(self.config.top_k);

        // 1. Embed the question; the vector is transient and never stored
        let vectors = self.gateway.embed(model, &[question]).await.map_err(|e| {
            error!(model, error = %e, "embedding failed during query");
            e
        })?;
        let query_embedding = vectors.into_iter().next().ok_or_else(|| {
            error!(model, "embedding gateway returned no vector for the question");
            RagError::RetrievalError("failed to compute query embedding".to_string())
        })?;

        // 2. Search the vector store
        let results = self.vector_store.search(&query_embedding, top_k).await.map_err(|e| {
            error!(error = %e, "vector store search failed");
            e
        })?;

        // 3. Assemble the ranked context
        let outcome = QueryOutcome {
            context: format_context(&results),
            top_matches: results.into_iter().map(|r| r.record.text).collect(),
        };

        info!(result_count = outcome.top_matches.len(), top_k, "query completed");
        Ok(outcome)
    }
}

/// Format ranked results as `#<rank> (score=<score>):\n<text>` blocks
/// separated by blank lines, ranks starting at 1.
pub fn format_context(results: &[VectorSearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!("#{} (score={:.3}):\n{}", i + 1, result.score, result.record.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builder for constructing a [`RagPipeline`] from a document.
///
/// `gateway` and `embedding_model` are required. Without an explicit
/// `vector_store` a fresh [`InMemoryVectorStore`] is created; without an
/// explicit `chunker` a [`FixedSizeChunker`] is derived from the config.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = RagPipeline::builder()
///     .config(RagConfig::builder().chunk_size(400).chunk_overlap(50).build()?)
///     .gateway(Arc::new(gateway))
///     .embedding_model("text-embedding-3-small")
///     .vector_store(shared_store.clone())  // optional
///     .build_from_document("notes.md")
///     .await?;
/// ```
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    gateway: Option<Arc<dyn EmbeddingGateway>>,
    embedding_model: Option<String>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
    loader: DocumentLoader,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding gateway.
    pub fn gateway(mut self, gateway: Arc<dyn EmbeddingGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the embedding model identifier.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Upsert into an existing vector store instead of a fresh one.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Replace the chunker derived from the configuration.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the document loader.
    pub fn loader(mut self, loader: DocumentLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Load → chunk → embed → upsert the document at `path`.
    ///
    /// Configuration is validated before any I/O. The whole document is
    /// embedded before anything is upserted, so on failure the store is left
    /// as it was.
    ///
    /// # Errors
    ///
    /// - [`RagError::ConfigError`] if a required field is missing or the
    ///   configuration is invalid
    /// - [`RagError::IoError`] if the document cannot be read
    /// - the gateway's error, unchanged, if embedding fails
    pub async fn build_from_document(self, path: impl AsRef<Path>) -> Result<RagPipeline> {
        let path = path.as_ref();
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let gateway =
            self.gateway.ok_or_else(|| RagError::ConfigError("gateway is required".to_string()))?;
        let embedding_model = self
            .embedding_model
            .filter(|model| !model.trim().is_empty())
            .ok_or_else(|| RagError::ConfigError("embedding_model is required".to_string()))?;
        let chunker: Arc<dyn Chunker> = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(FixedSizeChunker::from_config(&config)?),
        };
        let vector_store: Arc<dyn VectorStore> = match self.vector_store {
            Some(store) => store,
            None => Arc::new(InMemoryVectorStore::new()),
        };

        // 1. Load the document
        let document = self.loader.load(path).await?;
        for warning in &document.warnings {
            warn!(path = %path.display(), warning = %warning, "document loaded with warning");
        }

        // 2. Chunk its text
        let chunks = chunker.chunk(&document.text);
        let source = path.to_string_lossy().into_owned();
        let inputs: Vec<EmbeddingInput> = chunks
            .into_iter()
            .map(|chunk| {
                let metadata = HashMap::from([
                    ("startIndex".to_string(), json!(chunk.start_index)),
                    ("endIndex".to_string(), json!(chunk.end_index)),
                    ("source".to_string(), Value::String(source.clone())),
                ]);
                EmbeddingInput::new(chunk.id, chunk.text).with_metadata(metadata)
            })
            .collect();

        // 3. Embed every chunk in one batch
        let records =
            embed_records(gateway.as_ref(), &embedding_model, inputs).await.map_err(|e| {
                error!(path = %path.display(), error = %e, "embedding failed during build");
                e
            })?;

        // 4. Upsert into the vector store
        let chunk_count = records.len();
        if chunk_count > 0 {
            vector_store.upsert(records).await.map_err(|e| {
                error!(path = %path.display(), error = %e, "upsert failed during build");
                e
            })?;
        }

        info!(
            path = %path.display(),
            chunk_count,
            model = %embedding_model,
            warnings = document.warnings.len(),
            "built pipeline from document"
        );

        Ok(RagPipeline {
            config,
            gateway,
            vector_store,
            embedding_model,
            source: path.to_path_buf(),
            warnings: document.warnings,
        })
    }
}
