//! Document retrieval pipeline for grounded question answering.
//!
//! This crate provides:
//! - Document loading with a non-fatal fallback for unreadable PDFs
//! - Fixed-size, overlapping text chunking with character offsets
//! - An [`EmbeddingGateway`] seam for remote embedding models
//! - An in-memory [`VectorStore`] with upsert-by-id and cosine search
//! - [`RagPipeline`], which builds a store from a document and assembles
//!   ranked context for questions
//! - [`RagQaTool`], a JSON tool that answers questions over a document
//!
//! # Features
//!
//! - `pdf`: structured PDF text extraction via `lopdf`
//! - `openai`: [`openai::OpenAIEmbeddingGateway`] and
//!   [`openai::OpenAIAnswerGenerator`] over `reqwest`

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod loader;
pub mod pipeline;
pub mod tool;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;

pub use chunking::{Chunker, FixedSizeChunker, chunk_text};
pub use config::{GatewayConfig, RagConfig, RagConfigBuilder};
pub use document::{LoadedDocument, QueryOutcome, TextChunk, VectorRecord, VectorSearchResult};
pub use embedding::{EmbeddingGateway, EmbeddingInput, embed_records};
pub use error::{RagError, Result};
pub use inmemory::{InMemoryVectorStore, cosine_similarity};
pub use loader::{DocumentLoader, load_document};
pub use pipeline::{QueryOptions, RagPipeline, RagPipelineBuilder, format_context};
pub use tool::{AnswerGenerator, RagQaContext, RagQaInput, RagQaResult, RagQaTool, Tool};
pub use vectorstore::{DEFAULT_SEARCH_TOP_K, VectorStore};
