//! # RAG Document Example
//!
//! Demonstrates the retrieval pipeline: build a store from one document, then
//! query it and print the assembled context.
//!
//! Uses a deterministic `MockEmbeddingGateway` so it runs with **zero API keys**.
//!
//! Run: `cargo run -p docqa-demos --example rag_document [path]`
//! Set `RUST_LOG=debug` to see per-stage logging.

use std::path::PathBuf;
use std::sync::Arc;

use docqa_rag::{EmbeddingGateway, QueryOptions, RagConfig, RagPipeline, VectorStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// MockEmbeddingGateway: deterministic bag-of-letters embeddings
// ---------------------------------------------------------------------------

struct MockEmbeddingGateway;

#[async_trait::async_trait]
impl EmbeddingGateway for MockEmbeddingGateway {
    async fn embed(&self, _model: &str, texts: &[&str]) -> docqa_rag::Result<Vec<Vec<f32>>> {
        // Letter frequencies: texts sharing vocabulary point in similar directions.
        Ok(texts
            .iter()
            .map(|text| {
                let mut emb = vec![0.0f32; 26];
                for b in text.bytes().filter(u8::is_ascii_alphabetic) {
                    emb[(b.to_ascii_lowercase() - b'a') as usize] += 1.0;
                }
                emb
            })
            .collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

const HANDBOOK: &str = "\
Rust is a systems programming language focused on safety, speed, and concurrency. \
It achieves memory safety without a garbage collector through its ownership system.

Python is a high-level, interpreted programming language known for its readability \
and versatility. It is widely used in data science, web development, and automation.

Retrieval-Augmented Generation combines a retrieval system with a language model. \
Documents are chunked, embedded, and stored in a vector database. At query time the \
most relevant chunks are retrieved and fed to the model as context.
";

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // -- 1. Pick a document -----------------------------------------------
    // Without an argument, write the sample handbook to a temporary file.
    let path: PathBuf = match std::env::args().nth(1) {
        Some(path) => path.into(),
        None => {
            let path = std::env::temp_dir().join("docqa_handbook.txt");
            tokio::fs::write(&path, HANDBOOK).await?;
            path
        }
    };

    // -- 2. Build the pipeline --------------------------------------------
    // chunk_size=200 keeps chunks small for this demo; overlap=50 shares
    // context between adjacent chunks.
    let config = RagConfig::builder().chunk_size(200).chunk_overlap(50).top_k(2).build()?;
    let pipeline = RagPipeline::builder()
        .config(config)
        .gateway(Arc::new(MockEmbeddingGateway))
        .embedding_model("mock-letters")
        .build_from_document(&path)
        .await?;

    for warning in pipeline.warnings() {
        println!("warning: {warning}");
    }
    info!(chunks = pipeline.vector_store().len().await, "document indexed");

    // -- 3. Query the pipeline --------------------------------------------
    let questions = ["memory safety in programming", "data science language", "vector database"];

    for question in &questions {
        println!("\nQuestion: \"{question}\"");
        let outcome = pipeline.query(question).await?;
        if outcome.top_matches.is_empty() {
            println!("  (no results)");
        } else {
            println!("{}", outcome.context);
        }
    }

    // -- 4. Override top_k for a single query -----------------------------
    let best = pipeline.query_with("ownership", QueryOptions::default().top_k(1)).await?;
    println!("\nBest match for \"ownership\":\n{}", serde_json::to_string_pretty(&best)?);

    println!("\nDone.");
    Ok(())
}
