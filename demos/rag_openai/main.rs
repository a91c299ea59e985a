//! # RAG QA over OpenAI
//!
//! Answers a question about a document with the `rag_qa` tool, using the
//! OpenAI embeddings and chat completions endpoints.
//!
//! Requires `OPENAI_API_KEY`; `OPENAI_BASE_URL` optionally points at another
//! OpenAI-compatible server.
//!
//! Run: `cargo run -p docqa-demos --example rag_openai --features openai -- <path> "<question>"`

use std::sync::Arc;

use anyhow::Context;
use docqa_rag::openai::{OpenAIAnswerGenerator, OpenAIEmbeddingGateway};
use docqa_rag::{GatewayConfig, RagQaTool, Tool};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: rag_openai <path> <question>")?;
    let question = args.next().context("usage: rag_openai <path> <question>")?;

    let config = GatewayConfig::from_env()?;
    let tool = RagQaTool::new(
        Arc::new(OpenAIEmbeddingGateway::new(config.clone())),
        Arc::new(OpenAIAnswerGenerator::new(config)),
    );

    let result = tool
        .execute(json!({
            "question": question,
            "context": { "documentPath": path, "embeddingModel": EMBEDDING_MODEL }
        }))
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
