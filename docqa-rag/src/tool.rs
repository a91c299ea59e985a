//! Question-answering tool built on the retrieval pipeline.
//!
//! The [`RagQaTool`] builds a [`RagPipeline`] from the document named in the
//! call arguments, retrieves context for the question and hands both to an
//! [`AnswerGenerator`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::{RagQaTool, Tool};
//!
//! let tool = RagQaTool::new(Arc::new(gateway), Arc::new(generator));
//!
//! // The caller invokes the tool with:
//! // { "question": "What is the refund window?",
//! //   "context": { "documentPath": "policy.pdf", "embeddingModel": "text-embedding-3-small" } }
//! let result = tool.execute(args).await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::config::RagConfig;
use crate::embedding::EmbeddingGateway;
use crate::error::{RagError, Result};
use crate::pipeline::RagPipeline;

const MIN_QUESTION_CHARS: usize = 3;

/// A named operation with a JSON argument schema, invoked with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name callers use to select the tool.
    fn name(&self) -> &str;

    /// A human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema describing the accepted arguments.
    fn parameters_schema(&self) -> Value;

    /// Run the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Turns a question and its retrieved context into a final answer.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Answer `question` using `context`.
    async fn answer(&self, question: &str, context: &str) -> Result<String>;
}

/// Document to retrieve from, as passed in tool arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RagQaContext {
    /// Path of the document to build the pipeline from.
    pub document_path: String,
    /// Embedding model for both the document and the question.
    pub embedding_model: String,
}

/// Arguments accepted by [`RagQaTool`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RagQaInput {
    /// The question to answer.
    pub question: String,
    /// The document to answer from.
    #[serde(default)]
    pub context: Option<RagQaContext>,
}

/// The result of a [`RagQaTool`] call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RagQaResult {
    /// The generated answer.
    pub answer: String,
    /// The ranked context the answer was generated from.
    pub context: String,
    /// The ranked chunk texts, best match first.
    pub citations: Vec<String>,
    /// Warnings produced while loading the document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Retrieval-augmented question answering over a single document.
///
/// Every call builds a fresh pipeline from the document in its arguments;
/// nothing is cached between calls.
pub struct RagQaTool {
    gateway: Arc<dyn EmbeddingGateway>,
    generator: Arc<dyn AnswerGenerator>,
    config: RagConfig,
}

impl RagQaTool {
    /// Create a tool with the default [`RagConfig`].
    pub fn new(gateway: Arc<dyn EmbeddingGateway>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self { gateway, generator, config: RagConfig::default() }
    }

    /// Use `config` for every pipeline this tool builds.
    pub fn with_config(mut self, config: RagConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the tool with already-parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ToolError`] for invalid arguments; pipeline and
    /// generator errors are propagated unchanged.
    pub async fn run(&self, input: RagQaInput) -> Result<RagQaResult> {
        if input.question.chars().count() < MIN_QUESTION_CHARS {
            return Err(RagError::ToolError(format!(
                "question must be at least {MIN_QUESTION_CHARS} characters"
            )));
        }
        let context = input.context.ok_or_else(|| {
            RagError::ToolError(
                "RAG QA tool requires a context with documentPath and embeddingModel".to_string(),
            )
        })?;

        info!(document = %context.document_path, "rag_qa tool called");

        let pipeline = RagPipeline::builder()
            .config(self.config.clone())
            .gateway(Arc::clone(&self.gateway))
            .embedding_model(&context.embedding_model)
            .build_from_document(&context.document_path)
            .await?;

        let outcome = pipeline.query(&input.question).await?;
        let answer = self.generator.answer(&input.question, &outcome.context).await?;

        Ok(RagQaResult {
            answer,
            context: outcome.context,
            citations: outcome.top_matches,
            warnings: pipeline.warnings().to_vec(),
        })
    }
}

#[async_trait]
impl Tool for RagQaTool {
    fn name(&self) -> &str {
        "rag_qa"
    }

    fn description(&self) -> &str {
        "Perform retrieval augmented generation over a prepared document set."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "minLength": MIN_QUESTION_CHARS,
                    "description": "The question to answer from the document"
                },
                "context": {
                    "type": "object",
                    "properties": {
                        "documentPath": {
                            "type": "string",
                            "description": "Path of the document to retrieve from"
                        },
                        "embeddingModel": {
                            "type": "string",
                            "description": "Embedding model used for the document and the question"
                        }
                    },
                    "required": ["documentPath", "embeddingModel"]
                }
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let input: RagQaInput = serde_json::from_value(args)
            .map_err(|e| RagError::ToolError(format!("invalid rag_qa arguments: {e}")))?;

        let result = self.run(input).await.map_err(|e| {
            error!(error = %e, "rag_qa failed");
            e
        })?;

        serde_json::to_value(&result).map_err(|e| {
            error!(error = %e, "failed to serialize rag_qa result");
            RagError::ToolError(format!("failed to serialize result: {e}"))
        })
    }
}
