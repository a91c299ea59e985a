//! OpenAI-compatible embedding gateway and answer generator.
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::GatewayConfig;
use crate::embedding::EmbeddingGateway;
use crate::error::{RagError, Result};
use crate::tool::AnswerGenerator;

const PROVIDER: &str = "OpenAI";

/// The default chat model used to answer questions.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You answer questions using the provided context. Respond concisely.";

/// Returned when the chat completion contains no choice.
pub const NO_ANSWER: &str = "No answer generated";

/// An [`EmbeddingGateway`] backed by the `/embeddings` endpoint of an
/// OpenAI-compatible API.
///
/// Requests are sent once; failures are not retried.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{GatewayConfig, openai::OpenAIEmbeddingGateway};
///
/// let gateway = OpenAIEmbeddingGateway::new(GatewayConfig::from_env()?);
/// let vectors = gateway.embed("text-embedding-3-small", &["hello world"]).await?;
/// ```
pub struct OpenAIEmbeddingGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl OpenAIEmbeddingGateway {
    /// Create a gateway for the endpoint described by `config`.
    pub fn new(config: GatewayConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }

    /// Create a gateway that reuses an existing HTTP client.
    pub fn with_client(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// POST `body` as JSON and decode a successful response, mapping every
/// failure through `to_error`.
async fn post_json<B, R>(
    client: &reqwest::Client,
    config: &GatewayConfig,
    endpoint: &str,
    body: &B,
    to_error: impl Fn(String) -> RagError,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let url = format!("{}/{endpoint}", config.base_url());
    let response =
        client.post(&url).bearer_auth(config.api_key()).json(body).send().await.map_err(|e| {
            error!(provider = PROVIDER, endpoint, error = %e, "request failed");
            to_error(format!("request failed: {e}"))
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail =
            serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);

        error!(provider = PROVIDER, endpoint, %status, "API error");
        return Err(to_error(format!("API returned {status}: {detail}")));
    }

    response.json().await.map_err(|e| {
        error!(provider = PROVIDER, endpoint, error = %e, "failed to parse response");
        to_error(format!("failed to parse response: {e}"))
    })
}

#[async_trait]
impl EmbeddingGateway for OpenAIEmbeddingGateway {
    async fn embed(&self, model: &str, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = PROVIDER, batch_size = texts.len(), model, "embedding batch");

        let request = EmbeddingRequest { model, input: texts };
        let mut response: EmbeddingResponse =
            post_json(&self.client, &self.config, "embeddings", &request, |message| {
                RagError::EmbeddingError { provider: PROVIDER.into(), message }
            })
            .await?;

        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// An [`AnswerGenerator`] backed by the `/chat/completions` endpoint of an
/// OpenAI-compatible API.
pub struct OpenAIAnswerGenerator {
    client: reqwest::Client,
    config: GatewayConfig,
    model: String,
}

impl OpenAIAnswerGenerator {
    /// Create a generator using [`DEFAULT_CHAT_MODEL`].
    pub fn new(config: GatewayConfig) -> Self {
        Self { client: reqwest::Client::new(), config, model: DEFAULT_CHAT_MODEL.into() }
    }

    /// Set the chat model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl AnswerGenerator for OpenAIAnswerGenerator {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let user_message = format!("Context:\n{context}\n\nQuestion: {question}");
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &user_message },
            ],
        };

        debug!(
            provider = PROVIDER,
            model = %self.model,
            context_len = context.len(),
            "generating answer"
        );

        let response: ChatResponse =
            post_json(&self.client, &self.config, "chat/completions", &request, |message| {
                RagError::GenerationError { provider: PROVIDER.into(), message }
            })
            .await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}
