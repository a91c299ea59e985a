//! Configuration for the retrieval pipeline and its remote collaborators.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RagError, Result};

/// Default maximum chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 700;

/// Default overlap in characters between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Default number of ranked matches assembled into a query context.
pub const DEFAULT_QUERY_TOP_K: usize = 3;

/// Default base URL of the OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration parameters for the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of ranked matches a query assembles into its context.
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_QUERY_TOP_K,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Check that the configuration can drive chunking and retrieval.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size == 0` or `top_k == 0`.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            warn!(
                chunk_size = self.chunk_size,
                chunk_overlap = self.chunk_overlap,
                "chunk_overlap is not smaller than chunk_size; chunks advance one character at a time"
            );
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of ranked matches a query returns.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_size == 0`
    /// - `top_k == 0`
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Connection settings for an OpenAI-compatible API.
///
/// Constructed once and passed by value to the gateways that need it;
/// nothing in this crate reads the process environment implicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a configuration for the default OpenAI endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::ConfigError("API key must not be empty".to_string()));
        }
        Ok(Self { api_key, base_url: DEFAULT_BASE_URL.to_string() })
    }

    /// Point the configuration at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read `OPENAI_API_KEY` and `OPENAI_BASE_URL` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `OPENAI_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](GatewayConfig::from_env), resolving keys through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty()).ok_or_else(|| {
            RagError::ConfigError("Missing required environment variable: OPENAI_API_KEY".into())
        })?;
        let config = Self::new(api_key)?;
        Ok(match lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            Some(base_url) => config.with_base_url(base_url),
            None => config,
        })
    }

    /// The bearer token sent with each request.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 700);
        assert_eq!(config.chunk_overlap, 100);
        assert_eq!(config.top_k, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_rejects_zero_chunk_size() {
        let err = RagConfig::builder().chunk_size(0).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }

    #[test]
    fn builder_rejects_zero_top_k() {
        let err = RagConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }

    #[test]
    fn builder_accepts_overlap_not_smaller_than_size() {
        let config = RagConfig::builder().chunk_size(10).chunk_overlap(10).build().unwrap();
        assert_eq!(config.chunk_overlap, 10);
    }

    #[test]
    fn gateway_config_from_lookup_reads_both_keys() {
        let env = HashMap::from([
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
        ]);
        let config =
            GatewayConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_key(), "sk-test");
        assert_eq!(config.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn gateway_config_defaults_base_url() {
        let config = GatewayConfig::from_lookup(|key| {
            (key == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn gateway_config_requires_api_key() {
        let err = GatewayConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert!(GatewayConfig::new("  ").is_err());
    }

    #[test]
    fn gateway_config_debug_redacts_key() {
        let config = GatewayConfig::new("sk-secret").unwrap();
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
