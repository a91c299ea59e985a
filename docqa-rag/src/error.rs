//! Error types for the `docqa-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in retrieval pipeline operations.
///
/// Every variant is fatal for the build or query call that produced it.
/// Degraded PDF extraction is not an error; it is reported through
/// [`LoadedDocument::warnings`](crate::document::LoadedDocument::warnings).
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid configuration, rejected before any I/O takes place.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading the source document failed.
    #[error("Failed to read document '{}': {source}", path.display())]
    IoError {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The embedding gateway failed or returned a malformed response.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding gateway that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An internal retrieval invariant was violated.
    #[error("Retrieval error: {0}")]
    RetrievalError(String),

    /// A tool was invoked with invalid arguments.
    #[error("Tool error: {0}")]
    ToolError(String),

    /// The answer generator failed.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
