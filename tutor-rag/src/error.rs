//! Error types for the `tutor-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error (invalid tunables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search was invoked before any index was built.
    #[error("Index not built: ingest documents before searching")]
    IndexNotBuilt,

    /// An error from the external embedding service.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error in ingestion or retrieval orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
