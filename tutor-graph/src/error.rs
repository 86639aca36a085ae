//! Error types for the `tutor-graph` crate.

use thiserror::Error;

use tutor_rag::RagError;

/// Errors raised while executing the question-answering pipeline.
///
/// Each variant identifies the stage that failed, so a user can decide
/// whether to retry or change input. Failure of any node aborts the whole
/// execution; no partial results are surfaced.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The query-planning stage failed (generation service or parse).
    #[error("Query planning failed: {0}")]
    Planning(String),

    /// The retrieval stage failed.
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] RagError),

    /// The answer-generation stage failed.
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// A node read a state field no predecessor had written.
    #[error("Pipeline state missing '{0}': node executed out of order")]
    MissingState(&'static str),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, GraphError>;
