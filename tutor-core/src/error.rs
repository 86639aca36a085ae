//! Error type for the generation-service boundary.

use thiserror::Error;

/// An error from the external generation service.
///
/// Raised when a completion call fails or times out. Calls are not retried
/// internally; the interactive caller decides whether to re-invoke.
#[derive(Debug, Error)]
#[error("Generation error ({provider}): {message}")]
pub struct LlmError {
    /// The generation provider that produced the error.
    pub provider: String,
    /// A description of the failure.
    pub message: String,
}

impl LlmError {
    /// Create a new error for the given provider.
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self { provider: provider.into(), message: message.into() }
    }
}
