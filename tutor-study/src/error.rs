//! Error types for the `tutor-study` crate.

use thiserror::Error;

use tutor_core::LlmError;

/// Errors that can occur while generating or grading assessments.
#[derive(Debug, Error)]
pub enum StudyError {
    /// The generation service failed or timed out.
    #[error("Generation error: {0}")]
    Generation(#[from] LlmError),

    /// The generated quiz was unparseable or violated the quiz schema.
    ///
    /// Not retried automatically; the caller re-invokes the generation.
    #[error("Quiz format error: {0}")]
    QuizFormat(String),
}

/// A convenience result type for assessment operations.
pub type Result<T> = std::result::Result<T, StudyError>;
