//! Core traits and types shared across the tutor workspace.
//!
//! This crate defines the generation-service boundary: the [`Llm`] trait that
//! provider crates implement and pipeline crates consume, plus the
//! [`LlmError`] type surfaced when a generation call fails.

pub mod error;
pub mod json;
pub mod llm;

pub use error::LlmError;
pub use llm::{CompletionRequest, Llm};
