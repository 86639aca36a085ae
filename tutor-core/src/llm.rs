//! Language-model trait for text generation.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LlmError;

/// A single completion request.
///
/// Carries one prompt and, optionally, a JSON Schema the provider should
/// constrain its output to. Providers are expected — not guaranteed — to
/// honor the schema; callers must still validate the returned text.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
/// use tutor_core::CompletionRequest;
///
/// let request = CompletionRequest::new("Summarize ownership in Rust")
///     .with_output_schema(json!({
///         "type": "object",
///         "properties": { "query": { "type": "string" } },
///         "required": ["query"]
///     }));
/// ```
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    prompt: String,
    output_schema: Option<Value>,
}

impl CompletionRequest {
    /// Create a request with the given prompt and no output constraint.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), output_schema: None }
    }

    /// Attach a JSON Schema constraining the expected output shape.
    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The output schema, if one was attached.
    pub fn output_schema(&self) -> Option<&Value> {
        self.output_schema.as_ref()
    }
}

/// A language model that produces text completions.
///
/// Implementations wrap specific generation backends behind a unified async
/// interface. A call either completes or fails with [`LlmError`]; there is no
/// cancellation mechanism and no internal retry.
#[async_trait]
pub trait Llm: Send + Sync {
    /// The model or deployment name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Generate a completion for the request, returning the raw text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}
