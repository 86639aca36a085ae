//! Groq chat-completions client.
//!
//! Groq exposes an OpenAI-compatible API, so this client also works against
//! any other OpenAI-compatible endpoint via [`GroqClient::with_base_url`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use tutor_core::{CompletionRequest, Llm, LlmError};

/// The default Groq API base URL.
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// The default chat model.
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// An [`Llm`] backed by the Groq chat-completions API.
///
/// Uses `reqwest` to call the `/chat/completions` endpoint directly.
///
/// # Configuration
///
/// - `model` – defaults to `llama-3.1-8b-instant`.
/// - `base_url` – defaults to the Groq API; override for other
///   OpenAI-compatible services.
/// - `api_key` – from the constructor or the `GROQ_API_KEY` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use tutor_core::{CompletionRequest, Llm};
/// use tutor_model::GroqClient;
///
/// let client = GroqClient::from_env()?;
/// let answer = client.complete(CompletionRequest::new("What is a borrow checker?")).await?;
/// ```
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::new("Groq", "API key must not be empty"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: GROQ_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
        })
    }

    /// Create a new client using the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| LlmError::new("Groq", "GROQ_API_KEY environment variable not set"))?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `llama-3.3-70b-versatile`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL for OpenAI-compatible endpoints.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Chat-completions API request/response types ────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Restate the output schema inside the prompt.
///
/// JSON mode guarantees syntactically valid JSON but not any particular
/// shape, so the schema is spelled out for the model as well. Callers
/// validate the response regardless.
fn prompt_with_schema(prompt: &str, schema: &serde_json::Value) -> String {
    format!(
        "{prompt}\n\nRespond with a single JSON object that conforms to this JSON Schema, \
         with no surrounding prose:\n{schema}"
    )
}

// ── Llm implementation ─────────────────────────────────────────────

#[async_trait]
impl Llm for GroqClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        debug!(
            provider = "Groq",
            model = %self.model,
            prompt_len = request.prompt().len(),
            constrained = request.output_schema().is_some(),
            "chat completion"
        );

        let prompt;
        let (content, response_format) = match request.output_schema() {
            Some(schema) => {
                prompt = prompt_with_schema(request.prompt(), schema);
                (prompt.as_str(), Some(ResponseFormat { format_type: "json_object" }))
            }
            None => (request.prompt(), None),
        };

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content }],
            response_format,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Groq", error = %e, "request failed");
                LlmError::new("Groq", format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "Groq", %status, "API error");
            return Err(LlmError::new("Groq", format!("API returned {status}: {detail}")));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "Groq", error = %e, "failed to parse response");
            LlmError::new("Groq", format!("failed to parse response: {e}"))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::new("Groq", "API returned no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_api_key_is_rejected() {
        let result = GroqClient::new("");
        assert!(result.is_err());
    }

    #[test]
    fn schema_is_restated_in_prompt() {
        let schema = json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        });
        let prompt = prompt_with_schema("Find the main topic", &schema);
        assert!(prompt.starts_with("Find the main topic"));
        assert!(prompt.contains("\"query\""));
    }

    #[test]
    fn builder_overrides_model_and_base_url() {
        let client = GroqClient::new("key")
            .unwrap()
            .with_model("llama-3.3-70b-versatile")
            .with_base_url("http://localhost:8080/v1");
        assert_eq!(client.name(), "llama-3.3-70b-versatile");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }
}
