//! The three pipeline nodes: plan the query, retrieve context, generate the
//! answer.
//!
//! Each node is a pure transform over [`PipelineState`]: it reads only
//! fields populated by its predecessors and writes only its own declared
//! output field, so nodes can be tested in isolation with synthetic state.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error};

use tutor_core::{CompletionRequest, Llm, json::strip_code_fence};
use tutor_rag::RagPipeline;

use crate::error::{GraphError, Result};
use crate::state::{PipelineState, StructuredQuery};

/// A single pipeline transform.
#[async_trait]
pub trait Node: Send + Sync {
    /// The node's name, used in logs and failure messages.
    fn name(&self) -> &str;

    /// Run the transform, returning the state with this node's output
    /// field populated.
    async fn run(&self, state: PipelineState) -> Result<PipelineState>;
}

/// Planning node: converts the free-form question into a [`StructuredQuery`].
///
/// Delegates to the generation service with an output schema of exactly one
/// string field, collapsing rephrasing and conversational framing into a
/// single canonical search string. The returned text is parsed explicitly;
/// service failure and parse failure are both planning-stage errors with no
/// local fallback.
pub struct AnalyzeQuery {
    llm: Arc<dyn Llm>,
}

impl AnalyzeQuery {
    /// Create the planning node over the given model.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }
}

/// Output schema for the planner: one required string field.
fn query_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "description": "Search query" }
        },
        "required": ["query"],
        "additionalProperties": false
    })
}

#[async_trait]
impl Node for AnalyzeQuery {
    fn name(&self) -> &str {
        "analyze_query"
    }

    async fn run(&self, mut state: PipelineState) -> Result<PipelineState> {
        let request =
            CompletionRequest::new(&state.question).with_output_schema(query_schema());

        let text = self.llm.complete(request).await.map_err(|e| {
            error!(error = %e, "query planning call failed");
            GraphError::Planning(e.to_string())
        })?;

        let query: StructuredQuery =
            serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
                error!(error = %e, "structured query parse failed");
                GraphError::Planning(format!("could not parse structured query: {e}"))
            })?;

        debug!(query = %query.query, "planned search query");
        state.query = Some(query);
        Ok(state)
    }
}

/// Retrieval node: executes the planned query against the session index.
///
/// Uses diversity re-ranking so heavily overlapping chunks do not crowd out
/// the context window.
pub struct Retrieve {
    pipeline: Arc<RagPipeline>,
}

impl Retrieve {
    /// Create the retrieval node over the given pipeline.
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Node for Retrieve {
    fn name(&self) -> &str {
        "retrieve"
    }

    async fn run(&self, mut state: PipelineState) -> Result<PipelineState> {
        let query = state.query.as_ref().ok_or(GraphError::MissingState("query"))?;

        let context = self.pipeline.retrieve(&query.query, true).await?;
        debug!(chunk_count = context.len(), "retrieved context");

        state.context = Some(context);
        Ok(state)
    }
}

/// Generation node: produces a grounded answer from the retrieved context.
///
/// The prompt instructs the model to decline rather than fabricate when the
/// context is insufficient. That is a prompt-level contract, not enforced by
/// the pipeline.
pub struct Generate {
    llm: Arc<dyn Llm>,
}

impl Generate {
    /// Create the generation node over the given model.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }
}

/// Render the grounded-answer prompt from context chunks and the question.
pub(crate) fn answer_prompt(context: &[tutor_rag::Chunk], question: &str) -> String {
    let context_text: Vec<&str> = context.iter().map(|c| c.text.as_str()).collect();
    format!(
        "Use the following pieces of context to answer the question at the end.\n\
         If you don't know the answer, say that you don't know. Do not make up answers.\n\n\
         {}\n\n\
         Question: {}\n\n\
         Helpful Answer:",
        context_text.join("\n\n"),
        question,
    )
}

#[async_trait]
impl Node for Generate {
    fn name(&self) -> &str {
        "generate"
    }

    async fn run(&self, mut state: PipelineState) -> Result<PipelineState> {
        let context = state.context.as_ref().ok_or(GraphError::MissingState("context"))?;

        let prompt = answer_prompt(context, &state.question);
        let answer = self.llm.complete(CompletionRequest::new(prompt)).await.map_err(|e| {
            error!(error = %e, "answer generation call failed");
            GraphError::Generation(e.to_string())
        })?;

        state.answer = Some(answer);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_rag::Chunk;

    fn chunk(text: &str) -> Chunk {
        Chunk { id: "c0".into(), text: text.into(), start_offset: 0, document_id: "d".into() }
    }

    #[test]
    fn answer_prompt_joins_context_with_blank_lines() {
        let prompt = answer_prompt(&[chunk("First passage."), chunk("Second passage.")], "Why?");
        assert!(prompt.contains("First passage.\n\nSecond passage."));
        assert!(prompt.contains("Question: Why?"));
        assert!(prompt.contains("say that you don't know"));
    }

    #[test]
    fn planner_schema_requires_exactly_the_query_field() {
        let schema = query_schema();
        assert_eq!(schema["required"], serde_json::json!(["query"]));
        assert_eq!(schema["additionalProperties"], serde_json::json!(false));
    }
}
