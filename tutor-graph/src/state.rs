//! Typed state threaded through the question-answering pipeline.

use serde::{Deserialize, Serialize};

use tutor_rag::Chunk;

/// A normalized search query derived from a free-form question.
///
/// Produced by the planning node from schema-constrained model output and
/// parsed explicitly — never trusted as already-typed. Exists only within
/// one pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredQuery {
    /// The canonical search string.
    pub query: String,
}

/// State record threaded through the pipeline nodes.
///
/// Populated incrementally: each node reads only fields guaranteed written
/// by its predecessors and writes only its own output field. A field is
/// never read before a prior node has written it.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    /// The user's original question, set at the start.
    pub question: String,
    /// Written by the planning node.
    pub query: Option<StructuredQuery>,
    /// Written by the retrieval node; ordered by relevance, not document order.
    pub context: Option<Vec<Chunk>>,
    /// Written by the generation node; present in the terminal state.
    pub answer: Option<String>,
}

impl PipelineState {
    /// Create the starting state for a question.
    pub fn new(question: impl Into<String>) -> Self {
        Self { question: question.into(), ..Self::default() }
    }

    /// The generated answer, if the pipeline reached its terminal state.
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }
}
