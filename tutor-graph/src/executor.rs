//! Linear pipeline executor.
//!
//! The question-answering flow has exactly one valid topological order
//! (`analyze_query → retrieve → generate`), so it is expressed as a fixed
//! ordered sequence of typed transforms over [`PipelineState`] rather than
//! a general graph abstraction. No branching, no cycles, no conditional
//! edges.

use std::sync::Arc;

use tracing::{error, info};

use tutor_core::Llm;
use tutor_rag::RagPipeline;

use crate::error::Result;
use crate::nodes::{AnalyzeQuery, Generate, Node, Retrieve};
use crate::state::PipelineState;

/// The three-node question-answering pipeline.
///
/// Execution is synchronous and single-shot per invocation: the caller gets
/// either a complete terminal state with the answer populated, or the first
/// node error. The shared session index is the only state retained between
/// invocations.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tutor_graph::QaGraph;
///
/// let graph = QaGraph::new(llm, pipeline);
/// let state = graph.run("What is the borrow checker?").await?;
/// println!("{}", state.answer().unwrap_or("no answer"));
/// ```
pub struct QaGraph {
    nodes: Vec<Box<dyn Node>>,
}

impl QaGraph {
    /// Build the pipeline in its fixed order over the given model and
    /// retrieval pipeline.
    pub fn new(llm: Arc<dyn Llm>, pipeline: Arc<RagPipeline>) -> Self {
        Self {
            nodes: vec![
                Box::new(AnalyzeQuery::new(Arc::clone(&llm))),
                Box::new(Retrieve::new(pipeline)),
                Box::new(Generate::new(llm)),
            ],
        }
    }

    /// Execute the pipeline for one question.
    ///
    /// # Errors
    ///
    /// Propagates the first node failure as a stage-identifying
    /// [`GraphError`](crate::GraphError); no partial results are surfaced.
    pub async fn run(&self, question: impl Into<String>) -> Result<PipelineState> {
        let mut state = PipelineState::new(question);

        for node in &self.nodes {
            info!(node = node.name(), "running pipeline node");
            state = node.run(state).await.map_err(|e| {
                error!(node = node.name(), error = %e, "pipeline node failed");
                e
            })?;
        }

        Ok(state)
    }
}
