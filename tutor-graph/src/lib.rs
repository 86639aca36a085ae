//! Question-answering pipeline for the tutor study companion.
//!
//! A fixed three-stage flow over typed state: plan a search query from the
//! question, retrieve relevant chunks from the session index, generate a
//! grounded answer.

pub mod error;
pub mod executor;
pub mod nodes;
pub mod state;

pub use error::{GraphError, Result};
pub use executor::QaGraph;
pub use nodes::{AnalyzeQuery, Generate, Node, Retrieve};
pub use state::{PipelineState, StructuredQuery};
