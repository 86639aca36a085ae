//! Retrieval pipeline for the tutor study companion.
//!
//! Covers the build phase (chunk documents, embed chunks, build the session
//! vector index) and the retrieval phase (embed a query, rank by distance,
//! optionally diversify the result set). External services are consumed
//! through the [`EmbeddingProvider`] trait; [`HuggingFaceEmbeddingProvider`]
//! is the bundled implementation.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod huggingface;
pub mod index;
pub mod pipeline;
pub mod session;

pub use chunking::{Chunker, FixedSizeChunker, RecursiveChunker};
pub use config::RagConfig;
pub use document::{Chunk, Document};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use huggingface::HuggingFaceEmbeddingProvider;
pub use index::VectorIndex;
pub use pipeline::RagPipeline;
pub use session::SessionContext;
