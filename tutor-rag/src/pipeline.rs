//! Retrieval pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the ingest-and-retrieve workflow by
//! composing an [`EmbeddingProvider`], a [`Chunker`], and the session's
//! [`SessionContext`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tutor_rag::{RagPipeline, RagConfig, RecursiveChunker, SessionContext};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .chunker(Arc::new(RecursiveChunker::new(1000, 300)))
//!     .session(Arc::new(SessionContext::new()))
//!     .build()?;
//!
//! pipeline.ingest(&documents).await?;
//! let context = pipeline.retrieve("what is ownership?", true).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Chunk, Document};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::session::SessionContext;

/// The retrieval pipeline orchestrator.
///
/// Ingestion runs chunk → embed → index and atomically installs the result
/// into the session; retrieval runs embed → rank → (optionally) diversify
/// against the session's live index. Construct one via
/// [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunker: Arc<dyn Chunker>,
    session: Arc<SessionContext>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the session context.
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Ingest a document set: chunk every document, build a fresh index,
    /// and install it into the session.
    ///
    /// The new index fully replaces any prior one, but only after the build
    /// succeeds — a failed ingestion leaves the previously installed index
    /// live. Returns the number of chunks indexed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the embedding service fails;
    /// nothing is retried internally.
    pub async fn ingest(&self, documents: &[Document]) -> Result<usize> {
        let mut chunks: Vec<Chunk> = Vec::new();
        for document in documents {
            chunks.extend(self.chunker.chunk(document));
        }
        let chunk_count = chunks.len();

        let index =
            VectorIndex::build(self.embedding_provider.as_ref(), chunks).await.map_err(|e| {
                error!(error = %e, "ingestion failed; prior index (if any) left in place");
                e
            })?;

        self.session.install_index(index).await;
        info!(document_count = documents.len(), chunk_count, "ingestion complete");
        Ok(chunk_count)
    }

    /// Retrieve the chunks most relevant to `query` from the session index.
    ///
    /// Uses the configured `top_k`. With `diversify` the results are
    /// re-ranked for relevance and diversity rather than raw
    /// nearest-neighbor order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexNotBuilt`] if no ingestion has succeeded
    /// yet, or [`RagError::Embedding`] if embedding the query fails.
    pub async fn retrieve(&self, query: &str, diversify: bool) -> Result<Vec<Chunk>> {
        let index = self.session.index().await?;
        index.search(self.embedding_provider.as_ref(), query, self.config.top_k, diversify).await
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required. Call [`build()`](RagPipelineBuilder::build) to
/// validate and produce the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    chunker: Option<Arc<dyn Chunker>>,
    session: Option<Arc<SessionContext>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the session context that owns the live index.
    pub fn session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let session =
            self.session.ok_or_else(|| RagError::Config("session is required".to_string()))?;

        Ok(RagPipeline { config, embedding_provider, chunker, session })
    }
}
