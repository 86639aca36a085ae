//! Data types for documents and chunks.

use serde::{Deserialize, Serialize};

/// A source document containing extracted text.
///
/// Documents are transient: they are owned by the ingestion call and
/// discarded once chunking has produced their [`Chunk`]s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The extracted text content of the document.
    pub text: String,
    /// Optional URI pointing to the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

impl Document {
    /// Create a document with no source URI.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), source_uri: None }
    }
}

/// A bounded segment of a [`Document`], the unit of embedding and retrieval.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}` and are stable
/// for identical input text and chunking parameters. Chunks are immutable
/// once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// Byte offset of this chunk's text within the source document.
    pub start_offset: usize,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}
