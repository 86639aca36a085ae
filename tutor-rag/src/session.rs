//! Session-scoped ownership of the live vector index.
//!
//! A session owns at most one live [`VectorIndex`] at a time. Instead of
//! ambient shared state, the index lives in an explicit [`SessionContext`]
//! with install/clear lifecycle methods. [`install_index`] is only ever
//! called with a fully built index, so a failed rebuild leaves the previous
//! index usable.
//!
//! [`install_index`]: SessionContext::install_index

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Holds the session's live vector index, if one has been built.
#[derive(Debug, Default)]
pub struct SessionContext {
    index: RwLock<Option<Arc<VectorIndex>>>,
}

impl SessionContext {
    /// Create a session with no live index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live index with a fully built one.
    ///
    /// The prior index, if any, is dropped only after the new reference is
    /// in place.
    pub async fn install_index(&self, index: VectorIndex) {
        let chunk_count = index.len();
        *self.index.write().await = Some(Arc::new(index));
        info!(chunk_count, "installed session index");
    }

    /// Drop the live index, returning the session to its unbuilt state.
    pub async fn clear(&self) {
        *self.index.write().await = None;
        info!("cleared session index");
    }

    /// Whether a live index exists.
    pub async fn has_index(&self) -> bool {
        self.index.read().await.is_some()
    }

    /// The live index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexNotBuilt`] if no index has been installed.
    pub async fn index(&self) -> Result<Arc<VectorIndex>> {
        self.index.read().await.clone().ok_or(RagError::IndexNotBuilt)
    }
}
