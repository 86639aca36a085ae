//! In-memory vector index over chunk embeddings.
//!
//! A [`VectorIndex`] is built once per ingestion from a set of chunks and is
//! immutable afterwards; re-ingesting builds a fresh index rather than
//! updating this one. Search ranks by squared Euclidean distance, which is
//! equivalent to cosine ranking when the embedding service returns normalized
//! vectors, and optionally applies maximal-marginal-relevance re-ranking to
//! trade raw relevance against redundancy among the selected results.

use tracing::{debug, error, info};

use crate::document::Chunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Text used for the one-time dimensionality probe at build time.
const CALIBRATION_TEXT: &str = "dimension check";

/// Trade-off between relevance and diversity in MMR selection.
const MMR_LAMBDA: f32 = 0.5;

/// Candidate pool multiplier for MMR: re-rank the top `k * MMR_POOL_FACTOR`
/// nearest neighbors rather than the whole index.
const MMR_POOL_FACTOR: usize = 4;

/// A chunk embedding stored in the index.
#[derive(Debug, Clone)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// An immutable vector index over a set of chunks.
///
/// Built via [`VectorIndex::build`]; searched via [`VectorIndex::search`].
/// The index exists only once built, so "search before build" is
/// unrepresentable here — the session layer surfaces
/// [`RagError::IndexNotBuilt`] when no index is live.
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

impl VectorIndex {
    /// Build an index by embedding every chunk once.
    ///
    /// Dimensionality is discovered dynamically with a single calibration
    /// call before the batch, rather than hardcoded, because embedding
    /// models vary in output width. Every returned vector is checked
    /// against the probed width.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the embedding service fails or
    /// returns vectors of unexpected shape. The call is not retried; the
    /// caller may retry the whole ingestion.
    pub async fn build(provider: &dyn EmbeddingProvider, chunks: Vec<Chunk>) -> Result<Self> {
        let probe = provider.embed(CALIBRATION_TEXT).await?;
        let dimensions = probe.len();
        if dimensions == 0 {
            return Err(RagError::Embedding {
                provider: "calibration".into(),
                message: "embedding service returned a zero-width vector".into(),
            });
        }
        debug!(dimensions, "calibrated embedding dimensionality");

        if chunks.is_empty() {
            info!(chunk_count = 0, dimensions, "built empty vector index");
            return Ok(Self { entries: Vec::new(), dimensions });
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = provider.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            error!(
                expected = chunks.len(),
                received = embeddings.len(),
                "embedding count mismatch"
            );
            return Err(RagError::Embedding {
                provider: "batch".into(),
                message: format!(
                    "expected {} embeddings, received {}",
                    chunks.len(),
                    embeddings.len()
                ),
            });
        }

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                if embedding.len() != dimensions {
                    return Err(RagError::Embedding {
                        provider: "batch".into(),
                        message: format!(
                            "chunk '{}' embedded to width {}, expected {dimensions}",
                            chunk.id,
                            embedding.len()
                        ),
                    });
                }
                Ok(IndexEntry { chunk, embedding })
            })
            .collect::<Result<_>>()?;

        info!(chunk_count = entries.len(), dimensions, "built vector index");
        Ok(Self { entries, dimensions })
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimensionality discovered at build time.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Search for the `k` chunks most relevant to `query_text`.
    ///
    /// The query is embedded with the same provider used at build time.
    /// `k` is clamped to `[1, len()]`; requesting more than available
    /// returns all chunks rather than erroring. With `diversify` the result
    /// set is re-ranked by maximal marginal relevance instead of raw
    /// nearest-neighbor order. Result order reflects ranking, not document
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if embedding the query fails.
    pub async fn search(
        &self,
        provider: &dyn EmbeddingProvider,
        query_text: &str,
        k: usize,
        diversify: bool,
    ) -> Result<Vec<Chunk>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        let k = k.clamp(1, self.entries.len());

        let query = provider.embed(query_text).await?;

        // Rank all entries by squared Euclidean distance, ascending.
        let mut ranked: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, squared_euclidean(&query, &entry.embedding)))
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let selected = if diversify {
            let pool_size = (k * MMR_POOL_FACTOR).min(ranked.len());
            ranked.truncate(pool_size);
            self.mmr_select(&query, &ranked, k)
        } else {
            ranked.truncate(k);
            ranked.into_iter().map(|(i, _)| i).collect()
        };

        debug!(query_len = query_text.len(), k, diversify, results = selected.len(), "search");
        Ok(selected.into_iter().map(|i| self.entries[i].chunk.clone()).collect())
    }

    /// Greedy maximal-marginal-relevance selection over a candidate pool.
    ///
    /// Each round picks the candidate maximizing
    /// `λ·sim(query, c) − (1−λ)·max sim(c, selected)`, so the result set
    /// stays relevant while penalizing near-duplicates of chunks already
    /// chosen.
    fn mmr_select(&self, query: &[f32], pool: &[(usize, f32)], k: usize) -> Vec<usize> {
        let mut remaining: Vec<usize> = pool.iter().map(|(i, _)| *i).collect();
        let mut selected: Vec<usize> = Vec::with_capacity(k);

        while selected.len() < k && !remaining.is_empty() {
            let mut best_pos = 0;
            let mut best_score = f32::NEG_INFINITY;

            for (pos, &candidate) in remaining.iter().enumerate() {
                let relevance = cosine_similarity(query, &self.entries[candidate].embedding);
                let redundancy = selected
                    .iter()
                    .map(|&s| {
                        cosine_similarity(
                            &self.entries[candidate].embedding,
                            &self.entries[s].embedding,
                        )
                    })
                    .fold(f32::NEG_INFINITY, f32::max);
                let redundancy = if redundancy.is_finite() { redundancy } else { 0.0 };

                let score = MMR_LAMBDA * relevance - (1.0 - MMR_LAMBDA) * redundancy;
                if score > best_score {
                    best_score = score;
                    best_pos = pos;
                }
            }

            selected.push(remaining.swap_remove(best_pos));
        }

        selected
    }
}

/// Squared Euclidean distance between two vectors.
fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
