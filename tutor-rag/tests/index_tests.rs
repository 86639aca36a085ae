//! Property and scenario tests for vector index search.

use std::collections::HashMap;

use proptest::prelude::*;
use tutor_rag::document::Chunk;
use tutor_rag::embedding::EmbeddingProvider;
use tutor_rag::index::VectorIndex;

/// Deterministic hash-based embedder: the same text always maps to the same
/// L2-normalized vector, so tests can recompute expected distances.
struct HashEmbedder {
    dimensions: usize,
}

fn hash_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let mut emb = vec![0.0f32; dimensions];
    for (i, v) in emb.iter_mut().enumerate() {
        *v = ((hash.wrapping_add(i as u64)) as f32).sin();
    }
    let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        emb.iter_mut().for_each(|x| *x /= norm);
    }
    emb
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> tutor_rag::Result<Vec<f32>> {
        Ok(hash_embedding(text, self.dimensions))
    }
}

/// Embedder with a fixed text → vector table, for geometry-controlled tests.
struct TableEmbedder {
    table: HashMap<&'static str, Vec<f32>>,
    fallback: Vec<f32>,
}

#[async_trait::async_trait]
impl EmbeddingProvider for TableEmbedder {
    async fn embed(&self, text: &str) -> tutor_rag::Result<Vec<f32>> {
        Ok(self.table.get(text).cloned().unwrap_or_else(|| self.fallback.clone()))
    }
}

fn chunk(id: &str, text: &str) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        start_offset: 0,
        document_id: "doc".to_string(),
    }
}

fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[tokio::test]
async fn single_chunk_corpus_always_returns_that_chunk() {
    let embedder = HashEmbedder { dimensions: 16 };
    let index = VectorIndex::build(&embedder, vec![chunk("only", "the lone chunk")]).await.unwrap();

    let results = index.search(&embedder, "anything at all", 1, false).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "only");
}

#[tokio::test]
async fn k_is_clamped_to_available_chunks() {
    let embedder = HashEmbedder { dimensions: 16 };
    let chunks = vec![chunk("a", "alpha text"), chunk("b", "beta text"), chunk("c", "gamma text")];
    let index = VectorIndex::build(&embedder, chunks).await.unwrap();

    // Requesting more than available returns all available chunks.
    let results = index.search(&embedder, "alpha", 10, false).await.unwrap();
    assert_eq!(results.len(), 3);

    // k = 0 is clamped up to 1.
    let results = index.search(&embedder, "alpha", 0, false).await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn empty_index_searches_to_empty_results() {
    let embedder = HashEmbedder { dimensions: 16 };
    let index = VectorIndex::build(&embedder, Vec::new()).await.unwrap();
    assert!(index.is_empty());

    let results = index.search(&embedder, "anything", 5, true).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn dimensionality_is_probed_from_the_service() {
    for dimensions in [8, 64, 384] {
        let embedder = HashEmbedder { dimensions };
        let index = VectorIndex::build(&embedder, vec![chunk("a", "text")]).await.unwrap();
        assert_eq!(index.dimensions(), dimensions);
    }
}

#[tokio::test]
async fn diversify_skips_near_duplicate_chunks() {
    let table = HashMap::from([
        ("query text", vec![1.0, 0.0]),
        ("dup one", vec![0.995, 0.0995]),
        ("dup two", vec![0.995, 0.0995]),
        ("contrast", vec![0.707, -0.707]),
    ]);
    let embedder = TableEmbedder { table, fallback: vec![0.0, 1.0] };

    let chunks =
        vec![chunk("d1", "dup one"), chunk("d2", "dup two"), chunk("c", "contrast")];
    let index = VectorIndex::build(&embedder, chunks).await.unwrap();

    // Raw nearest-neighbor order returns both duplicates.
    let raw = index.search(&embedder, "query text", 2, false).await.unwrap();
    let raw_ids: Vec<&str> = raw.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(raw_ids, ["d1", "d2"]);

    // MMR trades the second duplicate for the contrasting chunk.
    let diverse = index.search(&embedder, "query text", 2, true).await.unwrap();
    let diverse_ids: Vec<&str> = diverse.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(diverse_ids, ["d1", "c"]);
}

#[tokio::test]
async fn diversified_results_never_repeat_a_chunk() {
    let embedder = HashEmbedder { dimensions: 16 };
    let chunks: Vec<Chunk> =
        (0..12).map(|i| chunk(&format!("c{i}"), &format!("chunk number {i}"))).collect();
    let index = VectorIndex::build(&embedder, chunks).await.unwrap();

    let results = index.search(&embedder, "chunk number 3", 6, true).await.unwrap();
    assert_eq!(results.len(), 6);
    let mut ids: Vec<&str> = results.iter().map(|c| c.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For any corpus and query, non-diversified search returns at most `k`
    /// chunks ordered by ascending squared Euclidean distance to the query.
    #[test]
    fn results_ordered_by_ascending_distance_and_bounded_by_k(
        texts in proptest::collection::vec("[a-z ]{5,30}", 1..20),
        query in "[a-z ]{5,30}",
        k in 1usize..25,
    ) {
        const DIM: usize = 16;

        let rt = tokio::runtime::Runtime::new().unwrap();
        let results = rt.block_on(async {
            let embedder = HashEmbedder { dimensions: DIM };
            let chunks: Vec<Chunk> = texts
                .iter()
                .enumerate()
                .map(|(i, text)| chunk(&format!("c{i}"), text))
                .collect();
            let index = VectorIndex::build(&embedder, chunks).await.unwrap();
            index.search(&embedder, &query, k, false).await.unwrap()
        });

        prop_assert!(results.len() <= k);
        prop_assert!(results.len() <= texts.len());

        let query_embedding = hash_embedding(&query, DIM);
        let distances: Vec<f32> = results
            .iter()
            .map(|c| squared_euclidean(&query_embedding, &hash_embedding(&c.text, DIM)))
            .collect();
        for window in distances.windows(2) {
            prop_assert!(
                window[0] <= window[1],
                "results not in ascending distance order: {} > {}",
                window[0],
                window[1],
            );
        }
    }
}
