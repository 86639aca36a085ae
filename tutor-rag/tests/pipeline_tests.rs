//! End-to-end ingestion and retrieval scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tutor_rag::document::Document;
use tutor_rag::embedding::EmbeddingProvider;
use tutor_rag::{RagConfig, RagError, RagPipeline, RecursiveChunker, SessionContext};

/// Deterministic hash-based embedder that can be switched into a failing
/// mode, for exercising the atomic index-replacement guarantee.
struct FlakyEmbedder {
    failing: AtomicBool,
}

impl FlakyEmbedder {
    fn new() -> Self {
        Self { failing: AtomicBool::new(false) }
    }

    fn fail_from_now_on(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, text: &str) -> tutor_rag::Result<Vec<f32>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RagError::Embedding {
                provider: "flaky".into(),
                message: "service unavailable".into(),
            });
        }
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; 16];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }
}

fn pipeline_with(embedder: Arc<FlakyEmbedder>, config: RagConfig) -> RagPipeline {
    let chunker = RecursiveChunker::new(config.chunk_size, config.chunk_overlap);
    RagPipeline::builder()
        .config(config)
        .embedding_provider(embedder)
        .chunker(Arc::new(chunker))
        .session(Arc::new(SessionContext::new()))
        .build()
        .unwrap()
}

fn three_paragraph_document() -> Document {
    let text = format!(
        "{}\n\n{}\n\n{}",
        "Ownership is Rust's most distinctive feature. ".repeat(4),
        "Borrowing lets code use values without taking ownership. ".repeat(4),
        "Lifetimes describe how long references remain valid. ".repeat(4),
    );
    Document::new("notes", text)
}

#[tokio::test]
async fn ingest_three_paragraphs_builds_an_index() {
    let embedder = Arc::new(FlakyEmbedder::new());
    let config = RagConfig::builder().chunk_size(1000).chunk_overlap(300).top_k(4).build().unwrap();
    let pipeline = pipeline_with(embedder, config);

    let chunk_count = pipeline.ingest(&[three_paragraph_document()]).await.unwrap();
    assert!(chunk_count >= 1);
    assert!(pipeline.session().has_index().await);
}

#[tokio::test]
async fn retrieve_before_ingest_reports_index_not_built() {
    let embedder = Arc::new(FlakyEmbedder::new());
    let pipeline = pipeline_with(embedder, RagConfig::default());

    let result = pipeline.retrieve("anything", false).await;
    assert!(matches!(result, Err(RagError::IndexNotBuilt)));
}

#[tokio::test]
async fn requesting_more_chunks_than_indexed_returns_all_of_them() {
    let embedder = Arc::new(FlakyEmbedder::new());
    // Three short paragraphs, each larger than half the chunk size, so the
    // chunker emits exactly one chunk per paragraph.
    let text = format!("{}\n\n{}\n\n{}", "a".repeat(80), "b".repeat(80), "c".repeat(80));
    let config = RagConfig::builder().chunk_size(100).chunk_overlap(20).top_k(10).build().unwrap();
    let pipeline = pipeline_with(embedder, config);

    let chunk_count = pipeline.ingest(&[Document::new("d", text)]).await.unwrap();
    assert_eq!(chunk_count, 3);

    let results = pipeline.retrieve("anything", false).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn failed_rebuild_leaves_prior_index_live() {
    let embedder = Arc::new(FlakyEmbedder::new());
    let pipeline = pipeline_with(Arc::clone(&embedder), RagConfig::default());

    pipeline.ingest(&[Document::new("first", "The original corpus text.")]).await.unwrap();
    assert!(pipeline.session().has_index().await);

    embedder.fail_from_now_on();
    let result = pipeline.ingest(&[Document::new("second", "Replacement corpus text.")]).await;
    assert!(matches!(result, Err(RagError::Embedding { .. })));

    // The old index survived the failed rebuild.
    let index = pipeline.session().index().await.unwrap();
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn reingest_replaces_the_prior_index() {
    let embedder = Arc::new(FlakyEmbedder::new());
    let pipeline = pipeline_with(embedder, RagConfig::default());

    pipeline.ingest(&[Document::new("first", "Old corpus.")]).await.unwrap();
    pipeline
        .ingest(&[
            Document::new("second", "New corpus, part one."),
            Document::new("third", "New corpus, part two."),
        ])
        .await
        .unwrap();

    let index = pipeline.session().index().await.unwrap();
    assert_eq!(index.len(), 2);

    let results = pipeline.retrieve("corpus", false).await.unwrap();
    assert!(results.iter().all(|c| c.document_id != "first"));
}
