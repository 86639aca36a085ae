//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] — splits by character count with configurable overlap
//! - [`RecursiveChunker`] — splits hierarchically by paragraphs, sentences,
//!   then words, falling back to hard character cuts
//!
//! Both are deterministic: identical input and parameters always yield
//! identical chunk boundaries.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s whose text is an exact substring of the
/// source document, recorded by `start_offset`.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// A contiguous byte range within the source text.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Step an index back to the nearest char boundary at or before it.
fn floor_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Step an index forward to the nearest char boundary at or after it.
fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Character-level split with overlap. Cut points snap to char boundaries.
fn hard_split(text: &str, span: Span, chunk_size: usize, chunk_overlap: usize) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = span.start;

    while start < span.end {
        let mut end = floor_boundary(text, (start + chunk_size).min(span.end));
        if end <= start {
            // A single char wider than chunk_size; emit it whole.
            end = ceil_boundary(text, start + 1).min(span.end);
        }
        spans.push(Span { start, end });
        if end == span.end {
            break;
        }
        let step = chunk_size.saturating_sub(chunk_overlap);
        if step == 0 {
            break;
        }
        start = ceil_boundary(text, start + step);
    }

    spans
}

/// Split a span at a separator, keeping the separator attached to the
/// preceding segment so that segments stay contiguous in the source text.
fn split_keeping_separator(text: &str, span: Span, separator: &str) -> Vec<Span> {
    let slice = &text[span.start..span.end];
    let mut spans = Vec::new();
    let mut start = 0;

    while let Some(pos) = slice[start..].find(separator) {
        let end = start + pos + separator.len();
        spans.push(Span { start: span.start + start, end: span.start + end });
        start = end;
    }

    if start < slice.len() {
        spans.push(Span { start: span.start + start, end: span.end });
    }

    spans
}

/// Split a span by a separator, then merge adjacent segments into spans that
/// respect `chunk_size`. A merged run that still exceeds `chunk_size` is
/// split further using the next-level separator.
fn split_and_merge(
    text: &str,
    span: Span,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<Span> {
    if span.len() <= chunk_size || separators.is_empty() {
        return hard_split(text, span, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining_separators = &separators[1..];
    let segments = split_keeping_separator(text, span, separator);

    let mut spans = Vec::new();
    let mut current: Option<Span> = None;

    for segment in segments {
        current = match current {
            None => Some(segment),
            // Segments are contiguous, so a merged run is one span.
            Some(cur) if segment.end - cur.start <= chunk_size => {
                Some(Span { start: cur.start, end: segment.end })
            }
            Some(cur) => {
                flush(text, cur, chunk_size, chunk_overlap, remaining_separators, &mut spans);
                Some(segment)
            }
        };
    }

    if let Some(cur) = current {
        flush(text, cur, chunk_size, chunk_overlap, remaining_separators, &mut spans);
    }

    spans
}

/// Emit a merged run, recursing to the next separator level if it is still
/// too large.
fn flush(
    text: &str,
    span: Span,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
    out: &mut Vec<Span>,
) {
    if span.len() > chunk_size {
        out.extend(split_and_merge(text, span, chunk_size, chunk_overlap, separators));
    } else {
        out.push(span);
    }
}

/// Materialize spans into chunks with `{document_id}_{index}` IDs.
fn spans_to_chunks(document: &Document, spans: Vec<Span>) -> Vec<Chunk> {
    spans
        .into_iter()
        .enumerate()
        .map(|(i, span)| Chunk {
            id: format!("{}_{i}", document.id),
            text: document.text[span.start..span.end].to_string(),
            start_offset: span.start,
            document_id: document.id.clone(),
        })
        .collect()
}

/// Splits text into fixed-size chunks by character count with configurable
/// overlap.
///
/// # Example
///
/// ```rust,ignore
/// use tutor_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(256, 50);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let full = Span { start: 0, end: document.text.len() };
        let spans = hard_split(&document.text, full, self.chunk_size, self.chunk_overlap);
        spans_to_chunks(document, spans)
    }
}

/// Splits text hierarchically: paragraphs → sentences → words.
///
/// First splits by paragraph separators (`\n\n`). If a paragraph exceeds
/// `chunk_size`, splits by sentence boundaries (`. `, `! `, `? `). If a
/// sentence still exceeds `chunk_size`, splits by word boundaries, then by
/// hard character cuts as the last resort. Overlap applies to hard cuts;
/// natural-boundary splits keep semantic units whole instead.
///
/// # Example
///
/// ```rust,ignore
/// use tutor_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 300);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let separators = ["\n\n", ". ", "! ", "? ", " "];
        let full = Span { start: 0, end: document.text.len() };
        let spans =
            split_and_merge(&document.text, full, self.chunk_size, self.chunk_overlap, &separators);
        spans_to_chunks(document, spans)
    }
}
