//! Document text extraction at the CLI boundary.
//!
//! Extraction is best-effort: PDF pages yielding no text are skipped
//! silently rather than erroring the whole extraction. Non-PDF files are
//! read as UTF-8 text.

use std::path::Path;

use anyhow::Context;
use tracing::info;

/// Extract the text content of a document file.
///
/// `.pdf` files go through `pdf-extract`; everything else is read as UTF-8.
pub fn extract_text(path: &Path) -> anyhow::Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        pdf_extract::extract_text(path)
            .with_context(|| format!("failed to extract text from {}", path.display()))?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    info!(path = %path.display(), chars = text.len(), "extracted document text");
    Ok(text)
}

/// Derive a document ID from a file path.
pub fn document_id(path: &Path) -> String {
    path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("document").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_uses_the_file_stem() {
        assert_eq!(document_id(Path::new("notes/chapter1.pdf")), "chapter1");
        assert_eq!(document_id(Path::new("README.md")), "README");
    }
}
