//! PDF content extraction.
//!
//! Page parsing sits behind [`DocumentParser`] so the concatenation rules
//! can be exercised without real PDF fixtures.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{Category, ExtractedText, UploadedArtifact};
use crate::Extractor;

/// Parses a page-structured document into per-page text, in page order.
pub trait DocumentParser: Send + Sync {
    fn pages(&self, content: &[u8]) -> ExtractResult<Vec<String>>;
}

/// [`DocumentParser`] backed by the pdf-extract library.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractParser;

#[cfg(feature = "pdf")]
impl DocumentParser for PdfExtractParser {
    fn pages(&self, content: &[u8]) -> ExtractResult<Vec<String>> {
        pdf_extract::extract_text_from_mem_by_pages(content)
            .map_err(|e| ExtractError::DocumentParse(format!("Failed to parse PDF: {}", e)))
    }
}

/// Document extractor.
///
/// Runs the parser in spawn_blocking and joins page text in ascending
/// page order, without inserting separators.
#[derive(Clone)]
pub struct PdfExtractor {
    parser: Arc<dyn DocumentParser>,
}

impl PdfExtractor {
    /// Create a PDF extractor using pdf-extract.
    #[cfg(feature = "pdf")]
    pub fn new() -> Self {
        Self::with_parser(Arc::new(PdfExtractParser))
    }

    /// Create a PDF extractor with a custom page parser.
    pub fn with_parser(parser: Arc<dyn DocumentParser>) -> Self {
        Self { parser }
    }

    /// Extract the full text of a document.
    pub async fn extract_document_text(&self, content: &[u8]) -> ExtractResult<String> {
        let parser = Arc::clone(&self.parser);
        let content = content.to_vec();

        let pages = tokio::task::spawn_blocking(move || parser.pages(&content)).await??;
        debug!(page_count = pages.len(), "Parsed document pages");

        Ok(pages.concat())
    }
}

#[cfg(feature = "pdf")]
impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, artifact: &UploadedArtifact) -> ExtractResult<ExtractedText> {
        let text = self.extract_document_text(&artifact.bytes).await?;
        Ok(ExtractedText::new(&artifact.filename, Category::Document, text))
    }

    fn category(&self) -> Category {
        Category::Document
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<&'static str>);

    impl DocumentParser for FixedPages {
        fn pages(&self, _content: &[u8]) -> ExtractResult<Vec<String>> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    struct Corrupt;

    impl DocumentParser for Corrupt {
        fn pages(&self, _content: &[u8]) -> ExtractResult<Vec<String>> {
            Err(ExtractError::DocumentParse("invalid xref table".to_string()))
        }
    }

    #[tokio::test]
    async fn test_pages_concatenated_in_order() {
        let extractor = PdfExtractor::with_parser(Arc::new(FixedPages(vec![
            "Page one. ",
            "Page two. ",
            "Page three.",
        ])));

        let text = extractor.extract_document_text(b"%PDF-1.4").await.unwrap();
        assert_eq!(text, "Page one. Page two. Page three.");
    }

    #[tokio::test]
    async fn test_empty_document() {
        let extractor = PdfExtractor::with_parser(Arc::new(FixedPages(vec![])));
        let text = extractor.extract_document_text(b"%PDF-1.4").await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_parse_error_propagates() {
        let extractor = PdfExtractor::with_parser(Arc::new(Corrupt));
        let artifact = UploadedArtifact::new("broken.pdf", b"not a pdf".to_vec());

        let result = extractor.extract(&artifact).await;
        assert!(matches!(result, Err(ExtractError::DocumentParse(_))));
    }

    #[tokio::test]
    async fn test_extract_sets_category_and_source() {
        let extractor = PdfExtractor::with_parser(Arc::new(FixedPages(vec!["hello"])));
        let artifact = UploadedArtifact::new("doc.pdf", b"%PDF".to_vec());

        let result = extractor.extract(&artifact).await.unwrap();
        assert_eq!(result.category, Category::Document);
        assert_eq!(result.source, "doc.pdf");
        assert!(!result.is_degraded());
    }
}
