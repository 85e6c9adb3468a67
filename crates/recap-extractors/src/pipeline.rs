//! Extraction pipeline routing artifacts to the extractor for their category.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::detect::detect;
use crate::error::{ExtractError, ExtractResult};
use crate::types::{Category, ExtractedText, UploadedArtifact};
use crate::Extractor;

/// Pipeline for extracting content using registered extractors.
///
/// Holds at most one extractor per [`Category`]; registering a second one
/// for the same category replaces the first.
#[derive(Clone, Default)]
pub struct ExtractionPipeline {
    extractors: HashMap<Category, Arc<dyn Extractor>>,
}

impl ExtractionPipeline {
    /// Create new empty pipeline.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Add an extractor to the pipeline.
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.register(extractor);
        self
    }

    /// Register an extractor, returning the one it replaced.
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) -> Option<Arc<dyn Extractor>> {
        self.extractors.insert(extractor.category(), extractor)
    }

    /// Detect the artifact's category from its filename and run the matching extractor.
    pub async fn extract(&self, artifact: &UploadedArtifact) -> ExtractResult<ExtractedText> {
        let category = detect(&artifact.filename)?;

        let extractor = self.extractors.get(&category).ok_or_else(|| {
            ExtractError::UnsupportedFormat(format!("no extractor registered for {category}"))
        })?;

        debug!(
            filename = %artifact.filename,
            category = %category,
            extractor = extractor.name(),
            bytes = artifact.bytes.len(),
            "Extracting artifact"
        );

        let extracted = extractor.extract(artifact).await?;
        if extracted.is_degraded() {
            warn!(
                filename = %artifact.filename,
                diagnostics = extracted.diagnostics.len(),
                "Extraction degraded"
            );
        }

        Ok(extracted)
    }

    /// Get the number of registered extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Check if the pipeline has no registered extractors.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextExtractor;
    use async_trait::async_trait;

    struct Labelled(Category, &'static str);

    #[async_trait]
    impl Extractor for Labelled {
        async fn extract(&self, artifact: &UploadedArtifact) -> ExtractResult<ExtractedText> {
            Ok(ExtractedText::new(&artifact.filename, self.0, self.1))
        }

        fn category(&self) -> Category {
            self.0
        }

        fn name(&self) -> &str {
            self.1
        }
    }

    #[test]
    fn test_pipeline_empty() {
        let pipeline = ExtractionPipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.len(), 0);
    }

    #[tokio::test]
    async fn test_routes_by_extension() {
        let pipeline = ExtractionPipeline::new()
            .with_extractor(Arc::new(Labelled(Category::Document, "doc")))
            .with_extractor(Arc::new(Labelled(Category::Image, "img")));

        let doc = pipeline
            .extract(&UploadedArtifact::new("Report.PDF", vec![]))
            .await
            .unwrap();
        assert_eq!(doc.text, "doc");

        let img = pipeline
            .extract(&UploadedArtifact::new("scan.jpeg", vec![]))
            .await
            .unwrap();
        assert_eq!(img.text, "img");
    }

    #[tokio::test]
    async fn test_register_replaces_same_category() {
        let mut pipeline = ExtractionPipeline::new();
        assert!(pipeline
            .register(Arc::new(Labelled(Category::Image, "first")))
            .is_none());
        assert!(pipeline
            .register(Arc::new(Labelled(Category::Image, "second")))
            .is_some());
        assert_eq!(pipeline.len(), 1);

        let result = pipeline
            .extract(&UploadedArtifact::new("a.png", vec![]))
            .await
            .unwrap();
        assert_eq!(result.text, "second");
    }

    #[tokio::test]
    async fn test_unknown_extension_fails() {
        let pipeline = ExtractionPipeline::new().with_extractor(Arc::new(TextExtractor::new()));
        let result = pipeline
            .extract(&UploadedArtifact::new("archive.zip", vec![1, 2]))
            .await;
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_unregistered_category_fails() {
        let pipeline = ExtractionPipeline::new().with_extractor(Arc::new(TextExtractor::new()));
        let result = pipeline
            .extract(&UploadedArtifact::new("clip.mp4", vec![0; 4]))
            .await;
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_text_roundtrip_through_pipeline() {
        let pipeline = ExtractionPipeline::new().with_extractor(Arc::new(TextExtractor::new()));
        let result = pipeline
            .extract(&UploadedArtifact::new("notes.md", b"# Title".to_vec()))
            .await
            .unwrap();
        assert_eq!(result.text, "# Title");
        assert_eq!(result.source, "notes.md");
    }
}
