//! Plain-text passthrough.

use async_trait::async_trait;

use crate::error::ExtractResult;
use crate::types::{Category, ExtractedText, UploadedArtifact};
use crate::Extractor;

/// Decodes plain-text artifacts as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for TextExtractor {
    async fn extract(&self, artifact: &UploadedArtifact) -> ExtractResult<ExtractedText> {
        let text = String::from_utf8(artifact.bytes.clone())?;
        Ok(ExtractedText::new(&artifact.filename, Category::PlainText, text))
    }

    fn category(&self) -> Category {
        Category::PlainText
    }

    fn name(&self) -> &str {
        "utf8-text"
    }
}
