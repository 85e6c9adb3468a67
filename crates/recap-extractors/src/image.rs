//! Image content extraction via OCR.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::types::{Category, DiagnosticKind, ExtractedText, ExtractionDiagnostic, UploadedArtifact};
use crate::Extractor;

/// Placeholder returned when OCR finds no text.
pub const NO_TEXT_FOUND: &str = "No text could be extracted from the image";

/// Optical character recognition over encoded image bytes.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in the image. May return an empty string.
    async fn recognize(&self, content: &[u8]) -> ExtractResult<String>;

    fn name(&self) -> &str;
}

/// [`OcrEngine`] backed by the Tesseract CLI.
///
/// The image is decoded and converted to grayscale first, so undecodable
/// input fails before Tesseract is ever started.
#[cfg(feature = "ocr")]
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: std::path::PathBuf,
    language: String,
}

#[cfg(feature = "ocr")]
impl TesseractOcr {
    pub fn new() -> Self {
        Self::with_language("eng")
    }

    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            binary: "tesseract".into(),
            language: language.into(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<std::path::PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }
}

#[cfg(feature = "ocr")]
impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ocr")]
#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, content: &[u8]) -> ExtractResult<String> {
        let content = content.to_vec();

        let page = tokio::task::spawn_blocking(move || -> ExtractResult<tempfile::TempPath> {
            let img = image::load_from_memory(&content)
                .map_err(|e| ExtractError::Image(format!("Failed to decode image: {}", e)))?;

            let page = tempfile::Builder::new()
                .prefix("recap-ocr-")
                .suffix(".png")
                .tempfile()?
                .into_temp_path();
            img.to_luma8()
                .save_with_format(&page, image::ImageFormat::Png)
                .map_err(|e| ExtractError::Image(format!("Failed to prepare image: {}", e)))?;
            Ok(page)
        })
        .await??;

        // `tesseract <image> stdout -l <lang>`, the same command line rusty-tesseract builds.
        let output = tokio::process::Command::new(&self.binary)
            .arg(&*page)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| ExtractError::Image(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            return Err(ExtractError::Image(format!(
                "Tesseract failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Image extractor. Falls back to [`NO_TEXT_FOUND`] on blank results.
#[derive(Clone)]
pub struct ImageExtractor {
    engine: Arc<dyn OcrEngine>,
}

impl ImageExtractor {
    /// Create an image extractor using Tesseract.
    #[cfg(feature = "ocr")]
    pub fn new() -> Self {
        Self::with_engine(Arc::new(TesseractOcr::new()))
    }

    pub fn with_engine(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    /// Extract text from an image, returning the placeholder when none is found.
    ///
    /// Non-empty OCR output is returned verbatim, surrounding whitespace included.
    pub async fn extract_image_text(&self, content: &[u8]) -> ExtractResult<String> {
        let text = self.engine.recognize(content).await?;
        debug!(engine = self.engine.name(), chars = text.len(), "OCR complete");

        if text.trim().is_empty() {
            Ok(NO_TEXT_FOUND.to_string())
        } else {
            Ok(text)
        }
    }
}

#[cfg(feature = "ocr")]
impl Default for ImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for ImageExtractor {
    async fn extract(&self, artifact: &UploadedArtifact) -> ExtractResult<ExtractedText> {
        let text = self.extract_image_text(&artifact.bytes).await?;

        let mut diagnostics = Vec::new();
        if text == NO_TEXT_FOUND {
            warn!(filename = %artifact.filename, "No text found in image");
            diagnostics.push(ExtractionDiagnostic::new(DiagnosticKind::NoTextFound, NO_TEXT_FOUND));
        }

        Ok(ExtractedText::new(&artifact.filename, Category::Image, text).with_diagnostics(diagnostics))
    }

    fn category(&self) -> Category {
        Category::Image
    }

    fn name(&self) -> &str {
        "image-ocr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        async fn recognize(&self, _content: &[u8]) -> ExtractResult<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct UndecodableOcr;

    #[async_trait]
    impl OcrEngine for UndecodableOcr {
        async fn recognize(&self, _content: &[u8]) -> ExtractResult<String> {
            Err(ExtractError::Image("Failed to decode image".to_string()))
        }

        fn name(&self) -> &str {
            "undecodable"
        }
    }

    #[tokio::test]
    async fn test_blank_image_placeholder() {
        let extractor = ImageExtractor::with_engine(Arc::new(FixedOcr("  \n\t ")));
        let text = extractor.extract_image_text(b"png").await.unwrap();
        assert_eq!(text, "No text could be extracted from the image");
    }

    #[tokio::test]
    async fn test_text_returned_untrimmed() {
        let extractor = ImageExtractor::with_engine(Arc::new(FixedOcr("  STOP\n")));
        let text = extractor.extract_image_text(b"png").await.unwrap();
        assert_eq!(text, "  STOP\n");
    }

    #[tokio::test]
    async fn test_blank_image_marked_degraded() {
        let extractor = ImageExtractor::with_engine(Arc::new(FixedOcr("")));
        let result = extractor
            .extract(&UploadedArtifact::new("blank.png", vec![0u8; 8]))
            .await
            .unwrap();

        assert!(result.is_degraded());
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::NoTextFound);
        assert_eq!(result.category, Category::Image);
    }

    #[tokio::test]
    async fn test_decode_error_propagates() {
        let extractor = ImageExtractor::with_engine(Arc::new(UndecodableOcr));
        let result = extractor
            .extract(&UploadedArtifact::new("bad.png", vec![1, 2, 3]))
            .await;
        assert!(matches!(result, Err(ExtractError::Image(_))));
    }

    #[cfg(feature = "ocr")]
    #[tokio::test]
    async fn test_tesseract_rejects_non_image() {
        let engine = TesseractOcr::new();
        let result = engine.recognize(&[0x00, 0x01, 0x02, 0x03]).await;
        assert!(matches!(result, Err(ExtractError::Image(_))));
    }
}
