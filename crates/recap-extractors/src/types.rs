//! Core types for content extraction.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Content category an artifact is routed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    /// Page-structured document (PDF).
    Document,
    /// Audio recording.
    Audio,
    /// Video container, handled through its audio track.
    Video,
    /// Plain text.
    PlainText,
    /// Raster image.
    Image,
}

/// An uploaded file awaiting extraction.
#[derive(Debug, Clone)]
pub struct UploadedArtifact {
    /// Client-supplied filename; the extension drives routing.
    pub filename: String,
    /// Content type declared by the client, if any.
    pub mime_type_hint: Option<String>,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedArtifact {
    /// Create an artifact without a MIME hint.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            mime_type_hint: None,
            bytes: bytes.into(),
        }
    }

    /// Attach the client-declared content type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type_hint = Some(mime_type.into());
        self
    }
}

/// Whether extraction produced real content or a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    #[default]
    Complete,
    /// Text is (at least partly) a diagnostic placeholder.
    Degraded,
}

/// Kind of problem recorded while extracting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    TranscodeFailed,
    Unintelligible,
    ServiceUnavailable,
    NoTextFound,
    Internal,
}

/// A warning attached to an extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionDiagnostic {
    /// Audio segment index, when the warning is per-segment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<usize>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl ExtractionDiagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            segment: None,
            kind,
            message: message.into(),
        }
    }

    pub fn for_segment(mut self, index: usize) -> Self {
        self.segment = Some(index);
        self
    }
}

/// Normalized text produced by an extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Filename of the artifact this came from.
    pub source: String,
    /// Category the artifact was routed as.
    pub category: Category,
    /// Extracted text (may be a placeholder when degraded).
    pub text: String,
    #[serde(default)]
    pub status: ExtractionStatus,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<ExtractionDiagnostic>,
}

impl ExtractedText {
    /// Create a complete extraction result.
    pub fn new(source: impl Into<String>, category: Category, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            category,
            text: text.into(),
            status: ExtractionStatus::Complete,
            diagnostics: Vec::new(),
        }
    }

    /// Attach diagnostics; any diagnostic marks the result degraded.
    pub fn with_diagnostics(mut self, diagnostics: Vec<ExtractionDiagnostic>) -> Self {
        if !diagnostics.is_empty() {
            self.status = ExtractionStatus::Degraded;
        }
        self.diagnostics.extend(diagnostics);
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.status == ExtractionStatus::Degraded
    }

    /// Check if extraction produced meaningful content.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(Category::PlainText.to_string(), "plain_text");
        assert_eq!(Category::Document.to_string(), "document");
    }

    #[test]
    fn test_diagnostics_mark_degraded() {
        let text = ExtractedText::new("a.mp3", Category::Audio, "Audio could not be understood")
            .with_diagnostics(vec![ExtractionDiagnostic::new(
                DiagnosticKind::Unintelligible,
                "segment 0",
            )
            .for_segment(0)]);
        assert!(text.is_degraded());
        assert_eq!(text.diagnostics[0].segment, Some(0));
    }

    #[test]
    fn test_no_diagnostics_stays_complete() {
        let text = ExtractedText::new("a.txt", Category::PlainText, "hello").with_diagnostics(vec![]);
        assert!(!text.is_degraded());
        assert_eq!(text.len(), 5);
    }
}
