//! recap-extractors - Normalize uploaded artifacts into plain text.
//!
//! Each artifact is routed by filename extension to exactly one extractor:
//! PDF text extraction, audio transcoding plus speech recognition, image
//! OCR, raw UTF-8 text, or video handled through its audio track.
//!
//! # Features
//!
//! - `pdf` (default) - PDF text extraction via pdf-extract
//! - `ocr` (default) - Image OCR via the tesseract CLI (requires tesseract installed)
//! - `speech` (default) - Speech recognition via the OpenAI transcription API
//!
//! # Example
//!
//! ```ignore
//! use recap_extractors::{ExtractionConfig, ExtractorFactory, UploadedArtifact};
//!
//! let pipeline = ExtractorFactory::pipeline(&ExtractionConfig::default());
//! let text = pipeline
//!     .extract(&UploadedArtifact::new("lecture.mp3", bytes))
//!     .await?;
//! if text.is_degraded() {
//!     // placeholder text, see text.diagnostics
//! }
//! ```

mod config;
mod detect;
mod error;
mod factory;
mod pipeline;
mod text;
mod types;

pub mod audio;
pub mod image;
pub mod pdf;

#[cfg(feature = "speech")]
pub mod speech;

pub use audio::{AudioExtractor, AudioTranscript, SegmentOutcome, SpeechRecognizer, Transcoder, VideoExtractor};
pub use config::ExtractionConfig;
pub use detect::{category_for_mime, detect, guess_mime_type};
pub use error::{ExtractError, ExtractResult};
pub use factory::ExtractorFactory;
pub use image::{ImageExtractor, OcrEngine};
pub use pdf::{DocumentParser, PdfExtractor};
pub use pipeline::ExtractionPipeline;
pub use text::TextExtractor;
pub use types::{
    Category, DiagnosticKind, ExtractedText, ExtractionDiagnostic, ExtractionStatus,
    UploadedArtifact,
};

#[cfg(feature = "speech")]
pub use speech::{WhisperConfig, WhisperRecognizer};

use async_trait::async_trait;

/// Core Extractor trait - all content extractors implement this.
///
/// Similar pattern to the Llm trait in recap-core.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract normalized text from an uploaded artifact.
    async fn extract(&self, artifact: &UploadedArtifact) -> ExtractResult<ExtractedText>;

    /// The single category this extractor handles.
    fn category(&self) -> Category;

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}
