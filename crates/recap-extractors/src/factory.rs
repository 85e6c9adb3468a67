//! Factory for creating extractors.

use std::sync::Arc;

use crate::config::ExtractionConfig;
use crate::pipeline::ExtractionPipeline;
use crate::text::TextExtractor;
use crate::Extractor;

#[cfg(feature = "pdf")]
use crate::pdf::PdfExtractor;

#[cfg(feature = "ocr")]
use crate::image::{ImageExtractor, TesseractOcr};

#[cfg(feature = "speech")]
use crate::audio::{AudioExtractionConfig, AudioExtractor, FfmpegTranscoder, VideoExtractor};
#[cfg(feature = "speech")]
use crate::speech::{WhisperConfig, WhisperRecognizer};

/// Factory for creating content extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create a PDF extractor.
    #[cfg(feature = "pdf")]
    pub fn pdf() -> Arc<dyn Extractor> {
        Arc::new(PdfExtractor::new())
    }

    /// Create a plain-text extractor.
    pub fn text() -> Arc<dyn Extractor> {
        Arc::new(TextExtractor::new())
    }

    /// Create a Tesseract-backed image extractor.
    #[cfg(feature = "ocr")]
    pub fn image(config: &ExtractionConfig) -> Arc<dyn Extractor> {
        Arc::new(ImageExtractor::with_engine(Arc::new(TesseractOcr::with_language(
            config.ocr_language.clone(),
        ))))
    }

    /// Create the ffmpeg + Whisper audio extractor.
    #[cfg(feature = "speech")]
    pub fn audio(config: &ExtractionConfig) -> Arc<AudioExtractor> {
        let transcoder = Arc::new(FfmpegTranscoder::with_binary(config.ffmpeg_path.clone()));
        let recognizer = Arc::new(WhisperRecognizer::with_config(WhisperConfig {
            model: config.speech_model.clone(),
            language: config.speech_language.clone(),
            api_key: config.api_key.clone(),
            base_url: None,
        }));

        Arc::new(
            AudioExtractor::new(transcoder, recognizer).with_config(AudioExtractionConfig {
                temp_dir: config.temp_dir.clone(),
                segment_seconds: config.segment_seconds,
            }),
        )
    }

    /// Get all available extractors, one per supported category.
    #[allow(clippy::vec_init_then_push)]
    pub fn all(config: &ExtractionConfig) -> Vec<Arc<dyn Extractor>> {
        let mut extractors: Vec<Arc<dyn Extractor>> = Vec::new();

        #[cfg(feature = "pdf")]
        extractors.push(Self::pdf());

        extractors.push(Self::text());

        #[cfg(feature = "ocr")]
        extractors.push(Self::image(config));

        #[cfg(feature = "speech")]
        {
            let audio = Self::audio(config);
            extractors.push(Arc::new(VideoExtractor::new(Arc::clone(&audio))));
            extractors.push(audio);
        }

        #[cfg(not(any(feature = "ocr", feature = "speech")))]
        let _ = config;

        extractors
    }

    /// Build a pipeline with every available extractor registered.
    pub fn pipeline(config: &ExtractionConfig) -> ExtractionPipeline {
        Self::all(config)
            .into_iter()
            .fold(ExtractionPipeline::new(), |pipeline, extractor| {
                pipeline.with_extractor(extractor)
            })
    }
}
