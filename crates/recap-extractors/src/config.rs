//! Extraction configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the default extractor set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Path or name of the ffmpeg binary.
    pub ffmpeg_path: PathBuf,
    /// Directory for scoped temp files. System temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// Recognize audio in chunks of this many seconds. Whole file when unset.
    pub segment_seconds: Option<u32>,
    pub speech_model: String,
    pub speech_language: Option<String>,
    /// Tesseract language code.
    pub ocr_language: String,
    /// API key for the speech service. Falls back to OPENAI_API_KEY.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            temp_dir: None,
            segment_seconds: None,
            speech_model: "whisper-1".to_string(),
            speech_language: None,
            ocr_language: "eng".to_string(),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.speech_model, "whisper-1");
        assert_eq!(config.ocr_language, "eng");
        assert!(config.segment_seconds.is_none());
    }

    #[test]
    fn test_partial_deserialize() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{"segment_seconds": 30, "ocr_language": "deu"}"#).unwrap();
        assert_eq!(config.segment_seconds, Some(30));
        assert_eq!(config.ocr_language, "deu");
        assert_eq!(config.speech_model, "whisper-1");
    }
}
