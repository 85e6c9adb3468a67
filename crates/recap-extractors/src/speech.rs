//! Speech recognition using the OpenAI transcription API.

use async_openai::{
    config::OpenAIConfig,
    types::{AudioInput, CreateTranscriptionRequestArgs},
    Client,
};
use async_trait::async_trait;

use crate::audio::{AudioSegment, RecognitionError, SpeechRecognizer};

/// Configuration for Whisper recognition.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Model to use (default: whisper-1).
    pub model: String,
    /// ISO-639-1 language hint.
    pub language: Option<String>,
    /// API key; falls back to OPENAI_API_KEY.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: None,
            api_key: None,
            base_url: None,
        }
    }
}

/// [`SpeechRecognizer`] backed by Whisper.
pub struct WhisperRecognizer {
    client: Client<OpenAIConfig>,
    config: WhisperConfig,
}

impl WhisperRecognizer {
    pub fn new() -> Self {
        Self::with_config(WhisperConfig::default())
    }

    pub fn with_config(config: WhisperConfig) -> Self {
        let mut openai_config = OpenAIConfig::new();
        if let Some(ref key) = config.api_key {
            openai_config = openai_config.with_api_key(key);
        }
        if let Some(ref base_url) = config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(openai_config),
            config,
        }
    }
}

impl Default for WhisperRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    async fn recognize(&self, segment: &AudioSegment) -> Result<String, RecognitionError> {
        let mut args = CreateTranscriptionRequestArgs::default();
        args.file(AudioInput::from_vec_u8(
            format!("segment-{}.wav", segment.index),
            segment.wav.clone(),
        ))
        .model(self.config.model.clone());
        if let Some(ref language) = self.config.language {
            args.language(language.clone());
        }

        let request = args
            .build()
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;

        if response.text.trim().is_empty() {
            Err(RecognitionError::Unintelligible)
        } else {
            Ok(response.text)
        }
    }

    fn name(&self) -> &str {
        "whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_config_default() {
        let config = WhisperConfig::default();
        assert_eq!(config.model, "whisper-1");
        assert!(config.language.is_none());
    }

    #[test]
    fn test_recognizer_name() {
        let recognizer = WhisperRecognizer::with_config(WhisperConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        });
        assert_eq!(recognizer.name(), "whisper");
    }
}
