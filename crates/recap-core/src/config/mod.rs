//! Configuration system for recap.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use recap_extractors::ExtractionConfig;

use crate::error::{RecapError, RecapResult};
use crate::summarize::SummaryMode;
use crate::traits::LlmConfig;

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Anthropic,
}

impl std::str::FromStr for LlmProvider {
    type Err = RecapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(RecapError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }
}

/// Provider configuration with type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Provider type.
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            config: LlmConfig {
                model: "gpt-4o-mini".to_string(),
                ..Default::default()
            },
        }
    }
}

/// Summarizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub mode: SummaryMode,
    /// Replaces the built-in system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_system_prompt: Option<String>,
}

/// Conversation memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Keep at most this many exchanges per conversation. Unbounded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_exchanges: Option<usize>,
    /// Live conversations kept by the server; the least recently used one is
    /// dropped to make room.
    pub max_sessions: usize,
}

pub const DEFAULT_MAX_SESSIONS: usize = 1000;

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_exchanges: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Main recap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecapConfig {
    /// LLM configuration.
    pub llm: LlmProviderConfig,
    pub summary: SummaryConfig,
    /// Extractor configuration.
    pub extraction: ExtractionConfig,
    pub memory: MemoryConfig,
    /// Path to the summary database.
    pub database_path: PathBuf,
}

impl Default for RecapConfig {
    fn default() -> Self {
        let recap_dir = dirs::home_dir()
            .map(|h| h.join(".recap"))
            .unwrap_or_else(|| PathBuf::from(".recap"));

        Self {
            llm: LlmProviderConfig::default(),
            summary: SummaryConfig::default(),
            extraction: ExtractionConfig::default(),
            memory: MemoryConfig::default(),
            database_path: recap_dir.join("recap.db"),
        }
    }
}

impl RecapConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> RecapResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RecapError::Configuration(e.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| RecapError::Configuration(e.to_string()))
            }
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| RecapError::Configuration(e.to_string()))
            }
            _ => Err(RecapError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> RecapResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self) -> RecapResult<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> RecapResult<()> {
        if let Some(provider) = var("RECAP_LLM_PROVIDER") {
            self.llm.provider = provider.parse()?;
        }
        if let Some(model) = var("RECAP_LLM_MODEL") {
            self.llm.config.model = model;
        }

        let key_var = match self.llm.provider {
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        };
        if let Some(api_key) = var(key_var) {
            self.llm.config.api_key = Some(api_key);
        }
        // Speech recognition always goes through OpenAI.
        if let Some(api_key) = var("OPENAI_API_KEY") {
            self.extraction.api_key = Some(api_key);
        }

        if let Some(mode) = var("RECAP_SUMMARY_MODE") {
            self.summary.mode = mode.parse()?;
        }
        if let Some(path) = var("RECAP_FFMPEG_PATH") {
            self.extraction.ffmpeg_path = PathBuf::from(path);
        }
        if let Some(path) = var("RECAP_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }

        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> RecapConfigBuilder {
        RecapConfigBuilder::default()
    }
}

/// Builder for RecapConfig.
#[derive(Default)]
pub struct RecapConfigBuilder {
    config: RecapConfig,
}

impl RecapConfigBuilder {
    /// Set LLM configuration.
    pub fn llm(mut self, config: LlmProviderConfig) -> Self {
        self.config.llm = config;
        self
    }

    pub fn summary_mode(mut self, mode: SummaryMode) -> Self {
        self.config.summary.mode = mode;
        self
    }

    /// Set custom summary system prompt.
    pub fn custom_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.summary.custom_system_prompt = Some(prompt.into());
        self
    }

    pub fn extraction(mut self, config: ExtractionConfig) -> Self {
        self.config.extraction = config;
        self
    }

    pub fn max_exchanges(mut self, max: usize) -> Self {
        self.config.memory.max_exchanges = Some(max);
        self
    }

    pub fn max_sessions(mut self, max: usize) -> Self {
        self.config.memory.max_sessions = max;
        self
    }

    /// Set summary database path.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database_path = path.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RecapConfig {
        self.config
    }
}
