//! Factory for creating LLM providers.

use std::sync::Arc;

use recap_core::config::{LlmProvider, LlmProviderConfig};
use recap_core::error::{RecapError, RecapResult};
use recap_core::traits::{Llm, LlmConfig};

#[cfg(feature = "anthropic")]
use crate::anthropic::AnthropicLlm;
use crate::openai::OpenAIProvider;

/// Factory for creating LLM providers.
pub struct LlmFactory;

impl LlmFactory {
    /// Create an LLM provider from the given configuration.
    pub fn create(provider: LlmProvider, config: LlmConfig) -> RecapResult<Arc<dyn Llm>> {
        match provider {
            LlmProvider::OpenAI => {
                let llm = OpenAIProvider::new(config)?;
                Ok(Arc::new(llm))
            }
            #[cfg(feature = "anthropic")]
            LlmProvider::Anthropic => {
                let llm = AnthropicLlm::new(config)?;
                Ok(Arc::new(llm))
            }
            #[allow(unreachable_patterns)]
            _ => Err(RecapError::UnsupportedProvider {
                provider: format!("{:?}", provider),
            }),
        }
    }

    /// Create the provider described by a [`LlmProviderConfig`].
    pub fn from_config(config: &LlmProviderConfig) -> RecapResult<Arc<dyn Llm>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an OpenAI LLM provider with default configuration.
    pub fn openai() -> RecapResult<Arc<dyn Llm>> {
        Self::create(LlmProvider::OpenAI, LlmConfig::default())
    }

    /// Create an OpenAI LLM provider with a specific model.
    pub fn openai_with_model(model: impl Into<String>) -> RecapResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::OpenAI, config)
    }

    /// Create an Anthropic LLM provider with a specific model.
    pub fn anthropic_with_model(model: impl Into<String>) -> RecapResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::Anthropic, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_configured_model() {
        let config = LlmProviderConfig {
            provider: LlmProvider::OpenAI,
            config: LlmConfig {
                model: "gpt-4o".to_string(),
                api_key: Some("sk-test".to_string()),
                ..Default::default()
            },
        };
        let llm = LlmFactory::from_config(&config).unwrap();
        assert_eq!(llm.model_name(), "gpt-4o");
    }

    #[cfg(feature = "anthropic")]
    #[test]
    fn test_anthropic_from_config() {
        let config = LlmProviderConfig {
            provider: LlmProvider::Anthropic,
            config: LlmConfig {
                api_key: Some("sk-ant-test".to_string()),
                ..Default::default()
            },
        };
        let llm = LlmFactory::from_config(&config).unwrap();
        assert!(llm.model_name().starts_with("claude"));
    }
}
