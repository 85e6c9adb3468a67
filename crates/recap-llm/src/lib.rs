//! recap-llm - LLM provider implementations for recap.
//!
//! # Supported Providers
//!
//! - **OpenAI** (feature: `openai`) - GPT-4o, o-series, etc.
//! - **Anthropic** (feature: `anthropic`) - Claude 3.5 and later
//!
//! Both providers implement tool calling, which the structured summarizer
//! relies on to get summary, highlights and insights in one response.
//!
//! # Example
//!
//! ```ignore
//! use recap_llm::LlmFactory;
//!
//! let llm = LlmFactory::openai_with_model("gpt-4o-mini")?;
//! let llm = LlmFactory::from_config(&config.llm)?;
//! ```

#[cfg(feature = "anthropic")]
mod anthropic;
mod factory;
mod openai;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicLlm;
pub use factory::LlmFactory;
pub use openai::OpenAIProvider;

// Re-export core types for convenience
pub use recap_core::config::{LlmProvider, LlmProviderConfig};
pub use recap_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, TokenUsage};
