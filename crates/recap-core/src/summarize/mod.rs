//! Summarization over conversation memory.

mod prompts;
mod quiz;
mod summarizer;

use tracing::debug;

use crate::traits::LlmResponse;

pub use prompts::*;
pub use quiz::QuizSummarizer;
pub use summarizer::{estimate_read_time, summary_tool, Summarizer, SummaryMode, SUMMARY_TOOL};

fn log_usage(model: &str, response: &LlmResponse) {
    if let Some(usage) = response.usage {
        debug!(
            model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "Token usage"
        );
    }
}
