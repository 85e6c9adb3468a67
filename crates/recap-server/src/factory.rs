//! Factory for building server state from configuration.

use std::sync::Arc;

use recap_core::config::RecapConfig;
use recap_core::error::RecapResult;
use recap_core::{
    ContentIngester, QuizSummarizer, Summarizer, SummaryStore, TranscriptFetcher, YouTubeClient,
};
use recap_extractors::ExtractorFactory;
use recap_llm::LlmFactory;
use tracing::info;

use crate::state::AppState;

/// Wire every service described by `config` into an [`AppState`].
pub fn create_state(config: &RecapConfig) -> RecapResult<AppState> {
    let llm = LlmFactory::from_config(&config.llm)?;
    info!(
        provider = ?config.llm.provider,
        model = llm.model_name(),
        mode = ?config.summary.mode,
        "LLM configured"
    );

    let youtube = Arc::new(YouTubeClient::new()?);
    let mut summarizer = Summarizer::new(llm.clone())
        .with_mode(config.summary.mode)
        .with_video_sources(TranscriptFetcher::new(youtube.clone()), youtube);
    if let Some(ref prompt) = config.summary.custom_system_prompt {
        summarizer = summarizer.with_system_prompt(prompt);
    }

    let pipeline = ExtractorFactory::pipeline(&config.extraction);
    info!(extractors = pipeline.len(), "Extraction pipeline ready");

    let store = SummaryStore::new(&config.database_path)?;
    info!(path = %config.database_path.display(), "Summary store opened");

    Ok(AppState::new(
        ContentIngester::new(pipeline, summarizer),
        QuizSummarizer::new(llm),
        store,
        config.memory.clone(),
    ))
}
