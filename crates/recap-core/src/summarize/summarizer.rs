//! Memory-threaded summarizer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::{RecapError, RecapResult};
use crate::memory::{parse_json_object, ConversationMemory};
use crate::summarize::log_usage;
use crate::summarize::prompts::{summary_request, NO_SUMMARY_AVAILABLE, SUMMARY_SYSTEM_PROMPT};
use crate::traits::{
    GenerationOptions, Llm, Tool, ToolChoice, VideoMetadata, VideoMetadataSource,
};
use crate::types::{Message, SummaryResult, VideoSummary};
use crate::youtube::{embed_url, extract_video_id, format_timestamp, TranscriptFetcher};

/// Name of the function the model is forced to call in structured mode.
pub const SUMMARY_TOOL: &str = "generate_summary";

const WORDS_PER_MINUTE: usize = 200;

/// How the model is asked to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// The assistant's raw text is the summary.
    Freeform,
    /// Summary, highlights and insights through a forced function call.
    #[default]
    Structured,
}

impl std::str::FromStr for SummaryMode {
    type Err = RecapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "freeform" => Ok(Self::Freeform),
            "structured" => Ok(Self::Structured),
            other => Err(RecapError::Configuration(format!(
                "Unknown summary mode: {}",
                other
            ))),
        }
    }
}

/// The `generate_summary` function schema.
pub fn summary_tool() -> Tool {
    Tool::new(
        SUMMARY_TOOL,
        "Generates a summary of the given text",
        json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "A concise summary of the given text"
                },
                "highlights": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Key highlights from the text"
                },
                "insights": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Key insights from the text"
                }
            },
            "required": ["summary", "highlights", "insights"],
            "additionalProperties": false
        }),
    )
}

/// Estimated reading time of `text` at 200 words per minute, as `"{m} min {s} secs"`.
pub fn estimate_read_time(text: &str) -> String {
    let words = text.split_whitespace().count();
    let seconds = words * 60 / WORDS_PER_MINUTE;
    format!("{} min {} secs", seconds / 60, seconds % 60)
}

#[derive(Clone)]
struct VideoSources {
    transcripts: TranscriptFetcher,
    metadata: Arc<dyn VideoMetadataSource>,
}

/// Summarizes text with the conversation so far as context.
///
/// Memory is only written after the model call and payload parsing have
/// both succeeded, so a failed call leaves it exactly as it was.
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn Llm>,
    mode: SummaryMode,
    system_prompt: String,
    options: Option<GenerationOptions>,
    video: Option<VideoSources>,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self {
            llm,
            mode: SummaryMode::default(),
            system_prompt: SUMMARY_SYSTEM_PROMPT.to_string(),
            options: None,
            video: None,
        }
    }

    pub fn with_mode(mut self, mode: SummaryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Enable [`Summarizer::summarize_video`].
    pub fn with_video_sources(
        mut self,
        transcripts: TranscriptFetcher,
        metadata: Arc<dyn VideoMetadataSource>,
    ) -> Self {
        self.video = Some(VideoSources {
            transcripts,
            metadata,
        });
        self
    }

    pub fn mode(&self) -> SummaryMode {
        self.mode
    }

    /// Summarize `text` and record the exchange in `memory`.
    pub async fn summarize(
        &self,
        text: &str,
        memory: &mut ConversationMemory,
    ) -> RecapResult<SummaryResult> {
        let request = summary_request(text);

        let mut messages = Vec::with_capacity(memory.len() * 2 + 2);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(memory.messages());
        messages.push(Message::user(&request));

        debug!(
            model = self.llm.model_name(),
            mode = ?self.mode,
            history = memory.len(),
            chars = text.len(),
            "Requesting summary"
        );

        let result = match self.mode {
            SummaryMode::Freeform => self.freeform(&messages).await,
            SummaryMode::Structured => self.structured(&messages).await,
        }
        .map_err(|e| match e {
            RecapError::Summarization { .. } => e,
            other => RecapError::summarization_from("Language model call failed", other),
        })?;

        memory.record_exchange(request, result.summary.clone());
        Ok(result)
    }

    /// Fetch a video's transcript, summarize it and attach the video details.
    pub async fn summarize_video(
        &self,
        url: &str,
        memory: &mut ConversationMemory,
    ) -> RecapResult<SummaryResult> {
        let video_id = extract_video_id(url)?;
        let sources = self.video.as_ref().ok_or_else(|| {
            RecapError::Configuration("Summarizer has no video sources configured".to_string())
        })?;

        let transcript = sources.transcripts.fetch_transcript_by_id(&video_id).await?;

        let metadata = match sources.metadata.fetch_metadata(&video_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "Video details unavailable");
                VideoMetadata::default()
            }
        };

        let text = transcript
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut result = self.summarize(&text, memory).await?;

        result.video = Some(VideoSummary {
            video_name: metadata.title,
            author_name: metadata.author,
            duration: format_timestamp(metadata.length_seconds),
            url_embed: embed_url(&video_id),
            read_time: estimate_read_time(&text),
            summary: result.summary.clone(),
            transcript,
            highlights: result.highlights.clone(),
            insights: result.insights.clone(),
        });

        Ok(result)
    }

    async fn freeform(&self, messages: &[Message]) -> RecapResult<SummaryResult> {
        let response = self.llm.generate(messages, self.options.clone()).await?;
        log_usage(self.llm.model_name(), &response);

        match response.content {
            Some(content) if !content.trim().is_empty() => Ok(SummaryResult::text(content)),
            _ => Err(RecapError::summarization("Model returned an empty summary")),
        }
    }

    async fn structured(&self, messages: &[Message]) -> RecapResult<SummaryResult> {
        let response = self
            .llm
            .generate_with_tools(
                messages,
                &[summary_tool()],
                ToolChoice::Specific(SUMMARY_TOOL.to_string()),
                self.options.clone(),
            )
            .await?;
        log_usage(self.llm.model_name(), &response);

        let payload: Map<String, Value> = if let Some(call) = response.tool_call(SUMMARY_TOOL) {
            call.arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        } else {
            match response.content.as_deref().map(str::trim) {
                Some(content) if !content.is_empty() => {
                    debug!("No tool call in response, parsing content as JSON");
                    parse_json_object(content).map_err(|e| RecapError::Summarization {
                        message: "Structured summary payload could not be parsed".to_string(),
                        code: crate::error::ErrorCode::SumInvalidPayload,
                        source: Some(Box::new(e)),
                    })?
                }
                _ => {
                    return Err(RecapError::summarization(
                        "Model returned neither a tool call nor content",
                    ))
                }
            }
        };

        Ok(structured_result(&payload))
    }
}

fn structured_result(payload: &Map<String, Value>) -> SummaryResult {
    let summary = payload
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or(NO_SUMMARY_AVAILABLE)
        .to_string();

    SummaryResult {
        summary,
        highlights: string_list(payload.get("highlights")),
        insights: string_list(payload.get("insights")),
        video: None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
