//! recap-core - Core library for recap.
//!
//! This crate provides the error taxonomy, LLM trait, conversation memory,
//! summarizers, YouTube transcript fetching, batch ingestion and the
//! summary store used by the recap server.
//!
//! # Example
//!
//! ```ignore
//! use recap_core::{ContentIngester, ConversationMemory, Summarizer};
//! use recap_extractors::{ExtractorFactory, UploadedArtifact};
//!
//! let ingester = ContentIngester::new(
//!     ExtractorFactory::pipeline(&config.extraction),
//!     Summarizer::new(llm),
//! );
//!
//! let mut memory = ConversationMemory::new();
//! let items = ingester.process_batch(&artifacts, &mut memory).await;
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod memory;
pub mod store;
pub mod summarize;
pub mod traits;
pub mod types;
pub mod youtube;

// Re-export commonly used types
pub use config::{LlmProvider, LlmProviderConfig, MemoryConfig, RecapConfig, SummaryConfig};
pub use error::{ErrorCode, RecapError, RecapResult};
pub use ingest::{BatchItem, BatchOutcome, ContentIngester};
pub use memory::{ConversationMemory, Exchange};
pub use store::SummaryStore;
pub use summarize::{QuizSummarizer, Summarizer, SummaryMode};
pub use traits::{
    CaptionSegment, CaptionSource, GenerationOptions, Llm, LlmConfig, LlmResponse, TokenUsage,
    Tool, ToolCall, ToolChoice, VideoMetadata, VideoMetadataSource,
};
pub use types::{Message, MessageRole, QuizSummary, SummaryResult, TranscriptEntry, VideoSummary};
pub use youtube::{extract_video_id, format_timestamp, TranscriptFetcher, YouTubeClient};
