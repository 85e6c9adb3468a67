//! Video caption and metadata sources.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RecapResult;

/// A timed caption as delivered by the caption service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Offset from the start of the video, in seconds.
    pub start: f64,
    /// Display duration, in seconds.
    pub duration: f64,
    pub text: String,
}

/// Details about a video, independent of its captions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub author: String,
    pub length_seconds: u64,
}

/// Fetches captions for a video id.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Return captions in source order. An empty list means no transcript.
    async fn fetch_captions(&self, video_id: &str) -> RecapResult<Vec<CaptionSegment>>;
}

/// Resolves title, author and duration for a video id.
#[async_trait]
pub trait VideoMetadataSource: Send + Sync {
    async fn fetch_metadata(&self, video_id: &str) -> RecapResult<VideoMetadata>;
}
