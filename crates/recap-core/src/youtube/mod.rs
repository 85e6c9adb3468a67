//! YouTube transcript fetching.

mod client;

pub use client::YouTubeClient;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{RecapError, RecapResult};
use crate::traits::CaptionSource;
use crate::types::TranscriptEntry;

/// Extract the video id from a watch URL.
///
/// Takes everything after the first `v=` up to the next `&`. No further URL
/// parsing is attempted.
pub fn extract_video_id(url: &str) -> RecapResult<String> {
    let (_, rest) = url
        .split_once("v=")
        .ok_or_else(|| RecapError::invalid_url(format!("No video id in URL: {}", url)))?;

    let id = rest.split('&').next().unwrap_or_default();
    if id.is_empty() {
        return Err(RecapError::invalid_url(format!("Empty video id in URL: {}", url)));
    }

    Ok(id.to_string())
}

/// Embeddable player URL for a video id.
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

/// Format whole seconds as `MM:SS`, or `HH:MM:SS` when there are hours.
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Turns a video URL into timestamped transcript entries.
#[derive(Clone)]
pub struct TranscriptFetcher {
    source: Arc<dyn CaptionSource>,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn CaptionSource>) -> Self {
        Self { source }
    }

    /// Fetch the transcript for `url`, preserving caption order.
    pub async fn fetch_transcript(&self, url: &str) -> RecapResult<Vec<TranscriptEntry>> {
        let video_id = extract_video_id(url)?;
        self.fetch_transcript_by_id(&video_id).await
    }

    pub async fn fetch_transcript_by_id(&self, video_id: &str) -> RecapResult<Vec<TranscriptEntry>> {
        // Whatever stopped the captions from arriving, the caller only sees that
        // the transcript is unavailable.
        let captions = self
            .source
            .fetch_captions(video_id)
            .await
            .map_err(|e| match e {
                RecapError::InvalidUrl { .. } | RecapError::TranscriptUnavailable { .. } => e,
                other => {
                    warn!(video_id, error = %other, "Caption source failed");
                    RecapError::transcript_unavailable_from(
                        format!("Could not fetch captions for video {}", video_id),
                        other,
                    )
                }
            })?;
        if captions.is_empty() {
            return Err(RecapError::transcript_unavailable(format!(
                "No captions for video {}",
                video_id
            )));
        }
        debug!(video_id, entries = captions.len(), "Fetched transcript");

        Ok(captions
            .into_iter()
            .map(|caption| TranscriptEntry {
                timestamp: format_timestamp(caption.start.max(0.0) as u64),
                text: caption.text,
            })
            .collect())
    }
}
