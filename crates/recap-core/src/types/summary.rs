//! Summary result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary produced for one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    /// Present when the content was a video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoSummary>,
}

impl SummaryResult {
    /// A plain summary with no highlights or insights.
    pub fn text(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            highlights: Vec::new(),
            insights: Vec::new(),
            video: None,
        }
    }
}

/// One caption line of a video transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// `MM:SS`, or `HH:MM:SS` past the first hour.
    pub timestamp: String,
    pub text: String,
}

/// Video details merged with its summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub video_name: String,
    pub author_name: String,
    pub duration: String,
    pub url_embed: String,
    pub read_time: String,
    pub summary: String,
    pub transcript: Vec<TranscriptEntry>,
    pub highlights: Vec<String>,
    pub insights: Vec<String>,
}

/// A persisted quiz summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: i64,
    pub user_id: i64,
    pub summary_text: String,
    pub created_at: DateTime<Utc>,
}
