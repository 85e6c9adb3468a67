//! Multi-format submission endpoint.

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use recap_core::{BatchItem, SummaryResult};
use recap_extractors::UploadedArtifact;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, DEFAULT_SESSION};

/// Header selecting which conversation memory a submission extends.
pub const SESSION_HEADER: &str = "x-session-id";

/// Response for a submission.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SubmitResponse {
    /// One item per uploaded file, in upload order.
    Files(Vec<BatchItem>),
    Video {
        youtube_url: String,
        summary: SummaryResult,
    },
}

#[derive(Debug, Default)]
struct Submission {
    files: Vec<UploadedArtifact>,
    youtube_url: Option<String>,
}

async fn read_submission(mut multipart: Multipart) -> ApiResult<Submission> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("files") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read '{}': {}", filename, e)))?;

                let mut artifact = UploadedArtifact::new(filename, bytes.to_vec());
                if let Some(content_type) = content_type {
                    artifact = artifact.with_mime_type(content_type);
                }
                submission.files.push(artifact);
            }
            Some("youtube_url") => {
                let url = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read youtube_url: {}", e)))?;
                let url = url.trim();
                if !url.is_empty() {
                    submission.youtube_url = Some(url.to_string());
                }
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    Ok(submission)
}

fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

/// Summarize uploaded files, or a YouTube video when no files are sent.
/// POST /multiformat/submit
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<Json<SubmitResponse>> {
    let session_id = session_id(&headers);
    let submission = read_submission(multipart).await?;

    if !submission.files.is_empty() {
        info!(session_id = %session_id, files = submission.files.len(), "Processing file submission");

        let memory = state.session(&session_id).await;
        let mut memory = memory.lock().await;
        let items = state
            .ingester()
            .process_batch(&submission.files, &mut memory)
            .await;

        return Ok(Json(SubmitResponse::Files(items)));
    }

    let Some(youtube_url) = submission.youtube_url else {
        return Err(ApiError::bad_request("No files or URL provided"));
    };
    if !youtube_url.contains("youtube.com/watch") {
        return Err(ApiError::bad_request("Invalid YouTube URL"));
    }
    info!(session_id = %session_id, url = %youtube_url, "Processing video submission");

    let memory = state.session(&session_id).await;
    let mut memory = memory.lock().await;
    let summary = state
        .ingester()
        .summarizer()
        .summarize_video(&youtube_url, &mut memory)
        .await?;

    Ok(Json(SubmitResponse::Video {
        youtube_url,
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_defaults() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id(&headers), DEFAULT_SESSION);

        headers.insert(SESSION_HEADER, "  ".parse().unwrap());
        assert_eq!(session_id(&headers), DEFAULT_SESSION);

        headers.insert(SESSION_HEADER, "alice".parse().unwrap());
        assert_eq!(session_id(&headers), "alice");
    }
}
