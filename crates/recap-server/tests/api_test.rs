//! End-to-end tests for the HTTP surface using a scripted LLM.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use recap_core::config::MemoryConfig;
use recap_core::error::{RecapError, RecapResult};
use recap_core::traits::{
    CaptionSegment, CaptionSource, GenerationOptions, Llm, LlmResponse, Tool, ToolChoice,
    VideoMetadata, VideoMetadataSource,
};
use recap_core::types::Message;
use recap_core::{
    ContentIngester, QuizSummarizer, Summarizer, SummaryMode, SummaryStore, TranscriptFetcher,
};
use recap_extractors::{ExtractionPipeline, ExtractorFactory};
use recap_server::{create_server, AppState};

const BOUNDARY: &str = "recap-test-boundary";

/// Replies with a fixed summary, tagged with the number of messages it saw.
struct FixedLlm;

#[async_trait]
impl Llm for FixedLlm {
    async fn generate(
        &self,
        messages: &[Message],
        _options: Option<GenerationOptions>,
    ) -> RecapResult<LlmResponse> {
        Ok(LlmResponse {
            content: Some(format!("summary after {} messages", messages.len())),
            ..Default::default()
        })
    }

    async fn generate_with_tools(
        &self,
        messages: &[Message],
        _tools: &[Tool],
        _tool_choice: ToolChoice,
        options: Option<GenerationOptions>,
    ) -> RecapResult<LlmResponse> {
        self.generate(messages, options).await
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

struct FakeVideo;

#[async_trait]
impl CaptionSource for FakeVideo {
    async fn fetch_captions(&self, _video_id: &str) -> RecapResult<Vec<CaptionSegment>> {
        Ok(vec![
            CaptionSegment {
                start: 0.0,
                duration: 4.0,
                text: "welcome to the course".to_string(),
            },
            CaptionSegment {
                start: 65.0,
                duration: 3.0,
                text: "ownership explained".to_string(),
            },
        ])
    }
}

#[async_trait]
impl VideoMetadataSource for FakeVideo {
    async fn fetch_metadata(&self, _video_id: &str) -> RecapResult<VideoMetadata> {
        Ok(VideoMetadata {
            title: "Intro to Rust".to_string(),
            author: "Ferris".to_string(),
            length_seconds: 212,
        })
    }
}

/// Caption endpoint that is down.
struct UnreachableCaptions;

#[async_trait]
impl CaptionSource for UnreachableCaptions {
    async fn fetch_captions(&self, _video_id: &str) -> RecapResult<Vec<CaptionSegment>> {
        Err(RecapError::api("Watch page request failed with HTTP 503"))
    }
}

fn build_state(captions: Arc<dyn CaptionSource>, memory: MemoryConfig) -> AppState {
    let llm: Arc<dyn Llm> = Arc::new(FixedLlm);
    let pipeline = ExtractionPipeline::new().with_extractor(ExtractorFactory::text());
    let summarizer = Summarizer::new(llm.clone())
        .with_mode(SummaryMode::Freeform)
        .with_video_sources(TranscriptFetcher::new(captions), Arc::new(FakeVideo));

    AppState::new(
        ContentIngester::new(pipeline, summarizer),
        QuizSummarizer::new(llm),
        SummaryStore::new(":memory:").unwrap(),
        memory,
    )
}

fn test_state() -> AppState {
    build_state(Arc::new(FakeVideo), MemoryConfig::default())
}

fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n",
                name, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn submit_request(body: String, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/multiformat/submit")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(session) = session {
        builder = builder.header("x-session-id", session);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_submit_files_returns_item_per_file() {
    let state = test_state();
    let app = create_server(state.clone());

    let body = multipart_body(&[
        ("files", Some("notes.txt"), "first document"),
        ("files", Some("archive.zip"), "PK"),
        ("files", Some("more.md"), "second document"),
    ]);
    let (status, value) = send(&app, submit_request(body, Some("alice"))).await;

    assert_eq!(status, StatusCode::OK);
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["filename"], "notes.txt");
    assert_eq!(items[0]["status"], "summarized");
    assert_eq!(items[0]["summary"]["summary"], "summary after 2 messages");
    assert_eq!(items[1]["status"], "failed");
    assert_eq!(items[1]["code"], "EXT_001");
    // The second summary replays the first exchange.
    assert_eq!(items[2]["summary"]["summary"], "summary after 4 messages");

    let memory = state.session("alice").await;
    assert_eq!(memory.lock().await.len(), 2);
    assert_eq!(state.session_count().await, 1);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let state = test_state();
    let app = create_server(state.clone());

    let body = || multipart_body(&[("files", Some("a.txt"), "hello")]);
    send(&app, submit_request(body(), Some("one"))).await;
    let (_, value) = send(&app, submit_request(body(), None)).await;

    assert_eq!(value[0]["summary"]["summary"], "summary after 2 messages");
    assert_eq!(state.session("default").await.lock().await.len(), 1);
    assert_eq!(state.session("one").await.lock().await.len(), 1);
}

#[tokio::test]
async fn test_sessions_bounded_by_config() {
    let state = build_state(
        Arc::new(FakeVideo),
        MemoryConfig {
            max_sessions: 2,
            ..Default::default()
        },
    );
    let app = create_server(state.clone());

    let body = || multipart_body(&[("files", Some("a.txt"), "hello")]);
    send(&app, submit_request(body(), Some("first"))).await;
    send(&app, submit_request(body(), Some("second"))).await;
    // Touch "first" so "second" becomes the least recently used.
    send(&app, submit_request(body(), Some("first"))).await;

    for id in ["third", "fourth", "fifth"] {
        send(&app, submit_request(body(), Some(id))).await;
        assert!(state.session_count().await <= 2);
    }
    assert_eq!(state.session_count().await, 2);

    // "fifth" survived; a recreated "first" starts empty.
    assert_eq!(state.session("fifth").await.lock().await.len(), 1);
    assert!(state.session("first").await.lock().await.is_empty());
}

#[tokio::test]
async fn test_least_recently_used_session_evicted_first() {
    let state = build_state(
        Arc::new(FakeVideo),
        MemoryConfig {
            max_sessions: 2,
            ..Default::default()
        },
    );
    let app = create_server(state.clone());

    let body = || multipart_body(&[("files", Some("a.txt"), "hello")]);
    send(&app, submit_request(body(), Some("first"))).await;
    send(&app, submit_request(body(), Some("second"))).await;
    send(&app, submit_request(body(), Some("first"))).await;
    send(&app, submit_request(body(), Some("third"))).await;

    // "second" was evicted, "first" kept both exchanges.
    assert_eq!(state.session("first").await.lock().await.len(), 2);
    assert_eq!(state.session_count().await, 2);
}

#[tokio::test]
async fn test_submit_without_input_rejected() {
    let app = create_server(test_state());

    let body = multipart_body(&[("comment", None, "nothing to see")]);
    let (status, value) = send(&app, submit_request(body, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"]["message"], "No files or URL provided");
}

#[tokio::test]
async fn test_submit_non_youtube_url_rejected() {
    let app = create_server(test_state());

    let body = multipart_body(&[("youtube_url", None, "https://vimeo.com/12345")]);
    let (status, value) = send(&app, submit_request(body, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_watch_url_without_video_id_is_client_error() {
    let app = create_server(test_state());

    let body = multipart_body(&[("youtube_url", None, "https://www.youtube.com/watch?list=abc")]);
    let (status, value) = send(&app, submit_request(body, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"]["code"], "VID_001");
}

#[tokio::test]
async fn test_submit_youtube_url() {
    let state = test_state();
    let app = create_server(state.clone());

    let url = "https://www.youtube.com/watch?v=abc123&t=5";
    let body = multipart_body(&[("youtube_url", None, url)]);
    let (status, value) = send(&app, submit_request(body, Some("viewer"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["youtube_url"], url);
    assert_eq!(value["summary"]["summary"], "summary after 2 messages");

    let video = &value["summary"]["video"];
    assert_eq!(video["videoName"], "Intro to Rust");
    assert_eq!(video["authorName"], "Ferris");
    assert_eq!(video["duration"], "03:32");
    assert_eq!(video["transcript"][1]["timestamp"], "01:05");
    assert_eq!(state.session("viewer").await.lock().await.len(), 1);
}

#[tokio::test]
async fn test_caption_outage_is_bad_gateway() {
    let state = build_state(Arc::new(UnreachableCaptions), MemoryConfig::default());
    let app = create_server(state.clone());

    let body = multipart_body(&[("youtube_url", None, "https://www.youtube.com/watch?v=abc123")]);
    let (status, value) = send(&app, submit_request(body, Some("viewer"))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(value["error"]["code"], "VID_002");
    assert!(value["error"]["suggestion"].is_string());
    assert!(state.session("viewer").await.lock().await.is_empty());
}

#[tokio::test]
async fn test_files_take_precedence_over_url() {
    let app = create_server(test_state());

    let body = multipart_body(&[
        ("youtube_url", None, "https://vimeo.com/12345"),
        ("files", Some("a.txt"), "hello"),
    ]);
    let (status, value) = send(&app, submit_request(body, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_quiz_requires_token() {
    let app = create_server(test_state());

    let request = Request::builder()
        .method("POST")
        .uri("/quiz/summarize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"questions": ["q"], "answers": ["a"]}).to_string()))
        .unwrap();
    let (status, value) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["error"]["code"], "AUTH_002");

    let request = Request::builder()
        .uri("/quiz/summaries")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let (status, value) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["error"]["code"], "AUTH_001");
}

#[tokio::test]
async fn test_quiz_summary_persisted_for_caller() {
    let state = test_state();
    let token = state.store().register_token(7).unwrap();
    let other = state.store().register_token(8).unwrap();
    let app = create_server(state);

    let request = Request::builder()
        .method("POST")
        .uri("/quiz/summarize")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(
            json!({"questions": ["2+2?", "Capital of France?"], "answers": ["4", "Paris"]})
                .to_string(),
        ))
        .unwrap();
    let (status, value) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["user_id"], 7);
    assert_eq!(value["summary_text"], "summary after 2 messages");
    let id = value["id"].as_i64().unwrap();

    let list = |token: &str| {
        Request::builder()
            .uri("/quiz/summaries")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    };

    let (status, value) = send(&app, list(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["results"][0]["id"], id);

    let (_, value) = send(&app, list(&other)).await;
    assert!(value["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_quiz_is_bad_request() {
    let state = test_state();
    let token = state.store().register_token(1).unwrap();
    let app = create_server(state);

    let request = Request::builder()
        .method("POST")
        .uri("/quiz/summarize")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({"questions": [], "answers": []}).to_string()))
        .unwrap();
    let (status, value) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"]["code"], "VAL_001");
}
