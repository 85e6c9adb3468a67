//! Caption and metadata retrieval from the YouTube watch page.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{RecapError, RecapResult};
use crate::traits::{CaptionSegment, CaptionSource, VideoMetadata, VideoMetadataSource};

const WATCH_URL: &str = "https://www.youtube.com/watch";

static TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<text start="([\d.]+)"(?: dur="([\d.]+)")?[^>]*>([\s\S]*?)</text>"#)
        .expect("valid regex")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

static NUMERIC_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|\d+);").expect("valid regex"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoDetails {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    length_seconds: String,
}

/// Scrapes captions and video details from the public watch page.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    watch_url: String,
    language: String,
}

impl YouTubeClient {
    pub fn new() -> RecapResult<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; recap/0.1)")
            .build()
            .map_err(|e| RecapError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            watch_url: WATCH_URL.to_string(),
            language: "en".to_string(),
        })
    }

    /// Prefer caption tracks in this language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    async fn watch_page(&self, video_id: &str) -> RecapResult<String> {
        let response = self
            .client
            .get(&self.watch_url)
            .query(&[("v", video_id)])
            .header("Accept-Language", format!("{},en;q=0.8", self.language))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecapError::api(format!(
                "Watch page request failed with HTTP {}",
                status
            )));
        }

        Ok(response.text().await?)
    }

    fn pick_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        let in_language = |t: &&CaptionTrack| t.language_code.starts_with(&self.language);
        let manual = |t: &&CaptionTrack| t.kind.as_deref() != Some("asr");

        tracks
            .iter()
            .filter(in_language)
            .find(manual)
            .or_else(|| tracks.iter().find(in_language))
            .or_else(|| tracks.first())
    }
}

#[async_trait]
impl CaptionSource for YouTubeClient {
    async fn fetch_captions(&self, video_id: &str) -> RecapResult<Vec<CaptionSegment>> {
        let page = self.watch_page(video_id).await?;

        let tracks: Vec<CaptionTrack> = embedded_json(&page, "\"captionTracks\":")
            .ok_or_else(|| {
                RecapError::transcript_unavailable(format!(
                    "Video {} has no caption tracks",
                    video_id
                ))
            })?;

        let track = self.pick_track(&tracks).ok_or_else(|| {
            RecapError::transcript_unavailable(format!("Video {} has no caption tracks", video_id))
        })?;
        debug!(video_id, language = %track.language_code, "Downloading caption track");

        let response = self.client.get(&track.base_url).send().await?;
        if !response.status().is_success() {
            return Err(RecapError::transcript_unavailable(format!(
                "Caption download failed with HTTP {}",
                response.status()
            )));
        }

        let xml = response.text().await?;
        Ok(parse_timedtext(&xml))
    }
}

#[async_trait]
impl VideoMetadataSource for YouTubeClient {
    async fn fetch_metadata(&self, video_id: &str) -> RecapResult<VideoMetadata> {
        let page = self.watch_page(video_id).await?;

        let details: VideoDetails = embedded_json(&page, "\"videoDetails\":").ok_or_else(|| {
            RecapError::parse(format!("No video details found for {}", video_id))
        })?;

        let length_seconds = details.length_seconds.parse::<u64>().unwrap_or_else(|_| {
            warn!(video_id, value = %details.length_seconds, "Unparseable video length");
            0
        });

        Ok(VideoMetadata {
            title: details.title,
            author: details.author,
            length_seconds,
        })
    }
}

/// Deserialize the JSON value that follows `marker` in `page`, ignoring what comes after it.
fn embedded_json<T: DeserializeOwned>(page: &str, marker: &str) -> Option<T> {
    let start = page.find(marker)? + marker.len();
    serde_json::Deserializer::from_str(&page[start..])
        .into_iter::<T>()
        .next()?
        .ok()
}

/// Parse timedtext XML into caption segments, in document order.
fn parse_timedtext(xml: &str) -> Vec<CaptionSegment> {
    TEXT_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let start = caps.get(1)?.as_str().parse::<f64>().ok()?;
            let duration = caps
                .get(2)
                .and_then(|d| d.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);
            let raw = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            let text = decode_entities(&TAG_RE.replace_all(&decode_entities(raw), ""));

            Some(CaptionSegment {
                start,
                duration,
                text: text.replace('\n', " ").trim().to_string(),
            })
        })
        .filter(|segment| !segment.text.is_empty())
        .collect()
}

fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    NUMERIC_ENTITY_RE
        .replace_all(&named, |caps: &regex::Captures| {
            let code = &caps[1];
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse().ok(),
            };
            value
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timedtext() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="0.5" dur="2.1">Hello &amp;amp; welcome</text>
<text start="3.04" dur="1.5">it&amp;#39;s a
test</text>
<text start="5">   </text>
</transcript>"#;

        let segments = parse_timedtext(xml);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello & welcome");
        assert_eq!(segments[0].start, 0.5);
        assert_eq!(segments[1].text, "it's a test");
        assert_eq!(segments[1].duration, 1.5);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&quot;hi&quot; &#x41;&#66;"), "\"hi\" AB");
    }

    #[test]
    fn test_embedded_json() {
        let page = r#"var ytInitialPlayerResponse = {"captions":{"captionTracks":[{"baseUrl":"https://example.test/t?a=1&b=2","languageCode":"en"}],"x":1}};"#;
        let tracks: Vec<CaptionTrack> = embedded_json(page, "\"captionTracks\":").unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].base_url, "https://example.test/t?a=1&b=2");
    }

    #[test]
    fn test_video_details() {
        let page = r#"{"videoDetails":{"videoId":"abc","title":"Intro to Rust","lengthSeconds":"212","author":"Ferris"},"more":true}"#;
        let details: VideoDetails = embedded_json(page, "\"videoDetails\":").unwrap();
        assert_eq!(details.title, "Intro to Rust");
        assert_eq!(details.author, "Ferris");
        assert_eq!(details.length_seconds, "212");
    }

    #[test]
    fn test_pick_track_prefers_manual_english() {
        let client = YouTubeClient::new().unwrap();
        let tracks = vec![
            CaptionTrack {
                base_url: "de".into(),
                language_code: "de".into(),
                kind: None,
            },
            CaptionTrack {
                base_url: "en-asr".into(),
                language_code: "en".into(),
                kind: Some("asr".into()),
            },
            CaptionTrack {
                base_url: "en".into(),
                language_code: "en-US".into(),
                kind: None,
            },
        ];
        assert_eq!(client.pick_track(&tracks).unwrap().base_url, "en");
    }
}
