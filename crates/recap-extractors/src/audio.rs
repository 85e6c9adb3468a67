//! Audio and video transcription.
//!
//! Input bytes are written to a scoped temp file, transcoded to WAV by an
//! external [`Transcoder`], split into segments and passed through a
//! [`SpeechRecognizer`]. Failures never propagate: they degrade into
//! placeholder text plus diagnostics so a batch keeps going.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::detect::guess_mime_type;
use crate::error::{ExtractError, ExtractResult};
use crate::types::{Category, DiagnosticKind, ExtractedText, ExtractionDiagnostic, UploadedArtifact};
use crate::Extractor;

/// Placeholder returned when the transcoder exits non-zero.
pub const TRANSCODE_FAILED_TEXT: &str = "Failed to decode audio file";

/// Placeholder for a segment the recognizer could not understand.
pub const UNINTELLIGIBLE_TEXT: &str = "Audio could not be understood";

/// Result of running the transcoder process.
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

/// Converts arbitrary audio/video input into an uncompressed WAV file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcode `input` into a WAV file at `output`.
    ///
    /// A non-zero exit is reported through [`TranscodeOutput::success`];
    /// `Err` is reserved for failing to run the process at all.
    async fn transcode_to_wav(&self, input: &Path, output: &Path) -> ExtractResult<TranscodeOutput>;
}

/// [`Transcoder`] that shells out to ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    /// Use `ffmpeg` from PATH.
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode_to_wav(&self, input: &Path, output: &Path) -> ExtractResult<TranscodeOutput> {
        let result = tokio::process::Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-f")
            .arg("wav")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ExtractError::Transcode(format!(
                    "Failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        Ok(TranscodeOutput {
            success: result.status.success(),
            exit_code: result.status.code(),
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        })
    }
}

/// A time-bounded chunk of WAV audio.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Position in temporal order, starting at 0.
    pub index: usize,
    pub start_seconds: f64,
    /// Self-contained WAV bytes for this segment.
    pub wav: Vec<u8>,
}

/// Typed failure from a speech recognition service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// Audio was processed but no speech could be recognized.
    #[error("speech could not be understood")]
    Unintelligible,
    /// The service request itself failed.
    #[error("{0}")]
    ServiceUnavailable(String),
}

/// Speech-to-text over a single WAV segment.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, segment: &AudioSegment) -> Result<String, RecognitionError>;

    fn name(&self) -> &str;
}

/// Recognition outcome for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    Recognized(String),
    Unintelligible,
    ServiceUnavailable(String),
}

impl SegmentOutcome {
    /// Text contributed by this segment, placeholder included.
    pub fn text(&self) -> String {
        match self {
            SegmentOutcome::Recognized(text) => text.clone(),
            SegmentOutcome::Unintelligible => UNINTELLIGIBLE_TEXT.to_string(),
            SegmentOutcome::ServiceUnavailable(cause) => format!(
                "Could not request results from the speech recognition service: {}",
                cause
            ),
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, SegmentOutcome::Recognized(_))
    }
}

impl From<Result<String, RecognitionError>> for SegmentOutcome {
    fn from(result: Result<String, RecognitionError>) -> Self {
        match result {
            Ok(text) => SegmentOutcome::Recognized(text),
            Err(RecognitionError::Unintelligible) => SegmentOutcome::Unintelligible,
            Err(RecognitionError::ServiceUnavailable(cause)) => {
                SegmentOutcome::ServiceUnavailable(cause)
            }
        }
    }
}

/// Transcript of an audio artifact, possibly degraded.
#[derive(Debug, Clone)]
pub struct AudioTranscript {
    /// Joined segment text, or a single placeholder.
    pub text: String,
    /// Per-segment outcomes in temporal order. Empty if transcoding failed.
    pub segments: Vec<SegmentOutcome>,
    pub diagnostics: Vec<ExtractionDiagnostic>,
}

impl AudioTranscript {
    fn failed(kind: DiagnosticKind, text: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments: Vec::new(),
            diagnostics: vec![ExtractionDiagnostic::new(kind, detail)],
        }
    }

    fn from_segments(segments: Vec<SegmentOutcome>) -> Self {
        let diagnostics = segments
            .iter()
            .enumerate()
            .filter_map(|(index, outcome)| match outcome {
                SegmentOutcome::Recognized(_) => None,
                SegmentOutcome::Unintelligible => Some(
                    ExtractionDiagnostic::new(DiagnosticKind::Unintelligible, UNINTELLIGIBLE_TEXT)
                        .for_segment(index),
                ),
                SegmentOutcome::ServiceUnavailable(cause) => Some(
                    ExtractionDiagnostic::new(DiagnosticKind::ServiceUnavailable, cause.clone())
                        .for_segment(index),
                ),
            })
            .collect();

        let text = segments
            .iter()
            .map(SegmentOutcome::text)
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            text,
            segments,
            diagnostics,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Configuration for audio extraction.
#[derive(Debug, Clone, Default)]
pub struct AudioExtractionConfig {
    /// Directory for scoped temp files (system temp dir when `None`).
    pub temp_dir: Option<PathBuf>,
    /// Segment length in seconds; `None` sends the whole file as one segment.
    pub segment_seconds: Option<u32>,
}

/// Audio extractor: transcode, segment, recognize.
pub struct AudioExtractor {
    transcoder: Arc<dyn Transcoder>,
    recognizer: Arc<dyn SpeechRecognizer>,
    config: AudioExtractionConfig,
}

impl AudioExtractor {
    pub fn new(transcoder: Arc<dyn Transcoder>, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            transcoder,
            recognizer,
            config: AudioExtractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AudioExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Transcribe audio bytes. Never fails; problems show up as diagnostics.
    pub async fn extract_audio_text(
        &self,
        content: &[u8],
        declared_mime_type: Option<&str>,
    ) -> AudioTranscript {
        match self.transcribe(content, declared_mime_type).await {
            Ok(transcript) => transcript,
            Err(e) => {
                error!(error = %e, mime_type = ?declared_mime_type, "Failed to process audio");
                AudioTranscript::failed(
                    DiagnosticKind::Internal,
                    format!("Failed to process audio: {}", e),
                    e.to_string(),
                )
            }
        }
    }

    async fn transcribe(
        &self,
        content: &[u8],
        declared_mime_type: Option<&str>,
    ) -> ExtractResult<AudioTranscript> {
        // Both paths are removed when they drop, on every return below.
        let input = self.scoped_temp_path("recap-audio-in-", input_suffix(declared_mime_type))?;
        let output = self.scoped_temp_path("recap-audio-out-", ".wav")?;

        tokio::fs::write(&input, content).await?;
        debug!(
            bytes = content.len(),
            mime_type = ?declared_mime_type,
            "Transcoding audio input"
        );

        let transcoded = self.transcoder.transcode_to_wav(&input, &output).await?;
        if !transcoded.success {
            warn!(
                exit_code = ?transcoded.exit_code,
                stderr = %transcoded.stderr,
                "Transcoder failed"
            );
            return Ok(AudioTranscript::failed(
                DiagnosticKind::TranscodeFailed,
                TRANSCODE_FAILED_TEXT,
                transcoded.stderr,
            ));
        }

        let wav = tokio::fs::read(&output).await?;
        let segment_seconds = self.config.segment_seconds;
        let segments =
            tokio::task::spawn_blocking(move || split_wav(wav, segment_seconds)).await??;
        debug!(segment_count = segments.len(), "Recognizing audio segments");

        let mut outcomes = Vec::with_capacity(segments.len());
        for segment in &segments {
            let outcome = SegmentOutcome::from(self.recognizer.recognize(segment).await);
            if !outcome.is_recognized() {
                warn!(
                    segment = segment.index,
                    recognizer = self.recognizer.name(),
                    outcome = ?outcome,
                    "Segment not recognized"
                );
            }
            outcomes.push(outcome);
        }

        Ok(AudioTranscript::from_segments(outcomes))
    }

    fn scoped_temp_path(&self, prefix: &str, suffix: &str) -> ExtractResult<tempfile::TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix).suffix(suffix);

        let file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        Ok(file.into_temp_path())
    }
}

#[async_trait]
impl Extractor for AudioExtractor {
    async fn extract(&self, artifact: &UploadedArtifact) -> ExtractResult<ExtractedText> {
        let mime_type = artifact
            .mime_type_hint
            .as_deref()
            .or_else(|| guess_mime_type(&artifact.filename));

        let transcript = self.extract_audio_text(&artifact.bytes, mime_type).await;
        Ok(ExtractedText::new(&artifact.filename, Category::Audio, transcript.text)
            .with_diagnostics(transcript.diagnostics))
    }

    fn category(&self) -> Category {
        Category::Audio
    }

    fn name(&self) -> &str {
        "audio-transcriber"
    }
}

/// Video extractor. Treats the container as audio; frames are never read.
pub struct VideoExtractor {
    audio: Arc<AudioExtractor>,
}

impl VideoExtractor {
    pub fn new(audio: Arc<AudioExtractor>) -> Self {
        Self { audio }
    }
}

#[async_trait]
impl Extractor for VideoExtractor {
    async fn extract(&self, artifact: &UploadedArtifact) -> ExtractResult<ExtractedText> {
        let transcript = self
            .audio
            .extract_audio_text(&artifact.bytes, Some("audio/mp4"))
            .await;
        Ok(ExtractedText::new(&artifact.filename, Category::Video, transcript.text)
            .with_diagnostics(transcript.diagnostics))
    }

    fn category(&self) -> Category {
        Category::Video
    }

    fn name(&self) -> &str {
        "video-audio-track"
    }
}

fn input_suffix(mime_type: Option<&str>) -> &'static str {
    match mime_type {
        Some("audio/mpeg") | Some("audio/mp3") => ".mp3",
        Some("audio/mp4") | Some("video/mp4") => ".mp4",
        Some("audio/x-wav") | Some("audio/wav") => ".wav",
        Some("audio/ogg") => ".ogg",
        Some("audio/flac") => ".flac",
        Some("audio/webm") | Some("video/webm") => ".webm",
        _ => "",
    }
}

/// Split WAV bytes into segments of `segment_seconds`, in temporal order.
///
/// With no segment length the file is passed through untouched as a
/// single segment.
pub fn split_wav(wav: Vec<u8>, segment_seconds: Option<u32>) -> ExtractResult<Vec<AudioSegment>> {
    let seconds = match segment_seconds {
        Some(s) if s > 0 => s,
        _ => {
            return Ok(vec![AudioSegment {
                index: 0,
                start_seconds: 0.0,
                wav,
            }])
        }
    };

    let reader = hound::WavReader::new(Cursor::new(&wav)).map_err(wav_error)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let frames_per_segment = spec.sample_rate as usize * seconds as usize;
    let samples_per_segment = frames_per_segment * channels;

    let samples: Vec<Sample> = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .into_samples::<i32>()
            .map(|s| s.map(Sample::Int))
            .collect::<Result<_, _>>()
            .map_err(wav_error)?,
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(Sample::Float))
            .collect::<Result<_, _>>()
            .map_err(wav_error)?,
    };

    if samples.is_empty() || samples_per_segment == 0 {
        return Ok(vec![AudioSegment {
            index: 0,
            start_seconds: 0.0,
            wav,
        }]);
    }

    samples
        .chunks(samples_per_segment)
        .enumerate()
        .map(|(index, chunk)| {
            Ok(AudioSegment {
                index,
                start_seconds: (index * seconds as usize) as f64,
                wav: encode_wav(spec, chunk)?,
            })
        })
        .collect()
}

#[derive(Clone, Copy)]
enum Sample {
    Int(i32),
    Float(f32),
}

fn encode_wav(spec: hound::WavSpec, samples: &[Sample]) -> ExtractResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(wav_error)?;
        for sample in samples {
            match *sample {
                Sample::Int(v) => writer.write_sample(v),
                Sample::Float(v) => writer.write_sample(v),
            }
            .map_err(wav_error)?;
        }
        writer.finalize().map_err(wav_error)?;
    }
    Ok(cursor.into_inner())
}

fn wav_error(e: hound::Error) -> ExtractError {
    ExtractError::Transcode(format!("Invalid WAV output: {}", e))
}
