//! Batch content ingestion.
//!
//! Each artifact is extracted and then summarized with the shared
//! conversation memory. Artifacts are handled one at a time, in order, and
//! a failure on one never stops the rest of the batch.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use recap_extractors::{
    Category, ExtractedText, ExtractionDiagnostic, ExtractionPipeline, UploadedArtifact,
};

use crate::error::RecapError;
use crate::memory::ConversationMemory;
use crate::summarize::Summarizer;
use crate::types::SummaryResult;

/// Outcome of one artifact in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Summarized { summary: SummaryResult },
    Failed { code: String, error: String },
}

/// Result for one artifact in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Extracted text was a placeholder, so the summary describes a failure.
    pub degraded: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<ExtractionDiagnostic>,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchItem {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Summarized { .. })
    }

    pub fn summary(&self) -> Option<&SummaryResult> {
        match &self.outcome {
            BatchOutcome::Summarized { summary } => Some(summary),
            BatchOutcome::Failed { .. } => None,
        }
    }

    fn failed(filename: &str, extracted: Option<ExtractedText>, error: &RecapError) -> Self {
        let (category, degraded, diagnostics) = match extracted {
            Some(e) => (Some(e.category), e.is_degraded(), e.diagnostics),
            None => (None, false, Vec::new()),
        };

        Self {
            filename: filename.to_string(),
            category,
            degraded,
            diagnostics,
            outcome: BatchOutcome::Failed {
                code: error.code().as_str().to_string(),
                error: error.to_string(),
            },
        }
    }
}

/// Orchestrates extraction and summarization of uploaded artifacts.
///
/// Workflow:
/// 1. Detect the artifact's category from its filename
/// 2. Extract text via the matching extractor
/// 3. Summarize with the conversation memory as context
pub struct ContentIngester {
    pipeline: ExtractionPipeline,
    summarizer: Summarizer,
}

impl ContentIngester {
    pub fn new(pipeline: ExtractionPipeline, summarizer: Summarizer) -> Self {
        Self {
            pipeline,
            summarizer,
        }
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Process every artifact in order, returning one item per artifact.
    pub async fn process_batch(
        &self,
        artifacts: &[UploadedArtifact],
        memory: &mut ConversationMemory,
    ) -> Vec<BatchItem> {
        let mut items = Vec::with_capacity(artifacts.len());

        for artifact in artifacts {
            let extracted = match self.pipeline.extract(artifact).await {
                Ok(extracted) => extracted,
                Err(e) => {
                    let err = RecapError::from(e);
                    warn!(filename = %artifact.filename, error = %err, "Extraction failed");
                    items.push(BatchItem::failed(&artifact.filename, None, &err));
                    continue;
                }
            };

            match self.summarizer.summarize(&extracted.text, memory).await {
                Ok(summary) => {
                    info!(
                        filename = %artifact.filename,
                        category = %extracted.category,
                        degraded = extracted.is_degraded(),
                        "Artifact summarized"
                    );
                    items.push(BatchItem {
                        filename: artifact.filename.clone(),
                        category: Some(extracted.category),
                        degraded: extracted.is_degraded(),
                        diagnostics: extracted.diagnostics,
                        outcome: BatchOutcome::Summarized { summary },
                    });
                }
                Err(err) => {
                    warn!(filename = %artifact.filename, error = %err, "Summarization failed");
                    items.push(BatchItem::failed(&artifact.filename, Some(extracted), &err));
                }
            }
        }

        items
    }
}
