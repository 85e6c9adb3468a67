//! Extraction error types.

use thiserror::Error;

/// Errors that can occur during content extraction.
///
/// Audio and video extraction never surface these to callers; their
/// failures are folded into a degraded transcript instead.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Filename maps to no known content category.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Document bytes could not be parsed into pages.
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    /// Image bytes could not be decoded or recognized.
    #[error("Image extraction error: {0}")]
    Image(String),

    /// Plain-text artifact was not valid UTF-8.
    #[error("Invalid UTF-8 text: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),

    /// Transcoding process could not be run or its output read.
    #[error("Transcode error: {0}")]
    Transcode(String),

    /// IO error during extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ExtractError {
    /// Whether the caller should treat this as a client-side input problem.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExtractError::UnsupportedFormat(_)
                | ExtractError::DocumentParse(_)
                | ExtractError::Image(_)
                | ExtractError::InvalidText(_)
        )
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
