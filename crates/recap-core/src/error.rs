//! Error types for recap operations.
//!
//! Every failure carries a structured [`ErrorCode`] so the HTTP layer can
//! map it to a status without matching on message text.

use recap_extractors::ExtractError;
use thiserror::Error;

/// Result type alias for recap operations.
pub type RecapResult<T> = Result<T, RecapError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all recap operations.
#[derive(Error, Debug)]
pub enum RecapError {
    /// Artifact could not be turned into text.
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// URL is not a recognizable video URL.
    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String, code: ErrorCode },

    /// No transcript could be fetched for the video.
    #[error("Transcript unavailable: {message}")]
    TranscriptUnavailable {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Request input was rejected before any work was done.
    #[error("Validation error: {message}")]
    Validation { message: String, code: ErrorCode },

    /// Summary could not be produced.
    #[error("Summarization failed: {message}")]
    Summarization {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<BoxedSource>,
    },

    /// LLM operation failed.
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Authentication failed.
    #[error("Authentication error: {message}")]
    Authentication { message: String, code: ErrorCode },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Extraction (EXT_xxx)
    ExtUnsupportedFormat,
    ExtFailed,

    // Video (VID_xxx)
    VidInvalidUrl,
    VidTranscriptUnavailable,

    // Summarization (SUM_xxx)
    SumGenerationFailed,
    SumInvalidPayload,

    // Request validation (VAL_xxx)
    ValInvalidInput,

    // LLM (LLM_xxx)
    LlmGenerationFailed,

    // Authentication (AUTH_xxx)
    AuthInvalidToken,
    AuthMissingCredentials,

    // Database (DB_xxx)
    DbOperationFailed,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Configuration
    Config,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ExtUnsupportedFormat => "EXT_001",
            ErrorCode::ExtFailed => "EXT_002",
            ErrorCode::VidInvalidUrl => "VID_001",
            ErrorCode::VidTranscriptUnavailable => "VID_002",
            ErrorCode::SumGenerationFailed => "SUM_001",
            ErrorCode::SumInvalidPayload => "SUM_002",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::AuthInvalidToken => "AUTH_001",
            ErrorCode::AuthMissingCredentials => "AUTH_002",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Config => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RecapError {
    /// Create an invalid URL error.
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            code: ErrorCode::VidInvalidUrl,
        }
    }

    /// Create a transcript unavailable error.
    pub fn transcript_unavailable(message: impl Into<String>) -> Self {
        Self::TranscriptUnavailable {
            message: message.into(),
            code: ErrorCode::VidTranscriptUnavailable,
            source: None,
        }
    }

    /// Wrap a caption source failure as a transcript unavailable error.
    pub fn transcript_unavailable_from(message: impl Into<String>, source: RecapError) -> Self {
        Self::TranscriptUnavailable {
            message: message.into(),
            code: ErrorCode::VidTranscriptUnavailable,
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
        }
    }

    /// Create a summarization error.
    pub fn summarization(message: impl Into<String>) -> Self {
        Self::Summarization {
            message: message.into(),
            code: ErrorCode::SumGenerationFailed,
            source: None,
        }
    }

    /// Wrap an underlying failure as a summarization error.
    pub fn summarization_from(message: impl Into<String>, source: RecapError) -> Self {
        Self::Summarization {
            message: message.into(),
            code: ErrorCode::SumGenerationFailed,
            source: Some(Box::new(source)),
        }
    }

    /// Create an LLM error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            source: None,
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::AuthInvalidToken,
        }
    }

    /// Create a missing-credentials error.
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::AuthMissingCredentials,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create an API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Extraction(ExtractError::UnsupportedFormat(_)) => ErrorCode::ExtUnsupportedFormat,
            Self::Extraction(_) => ErrorCode::ExtFailed,
            Self::InvalidUrl { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::TranscriptUnavailable { code, .. } => *code,
            Self::Summarization { code, .. } => *code,
            Self::Llm { code, .. } => *code,
            Self::Authentication { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Configuration(_) | Self::UnsupportedProvider { .. } => ErrorCode::Config,
            Self::Serialization(_) => ErrorCode::ParseInvalidJson,
            Self::Io(_) | Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Extraction(e) => e.is_client_error(),
            Self::InvalidUrl { .. } | Self::Validation { .. } => true,
            _ => false,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Extraction(ExtractError::UnsupportedFormat(_)) => {
                Some("Upload a PDF, audio, video, image or plain-text file")
            }
            Self::InvalidUrl { .. } => Some("Use a URL of the form https://www.youtube.com/watch?v=<id>"),
            Self::TranscriptUnavailable { .. } => Some("Check that the video has captions enabled"),
            Self::Authentication { .. } => Some("Please check your bearer token"),
            Self::Llm { .. } | Self::Summarization { .. } => {
                Some("Please check your LLM provider configuration")
            }
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RecapError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for RecapError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::NetTimeout
        } else {
            ErrorCode::NetConnectionFailed
        };
        Self::Network {
            message: err.to_string(),
            code,
            source: Some(Box::new(err)),
        }
    }
}
