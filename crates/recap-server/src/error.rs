//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recap_core::error::RecapError;
use serde::Serialize;
use std::fmt;
use tracing::error;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                suggestion: self.suggestion,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from recap-core errors
impl From<RecapError> for ApiError {
    fn from(err: RecapError) -> Self {
        let status = match &err {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            RecapError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            RecapError::TranscriptUnavailable { .. }
            | RecapError::Summarization { .. }
            | RecapError::Llm { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(code = err.code().as_str(), error = %err, "Request failed");
        }

        let api_error = ApiError::new(status, err.code().as_str(), err.to_string());
        match err.suggestion() {
            Some(suggestion) => api_error.with_suggestion(suggestion),
            None => api_error,
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use recap_extractors::ExtractError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                RecapError::from(ExtractError::UnsupportedFormat(".zip".into())),
                StatusCode::BAD_REQUEST,
            ),
            (RecapError::invalid_url("no v="), StatusCode::BAD_REQUEST),
            (RecapError::validation("empty quiz"), StatusCode::BAD_REQUEST),
            (RecapError::authentication("bad token"), StatusCode::UNAUTHORIZED),
            (RecapError::missing_credentials("no token"), StatusCode::UNAUTHORIZED),
            (
                RecapError::transcript_unavailable("no captions"),
                StatusCode::BAD_GATEWAY,
            ),
            (RecapError::summarization("empty"), StatusCode::BAD_GATEWAY),
            (RecapError::llm("timeout"), StatusCode::BAD_GATEWAY),
            (RecapError::database("locked"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                RecapError::Configuration("missing key".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let description = err.to_string();
            assert_eq!(ApiError::from(err).status, expected, "{}", description);
        }
    }

    #[test]
    fn test_code_and_suggestion_carried() {
        let api_error = ApiError::from(RecapError::invalid_url("no v="));
        assert_eq!(api_error.code, "VID_001");
        assert!(api_error.suggestion.is_some());

        let api_error = ApiError::from(RecapError::validation("Quiz has no question/answer pairs"));
        assert_eq!(api_error.code, "VAL_001");
    }
}
