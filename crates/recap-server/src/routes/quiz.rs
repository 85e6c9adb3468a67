//! Quiz summary endpoints.

use axum::{extract::State, Extension, Json};
use recap_core::QuizSummary;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// Request body for summarizing a quiz.
#[derive(Debug, Deserialize)]
pub struct QuizSummaryRequest {
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizSummaryResponse {
    pub id: i64,
    pub user_id: i64,
    pub summary_text: String,
}

impl From<QuizSummary> for QuizSummaryResponse {
    fn from(summary: QuizSummary) -> Self {
        Self {
            id: summary.id,
            user_id: summary.user_id,
            summary_text: summary.summary_text,
        }
    }
}

/// Summarize a quiz and store the result for the caller.
/// POST /quiz/summarize
pub async fn summarize_quiz(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(request): Json<QuizSummaryRequest>,
) -> ApiResult<Json<QuizSummaryResponse>> {
    let summary = state
        .quiz()
        .summarize(&request.questions, &request.answers)
        .await?;

    let saved = state.store().save_quiz_summary(user_id, &summary)?;
    info!(user_id, id = saved.id, "Quiz summary stored");

    Ok(Json(saved.into()))
}

#[derive(Debug, Serialize)]
pub struct QuizSummariesResponse {
    pub results: Vec<QuizSummary>,
}

/// The caller's stored quiz summaries, oldest first.
/// GET /quiz/summaries
pub async fn list_summaries(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> ApiResult<Json<QuizSummariesResponse>> {
    let results = state.store().list_quiz_summaries(user_id)?;
    Ok(Json(QuizSummariesResponse { results }))
}
