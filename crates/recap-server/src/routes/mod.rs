//! Route definitions for the REST API.

mod multiformat;
mod quiz;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Largest accepted multipart body.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let quiz_routes = Router::new()
        .route("/quiz/summarize", post(quiz::summarize_quiz))
        .route("/quiz/summaries", get(quiz::list_summaries))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route(
            "/multiformat/submit",
            post(multiformat::submit).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .merge(quiz_routes)
        .with_state(state)
}

pub use multiformat::*;
pub use quiz::*;
