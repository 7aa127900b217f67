pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/extract-criteria",
            post(handlers::handle_extract_criteria),
        )
        .route("/score-resumes", post(handlers::handle_score_resumes))
        // Resume batches can carry several multi-megabyte documents.
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .with_state(state)
}
