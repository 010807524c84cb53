pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::documents::handlers as documents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Analysis
        .route("/api/analyze", post(analysis::handle_analyze))
        .route("/api/jd/submit", post(documents::handle_jd_submit))
        .route("/api/resume/upload", post(documents::handle_resume_upload))
        // Mock interview
        .route(
            "/api/interview/generate-questions",
            post(analysis::handle_generate_questions),
        )
        .route(
            "/api/interview/evaluate-answer",
            post(analysis::handle_evaluate_answer),
        )
        .route(
            "/api/interview/complete-interview",
            post(analysis::handle_complete_interview),
        )
        .route(
            "/api/interview/start-interview",
            post(documents::handle_start_interview),
        )
        // Rewriter
        .route(
            "/api/rewriter/star-rewrite",
            post(analysis::handle_star_rewrite),
        )
        .route(
            "/api/rewriter/generate-scorecard",
            post(documents::handle_generate_scorecard),
        )
        .with_state(state)
}
