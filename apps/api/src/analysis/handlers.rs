//! Axum route handlers for the analysis and interview API.

use axum::{extract::State, Json};

use crate::analysis::models::{
    AnalysisResult, AnalyzeRequest, AnswerFeedback, AnswerRequest, BulletRewrite,
    InterviewSessionRequest, InterviewSummary, QuestionRequest, QuestionSet, RewriteRequest,
};
use crate::errors::{AppError, AppJson};
use crate::state::AppState;

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(req): AppJson<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let analysis = state
        .analyzer
        .analyze(&req.resume_text, &req.job_description)
        .await?;
    Ok(Json(analysis))
}

/// POST /api/interview/generate-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    AppJson(req): AppJson<QuestionRequest>,
) -> Result<Json<QuestionSet>, AppError> {
    let set = state
        .analyzer
        .generate_questions(
            &req.resume_text,
            &req.job_description,
            &req.analysis,
            req.question_count,
        )
        .await?;
    Ok(Json(set))
}

/// POST /api/interview/evaluate-answer
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    AppJson(req): AppJson<AnswerRequest>,
) -> Result<Json<AnswerFeedback>, AppError> {
    Ok(Json(state.analyzer.evaluate_answer(&req).await?))
}

/// POST /api/interview/complete-interview
pub async fn handle_complete_interview(
    State(state): State<AppState>,
    AppJson(session): AppJson<InterviewSessionRequest>,
) -> Result<Json<InterviewSummary>, AppError> {
    Ok(Json(state.analyzer.summarize_interview(&session).await?))
}

/// POST /api/rewriter/star-rewrite
pub async fn handle_star_rewrite(
    State(state): State<AppState>,
    AppJson(req): AppJson<RewriteRequest>,
) -> Result<Json<BulletRewrite>, AppError> {
    Ok(Json(state.analyzer.rewrite_bullet(&req).await?))
}
