//! Axum route handlers for document intake and scorecard download.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::models::{AnalysisResult, InterviewQuestion, DEFAULT_QUESTION_COUNT};
use crate::documents::jd_cleaner::clean_job_description;
use crate::documents::pdf_text::{extract_resume_text, PDF_CONTENT_TYPE};
use crate::documents::scorecard::{Scorecard, ScorecardRequest};
use crate::errors::{require_text, AppError, AppJson};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JdSubmitRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct JdSubmitResponse {
    pub cleaned_job_description: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewPlan {
    pub questions: Vec<InterviewQuestion>,
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub resume_text: String,
    pub filename: String,
    pub analysis: AnalysisResult,
    pub interview: InterviewPlan,
}

/// Parts of a multipart form this API cares about.
#[derive(Debug, Default)]
struct ResumeForm {
    file: Option<(String, Bytes)>,
    job_description: Option<String>,
}

const DEFAULT_UPLOAD_NAME: &str = "resume.pdf";

async fn read_resume_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                if field.content_type() != Some(PDF_CONTENT_TYPE) {
                    return Err(AppError::Validation("Only PDF files are allowed".to_string()));
                }
                let filename = field.file_name().unwrap_or(DEFAULT_UPLOAD_NAME).to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
                form.file = Some((filename, data));
            }
            Some("job_description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_description: {e}")))?;
                form.job_description = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/jd/submit
pub async fn handle_jd_submit(
    AppJson(req): AppJson<JdSubmitRequest>,
) -> Result<Json<JdSubmitResponse>, AppError> {
    require_text(&req.job_description, "Job description")?;
    Ok(Json(JdSubmitResponse {
        cleaned_job_description: clean_job_description(&req.job_description),
    }))
}

/// POST /api/resume/upload
pub async fn handle_resume_upload(multipart: Multipart) -> Result<Json<UploadResponse>, AppError> {
    let form = read_resume_form(multipart).await?;
    let (filename, data) = form
        .file
        .ok_or_else(|| AppError::Validation("A PDF file field named `file` is required".to_string()))?;

    let resume_text = extract_resume_text(data).await?;
    info!("Extracted resume text from {filename}");

    Ok(Json(UploadResponse {
        filename,
        resume_text,
    }))
}

/// POST /api/interview/start-interview
/// Upload → analyze → question set, in one call.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StartInterviewResponse>, AppError> {
    let form = read_resume_form(multipart).await?;
    let (filename, data) = form
        .file
        .ok_or_else(|| AppError::Validation("A PDF file field named `file` is required".to_string()))?;
    let job_description = form.job_description.unwrap_or_default();
    require_text(&job_description, "Job description")?;

    let resume_text = extract_resume_text(data).await?;

    let analysis = state.analyzer.analyze(&resume_text, &job_description).await?;
    let analysis_doc = serde_json::to_value(&analysis).map_err(|e| AppError::Internal(e.into()))?;
    let set = state
        .analyzer
        .generate_questions(
            &resume_text,
            &job_description,
            &analysis_doc,
            DEFAULT_QUESTION_COUNT,
        )
        .await?;

    info!(
        "Started interview for {filename}: match_score={}, questions={}",
        analysis.match_score, set.total
    );

    Ok(Json(StartInterviewResponse {
        resume_text,
        filename,
        analysis,
        interview: InterviewPlan {
            questions: set.questions,
            focus_areas: set.focus_areas,
        },
    }))
}

/// POST /api/rewriter/generate-scorecard
pub async fn handle_generate_scorecard(
    State(state): State<AppState>,
    AppJson(req): AppJson<ScorecardRequest>,
) -> Result<Response, AppError> {
    let scorecard = Scorecard::build(
        &req.analysis,
        req.interview_summary.as_ref(),
        &req.candidate_name,
    );
    let pdf = state.renderer.render(&scorecard).await?;

    info!(
        "Generated scorecard {} ({} bytes)",
        scorecard.report_id,
        pdf.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", scorecard.filename()),
            ),
        ],
        pdf,
    )
        .into_response())
}
