//! Resume Analyzer: runs each operation through the same chain:
//!
//!   prompt → provider (if configured, bounded by a timeout) → fence strip + parse
//!   → schema check → typed result
//!
//! Any failure along that chain is logged and replaced by the operation's
//! local fallback. The returned value is checked against the schema once more
//! before it leaves; a failure there is a defect and surfaces as `AppError::Internal`.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::analysis::fallback;
use crate::analysis::models::{
    missing_keywords_from, AnalysisResult, AnswerFeedback, AnswerRequest, BulletRewrite,
    InterviewSessionRequest, InterviewSummary, QuestionList, QuestionSet, RewriteRequest,
    SummaryNarrative, MAX_QUESTION_COUNT,
};
use crate::analysis::prompts::{self, PromptPair};
use crate::analysis::summary;
use crate::analysis::validation;
use crate::config::Config;
use crate::errors::{require_text, AppError};
use crate::llm_client::prompts::JSON_OBJECT_FORMAT;
use crate::llm_client::{parse_json_output, GenerationRequest, LlmError, OpenAiClient, TextGenerator};

/// Number of missing keywords echoed back as interview focus areas.
pub const FOCUS_AREA_COUNT: usize = 5;

/// The five generated operations and their sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analysis,
    Questions,
    AnswerEvaluation,
    BulletRewrite,
    SummaryNarrative,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Analysis => "resume_analysis",
            Operation::Questions => "question_generation",
            Operation::AnswerEvaluation => "answer_evaluation",
            Operation::BulletRewrite => "bullet_rewrite",
            Operation::SummaryNarrative => "interview_summary",
        }
    }

    /// Low for judging/extraction, high for creative generation.
    pub fn temperature(&self) -> f32 {
        match self {
            Operation::Analysis | Operation::AnswerEvaluation => 0.3,
            Operation::SummaryNarrative => 0.5,
            Operation::BulletRewrite => 0.7,
            Operation::Questions => 0.8,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            Operation::Analysis => 2000,
            Operation::Questions => 1500,
            Operation::AnswerEvaluation => 1000,
            Operation::BulletRewrite => 800,
            Operation::SummaryNarrative => 600,
        }
    }
}

#[derive(Clone)]
pub struct ResumeAnalyzer {
    /// `None` means fallback-only for the lifetime of this analyzer.
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl ResumeAnalyzer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Builds the provider client once from configuration.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let generator = OpenAiClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);
        match &generator {
            Some(g) => info!("Text generation provider configured (model: {})", g.model()),
            None => warn!(
                "OPENAI_API_KEY is missing or a placeholder; all operations will use local fallbacks"
            ),
        }
        Ok(Self::new(generator, config.llm_timeout))
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    pub fn model(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Operations
    // ────────────────────────────────────────────────────────────────────────

    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AppError> {
        require_text(resume_text, "Resume text")?;
        require_text(job_description, "Job description")?;

        let prompt = prompts::analysis_prompt(resume_text, job_description);
        let result = self
            .generate_structured(Operation::Analysis, prompt, validation::validate_analysis)
            .await;
        let analysis = recover(Operation::Analysis, result, fallback::sample_analysis);

        checked(Operation::Analysis, analysis, validation::validate_analysis)
    }

    pub async fn generate_questions(
        &self,
        resume_text: &str,
        job_description: &str,
        analysis: &Value,
        count: usize,
    ) -> Result<QuestionSet, AppError> {
        require_text(resume_text, "Resume text")?;
        require_text(job_description, "Job description")?;

        let count = count.clamp(1, MAX_QUESTION_COUNT);
        let keywords = missing_keywords_from(analysis);

        let prompt = prompts::question_prompt(resume_text, job_description, &keywords, count);
        let result = self
            .generate_structured::<QuestionList>(
                Operation::Questions,
                prompt,
                validation::validate_questions,
            )
            .await
            .map(|list| list.questions.into_iter().take(count).collect::<Vec<_>>());
        let questions = recover(Operation::Questions, result, || {
            fallback::fallback_questions(&keywords, count)
        });

        let envelope = json!({ "questions": questions });
        if !validation::validate_questions(&envelope) {
            return Err(schema_defect(Operation::Questions));
        }

        Ok(QuestionSet {
            total: questions.len(),
            questions,
            focus_areas: keywords.into_iter().take(FOCUS_AREA_COUNT).collect(),
        })
    }

    pub async fn evaluate_answer(&self, request: &AnswerRequest) -> Result<AnswerFeedback, AppError> {
        require_text(&request.question, "Question")?;
        require_text(&request.answer, "Answer")?;

        let prompt = prompts::answer_prompt(
            &request.question,
            &request.answer,
            &request.job_description,
            request.resume_context.as_deref(),
        );
        let result = self
            .generate_structured(
                Operation::AnswerEvaluation,
                prompt,
                validation::validate_answer_feedback,
            )
            .await;
        let feedback = recover(Operation::AnswerEvaluation, result, || {
            fallback::evaluate_answer(&request.answer)
        });

        checked(
            Operation::AnswerEvaluation,
            feedback,
            validation::validate_answer_feedback,
        )
    }

    pub async fn rewrite_bullet(&self, request: &RewriteRequest) -> Result<BulletRewrite, AppError> {
        require_text(&request.original_bullet, "Original bullet")?;
        require_text(&request.job_description, "Job description")?;

        let prompt = prompts::rewrite_prompt(
            &request.original_bullet,
            &request.job_description,
            request.resume_context.as_deref(),
        );
        let result = self
            .generate_structured::<BulletRewrite>(
                Operation::BulletRewrite,
                prompt,
                validation::validate_rewrite,
            )
            .await
            .map(|mut rewrite| {
                // The caller's text is the source of truth, whatever the model echoed.
                rewrite.original = request.original_bullet.clone();
                rewrite.note = None;
                rewrite
            });
        let rewrite = recover(Operation::BulletRewrite, result, || {
            fallback::rewrite_bullet(&request.original_bullet)
        });

        checked(Operation::BulletRewrite, rewrite, validation::validate_rewrite)
    }

    pub async fn summarize_interview(
        &self,
        session: &InterviewSessionRequest,
    ) -> Result<InterviewSummary, AppError> {
        let keywords = missing_keywords_from(&session.analysis);
        let mut summary = summary::aggregate(&session.answers, &keywords);
        debug!(
            "Summarized session {}: {} answers, overall_score={}",
            session.session_id.as_deref().unwrap_or("(anonymous)"),
            session.answers.len(),
            summary.overall_score
        );

        if self.is_available() {
            let prompt = prompts::summary_prompt(
                &summary,
                &session.questions,
                &keywords,
                &session.job_description,
            );
            let result = self
                .generate_structured::<SummaryNarrative>(
                    Operation::SummaryNarrative,
                    prompt,
                    validation::validate_summary_narrative,
                )
                .await;
            match result {
                Ok(narrative) => {
                    summary.recommendations = narrative.recommendations;
                    summary.next_steps = narrative.next_steps;
                }
                Err(e) => log_fallback(Operation::SummaryNarrative, &e),
            }
        }

        checked(Operation::SummaryNarrative, summary, validation::validate_summary)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Provider call
    // ────────────────────────────────────────────────────────────────────────

    /// One provider attempt, parsed, validated and deserialized into `T`.
    async fn generate_structured<T: DeserializeOwned>(
        &self,
        operation: Operation,
        prompt: PromptPair,
        validate: fn(&Value) -> bool,
    ) -> Result<T, LlmError> {
        let generator = self.generator.as_deref().ok_or(LlmError::Unavailable)?;

        let request = GenerationRequest {
            system: prompt.system,
            user: prompt.user,
            temperature: operation.temperature(),
            max_tokens: operation.max_tokens(),
            response_format: Some(JSON_OBJECT_FORMAT.to_string()),
        };

        let text = tokio::time::timeout(self.timeout, generator.generate(&request))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        let value: Value = parse_json_output(&text)?;
        if !validate(&value) {
            return Err(LlmError::SchemaMismatch);
        }
        let typed = serde_json::from_value(value)?;

        debug!("{} generated by {}", operation.name(), generator.model());
        Ok(typed)
    }
}

fn log_fallback(operation: Operation, error: &LlmError) {
    match error {
        // Already reported once at startup.
        LlmError::Unavailable => debug!("{}: no provider, using fallback", operation.name()),
        other => warn!("{}: generation failed ({other}); using fallback", operation.name()),
    }
}

fn recover<T>(operation: Operation, result: Result<T, LlmError>, fallback: impl FnOnce() -> T) -> T {
    result.unwrap_or_else(|e| {
        log_fallback(operation, &e);
        fallback()
    })
}

fn schema_defect(operation: Operation) -> AppError {
    AppError::Internal(anyhow::anyhow!(
        "{} produced a result that fails its own schema",
        operation.name()
    ))
}

/// Final gate before a result is returned.
fn checked<T: Serialize>(
    operation: Operation,
    result: T,
    validate: fn(&Value) -> bool,
) -> Result<T, AppError> {
    let value = serde_json::to_value(&result).map_err(|e| AppError::Internal(e.into()))?;
    if validate(&value) {
        Ok(result)
    } else {
        Err(schema_defect(operation))
    }
}
