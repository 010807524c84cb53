//! Request and result types for the five analysis operations.
//!
//! Result types are the static side of the schema contract: provider output is
//! checked structurally by `validation` first, then deserialized into these.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accepts any JSON number and rounds/clamps it into 0–100.
/// Models routinely answer `72.5` or `105` where an integer percentage is asked for.
fn percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("score must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

// ────────────────────────────────────────────────────────────────────────────
// Resume analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhyNotPassing {
    pub main_reasons: Vec<String>,
    pub ats_perspective: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingKeyword {
    pub keyword: String,
    pub importance: Importance,
    pub why_matters: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub experience_gaps: String,
    pub skills_gaps: String,
    pub qualification_gaps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub current_state: String,
    pub problem: String,
    pub impact: String,
}

/// Canonical resume-vs-JD analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "percentage")]
    pub match_score: u8,
    pub overall_assessment: String,
    pub why_not_passing: WhyNotPassing,
    pub missing_keywords: Vec<MissingKeyword>,
    pub gap_analysis: GapAnalysis,
    /// Section name → feedback. Ordered so serialization is stable.
    pub section_detailed_feedback: BTreeMap<String, SectionFeedback>,
    pub actionable_next_steps: Vec<String>,
}

/// Reads missing keyword names out of a caller-supplied analysis document.
///
/// Accepts both the canonical `[{"keyword": ...}]` shape and a bare list of
/// strings. Anything else yields an empty list.
pub fn missing_keywords_from(analysis: &Value) -> Vec<String> {
    analysis
        .get("missing_keywords")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(o) => o.get("keyword").and_then(Value::as_str),
                    _ => None,
                })
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Interview questions
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const MAX_QUESTION_COUNT: usize = 10;

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub resume_text: String,
    pub job_description: String,
    /// Result of a previous analysis call, passed back by the client.
    #[serde(default)]
    pub analysis: Value,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Technical,
    Behavioral,
    Situational,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub category: QuestionCategory,
    pub focus_area: String,
    pub why_asking: String,
}

/// Provider envelope for question generation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionList {
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSet {
    pub questions: Vec<InterviewQuestion>,
    pub total: usize,
    pub focus_areas: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Answer evaluation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub job_description: String,
    pub resume_context: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarStatus {
    Present,
    Weak,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarAnalysis {
    pub situation: StarStatus,
    pub task: StarStatus,
    pub action: StarStatus,
    pub result: StarStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    #[serde(deserialize_with = "percentage")]
    pub score: u8,
    pub star_analysis: StarAnalysis,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestion: String,
    pub example_reframe: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Interview summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLevel {
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Good,
    Excellent,
}

impl PerformanceLevel {
    /// <60 needs improvement, 60–79 good, ≥80 excellent.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => PerformanceLevel::Excellent,
            60..=79 => PerformanceLevel::Good,
            _ => PerformanceLevel::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::NeedsImprovement => "Needs Improvement",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Excellent => "Excellent",
        }
    }
}

/// Like `percentage`, but a missing, null or non-numeric value reads as 0.
fn lenient_percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw
        .as_f64()
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

/// Keeps the string entries of a list; anything else reads as empty.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}

/// One answer as posted back by the client. Only the fields the summary reads
/// are kept, and each may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnswerRecord {
    #[serde(default, deserialize_with = "lenient_percentage")]
    pub score: u8,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewSessionRequest {
    /// Echoed into the logs only.
    pub session_id: Option<String>,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub analysis: Value,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSummary {
    #[serde(deserialize_with = "percentage")]
    pub overall_score: u8,
    pub performance_level: PerformanceLevel,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

/// The part of a summary a provider may write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryNarrative {
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Bullet rewrite
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
    pub original_bullet: String,
    pub job_description: String,
    pub resume_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteImprovements {
    pub before_issues: Vec<String>,
    pub after_strengths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarBreakdown {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletRewrite {
    pub original: String,
    pub rewritten: String,
    pub improvements: RewriteImprovements,
    pub star_breakdown: StarBreakdown,
    pub keywords_added: Vec<String>,
    #[serde(deserialize_with = "percentage")]
    pub impact_score_improvement: u8,
    /// Set when the rewrite was produced by the local template, not a model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_percentage_rounds_and_clamps() {
        let feedback: AnswerFeedback = serde_json::from_value(json!({
            "score": 104.6,
            "star_analysis": {"situation": "present", "task": "weak", "action": "present", "result": "missing"},
            "strengths": [],
            "improvements": [],
            "suggestion": "",
            "example_reframe": ""
        }))
        .unwrap();
        assert_eq!(feedback.score, 100);
        assert_eq!(feedback.star_analysis.task, StarStatus::Weak);
    }

    #[test]
    fn test_percentage_rejects_strings() {
        let result: Result<InterviewSummary, _> = serde_json::from_value(json!({
            "overall_score": "eighty",
            "performance_level": "Good",
            "strengths": [], "improvements": [], "recommendations": [], "next_steps": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_performance_level_boundaries() {
        assert_eq!(PerformanceLevel::from_score(0), PerformanceLevel::NeedsImprovement);
        assert_eq!(PerformanceLevel::from_score(59), PerformanceLevel::NeedsImprovement);
        assert_eq!(PerformanceLevel::from_score(60), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_score(79), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_score(80), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_score(100), PerformanceLevel::Excellent);
    }

    #[test]
    fn test_performance_level_serializes_with_space() {
        let json = serde_json::to_string(&PerformanceLevel::NeedsImprovement).unwrap();
        assert_eq!(json, r#""Needs Improvement""#);
    }

    #[test]
    fn test_missing_keywords_from_objects_and_strings() {
        let canonical = json!({"missing_keywords": [
            {"keyword": "Docker", "importance": "critical", "why_matters": "x"},
            {"keyword": "  ", "importance": "high", "why_matters": "blank is dropped"},
            {"keyword": "Kubernetes", "importance": "high", "why_matters": "y"}
        ]});
        assert_eq!(missing_keywords_from(&canonical), vec!["Docker", "Kubernetes"]);

        let legacy = json!({"missing_keywords": ["AWS", 42, "Terraform"]});
        assert_eq!(missing_keywords_from(&legacy), vec!["AWS", "Terraform"]);
    }

    #[test]
    fn test_missing_keywords_from_absent_analysis() {
        assert!(missing_keywords_from(&Value::Null).is_empty());
        assert!(missing_keywords_from(&json!({"missing_keywords": "Docker"})).is_empty());
    }

    #[test]
    fn test_answer_record_tolerates_partial_objects() {
        let session: InterviewSessionRequest = serde_json::from_value(json!({
            "answers": [
                {"score": 72.6, "strengths": ["a", 3]},
                {"improvements": ["b"], "suggestion": "ignored"},
                {"score": "n/a", "strengths": "not a list"}
            ]
        }))
        .unwrap();
        assert_eq!(
            session.answers,
            vec![
                AnswerRecord {
                    score: 73,
                    strengths: vec!["a".to_string()],
                    improvements: vec![],
                },
                AnswerRecord {
                    score: 0,
                    strengths: vec![],
                    improvements: vec!["b".to_string()],
                },
                AnswerRecord::default(),
            ]
        );
        assert!(session.job_description.is_empty());
    }

    #[test]
    fn test_question_request_defaults() {
        let request: QuestionRequest = serde_json::from_value(json!({
            "resume_text": "r",
            "job_description": "j"
        }))
        .unwrap();
        assert_eq!(request.question_count, DEFAULT_QUESTION_COUNT);
        assert!(request.analysis.is_null());
    }

    #[test]
    fn test_rewrite_note_omitted_when_absent() {
        let rewrite = BulletRewrite {
            original: "a".to_string(),
            rewritten: "b".to_string(),
            improvements: RewriteImprovements {
                before_issues: vec![],
                after_strengths: vec![],
            },
            star_breakdown: StarBreakdown {
                situation: String::new(),
                task: String::new(),
                action: String::new(),
                result: String::new(),
            },
            keywords_added: vec![],
            impact_score_improvement: 10,
            note: None,
        };
        let json = serde_json::to_value(&rewrite).unwrap();
        assert!(json.get("note").is_none());
    }
}
