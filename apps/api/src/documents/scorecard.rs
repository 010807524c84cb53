//! Job-readiness scorecard: a layout-free document built from an analysis
//! result and, optionally, an interview summary.
//!
//! Both inputs arrive from the client as loose JSON, so every field is read
//! leniently: a missing or mistyped field becomes an empty value rather than an error.
//! Rendering to PDF lives in `render`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

pub const TITLE: &str = "HireSense";
pub const SUBTITLE: &str = "Job Readiness Scorecard";
pub const REPORT_TYPE: &str = "Resume Analysis & Interview Performance";
pub const DEFAULT_CANDIDATE: &str = "Candidate";

const ASSESSMENT_CHARS: usize = 200;
const KEYWORD_REASON_CHARS: usize = 100;
const MAX_KEY_ISSUES: usize = 3;
const MAX_KEYWORDS: usize = 5;
const MAX_ACTIONS: usize = 5;
const MAX_INTERVIEW_ITEMS: usize = 3;
const MAX_INTERVIEW_NEXT_STEPS: usize = 4;

fn default_candidate() -> String {
    DEFAULT_CANDIDATE.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScorecardRequest {
    #[serde(default)]
    pub analysis: Value,
    pub interview_summary: Option<Value>,
    #[serde(default = "default_candidate")]
    pub candidate_name: String,
}

/// Colour band for a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Moderate,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => ScoreBand::Good,
            50..=69 => ScoreBand::Moderate,
            _ => ScoreBand::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Good => "Good Match",
            ScoreBand::Moderate => "Moderate Match",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }

    /// Hex colour used for the score box.
    pub fn colour(&self) -> &'static str {
        match self {
            ScoreBand::Good => "#10b981",
            ScoreBand::Moderate => "#f59e0b",
            ScoreBand::NeedsImprovement => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRow {
    pub keyword: String,
    /// Upper-cased importance, e.g. `CRITICAL`.
    pub importance: String,
    pub why_matters: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeSection {
    pub score: u8,
    pub band: ScoreBand,
    pub assessment: String,
    pub key_issues: Vec<String>,
    pub missing_keywords: Vec<KeywordRow>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewSection {
    pub score: u8,
    pub band: ScoreBand,
    pub performance_level: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Scorecard {
    pub report_id: Uuid,
    pub candidate_name: String,
    pub generated_at: DateTime<Utc>,
    pub resume: ResumeSection,
    pub interview: Option<InterviewSection>,
}

impl Scorecard {
    pub fn build(analysis: &Value, summary: Option<&Value>, candidate_name: &str) -> Self {
        Self::build_at(analysis, summary, candidate_name, Utc::now())
    }

    pub fn build_at(
        analysis: &Value,
        summary: Option<&Value>,
        candidate_name: &str,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let candidate_name = match candidate_name.trim() {
            "" => DEFAULT_CANDIDATE.to_string(),
            name => name.to_string(),
        };

        let score = score_field(analysis, "match_score");
        let resume = ResumeSection {
            score,
            band: ScoreBand::from_score(score),
            assessment: truncate_with_ellipsis(
                &string_field(analysis, "overall_assessment"),
                ASSESSMENT_CHARS,
            ),
            key_issues: string_list(
                analysis.get("why_not_passing").unwrap_or(&Value::Null),
                "main_reasons",
                MAX_KEY_ISSUES,
            ),
            missing_keywords: keyword_rows(analysis),
            actions: string_list(analysis, "actionable_next_steps", MAX_ACTIONS),
        };

        // An empty object counts as "no interview", same as null.
        let interview = summary
            .filter(|s| s.as_object().is_some_and(|o| !o.is_empty()))
            .map(|s| {
                let score = score_field(s, "overall_score");
                let level = string_field(s, "performance_level");
                InterviewSection {
                    score,
                    band: ScoreBand::from_score(score),
                    performance_level: if level.is_empty() { "N/A".to_string() } else { level },
                    strengths: string_list(s, "strengths", MAX_INTERVIEW_ITEMS),
                    improvements: string_list(s, "improvements", MAX_INTERVIEW_ITEMS),
                    next_steps: string_list(s, "next_steps", MAX_INTERVIEW_NEXT_STEPS),
                }
            });

        Scorecard {
            report_id: Uuid::new_v4(),
            candidate_name,
            generated_at,
            resume,
            interview,
        }
    }

    /// e.g. `October 19, 2026`
    pub fn date_label(&self) -> String {
        self.generated_at.format("%B %d, %Y").to_string()
    }

    pub fn footer(&self) -> String {
        format!(
            "Generated by HireSense AI • {}",
            self.generated_at.format("%B %d, %Y at %I:%M %p UTC")
        )
    }

    /// Attachment name: `HireSense_Scorecard_<name>.pdf`, spaces as underscores.
    /// Characters that would break a `Content-Disposition` header are dropped.
    pub fn filename(&self) -> String {
        let name: String = self
            .candidate_name
            .chars()
            .map(|c| if c == ' ' { '_' } else { c })
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            .collect();
        let name = if name.is_empty() { DEFAULT_CANDIDATE } else { &name };
        format!("HireSense_Scorecard_{name}.pdf")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field access
// ────────────────────────────────────────────────────────────────────────────

fn score_field(doc: &Value, key: &str) -> u8 {
    doc.get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

fn string_field(doc: &Value, key: &str) -> String {
    doc.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn string_list(doc: &Value, key: &str, limit: usize) -> Vec<String> {
    doc.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(limit)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn keyword_rows(analysis: &Value) -> Vec<KeywordRow> {
    let Some(items) = analysis.get("missing_keywords").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(KeywordRow {
                keyword: s.trim().to_string(),
                importance: String::new(),
                why_matters: String::new(),
            }),
            Value::Object(_) => Some(KeywordRow {
                keyword: string_field(item, "keyword"),
                importance: string_field(item, "importance").to_uppercase(),
                why_matters: truncate_with_ellipsis(
                    &string_field(item, "why_matters"),
                    KEYWORD_REASON_CHARS,
                ),
            }),
            _ => None,
        })
        .filter(|row| !row.keyword.is_empty())
        .take(MAX_KEYWORDS)
        .collect()
}

/// First `max_chars` characters plus `...` when anything was cut.
fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 15, 30, 0).unwrap()
    }

    fn analysis() -> Value {
        json!({
            "match_score": 64,
            "overall_assessment": "a".repeat(250),
            "why_not_passing": {"main_reasons": ["r1", "r2", "r3", "r4"], "ats_perspective": "x"},
            "missing_keywords": [
                {"keyword": "Docker", "importance": "critical", "why_matters": "b".repeat(150)},
                {"keyword": "Kubernetes", "importance": "high", "why_matters": "Orchestration."},
                "Terraform",
                {"keyword": "AWS", "importance": "medium", "why_matters": ""},
                {"keyword": "Go", "importance": "medium", "why_matters": ""},
                {"keyword": "Helm", "importance": "medium", "why_matters": ""}
            ],
            "actionable_next_steps": ["s1", "s2", "s3", "s4", "s5", "s6"]
        })
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(70), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(69), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::Good.colour(), "#10b981");
        assert_eq!(ScoreBand::NeedsImprovement.label(), "Needs Improvement");
    }

    #[test]
    fn test_resume_section_is_truncated_and_capped() {
        let card = Scorecard::build_at(&analysis(), None, "Jane Doe", fixed_time());
        let resume = &card.resume;
        assert_eq!(resume.score, 64);
        assert_eq!(resume.band, ScoreBand::Moderate);
        assert_eq!(resume.assessment.chars().count(), 203);
        assert!(resume.assessment.ends_with("..."));
        assert_eq!(resume.key_issues, vec!["r1", "r2", "r3"]);
        assert_eq!(resume.actions.len(), 5);

        assert_eq!(resume.missing_keywords.len(), 5);
        assert_eq!(resume.missing_keywords[0].importance, "CRITICAL");
        assert_eq!(resume.missing_keywords[0].why_matters.chars().count(), 103);
        assert_eq!(resume.missing_keywords[1].why_matters, "Orchestration.");
        assert_eq!(resume.missing_keywords[2].keyword, "Terraform");
        assert!(card.interview.is_none());
    }

    #[test]
    fn test_interview_section_caps_lists() {
        let summary = json!({
            "overall_score": 82,
            "performance_level": "Excellent",
            "strengths": ["a", "b", "c", "d"],
            "improvements": ["e"],
            "next_steps": ["1", "2", "3", "4", "5"]
        });
        let card = Scorecard::build_at(&analysis(), Some(&summary), "Jane", fixed_time());
        let interview = card.interview.unwrap();
        assert_eq!(interview.score, 82);
        assert_eq!(interview.band, ScoreBand::Good);
        assert_eq!(interview.strengths.len(), 3);
        assert_eq!(interview.next_steps.len(), 4);
    }

    #[test]
    fn test_empty_summary_is_no_interview() {
        let card = Scorecard::build_at(&analysis(), Some(&json!({})), "Jane", fixed_time());
        assert!(card.interview.is_none());
    }

    #[test]
    fn test_garbage_analysis_does_not_panic() {
        let card = Scorecard::build_at(&json!("nope"), Some(&json!([1])), "", fixed_time());
        assert_eq!(card.resume.score, 0);
        assert!(card.resume.missing_keywords.is_empty());
        assert_eq!(card.candidate_name, DEFAULT_CANDIDATE);
        assert!(card.interview.is_none());
    }

    #[test]
    fn test_filename_and_dates() {
        let card = Scorecard::build_at(&analysis(), None, "Jane Q Doe", fixed_time());
        assert_eq!(card.filename(), "HireSense_Scorecard_Jane_Q_Doe.pdf");
        assert_eq!(card.date_label(), "March 04, 2026");
        assert_eq!(card.footer(), "Generated by HireSense AI • March 04, 2026 at 03:30 PM UTC");
    }

    #[test]
    fn test_filename_drops_header_breaking_characters() {
        let card = Scorecard::build_at(&analysis(), None, "Eve \"x\"\r\n", fixed_time());
        assert_eq!(card.filename(), "HireSense_Scorecard_Eve_x.pdf");
    }

    #[test]
    fn test_report_ids_are_unique() {
        let a = Scorecard::build(&analysis(), None, "A");
        let b = Scorecard::build(&analysis(), None, "A");
        assert_ne!(a.report_id, b.report_id);
    }
}
