// Prompt templates for the five analysis operations.
// Each builder returns a (system, user) pair; nothing here validates or calls out.

use crate::analysis::models::InterviewSummary;
use crate::llm_client::prompts::{JSON_ONLY_RULES, MENTOR_TONE};

/// Resume text used as background context is capped at this many characters.
pub const RESUME_PREVIEW_CHARS: usize = 500;
/// Job-description text used as background context is capped at this many characters.
pub const JD_PREVIEW_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> &str {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Single-pass placeholder substitution. Values are inserted verbatim, so a
/// `{placeholder}` appearing inside user text is never expanded.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn system_prompt(persona: &str, schema: &str) -> String {
    format!("{persona} {MENTOR_TONE}\n\nOUTPUT SCHEMA (return exactly this structure):\n{schema}\n\n{JSON_ONLY_RULES}")
}

// ────────────────────────────────────────────────────────────────────────────
// Resume analysis
// ────────────────────────────────────────────────────────────────────────────

const ANALYSIS_PERSONA: &str = "You are an expert ATS (Applicant Tracking System) analyst \
    and career mentor. You explain exactly why a resume would or would not pass screening \
    for a specific job.";

pub const ANALYSIS_SCHEMA: &str = r#"{
  "match_score": 72,
  "overall_assessment": "Two to three sentences on how well the resume fits this role.",
  "why_not_passing": {
    "main_reasons": ["Most important reason the resume is filtered out", "Second reason"],
    "ats_perspective": "How an ATS keyword scan would rank this resume and why."
  },
  "missing_keywords": [
    {"keyword": "Docker", "importance": "critical", "why_matters": "Named in the core requirements."}
  ],
  "gap_analysis": {
    "experience_gaps": "Experience the role expects that the resume does not show.",
    "skills_gaps": "Skills the role expects that the resume does not show.",
    "qualification_gaps": "Certifications, degrees or seniority signals that are missing."
  },
  "section_detailed_feedback": {
    "Summary": {"current_state": "...", "problem": "...", "impact": "..."},
    "Experience": {"current_state": "...", "problem": "...", "impact": "..."},
    "Skills": {"current_state": "...", "problem": "...", "impact": "..."}
  },
  "actionable_next_steps": ["Concrete step the candidate can take this week"]
}"#;

const ANALYSIS_USER_TEMPLATE: &str = r#"Analyze the resume against the job description.

Rules:
1. match_score: integer 0-100 based on keyword matches, experience alignment and skill coverage
2. missing_keywords: 5-10 keywords or technologies from the job description absent from the resume; importance is one of "critical", "high", "medium"
3. section_detailed_feedback: one entry per resume section you can identify
4. actionable_next_steps: 3-5 specific actions, most impactful first

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}"#;

pub fn analysis_prompt(resume_text: &str, job_description: &str) -> PromptPair {
    PromptPair {
        system: system_prompt(ANALYSIS_PERSONA, ANALYSIS_SCHEMA),
        user: fill(
            ANALYSIS_USER_TEMPLATE,
            &[
                ("job_description", job_description.trim()),
                ("resume_text", resume_text.trim()),
            ],
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interview question generation
// ────────────────────────────────────────────────────────────────────────────

const QUESTION_PERSONA: &str = "You are an experienced technical interviewer preparing a \
    mock interview. You probe the candidate's weak areas for this specific role.";

pub const QUESTION_SCHEMA: &str = r#"{
  "questions": [
    {
      "question": "The question exactly as you would ask it",
      "category": "technical",
      "focus_area": "Skill or theme the question probes",
      "why_asking": "One sentence on what this question reveals"
    }
  ]
}"#;

const QUESTION_USER_TEMPLATE: &str = r#"Write exactly {count} interview questions for this candidate.

Rules:
1. category is one of "technical", "behavioral", "situational"
2. Prioritise the skill gaps listed below; at least half the questions should target them
3. Mix categories; never ask two questions about the same focus_area
4. Questions must be answerable in 2-3 minutes

SKILL GAPS FROM RESUME ANALYSIS:
{missing_keywords}

JOB DESCRIPTION:
{job_description}

RESUME EXCERPT:
{resume_excerpt}"#;

pub fn question_prompt(
    resume_text: &str,
    job_description: &str,
    missing_keywords: &[String],
    count: usize,
) -> PromptPair {
    let keywords = if missing_keywords.is_empty() {
        "(none identified)".to_string()
    } else {
        missing_keywords.join(", ")
    };
    let count = count.to_string();
    PromptPair {
        system: system_prompt(QUESTION_PERSONA, QUESTION_SCHEMA),
        user: fill(
            QUESTION_USER_TEMPLATE,
            &[
                ("count", count.as_str()),
                ("missing_keywords", keywords.as_str()),
                ("job_description", preview(job_description, JD_PREVIEW_CHARS)),
                ("resume_excerpt", preview(resume_text, RESUME_PREVIEW_CHARS)),
            ],
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Answer evaluation
// ────────────────────────────────────────────────────────────────────────────

const ANSWER_PERSONA: &str = "You are an interview coach who grades answers with the STAR \
    framework (Situation, Task, Action, Result).";

pub const ANSWER_SCHEMA: &str = r#"{
  "score": 65,
  "star_analysis": {
    "situation": "present",
    "task": "weak",
    "action": "present",
    "result": "missing"
  },
  "strengths": ["What the answer did well"],
  "improvements": ["What the answer should add or change"],
  "suggestion": "The single most valuable change to make",
  "example_reframe": "A short rewrite of the answer that follows STAR"
}"#;

const ANSWER_USER_TEMPLATE: &str = r#"Grade the candidate's answer.

Rules:
1. score: integer 0-100
2. each star_analysis value is one of "present", "weak", "missing"
3. strengths and improvements: 1-3 items each, specific to this answer
4. example_reframe must keep the candidate's facts; do not invent achievements

QUESTION:
{question}

ANSWER:
{answer}

ROLE CONTEXT:
{job_description}

CANDIDATE BACKGROUND:
{resume_context}"#;

pub fn answer_prompt(
    question: &str,
    answer: &str,
    job_description: &str,
    resume_context: Option<&str>,
) -> PromptPair {
    let background = resume_context
        .map(|c| preview(c, RESUME_PREVIEW_CHARS))
        .filter(|c| !c.is_empty())
        .unwrap_or("(not provided)");
    let role = match preview(job_description, JD_PREVIEW_CHARS) {
        "" => "(not provided)",
        jd => jd,
    };
    PromptPair {
        system: system_prompt(ANSWER_PERSONA, ANSWER_SCHEMA),
        user: fill(
            ANSWER_USER_TEMPLATE,
            &[
                ("question", question.trim()),
                ("answer", answer.trim()),
                ("job_description", role),
                ("resume_context", background),
            ],
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bullet rewrite
// ────────────────────────────────────────────────────────────────────────────

const REWRITE_PERSONA: &str = "You are a resume writer who turns task-oriented bullet points \
    into impact-oriented STAR bullets tailored to a target job.";

pub const REWRITE_SCHEMA: &str = r#"{
  "original": "The bullet exactly as given",
  "rewritten": "Led migration of 12 services to Kubernetes, cutting deploy time by 40%",
  "improvements": {
    "before_issues": ["What was weak about the original"],
    "after_strengths": ["What the rewrite does better"]
  },
  "star_breakdown": {
    "situation": "Context implied by the bullet",
    "task": "What needed to be done",
    "action": "What the candidate did",
    "result": "The measurable outcome"
  },
  "keywords_added": ["Kubernetes"],
  "impact_score_improvement": 35
}"#;

const REWRITE_USER_TEMPLATE: &str = r#"Rewrite this resume bullet.

Rules:
1. Start with a strong action verb; one sentence; under 30 words
2. Quantify the result; if no number is known, use a clearly conservative estimate
3. Work in job-description keywords only where they are truthful for this bullet
4. impact_score_improvement: integer 0-100, how much stronger the rewrite is

ORIGINAL BULLET:
{original_bullet}

TARGET JOB DESCRIPTION:
{job_description}

OTHER RESUME CONTEXT:
{resume_context}"#;

pub fn rewrite_prompt(
    original_bullet: &str,
    job_description: &str,
    resume_context: Option<&str>,
) -> PromptPair {
    let background = resume_context
        .map(|c| preview(c, RESUME_PREVIEW_CHARS))
        .filter(|c| !c.is_empty())
        .unwrap_or("(not provided)");
    PromptPair {
        system: system_prompt(REWRITE_PERSONA, REWRITE_SCHEMA),
        user: fill(
            REWRITE_USER_TEMPLATE,
            &[
                ("original_bullet", original_bullet.trim()),
                ("job_description", preview(job_description, JD_PREVIEW_CHARS)),
                ("resume_context", background),
            ],
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interview summary narrative
// ────────────────────────────────────────────────────────────────────────────

const SUMMARY_PERSONA: &str = "You are an interview coach writing the closing debrief of a \
    mock interview. Scores are already computed; you only write the advice.";

pub const SUMMARY_SCHEMA: &str = r#"{
  "recommendations": ["Specific recommendation tied to a gap or weak answer"],
  "next_steps": ["Concrete thing to do before the real interview"]
}"#;

const SUMMARY_USER_TEMPLATE: &str = r#"Write recommendations and next steps for this candidate.

Rules:
1. 3-4 recommendations; reference the skill gaps by name where relevant
2. 3-4 next steps, ordered by priority

OVERALL SCORE: {overall_score} ({performance_level})
STRENGTHS: {strengths}
IMPROVEMENTS: {improvements}
SKILL GAPS FROM RESUME ANALYSIS: {missing_keywords}

TARGET ROLE:
{job_description}

QUESTIONS ASKED:
{questions}"#;

pub fn summary_prompt(
    aggregate: &InterviewSummary,
    questions: &[String],
    missing_keywords: &[String],
    job_description: &str,
) -> PromptPair {
    let score = aggregate.overall_score.to_string();
    let join_or_none = |items: &[String]| {
        if items.is_empty() {
            "(none)".to_string()
        } else {
            items.join("; ")
        }
    };
    let strengths = join_or_none(&aggregate.strengths);
    let improvements = join_or_none(&aggregate.improvements);
    let keywords = join_or_none(missing_keywords);
    let role = match preview(job_description, JD_PREVIEW_CHARS).trim() {
        "" => "(not provided)",
        jd => jd,
    };
    let asked = if questions.is_empty() {
        "(not recorded)".to_string()
    } else {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    PromptPair {
        system: system_prompt(SUMMARY_PERSONA, SUMMARY_SCHEMA),
        user: fill(
            SUMMARY_USER_TEMPLATE,
            &[
                ("overall_score", score.as_str()),
                ("performance_level", aggregate.performance_level.label()),
                ("strengths", strengths.as_str()),
                ("improvements", improvements.as_str()),
                ("missing_keywords", keywords.as_str()),
                ("job_description", role),
                ("questions", asked.as_str()),
            ],
        ),
    }
}
