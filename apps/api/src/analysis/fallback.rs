//! Deterministic local stand-ins for each generated result.
//!
//! Used when no provider is configured, or when the provider's output cannot
//! be parsed or fails validation. Every function here is pure: same input,
//! same output, no I/O, no randomness. Every result is schema-complete.

use std::collections::BTreeMap;

use crate::analysis::models::{
    AnalysisResult, AnswerFeedback, BulletRewrite, GapAnalysis, Importance, InterviewQuestion,
    MissingKeyword, QuestionCategory, RewriteImprovements, SectionFeedback, StarAnalysis,
    StarBreakdown, StarStatus, WhyNotPassing,
};

// ────────────────────────────────────────────────────────────────────────────
// Resume analysis
// ────────────────────────────────────────────────────────────────────────────

pub const SAMPLE_ANALYSIS_LABEL: &str = "Sample analysis (no AI provider available):";

fn keyword(keyword: &str, importance: Importance, why_matters: &str) -> MissingKeyword {
    MissingKeyword {
        keyword: keyword.to_string(),
        importance,
        why_matters: why_matters.to_string(),
    }
}

fn section(current_state: &str, problem: &str, impact: &str) -> SectionFeedback {
    SectionFeedback {
        current_state: current_state.to_string(),
        problem: problem.to_string(),
        impact: impact.to_string(),
    }
}

/// Fixed exemplar analysis so an unconfigured deployment still works end to end.
/// It does not look at the inputs.
pub fn sample_analysis() -> AnalysisResult {
    let mut sections = BTreeMap::new();
    sections.insert(
        "Summary".to_string(),
        section(
            "Generic statement about problem-solving and teamwork.",
            "Does not name the target role, years of experience or the core technologies in the job description.",
            "Recruiters skim the summary first; a generic one reads as a mass application.",
        ),
    );
    sections.insert(
        "Experience".to_string(),
        section(
            "Lists responsibilities such as developing features and fixing bugs.",
            "No metrics for scale, performance or team size, and no infrastructure ownership.",
            "Without numbers the impact of the work cannot be compared with other candidates.",
        ),
    );
    sections.insert(
        "Skills".to_string(),
        section(
            "Application languages and frameworks.",
            "Cloud, container and CI/CD tooling from the requirements is absent.",
            "ATS keyword filters for this role will rank the resume low.",
        ),
    );

    AnalysisResult {
        match_score: 72,
        overall_assessment: format!(
            "{SAMPLE_ANALYSIS_LABEL} the resume shows a solid software engineering foundation, \
             but it is missing several infrastructure skills the role treats as core, and the \
             experience section describes tasks rather than measurable outcomes."
        ),
        why_not_passing: WhyNotPassing {
            main_reasons: vec![
                "Container and orchestration tools (Docker, Kubernetes) named in the requirements do not appear anywhere.".to_string(),
                "Experience bullets describe duties without quantified results.".to_string(),
                "The summary is not tailored to the target role.".to_string(),
            ],
            ats_perspective: "A keyword-based screen would match the general programming terms \
                but miss most of the required platform keywords, placing the resume below the \
                typical shortlist threshold."
                .to_string(),
        },
        missing_keywords: vec![
            keyword("Docker", Importance::Critical, "Listed as a core requirement; most screens filter on it directly."),
            keyword("Kubernetes", Importance::Critical, "Container orchestration is central to the day-to-day work of the role."),
            keyword("CI/CD", Importance::High, "The role owns build and deployment pipelines."),
            keyword("Microservices", Importance::High, "The target architecture is service-based."),
            keyword("System Design", Importance::Medium, "Signals the ability to reason about scale and trade-offs."),
            keyword("AWS Lambda", Importance::Medium, "Serverless components appear in the listed stack."),
        ],
        gap_analysis: GapAnalysis {
            experience_gaps: "No evidence of operating production infrastructure or owning deployments.".to_string(),
            skills_gaps: "Containers, orchestration, CI/CD pipelines and cloud services.".to_string(),
            qualification_gaps: "No cloud certification; not required, but it would offset the missing hands-on experience.".to_string(),
        },
        section_detailed_feedback: sections,
        actionable_next_steps: vec![
            "Containerise an existing project with Docker and deploy it to a managed Kubernetes cluster.".to_string(),
            "Rewrite each experience bullet to lead with an action verb and end with a measurable result.".to_string(),
            "Add a skills line for the cloud and CI/CD tools you have used, even briefly.".to_string(),
            "Tailor the summary to name the role and its two or three core technologies.".to_string(),
        ],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interview questions
// ────────────────────────────────────────────────────────────────────────────

/// One technical question per missing keyword.
pub fn keyword_question(keyword: &str) -> InterviewQuestion {
    InterviewQuestion {
        question: format!(
            "Can you describe your experience with {keyword}? How would you approach learning it if you haven't used it directly?"
        ),
        category: QuestionCategory::Technical,
        focus_area: keyword.to_string(),
        why_asking: format!(
            "The role calls for {keyword}, which is not evident in your resume."
        ),
    }
}

/// Generic questions used to pad the list, in this order.
pub fn generic_questions() -> Vec<InterviewQuestion> {
    vec![
        InterviewQuestion {
            question: "Tell me about a time you had to learn a new technology quickly to deliver a project. How did you approach it?".to_string(),
            category: QuestionCategory::Behavioral,
            focus_area: "Learning agility".to_string(),
            why_asking: "Shows how you close skill gaps under time pressure.".to_string(),
        },
        InterviewQuestion {
            question: "Suppose a system you own starts failing under production load. How would you investigate and what would you change?".to_string(),
            category: QuestionCategory::Situational,
            focus_area: "Technical depth".to_string(),
            why_asking: "Reveals how deeply you understand the systems you build.".to_string(),
        },
        InterviewQuestion {
            question: "Describe a disagreement with a teammate about a technical decision. How was it resolved?".to_string(),
            category: QuestionCategory::Behavioral,
            focus_area: "Team conflict".to_string(),
            why_asking: "Shows how you collaborate and handle conflict.".to_string(),
        },
    ]
}

/// Keyword questions first (input order), then the generic pool in fixed order,
/// until `count` is reached or both sources run out.
pub fn fallback_questions(missing_keywords: &[String], count: usize) -> Vec<InterviewQuestion> {
    let mut questions: Vec<InterviewQuestion> = missing_keywords
        .iter()
        .take(count)
        .map(|k| keyword_question(k))
        .collect();

    let padding = count.saturating_sub(questions.len());
    questions.extend(generic_questions().into_iter().take(padding));
    questions
}

// ────────────────────────────────────────────────────────────────────────────
// Answer evaluation
// ────────────────────────────────────────────────────────────────────────────

const BASE_SCORE: i32 = 50;
const LONG_ANSWER_WORDS: usize = 50;
const SHORT_ANSWER_WORDS: usize = 20;
const LENGTH_ADJUSTMENT: i32 = 10;

const SITUATION_CUES: &[&str] = &["when", "while", "during", "at", "in my role"];
const TASK_CUES: &[&str] = &["needed to", "required", "had to", "was responsible", "objective"];
const ACTION_CUES: &[&str] = &["i", "implemented", "developed", "created", "led", "managed"];
const RESULT_CUES: &[&str] = &["resulted", "achieved", "improved", "increased", "reduced", "%"];

/// Lower-cased answer with every non-alphanumeric run collapsed to one space,
/// padded so that `" cue "` lookups match whole words and phrases only.
struct CueText {
    raw: String,
    words: String,
}

impl CueText {
    fn new(answer: &str) -> Self {
        let lowered = answer.to_lowercase();
        let words = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            raw: lowered,
            words: format!(" {words} "),
        }
    }

    fn has(&self, cue: &str) -> bool {
        if cue.chars().all(char::is_alphanumeric) || cue.contains(' ') {
            self.words.contains(&format!(" {cue} "))
        } else {
            self.raw.contains(cue)
        }
    }

    fn has_any(&self, cues: &[&str]) -> bool {
        cues.iter().any(|c| self.has(c))
    }
}

fn status(found: bool) -> StarStatus {
    if found {
        StarStatus::Present
    } else {
        StarStatus::Missing
    }
}

/// Rule-based STAR scorer.
///
/// Base 50; situation +10, task +10, action +15, result +15; ≥50 words +10,
/// <20 words −10; clamped to 0–100.
pub fn evaluate_answer(answer: &str) -> AnswerFeedback {
    let text = CueText::new(answer);
    let situation = text.has_any(SITUATION_CUES);
    let task = text.has_any(TASK_CUES);
    let action = text.has_any(ACTION_CUES);
    let result = text.has_any(RESULT_CUES);
    let word_count = answer.split_whitespace().count();

    let mut score = BASE_SCORE;
    if situation {
        score += 10;
    }
    if task {
        score += 10;
    }
    if action {
        score += 15;
    }
    if result {
        score += 15;
    }
    if word_count >= LONG_ANSWER_WORDS {
        score += LENGTH_ADJUSTMENT;
    } else if word_count < SHORT_ANSWER_WORDS {
        score -= LENGTH_ADJUSTMENT;
    }
    let score = score.clamp(0, 100) as u8;

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();

    if situation {
        strengths.push("Set the scene with clear context".to_string());
    } else {
        improvements.push("Open with the situation: where you were and what was happening".to_string());
    }
    if task {
        strengths.push("Explained what you were responsible for".to_string());
    } else {
        improvements.push("State the task or goal you owned".to_string());
    }
    if action {
        strengths.push("Described the specific actions you took".to_string());
    } else {
        improvements.push("Describe what you personally did, using \"I\" rather than \"we\"".to_string());
    }
    if result {
        strengths.push("Shared a concrete outcome".to_string());
    } else {
        improvements.push("Finish with a measurable result (numbers, percentages, time saved)".to_string());
    }
    if word_count >= LONG_ANSWER_WORDS {
        strengths.push("Gave a detailed, well-developed answer".to_string());
    } else if word_count < SHORT_ANSWER_WORDS {
        improvements.push("Expand your answer; aim for at least 50 words of specific detail".to_string());
    }

    if strengths.is_empty() {
        strengths.push("Attempted to address the question directly".to_string());
    }
    if improvements.is_empty() {
        improvements.push("Keep practising to tighten delivery and timing".to_string());
    }

    let suggestion = if !result {
        "Close every answer with the outcome and a number that shows its impact."
    } else if !situation || !task {
        "Give one or two sentences of context before describing your actions."
    } else if !action {
        "Spend most of the answer on the steps you personally took."
    } else {
        "Strong structure. Tailor the example more closely to the role's requirements."
    };

    AnswerFeedback {
        score,
        star_analysis: StarAnalysis {
            situation: status(situation),
            task: status(task),
            action: status(action),
            result: status(result),
        },
        strengths,
        improvements,
        suggestion: suggestion.to_string(),
        example_reframe: "In my role at [company], [situation]. I needed to [task]. \
            I [specific actions], which resulted in [measurable result]."
            .to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bullet rewrite
// ────────────────────────────────────────────────────────────────────────────

pub const ACTION_VERBS: &[&str] = &[
    "Led",
    "Developed",
    "Implemented",
    "Managed",
    "Created",
    "Optimized",
    "Designed",
];
pub const DEFAULT_VERB: &str = "Developed";
pub const METRIC_CLAUSE: &str = "improving efficiency by 20%";
pub const TEMPLATE_IMPACT_IMPROVEMENT: u8 = 35;
pub const TEMPLATE_NOTE: &str = "Template-based rewrite produced without an AI model. \
    Replace the placeholder metric with your real numbers.";

fn starts_with_action_verb(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .is_some_and(|first| ACTION_VERBS.iter().any(|v| v.eq_ignore_ascii_case(first)))
}

/// Verb + metric template rewrite.
pub fn rewrite_bullet(original: &str) -> BulletRewrite {
    let trimmed = original.trim();
    let has_verb = starts_with_action_verb(trimmed);
    let has_metric = trimmed.chars().any(|c| c.is_ascii_digit());

    let mut rewritten = if has_verb {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_VERB} {}", trimmed.to_lowercase())
    };
    if !has_metric {
        let base = rewritten.trim_end_matches('.').to_string();
        rewritten = format!("{base}, {METRIC_CLAUSE}");
    }

    let mut before_issues = Vec::new();
    let mut after_strengths = Vec::new();
    if has_verb {
        after_strengths.push("Keeps the original action verb".to_string());
    } else {
        before_issues.push("Does not open with a strong action verb".to_string());
        after_strengths.push(format!("Opens with the action verb \"{DEFAULT_VERB}\""));
    }
    if has_metric {
        after_strengths.push("Keeps the original quantified detail".to_string());
    } else {
        before_issues.push("No quantified result".to_string());
        after_strengths.push("Adds a placeholder metric to show impact".to_string());
    }
    if before_issues.is_empty() {
        before_issues.push("Could tie more directly to the target role".to_string());
    }

    BulletRewrite {
        original: original.to_string(),
        rewritten,
        improvements: RewriteImprovements {
            before_issues,
            after_strengths,
        },
        star_breakdown: StarBreakdown {
            situation: "Context of the project or team (add specifics)".to_string(),
            task: "The goal or problem you were responsible for".to_string(),
            action: "The steps you personally took".to_string(),
            result: "The measurable outcome of your work".to_string(),
        },
        keywords_added: Vec::new(),
        impact_score_improvement: TEMPLATE_IMPACT_IMPROVEMENT,
        note: Some(TEMPLATE_NOTE.to_string()),
    }
}
