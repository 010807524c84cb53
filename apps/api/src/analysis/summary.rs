//! Interview summary aggregation. Always computed locally.
//!
//! A provider, when available, may only replace the narrative part
//! (`recommendations`, `next_steps`); scores and lists come from here.

use std::collections::HashSet;

use crate::analysis::models::{AnswerRecord, InterviewSummary, PerformanceLevel, SummaryNarrative};

pub const MAX_SUMMARY_ITEMS: usize = 3;
const MAX_KEYWORD_RECOMMENDATIONS: usize = 3;

const GENERIC_STRENGTHS: &[&str] = &[
    "Completed the full mock interview",
    "Engaged with every question asked",
];
const GENERIC_IMPROVEMENTS: &[&str] = &[
    "Structure answers with the STAR framework",
    "Support claims with specific, measurable results",
];

/// Rounded mean of the answer scores; 0 when there are none.
/// An answer posted without a score counts as 0.
pub fn overall_score(answers: &[AnswerRecord]) -> u8 {
    if answers.is_empty() {
        return 0;
    }
    let total: f64 = answers.iter().map(|a| f64::from(a.score)).sum();
    (total / answers.len() as f64).round().clamp(0.0, 100.0) as u8
}

/// First-seen-order dedup (case-insensitive, trimmed), capped at `limit`.
fn dedup_capped<'a>(items: impl Iterator<Item = &'a String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn or_generic(items: Vec<String>, generic: &[&str]) -> Vec<String> {
    if items.is_empty() {
        generic.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}

/// Local recommendations and next steps.
pub fn local_narrative(level: PerformanceLevel, missing_keywords: &[String]) -> SummaryNarrative {
    let mut recommendations: Vec<String> = missing_keywords
        .iter()
        .take(MAX_KEYWORD_RECOMMENDATIONS)
        .map(|k| {
            format!("Build hands-on experience with {k} and prepare a concrete example of using it")
        })
        .collect();
    recommendations.push(
        "Practise answering with the STAR framework: situation, task, action, result".to_string(),
    );
    if missing_keywords.is_empty() {
        recommendations.push(
            "Review the job description and prepare one story for each core requirement"
                .to_string(),
        );
    }

    let next_steps = match level {
        PerformanceLevel::Excellent => vec![
            "Apply to the role with your tailored resume".to_string(),
            "Prepare thoughtful questions to ask the interviewer".to_string(),
            "Research the company's recent products and engineering blog".to_string(),
        ],
        PerformanceLevel::Good => vec![
            "Rework your weakest answers and practise them aloud".to_string(),
            "Add measurable results to each of your prepared stories".to_string(),
            "Run another mock interview in a few days".to_string(),
        ],
        PerformanceLevel::NeedsImprovement => vec![
            "Close the top skill gaps before applying".to_string(),
            "Write out STAR answers for the most common behavioral questions".to_string(),
            "Run a full mock interview again once the gaps are addressed".to_string(),
            "Ask a peer or mentor to review your answers".to_string(),
        ],
    };

    SummaryNarrative {
        recommendations,
        next_steps,
    }
}

/// Combines per-answer feedback into an overall summary.
pub fn aggregate(answers: &[AnswerRecord], missing_keywords: &[String]) -> InterviewSummary {
    let overall = overall_score(answers);
    let level = PerformanceLevel::from_score(overall);

    let strengths = dedup_capped(answers.iter().flat_map(|a| a.strengths.iter()), MAX_SUMMARY_ITEMS);
    let improvements = dedup_capped(
        answers.iter().flat_map(|a| a.improvements.iter()),
        MAX_SUMMARY_ITEMS,
    );
    let narrative = local_narrative(level, missing_keywords);

    InterviewSummary {
        overall_score: overall,
        performance_level: level,
        strengths: or_generic(strengths, GENERIC_STRENGTHS),
        improvements: or_generic(improvements, GENERIC_IMPROVEMENTS),
        recommendations: narrative.recommendations,
        next_steps: narrative.next_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::validation::validate_summary;

    fn feedback(score: u8, strengths: &[&str], improvements: &[&str]) -> AnswerRecord {
        AnswerRecord {
            score,
            strengths: strengths.iter().map(|s| s.to_string()).collect(),
            improvements: improvements.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exactly_80_is_excellent() {
        let answers = vec![feedback(100, &[], &[]), feedback(80, &[], &[]), feedback(60, &[], &[])];
        let summary = aggregate(&answers, &[]);
        assert_eq!(summary.overall_score, 80);
        assert_eq!(summary.performance_level, PerformanceLevel::Excellent);
    }

    #[test]
    fn test_mean_is_rounded() {
        let answers = vec![feedback(70, &[], &[]), feedback(75, &[], &[])];
        assert_eq!(overall_score(&answers), 73); // 72.5 rounds away from zero
        let answers = vec![feedback(59, &[], &[]), feedback(60, &[], &[]), feedback(60, &[], &[])];
        assert_eq!(overall_score(&answers), 60);
    }

    #[test]
    fn test_no_answers_scores_zero() {
        let summary = aggregate(&[], &[]);
        assert_eq!(summary.overall_score, 0);
        assert_eq!(summary.performance_level, PerformanceLevel::NeedsImprovement);
        assert_eq!(summary.strengths.len(), GENERIC_STRENGTHS.len());
        assert_eq!(summary.improvements.len(), GENERIC_IMPROVEMENTS.len());
    }

    #[test]
    fn test_unscored_answer_counts_as_zero() {
        let answers = vec![feedback(90, &[], &[]), AnswerRecord::default()];
        let summary = aggregate(&answers, &[]);
        assert_eq!(summary.overall_score, 45);
        assert_eq!(summary.strengths.len(), GENERIC_STRENGTHS.len());
    }

    #[test]
    fn test_strengths_are_deduplicated_and_capped() {
        let answers = vec![
            feedback(70, &["Clear context", "Good actions"], &["Add metrics"]),
            feedback(70, &["clear context ", "Strong result", "Concise"], &["Add metrics"]),
        ];
        let summary = aggregate(&answers, &[]);
        assert_eq!(
            summary.strengths,
            vec!["Clear context", "Good actions", "Strong result"]
        );
        assert_eq!(summary.improvements, vec!["Add metrics"]);
    }

    #[test]
    fn test_recommendations_name_top_three_keywords() {
        let summary = aggregate(
            &[feedback(50, &[], &[])],
            &keywords(&["Docker", "Kubernetes", "CI/CD", "Terraform"]),
        );
        let joined = summary.recommendations.join(" | ");
        assert!(joined.contains("Docker"));
        assert!(joined.contains("Kubernetes"));
        assert!(joined.contains("CI/CD"));
        assert!(!joined.contains("Terraform"));
    }

    #[test]
    fn test_summary_is_schema_complete() {
        let summary = aggregate(&[feedback(65, &["a"], &["b"])], &keywords(&["Docker"]));
        let value = serde_json::to_value(&summary).unwrap();
        assert!(validate_summary(&value));
        assert_eq!(value["performance_level"], "Good");
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let answers = vec![feedback(90, &["x", "y"], &["z"]), feedback(40, &["y", "w"], &["v"])];
        let kws = keywords(&["Go"]);
        assert_eq!(aggregate(&answers, &kws), aggregate(&answers, &kws));
    }
}
