//! Structural checks on untyped result documents.
//!
//! These run on `serde_json::Value` at the provider boundary (and on fallback
//! output before it is returned). They check key presence and coarse types
//! only; field-level typing is left to deserialization into `analysis::models`.
//! Every check returns `bool` and never panics.

use serde_json::{Map, Value};

fn is_string(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(Value::is_string)
}

fn is_number(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(Value::is_number)
}

fn is_array(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(Value::is_array)
}

fn object<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    obj.get(key).and_then(Value::as_object)
}

fn all_strings(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().all(|k| is_string(obj, k))
}

/// Required top-level keys of an analysis result.
pub const ANALYSIS_FIELDS: [&str; 7] = [
    "match_score",
    "overall_assessment",
    "why_not_passing",
    "missing_keywords",
    "gap_analysis",
    "section_detailed_feedback",
    "actionable_next_steps",
];

/// Canonical analysis schema: all seven fields present, numeric score,
/// string assessment, list and mapping fields of the declared shape.
pub fn validate_analysis(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if !ANALYSIS_FIELDS.iter().all(|k| obj.contains_key(*k)) {
        return false;
    }
    if !is_number(obj, "match_score") || !is_string(obj, "overall_assessment") {
        return false;
    }

    let why_ok = object(obj, "why_not_passing")
        .is_some_and(|w| is_array(w, "main_reasons") && is_string(w, "ats_perspective"));

    let keywords_ok = obj["missing_keywords"].as_array().is_some_and(|items| {
        items.iter().all(|item| {
            item.as_object()
                .is_some_and(|k| all_strings(k, &["keyword", "importance", "why_matters"]))
        })
    });

    let gaps_ok = object(obj, "gap_analysis").is_some_and(|g| {
        all_strings(g, &["experience_gaps", "skills_gaps", "qualification_gaps"])
    });

    let sections_ok = object(obj, "section_detailed_feedback").is_some_and(|sections| {
        sections.values().all(|s| {
            s.as_object()
                .is_some_and(|s| all_strings(s, &["current_state", "problem", "impact"]))
        })
    });

    why_ok && keywords_ok && gaps_ok && sections_ok && is_array(obj, "actionable_next_steps")
}

/// `{"questions": [{question, category, focus_area, why_asking}, ...]}` with at least one entry.
pub fn validate_questions(value: &Value) -> bool {
    value
        .get("questions")
        .and_then(Value::as_array)
        .is_some_and(|questions| {
            !questions.is_empty()
                && questions.iter().all(|q| {
                    q.as_object().is_some_and(|q| {
                        all_strings(q, &["question", "category", "focus_area", "why_asking"])
                    })
                })
        })
}

pub fn validate_answer_feedback(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let star_ok = object(obj, "star_analysis")
        .is_some_and(|s| all_strings(s, &["situation", "task", "action", "result"]));

    is_number(obj, "score")
        && star_ok
        && is_array(obj, "strengths")
        && is_array(obj, "improvements")
        && all_strings(obj, &["suggestion", "example_reframe"])
}

pub fn validate_rewrite(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let improvements_ok = object(obj, "improvements")
        .is_some_and(|i| is_array(i, "before_issues") && is_array(i, "after_strengths"));
    let star_ok = object(obj, "star_breakdown")
        .is_some_and(|s| all_strings(s, &["situation", "task", "action", "result"]));

    all_strings(obj, &["original", "rewritten"])
        && improvements_ok
        && star_ok
        && is_array(obj, "keywords_added")
        && is_number(obj, "impact_score_improvement")
}

/// The provider-written part of a summary.
pub fn validate_summary_narrative(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        is_array(obj, "recommendations")
            && is_array(obj, "next_steps")
            && !obj["recommendations"].as_array().is_some_and(Vec::is_empty)
    })
}

pub fn validate_summary(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        is_number(obj, "overall_score")
            && is_string(obj, "performance_level")
            && is_array(obj, "strengths")
            && is_array(obj, "improvements")
    }) && validate_summary_narrative(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_analysis() -> Value {
        json!({
            "match_score": 64,
            "overall_assessment": "Solid web background, thin on infrastructure.",
            "why_not_passing": {
                "main_reasons": ["No container experience"],
                "ats_perspective": "Low keyword overlap."
            },
            "missing_keywords": [
                {"keyword": "Docker", "importance": "critical", "why_matters": "Core requirement."}
            ],
            "gap_analysis": {
                "experience_gaps": "No ops work.",
                "skills_gaps": "Kubernetes.",
                "qualification_gaps": "None."
            },
            "section_detailed_feedback": {
                "Skills": {"current_state": "Lists React.", "problem": "No cloud.", "impact": "Filtered out."}
            },
            "actionable_next_steps": ["Deploy a side project on Kubernetes"]
        })
    }

    #[test]
    fn test_valid_analysis_passes() {
        assert!(validate_analysis(&valid_analysis()));
    }

    #[test]
    fn test_each_missing_top_level_field_fails() {
        for field in ANALYSIS_FIELDS {
            let mut doc = valid_analysis();
            doc.as_object_mut().unwrap().remove(field);
            assert!(!validate_analysis(&doc), "missing {field} should fail");
        }
    }

    #[test]
    fn test_string_score_fails() {
        let mut doc = valid_analysis();
        doc["match_score"] = json!("64");
        assert!(!validate_analysis(&doc));
    }

    #[test]
    fn test_feedback_as_list_fails() {
        let mut doc = valid_analysis();
        doc["section_detailed_feedback"] = json!(["Skills are weak"]);
        assert!(!validate_analysis(&doc));
    }

    #[test]
    fn test_keyword_as_bare_string_fails() {
        let mut doc = valid_analysis();
        doc["missing_keywords"] = json!(["Docker"]);
        assert!(!validate_analysis(&doc));
    }

    #[test]
    fn test_non_object_fails() {
        assert!(!validate_analysis(&json!([1, 2, 3])));
        assert!(!validate_analysis(&Value::Null));
    }

    #[test]
    fn test_questions_require_entries() {
        assert!(!validate_questions(&json!({"questions": []})));
        assert!(validate_questions(&json!({"questions": [{
            "question": "Q?", "category": "technical", "focus_area": "Docker", "why_asking": "Gap."
        }]})));
        assert!(!validate_questions(&json!({"questions": [{"question": "Q?"}]})));
    }

    #[test]
    fn test_answer_feedback_shape() {
        let doc = json!({
            "score": 70,
            "star_analysis": {"situation": "present", "task": "present", "action": "weak", "result": "missing"},
            "strengths": ["Clear context"],
            "improvements": [],
            "suggestion": "Add a metric.",
            "example_reframe": "In my role..."
        });
        assert!(validate_answer_feedback(&doc));

        let mut broken = doc.clone();
        broken["star_analysis"] = json!("present");
        assert!(!validate_answer_feedback(&broken));
    }

    #[test]
    fn test_rewrite_shape() {
        let doc = json!({
            "original": "a",
            "rewritten": "b",
            "improvements": {"before_issues": [], "after_strengths": []},
            "star_breakdown": {"situation": "", "task": "", "action": "", "result": ""},
            "keywords_added": [],
            "impact_score_improvement": 30
        });
        assert!(validate_rewrite(&doc));

        let mut broken = doc.clone();
        broken.as_object_mut().unwrap().remove("star_breakdown");
        assert!(!validate_rewrite(&broken));
    }

    #[test]
    fn test_summary_narrative_needs_recommendations() {
        assert!(validate_summary_narrative(&json!({"recommendations": ["a"], "next_steps": []})));
        assert!(!validate_summary_narrative(&json!({"recommendations": [], "next_steps": ["b"]})));
        assert!(!validate_summary_narrative(&json!({"recommendations": ["a"]})));
    }
}
