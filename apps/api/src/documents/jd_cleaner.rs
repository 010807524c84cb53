use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9., ]").unwrap());

/// Normalises a pasted job description: lower-case, single spaces, and only
/// `[a-z0-9., ]` characters kept.
pub fn clean_job_description(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = WHITESPACE.replace_all(&lowered, " ");
    DISALLOWED.replace_all(&collapsed, "").trim().to_string()
}
