// Shared prompt constants.
// Each operation's own templates live in analysis::prompts; this file holds
// the cross-cutting fragments every system prompt ends with.

/// Formatting rules appended to every system prompt.
pub const JSON_ONLY_RULES: &str = "\
    FORMATTING RULES: \
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies. \
    Use exactly the keys shown in the schema; do not add or rename keys.";

/// Tone shared by every persona: direct, specific, constructive.
pub const MENTOR_TONE: &str = "\
    Speak like a senior hiring mentor: direct and honest about gaps, \
    specific rather than generic, and always constructive.";

/// Response-format hint sent with every call.
pub const JSON_OBJECT_FORMAT: &str = "json_object";
