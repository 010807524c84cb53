// Resume analysis and mock-interview operations.
// Every provider call goes through `analyzer::ResumeAnalyzer`; handlers never touch llm_client.

pub mod analyzer;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod summary;
pub mod validation;
