// Document handling: resume PDF intake, job-description cleanup, scorecard output.
// PDF parsing is blocking and runs inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod jd_cleaner;
pub mod pdf_text;
pub mod render;
pub mod scorecard;
