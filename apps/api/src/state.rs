use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;
use crate::documents::render::ScorecardRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Provider-or-fallback orchestration for all five analysis operations.
    pub analyzer: Arc<ResumeAnalyzer>,
    /// Pluggable scorecard renderer. Default: TypstRenderer.
    pub renderer: Arc<dyn ScorecardRenderer>,
    pub config: Config,
}
