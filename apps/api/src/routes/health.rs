use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "HireSense API is running" }))
}

/// GET /health
/// Reports service version and whether a text-generation provider is configured.
/// Without one the service still answers every request from its fallbacks.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "hiresense-api",
        "provider": {
            "available": state.analyzer.is_available(),
            "model": state.analyzer.model(),
        },
        "renderer": state.config.typst_bin,
    }))
}
