use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Credential values shipped in sample `.env` files. Treated the same as no key at all.
const PLACEHOLDER_KEYS: &[&str] = &[
    "your-api-key-here",
    "your_openai_api_key_here",
    "sk-...",
    "changeme",
    "placeholder",
    "none",
];

/// Application configuration loaded from environment variables.
/// Built once in `main` and passed by value into everything that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when the key is missing, empty, or a known placeholder.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_timeout: Duration,
    pub typst_bin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: usable_api_key(std::env::var("OPENAI_API_KEY").ok()),
            openai_model: optional_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(
                optional_env("LLM_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            typst_bin: optional_env("TYPST_BIN").unwrap_or_else(|| "typst".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Configuration with no provider credential. Every operation runs on its fallback path.
    #[cfg(test)]
    pub fn offline() -> Self {
        Config {
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            llm_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            typst_bin: "typst".to_string(),
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the key only if it looks like a real credential.
pub fn usable_api_key(raw: Option<String>) -> Option<String> {
    let key = raw?.trim().to_string();
    if key.is_empty() {
        return None;
    }
    let lowered = key.to_lowercase();
    if PLACEHOLDER_KEYS.iter().any(|p| lowered == *p) {
        return None;
    }
    Some(key)
}
