use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Retry count, retry delay, and validation thresholds are deliberately
/// configuration parameters rather than constants — tune per deployment.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub model: String,
    /// Attempts per model call (transport and parse failures alike).
    pub max_model_retries: u32,
    /// Fixed delay between retry attempts. No exponential backoff.
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    /// Validation verdicts below this score fail and trigger regeneration.
    pub min_validation_score: u32,
    /// Minimum fraction of ATS keywords the resume must cover.
    pub min_keyword_coverage: f32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            model: env_or("PIPELINE_MODEL", "claude-sonnet-4-5"),
            max_model_retries: parse_env("MAX_MODEL_RETRIES", 3)?,
            retry_delay: Duration::from_millis(parse_env("RETRY_DELAY_MS", 1000)?),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 120)?),
            min_validation_score: parse_env("MIN_VALIDATION_SCORE", 70)?,
            min_keyword_coverage: parse_env("MIN_KEYWORD_COVERAGE", 0.4)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

impl Default for Config {
    /// Defaults used by tests — no environment access.
    fn default() -> Self {
        Config {
            anthropic_api_key: String::new(),
            model: "claude-sonnet-4-5".to_string(),
            max_model_retries: 3,
            retry_delay: Duration::from_millis(0),
            request_timeout: Duration::from_secs(120),
            min_validation_score: 70,
            min_keyword_coverage: 0.4,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid value")),
        Err(_) => Ok(default),
    }
}
