use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::interview::models::{Threshold, MAX_QUESTION_COUNT};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Fit score at or above which a candidate proceeds to the interview.
    pub fit_threshold: Threshold,
    /// Question count used when a caller's job context omits one.
    pub default_question_count: u32,
    /// Upper bound on every scoring, question and summary oracle call.
    pub oracle_timeout: Duration,
    /// Sessions with no events for this long are abandoned on the next event.
    pub session_idle_timeout: Duration,
    pub enable_llm_summary: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let threshold: i64 = optional_env("FIT_THRESHOLD", 75)?;
        let default_question_count: u32 = optional_env("DEFAULT_QUESTION_COUNT", 5)?;
        if !(1..=MAX_QUESTION_COUNT).contains(&default_question_count) {
            bail!("DEFAULT_QUESTION_COUNT must be between 1 and {MAX_QUESTION_COUNT}");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            fit_threshold: Threshold::new(threshold)
                .context("FIT_THRESHOLD must be between 0 and 100")?,
            default_question_count,
            oracle_timeout: Duration::from_secs(optional_env("ORACLE_TIMEOUT_SECS", 60)?),
            session_idle_timeout: Duration::from_secs(optional_env(
                "SESSION_IDLE_TIMEOUT_SECS",
                1800,
            )?),
            enable_llm_summary: optional_env("ENABLE_LLM_SUMMARY", true)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw:?}"))
}
