use anyhow::{Context, Result};

use crate::llm_client::{CompletionParams, DEFAULT_BASE_URL};

const DEFAULT_MODEL: &str = "gpt-4.1";
const DEFAULT_FALLBACK_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means reports are kept in memory only.
    pub database_url: Option<String>,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    /// Substituted once when `model` is unavailable. `None` disables substitution.
    pub fallback_model: Option<String>,
    pub completion: CompletionParams,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = CompletionParams::default();

        Ok(Config {
            database_url: get("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            openai_api_key: get("OPENAI_API_KEY")
                .filter(|v| !v.trim().is_empty())
                .context("Required environment variable 'OPENAI_API_KEY' is not set")?,
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            fallback_model: match get("OPENAI_FALLBACK_MODEL") {
                Some(v) if v.trim().is_empty() => None,
                Some(v) => Some(v),
                None => Some(DEFAULT_FALLBACK_MODEL.to_string()),
            },
            completion: CompletionParams {
                temperature: parse_or(&get, "OPENAI_TEMPERATURE", defaults.temperature)?,
                max_tokens: parse_or(&get, "OPENAI_MAX_TOKENS", defaults.max_tokens)?,
                ..defaults
            },
            port: parse_or(&get, "PORT", 5000)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}
