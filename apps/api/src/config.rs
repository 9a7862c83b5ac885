use std::time::Duration;

use anyhow::{Context, Result};

/// Django's default PBKDF2 work factor.
pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 600_000;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub openrouter_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub local_model_url: Option<String>,
    pub local_model_name: String,
    pub lightcast_api_key: Option<String>,
    pub frontend_url: String,
    pub max_resume_chars: usize,
    pub llm_timeout: Duration,
    pub password_iterations: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            local_model_url: optional_env("LOCAL_MODEL_URL"),
            local_model_name: optional_env("LOCAL_MODEL_NAME")
                .unwrap_or_else(|| "phi3:mini".to_string()),
            lightcast_api_key: optional_env("LIGHTCAST_API_KEY"),
            frontend_url: optional_env("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            max_resume_chars: parse_env("MAX_RESUME_CHARS", 50_000)?,
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60)?),
            password_iterations: parse_env("PASSWORD_ITERATIONS", DEFAULT_PASSWORD_ITERATIONS)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Offline configuration: no model keys, cheap password hashing.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/compass_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            openrouter_api_key: None,
            openai_api_key: None,
            local_model_url: None,
            local_model_name: "phi3:mini".to_string(),
            lightcast_api_key: None,
            frontend_url: "http://localhost:3000".to_string(),
            max_resume_chars: 50_000,
            llm_timeout: Duration::from_secs(1),
            password_iterations: 1_000,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
