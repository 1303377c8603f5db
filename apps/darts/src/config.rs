use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_API_URL;

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Max in-flight model calls per pipeline stage. 1 runs strictly sequentially.
    pub concurrency: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let concurrency = parse_or("DARTS_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        if concurrency == 0 {
            bail!("DARTS_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            port: parse_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            concurrency,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name; the process environment is shared.

    #[test]
    fn test_parse_or_uses_default_when_unset() {
        let value: usize = parse_or("DARTS_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_or_reads_value() {
        std::env::set_var("DARTS_TEST_PARSE_VALUE", " 12 ");
        let value: usize = parse_or("DARTS_TEST_PARSE_VALUE", 1).unwrap();
        assert_eq!(value, 12);
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        std::env::set_var("DARTS_TEST_PARSE_GARBAGE", "many");
        let err = parse_or::<u16>("DARTS_TEST_PARSE_GARBAGE", 1).unwrap_err();
        assert!(err.to_string().contains("DARTS_TEST_PARSE_GARBAGE"));
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("DARTS_TEST_REQUIRED_MISSING").unwrap_err();
        assert!(err.to_string().contains("DARTS_TEST_REQUIRED_MISSING"));
    }
}
