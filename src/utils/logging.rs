//! Structured logging and secret redaction.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides a helper that keeps API keys from leaking into logs when an
//! upstream error body echoes them back.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

static BEARER_REGEX: OnceLock<Regex> = OnceLock::new();
static API_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

/// Replaces bearer credentials and `sk-…` style API keys with placeholders.
pub fn sanitize(input: &str) -> String {
    let bearer = BEARER_REGEX.get_or_init(|| {
        Regex::new(r"(?i)bearer\s+[A-Za-z0-9._~+/=-]+").expect("Invalid regex pattern")
    });
    let api_key = API_KEY_REGEX
        .get_or_init(|| Regex::new(r"sk-[A-Za-z0-9_-]{8,}").expect("Invalid regex pattern"));

    let result = bearer.replace_all(input, "Bearer [REDACTED]");
    api_key.replace_all(&result, "[REDACTED_API_KEY]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_bearer() {
        let output = sanitize("Authorization: Bearer abc.def-123");
        assert!(output.contains("Bearer [REDACTED]"));
        assert!(!output.contains("abc.def-123"));
    }

    #[test]
    fn test_sanitize_api_key() {
        let output = sanitize(r#"{"error": "Incorrect API key provided: sk-proj-abcdef123456"}"#);
        assert!(output.contains("[REDACTED_API_KEY]"));
        assert!(!output.contains("abcdef123456"));
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize("model not found"), "model not found");
    }
}
