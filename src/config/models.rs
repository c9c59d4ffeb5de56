//! Configuration data structures for the review translator.
//!
//! This module defines the schema for the application settings: server
//! parameters, the upstream generation endpoint, the usage store and the
//! free trial quota.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream chat-completion endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// SQLite usage store settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Free trial quota.
    #[serde(default)]
    pub trial: TrialConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `0.0.0.0`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8000`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the upstream generation API (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the proxy; `/v1/chat/completions` is appended.
    /// Default: `http://localhost:3000`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer credential sent with every call.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier forwarded to the endpoint.
    /// Default: `gpt-4o-mini`
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    /// Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum output size requested from the model.
    /// Default: `1000`
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature. Kept high for varied, playful output.
    /// Default: `0.8`
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file holding trial records and generation tokens.
    /// Default: `~/.review-translator/usage.db`
    #[serde(default = "default_database_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Number of free generations granted per device.
    /// Default: `3`
    #[serde(default = "default_free_trial_limit")]
    pub free_trial_limit: u32,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask API keys and bearer credentials in logged upstream errors.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_secrets: bool,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            free_trial_limit: default_free_trial_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_secrets: true,
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.8
}

fn default_database_path() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".review-translator")
        .join("usage.db")
        .to_string_lossy()
        .to_string()
}

fn default_free_trial_limit() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
