// Chat-completion client for the upstream generation API
// Author: kelexine (https://github.com/kelexine)

use super::Generator;
use crate::config::LlmConfig;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Makes exactly one call per prompt. Failures are returned as
/// [`AppError::Generation`] and never retried here.
pub struct ChatCompletionClient {
    http_client: Client,
    config: LlmConfig,
    sanitize_errors: bool,
}

impl ChatCompletionClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created chat completion client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
            sanitize_errors: true,
        })
    }

    /// Toggle masking of API keys in logged upstream error bodies.
    pub fn with_sanitized_errors(mut self, enabled: bool) -> Self {
        self.sanitize_errors = enabled;
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.api_base_url.trim_end_matches('/')
        )
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("HTTP error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let body = if self.sanitize_errors { sanitize(&body) } else { body };
            error!("Generation API returned {}: {}", status, body);
            return Err(AppError::Generation(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Generation(format!("Invalid response: {}", e)))?;

        parsed
            .first_content()
            .ok_or_else(|| AppError::Generation("No choices in generation response".to_string()))
    }
}

#[async_trait]
impl Generator for ChatCompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Calling chat completion API with model {}", self.config.model);
        let started = Instant::now();

        let result = self.send(prompt).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::record_generation_call(outcome, started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            error!("Generation call failed: {}", e);
        }
        result
    }
}
