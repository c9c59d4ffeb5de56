// Error types for the review translator
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned to callers for every server-side failure.
/// The underlying cause is logged, never echoed.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to translate review";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Payment required: {0}")]
    PaymentRequired(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Could not parse model output: {0}")]
    ResponseParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Convert AppError to HTTP responses for Axum
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_type, message) = match &self {
            AppError::InvalidRequest(msg) => ("invalid_request_error", msg.clone()),
            AppError::UnprocessableEntity(msg) => ("validation_error", msg.clone()),
            AppError::PaymentRequired(msg) => ("payment_required", msg.clone()),
            AppError::Generation(_) | AppError::ResponseParse(_) => {
                error!("Translation failed: {}", self);
                ("generation_error", GENERIC_FAILURE_MESSAGE.to_string())
            }
            _ => {
                error!("Internal failure: {}", self);
                ("api_error", GENERIC_FAILURE_MESSAGE.to_string())
            }
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
