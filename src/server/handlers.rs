// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{TranslationRequest, TranslationResult, TrialStatus};
use crate::translation::{build_prompt, parse_generation};
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const SERVICE_NAME: &str = "bad-review-translator";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// Prometheus scrape endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

/// Handler for /trial-status/:device_id
pub async fn trial_status_handler(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<TrialStatus>> {
    let status = state.gate.trial_status(&device_id).await?;
    debug!(device_id = %device_id, ?status, "Trial status");
    Ok(Json(status))
}

/// Handler for /translate-review
///
/// validate → gate → prompt → generate → parse. A use consumed by the gate
/// stays consumed when generation or parsing fails afterwards.
pub async fn translate_review_handler(
    State(state): State<AppState>,
    body: String, // Raw JSON so syntax and schema errors map to distinct statuses
) -> Result<Json<TranslationResult>> {
    let req: TranslationRequest = serde_json::from_str(&body).map_err(|e| {
        metrics::record_translation("rejected");
        request_error(e)
    })?;

    let review = req.review.trim();
    if review.is_empty() {
        metrics::record_translation("rejected");
        return Err(AppError::InvalidRequest("Review must not be empty".to_string()));
    }

    let grant = state
        .gate
        .authorize(req.device_id(), req.token())
        .await
        .map_err(|e| {
            metrics::record_translation("rejected");
            e
        })?;

    info!(
        ?grant,
        source = %req.source,
        language = %req.language,
        "Translating review"
    );

    let prompt = build_prompt(review, req.source, req.language);
    let perspectives = match state.generator.generate(&prompt).await {
        Ok(raw) => parse_generation(&raw),
        Err(e) => Err(e),
    };

    match perspectives {
        Ok(perspectives) => {
            metrics::record_translation("success");
            Ok(Json(TranslationResult::new(
                review,
                perspectives,
                req.source,
                req.language,
            )))
        }
        Err(e) => {
            metrics::record_translation("failed");
            Err(e)
        }
    }
}

/// Malformed JSON is a bad request; well-formed JSON with wrong or missing
/// fields (e.g. an unknown `source`) is unprocessable.
fn request_error(e: serde_json::Error) -> AppError {
    use serde_json::error::Category;

    match e.classify() {
        Category::Data => AppError::UnprocessableEntity(e.to_string()),
        Category::Syntax | Category::Eof | Category::Io => {
            AppError::InvalidRequest(format!("Malformed JSON body: {}", e))
        }
    }
}
