// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    health_handler, metrics_handler, translate_review_handler, trial_status_handler,
};
use super::middleware::{cors_layer, request_id_layers};
use crate::config::AppConfig;
use crate::gate::UsageGate;
use crate::llm::Generator;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Upper bound for request bodies; a review is a short piece of text.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gate: UsageGate,
    pub generator: Arc<dyn Generator>,
}

pub fn create_router(config: AppConfig, gate: UsageGate, generator: Arc<dyn Generator>) -> Router {
    let state = AppState {
        config: Arc::new(config),
        gate,
        generator,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let api = Router::new()
        .route("/trial-status/:device_id", get(trial_status_handler))
        .route("/translate-review", post(translate_review_handler));

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // Served both at the root and under /api, where earlier clients expect them
        .merge(api.clone())
        .nest("/api", api)
        .layer(tower_http::limit::RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state)
}
