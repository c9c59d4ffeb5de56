//! Axum-based HTTP server for the review translator.
//!
//! Exposes the health probe, the per-device trial status lookup and the
//! translate-review endpoint, plus a Prometheus scrape endpoint.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual API endpoints.
//! - `middleware`: Request ID and CORS layers.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthResponse, SERVICE_NAME};
pub use routes::{create_router, AppState};
