// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // USAGE GATE METRICS
    // ============================================================================

    /// Gate decisions by credential kind
    pub static ref GATE_DECISIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("gate_decisions_total", "Usage gate decisions"),
        &["credential", "decision"], // credential: token, trial, none
        REGISTRY
    ).unwrap();

    // ============================================================================
    // TRANSLATION METRICS
    // ============================================================================

    /// Completed translate-review requests by outcome
    pub static ref TRANSLATIONS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("translations_total", "Translate-review requests by outcome"),
        &["outcome"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // GENERATION API METRICS
    // ============================================================================

    /// Total generation API calls
    pub static ref GENERATION_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("generation_calls_total", "Total generation API calls"),
        &["status"],
        REGISTRY
    ).unwrap();

    /// Generation API call duration
    pub static ref GENERATION_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("generation_duration_seconds", "Generation API call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        &["status"],
        REGISTRY
    ).unwrap();
}

/// Render all registered metrics in the Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
