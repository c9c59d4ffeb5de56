// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, GATE_DECISIONS, GENERATION_CALLS, GENERATION_DURATION, TRANSLATIONS_TOTAL,
};

/// Helper to record a usage gate decision
pub fn record_gate_decision(credential: &str, decision: &str) {
    GATE_DECISIONS
        .with_label_values(&[credential, decision])
        .inc();
}

/// Helper to record the outcome of a translate-review request
pub fn record_translation(outcome: &str) {
    TRANSLATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Helper to record generation API call metrics
pub fn record_generation_call(status: &str, duration_secs: f64) {
    GENERATION_CALLS.with_label_values(&[status]).inc();
    GENERATION_DURATION
        .with_label_values(&[status])
        .observe(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gathered_output_contains_recorded_series() {
        record_gate_decision("trial", "granted");
        record_translation("success");
        let output = gather_metrics();
        assert!(output.contains("gate_decisions_total"));
        assert!(output.contains("translations_total"));
    }
}
