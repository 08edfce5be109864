//! Observability infrastructure for the inference service
//!
//! Provides:
//! - Prometheus metrics (request counters, prediction latency, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;
use tracing::{debug, error, info};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ApiMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ApiMetricsInner {
    predictions_total: IntCounter,
    fallback_responses_total: IntCounter,
    invalid_requests_total: IntCounter,
    prediction_errors_total: IntCounter,
    prediction_latency_seconds: Histogram,
    model_info: GaugeVec,
}

impl ApiMetricsInner {
    fn new() -> Self {
        Self {
            predictions_total: register_int_counter!(
                "nudger_api_predictions_total",
                "Total number of predictions served from the loaded model"
            )
            .expect("Failed to register predictions_total"),

            fallback_responses_total: register_int_counter!(
                "nudger_api_fallback_responses_total",
                "Total number of fallback responses served while degraded"
            )
            .expect("Failed to register fallback_responses_total"),

            invalid_requests_total: register_int_counter!(
                "nudger_api_invalid_requests_total",
                "Total number of requests rejected for a missing text field"
            )
            .expect("Failed to register invalid_requests_total"),

            prediction_errors_total: register_int_counter!(
                "nudger_api_prediction_errors_total",
                "Total number of predictions that failed with an internal error"
            )
            .expect("Failed to register prediction_errors_total"),

            prediction_latency_seconds: register_histogram!(
                "nudger_api_prediction_latency_seconds",
                "Time spent transforming and classifying one request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            model_info: register_gauge_vec!(
                "nudger_api_model_info",
                "Information about the currently loaded classifier",
                &["kind"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ApiMetrics {
    // This is just a marker - we use the global instance
    _private: (),
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ApiMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ApiMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Increment the served-predictions counter
    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    /// Increment the fallback-responses counter
    pub fn inc_fallback_responses(&self) {
        self.inner().fallback_responses_total.inc();
    }

    /// Increment the invalid-requests counter
    pub fn inc_invalid_requests(&self) {
        self.inner().invalid_requests_total.inc();
    }

    /// Increment the prediction-errors counter
    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Update model info
    pub fn set_model_info(&self, kind: &str) {
        // Reset previous kind
        self.inner().model_info.reset();
        // Set new kind with value 1
        self.inner().model_info.with_label_values(&[kind]).set(1.0);
    }
}

/// Structured logger for service lifecycle and prediction events
///
/// Provides consistent JSON-formatted logging for startup, shutdown,
/// artifact failures, and served predictions.
#[derive(Clone)]
pub struct ServiceLogger {
    service: String,
}

impl ServiceLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_kind: &str, port: u16) {
        info!(
            event = "service_started",
            service = %self.service,
            service_version = %version,
            model_kind = %model_kind,
            port = port,
            "Inference service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Inference service shutting down"
        );
    }

    /// Log a failed artifact load (once, at startup)
    pub fn log_artifact_failure(&self, component: &str, reason: &str) {
        error!(
            event = "artifact_load_failed",
            service = %self.service,
            component = %component,
            reason = %reason,
            "Artifact load failed, serving fallback predictions until restart"
        );
    }

    /// Log a served prediction
    pub fn log_prediction(&self, category: &str, confidence: Option<f32>, latency_secs: f64) {
        debug!(
            event = "prediction_served",
            service = %self.service,
            category = %category,
            confidence = ?confidence,
            latency_secs = latency_secs,
            "Prediction served"
        );
    }
}
