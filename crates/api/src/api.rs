//! HTTP API for predictions, health checks, and Prometheus metrics

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use nudger_lib::{
    engine::{self, EngineState},
    health::{HealthResponse, ReadinessResponse},
    models::{PredictRequest, Prediction},
    observability::{ApiMetrics, ServiceLogger},
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Error body returned for requests without a usable `text` field
const MISSING_TEXT_ERROR: &str = "Missing 'text' field";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine_state: Arc<EngineState>,
    pub metrics: ApiMetrics,
    pub logger: ServiceLogger,
    pub started_at: i64,
}

impl AppState {
    pub fn new(engine_state: Arc<EngineState>, metrics: ApiMetrics, logger: ServiceLogger) -> Self {
        Self {
            engine_state,
            metrics,
            logger,
            started_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// API-level errors mapped to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// Request body did not carry a JSON object with a `text` string
    MissingText,
    /// Inference failed outside the confidence step
    Inference(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::MissingText => (StatusCode::BAD_REQUEST, MISSING_TEXT_ERROR.to_string()),
            ApiError::Inference(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Prediction endpoint
///
/// Any body that does not deserialize into a `text` string gets the
/// fixed 400 error body. While degraded, responds 200 with the fixed
/// fallback prediction and never touches the artifacts.
async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Ok(Json(request)) = body else {
        state.metrics.inc_invalid_requests();
        return Err(ApiError::MissingText);
    };

    let engine = match state.engine_state.as_ref() {
        EngineState::Loaded(engine) => engine,
        EngineState::Degraded { .. } => {
            state.metrics.inc_fallback_responses();
            return Ok(Json(engine::fallback_prediction()));
        }
    };

    let start = Instant::now();
    let prediction = engine.classify(&request.text).map_err(|err| {
        state.metrics.inc_prediction_errors();
        error!(error = %err, "Prediction failed");
        ApiError::Inference(err.to_string())
    })?;
    let elapsed = start.elapsed().as_secs_f64();

    state.metrics.inc_predictions();
    state.metrics.observe_prediction_latency(elapsed);
    state
        .logger
        .log_prediction(&prediction.category, prediction.confidence, elapsed);

    Ok(Json(prediction))
}

/// Health check - always 200 while serving; the payload carries the
/// healthy/degraded detail
async fn healthz(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::from_engine_state(
        &state.engine_state,
        state.started_at,
    ))
}

/// Readiness check - ready as soon as the server accepts requests
async fn readyz(State(state): State<Arc<AppState>>) -> Json<ReadinessResponse> {
    Json(ReadinessResponse::serving(&state.engine_state))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
