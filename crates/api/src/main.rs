//! Financial Nudger inference service
//!
//! Loads the trained vectorizer and classifier once at startup and
//! serves category predictions over HTTP. When the artifacts cannot
//! be loaded the service stays up and answers with a fixed fallback
//! prediction until restarted.

use anyhow::Result;
use nudger_api::{api, config::ServiceConfig};
use nudger_lib::{ApiMetrics, EngineState, ServiceLogger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting nudger-api");

    // Load configuration
    let config = ServiceConfig::load()?;
    info!(port = config.port, "Service configured");

    // Load both artifacts once; a failure degrades the service
    // instead of aborting it
    let engine_state = Arc::new(EngineState::load(
        &config.vectorizer_path,
        &config.classifier_path,
    ));

    // Initialize metrics
    let metrics = ApiMetrics::new();

    // Initialize structured logger
    let logger = ServiceLogger::new("nudger-api");

    let model_kind = match engine_state.as_ref() {
        EngineState::Loaded(engine) => engine.model_kind(),
        EngineState::Degraded { component, reason } => {
            logger.log_artifact_failure(component, reason);
            "fallback"
        }
    };
    metrics.set_model_info(model_kind);
    logger.log_startup(SERVICE_VERSION, model_kind, config.port);

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        engine_state,
        metrics.clone(),
        logger.clone(),
    ));

    // Start the API server
    let server = tokio::spawn(api::serve(config.port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");
    server.abort();

    Ok(())
}
