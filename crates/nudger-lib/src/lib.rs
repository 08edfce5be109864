//! Core library for the financial text classification service
//!
//! This crate provides:
//! - Artifact loading for the trained vectorizer and classifier
//! - TF-IDF feature transformation
//! - Linear classifier variants with optional probability estimation
//! - The inference engine and its immutable startup load state
//! - Health reporting and observability

pub mod artifact;
pub mod classifier;
pub mod engine;
pub mod health;
pub mod models;
pub mod observability;
pub mod vectorizer;

pub use engine::{fallback_prediction, EngineState, InferenceEngine, FALLBACK_CATEGORY};
pub use health::{
    ComponentHealth, ComponentStatus, HealthResponse, ModelInfo, ReadinessResponse,
};
pub use models::{PredictRequest, Prediction};
pub use observability::{ApiMetrics, ServiceLogger};
