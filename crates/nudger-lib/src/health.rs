//! Health reporting for liveness and readiness probes
//!
//! Health is a pure projection of the startup load outcome: the
//! engine state never changes after boot, so neither does the
//! payload. Degraded mode still reports ready, because serving the
//! fallback prediction is the deliberate behavior while artifacts are
//! broken.

use crate::engine::EngineState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component failed to initialize; the service runs on fallback
    Degraded,
}

/// Health detail for one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: ComponentStatus::Healthy,
            message: None,
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Degraded,
            message: Some(message.into()),
        }
    }
}

/// Component names for health reporting
pub mod components {
    pub const VECTORIZER: &str = "vectorizer";
    pub const CLASSIFIER: &str = "classifier";
}

/// Summary of the loaded model, absent while degraded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub kind: String,
    pub categories: usize,
    pub vocabulary_size: usize,
}

/// Overall health payload for `GET /healthz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub started_at: i64,
    pub components: BTreeMap<String, ComponentHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelInfo>,
}

impl HealthResponse {
    /// Project the startup load outcome into a health payload
    pub fn from_engine_state(state: &EngineState, started_at: i64) -> Self {
        let mut component_map = BTreeMap::new();

        match state {
            EngineState::Loaded(engine) => {
                component_map.insert(
                    components::VECTORIZER.to_string(),
                    ComponentHealth::healthy(),
                );
                component_map.insert(
                    components::CLASSIFIER.to_string(),
                    ComponentHealth::healthy(),
                );
                Self {
                    status: ComponentStatus::Healthy,
                    started_at,
                    components: component_map,
                    model: Some(ModelInfo {
                        kind: engine.model_kind().to_string(),
                        categories: engine.category_count(),
                        vocabulary_size: engine.feature_count(),
                    }),
                }
            }
            EngineState::Degraded { component, reason } => {
                if component == components::VECTORIZER {
                    component_map.insert(
                        components::VECTORIZER.to_string(),
                        ComponentHealth::degraded(reason.clone()),
                    );
                    component_map.insert(
                        components::CLASSIFIER.to_string(),
                        ComponentHealth::degraded("not loaded: vectorizer unavailable"),
                    );
                } else {
                    component_map.insert(
                        components::VECTORIZER.to_string(),
                        ComponentHealth::healthy(),
                    );
                    component_map.insert(
                        components::CLASSIFIER.to_string(),
                        ComponentHealth::degraded(reason.clone()),
                    );
                }
                Self {
                    status: ComponentStatus::Degraded,
                    started_at,
                    components: component_map,
                    model: None,
                }
            }
        }
    }
}

/// Readiness payload for `GET /readyz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReadinessResponse {
    /// Ready as soon as the server accepts requests; degraded mode is
    /// deliberately routable.
    pub fn serving(state: &EngineState) -> Self {
        match state {
            EngineState::Loaded(_) => Self {
                ready: true,
                reason: None,
            },
            EngineState::Degraded { .. } => Self {
                ready: true,
                reason: Some("serving fallback predictions".to_string()),
            },
        }
    }
}
