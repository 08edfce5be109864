//! Wire types for the prediction API

use serde::{Deserialize, Serialize};

/// Body of a `POST /predict` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Prediction returned to the caller
///
/// `confidence` is always present in the serialized form: `null` when
/// the model cannot estimate one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category: String,
    pub confidence: Option<f32>,
}
