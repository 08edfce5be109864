//! Inference engine and its startup load state
//!
//! `EngineState` is built exactly once when the process starts and is
//! shared immutably with every request handler. A failed artifact
//! load produces `Degraded`, which serves a fixed fallback prediction
//! until the process is restarted; there is no reload path.

use crate::artifact::{ArtifactError, ClassifierArtifact, VectorizerArtifact};
use crate::classifier::{self, Classifier, InferenceError};
use crate::health::components;
use crate::models::Prediction;
use crate::vectorizer::TfidfVectorizer;
use std::path::Path;
use tracing::warn;

/// Category served while the engine is degraded
pub const FALLBACK_CATEGORY: &str = "Miscellaneous";

/// The fixed response served while degraded
pub fn fallback_prediction() -> Prediction {
    Prediction {
        category: FALLBACK_CATEGORY.to_string(),
        confidence: Some(0.0),
    }
}

/// A loaded vectorizer/classifier pair
pub struct InferenceEngine {
    vectorizer: TfidfVectorizer,
    classifier: Box<dyn Classifier>,
}

impl InferenceEngine {
    pub fn new(vectorizer: TfidfVectorizer, classifier: Box<dyn Classifier>) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    /// Classify one text
    ///
    /// A failure in the confidence step is recovered into a `None`
    /// confidence; a failure in the primary predict path propagates.
    pub fn classify(&self, text: &str) -> Result<Prediction, InferenceError> {
        let features = self.vectorizer.transform(&[text]);
        let labels = self.classifier.predict(&features)?;
        let category = labels.into_iter().next().ok_or(InferenceError::NoOutput)?;

        let confidence = match self.classifier.probabilities(&features) {
            None => None,
            Some(Err(err)) => {
                warn!(error = %err, "Confidence estimation failed, returning prediction without it");
                None
            }
            Some(Ok(rows)) => rows.first().and_then(|row| max_probability(row)),
        };

        Ok(Prediction {
            category,
            confidence,
        })
    }

    /// Model kind as reported in health and metrics
    pub fn model_kind(&self) -> &'static str {
        self.classifier.kind()
    }

    /// Number of categories the model can predict
    pub fn category_count(&self) -> usize {
        self.classifier.labels().len()
    }

    /// Vocabulary size of the vectorizer
    pub fn feature_count(&self) -> usize {
        self.vectorizer.n_features()
    }
}

/// Immutable load outcome, fixed for the process lifetime
pub enum EngineState {
    Loaded(InferenceEngine),
    Degraded { component: String, reason: String },
}

impl EngineState {
    /// Load both artifacts, degrading on any failure
    ///
    /// The vectorizer is loaded first; a classifier that disagrees
    /// with it on feature width is rejected here rather than at
    /// request time.
    pub fn load(vectorizer_path: impl AsRef<Path>, classifier_path: impl AsRef<Path>) -> Self {
        let vectorizer = match VectorizerArtifact::load(vectorizer_path) {
            Ok(artifact) => artifact,
            Err(err) => return Self::degraded(components::VECTORIZER, &err),
        };

        let classifier = match ClassifierArtifact::load(classifier_path) {
            Ok(artifact) => artifact,
            Err(err) => return Self::degraded(components::CLASSIFIER, &err),
        };

        if classifier.params().n_features() != vectorizer.n_features() {
            let err = ArtifactError::Incompatible(format!(
                "classifier expects {} features, vectorizer produces {}",
                classifier.params().n_features(),
                vectorizer.n_features()
            ));
            return Self::degraded(components::CLASSIFIER, &err);
        }

        EngineState::Loaded(InferenceEngine::new(
            TfidfVectorizer::from_artifact(vectorizer),
            classifier::from_artifact(classifier),
        ))
    }

    fn degraded(component: &str, err: &ArtifactError) -> Self {
        EngineState::Degraded {
            component: component.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Largest finite probability in a distribution
fn max_probability(distribution: &[f32]) -> Option<f32> {
    distribution
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .fold(None, |best, p| match best {
            Some(b) if b >= p => Some(b),
            _ => Some(p),
        })
}
