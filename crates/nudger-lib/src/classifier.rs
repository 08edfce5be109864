//! Linear classifier variants over TF-IDF features
//!
//! The two model kinds the training pipeline exports map to two
//! implementations of [`Classifier`]: logistic regression, which can
//! estimate class probabilities, and a linear SVM, which cannot. The
//! variant is chosen once when the artifact is loaded, so request
//! handling never probes for capabilities.

use crate::artifact::{ClassifierArtifact, LinearParams};
use crate::vectorizer::FeatureMatrix;
use thiserror::Error;

/// Errors raised during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Feature matrix has {actual} columns, model expects {expected}")]
    FeatureWidth { expected: usize, actual: usize },

    #[error("Classifier returned no output")]
    NoOutput,
}

/// A trained classifier over TF-IDF features
pub trait Classifier: Send + Sync {
    /// Category labels known to the model, in training class order
    fn labels(&self) -> &[String];

    /// Predict one category label per matrix row
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<String>, InferenceError>;

    /// Per-row probability distributions over [`labels`](Self::labels),
    /// or `None` for model kinds without probability estimation
    fn probabilities(
        &self,
        features: &FeatureMatrix,
    ) -> Option<Result<Vec<Vec<f32>>, InferenceError>>;

    /// Model kind as reported in health and metrics
    fn kind(&self) -> &'static str;
}

/// Build the classifier variant the artifact describes
pub fn from_artifact(artifact: ClassifierArtifact) -> Box<dyn Classifier> {
    match artifact {
        ClassifierArtifact::LogisticRegression(params) => {
            Box::new(LogisticRegression::new(params))
        }
        ClassifierArtifact::LinearSvc(params) => Box::new(LinearSvc::new(params)),
    }
}

/// Dense linear scorer shared by both model kinds
#[derive(Debug, Clone)]
struct LinearModel {
    params: LinearParams,
}

impl LinearModel {
    fn new(params: LinearParams) -> Self {
        Self { params }
    }

    fn check_width(&self, features: &FeatureMatrix) -> Result<(), InferenceError> {
        if features.n_features() != self.params.n_features() {
            return Err(InferenceError::FeatureWidth {
                expected: self.params.n_features(),
                actual: features.n_features(),
            });
        }
        Ok(())
    }

    /// Decision scores for one sparse row, one score per coefficient row
    fn scores(&self, row: &[(usize, f32)]) -> Vec<f32> {
        self.params
            .coefficients
            .iter()
            .zip(&self.params.intercepts)
            .map(|(coefficients, intercept)| {
                row.iter()
                    .map(|&(column, value)| coefficients[column] * value)
                    .sum::<f32>()
                    + intercept
            })
            .collect()
    }

    /// Predicted label for one sparse row
    fn label(&self, row: &[(usize, f32)]) -> &str {
        let scores = self.scores(row);
        let index = if self.is_binary_single_row() {
            // A single-row model scores the second class: positive
            // decision value selects it.
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores)
        };
        &self.params.classes[index]
    }

    fn is_binary_single_row(&self) -> bool {
        self.params.coefficients.len() == 1
    }
}

/// Logistic regression with probability estimation
pub struct LogisticRegression {
    model: LinearModel,
}

impl LogisticRegression {
    pub fn new(params: LinearParams) -> Self {
        Self {
            model: LinearModel::new(params),
        }
    }

    /// Probability distribution for one sparse row
    fn distribution(&self, row: &[(usize, f32)]) -> Vec<f32> {
        let scores = self.model.scores(row);
        if self.model.is_binary_single_row() {
            let positive = sigmoid(scores[0]);
            vec![1.0 - positive, positive]
        } else {
            softmax(&scores)
        }
    }
}

impl Classifier for LogisticRegression {
    fn labels(&self) -> &[String] {
        &self.model.params.classes
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<String>, InferenceError> {
        self.model.check_width(features)?;
        Ok(features
            .rows()
            .map(|row| self.model.label(row).to_string())
            .collect())
    }

    fn probabilities(
        &self,
        features: &FeatureMatrix,
    ) -> Option<Result<Vec<Vec<f32>>, InferenceError>> {
        let result = self
            .model
            .check_width(features)
            .map(|()| features.rows().map(|row| self.distribution(row)).collect());
        Some(result)
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}

/// Linear support vector classifier, label-only
pub struct LinearSvc {
    model: LinearModel,
}

impl LinearSvc {
    pub fn new(params: LinearParams) -> Self {
        Self {
            model: LinearModel::new(params),
        }
    }
}

impl Classifier for LinearSvc {
    fn labels(&self) -> &[String] {
        &self.model.params.classes
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<String>, InferenceError> {
        self.model.check_width(features)?;
        Ok(features
            .rows()
            .map(|row| self.model.label(row).to_string())
            .collect())
    }

    fn probabilities(
        &self,
        _features: &FeatureMatrix,
    ) -> Option<Result<Vec<Vec<f32>>, InferenceError>> {
        None
    }

    fn kind(&self) -> &'static str {
        "linear_svc"
    }
}

/// Index of the largest value, first occurrence on ties
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = index;
        }
    }
    best
}

/// Numerically stable softmax
fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = scores.iter().map(|score| (score - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.into_iter().map(|value| value / sum).collect()
}

fn sigmoid(score: f32) -> f32 {
    1.0 / (1.0 + (-score).exp())
}
