//! Artifact schemas for the trained vectorizer and classifier
//!
//! Artifacts are JSON parameter exports produced by the offline
//! training pipeline. The loader validates structural invariants up
//! front so a bad export degrades the service at startup instead of
//! panicking mid-request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating an artifact file
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact {path}: {reason}")]
    Invalid { path: String, reason: String },

    #[error("Incompatible artifacts: {0}")]
    Incompatible(String),
}

/// Exported parameters of the trained TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    /// Token to feature-column mapping
    pub vocabulary: HashMap<String, usize>,
    /// Per-column inverse document frequency weights
    pub idf: Vec<f32>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_true")]
    pub l2_normalize: bool,
}

fn default_true() -> bool {
    true
}

impl VectorizerArtifact {
    /// Load and validate a vectorizer export
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let artifact: Self = read_json(path)?;
        artifact
            .validate()
            .map_err(|reason| ArtifactError::Invalid {
                path: path.display().to_string(),
                reason,
            })?;
        Ok(artifact)
    }

    /// Feature-space width of this vectorizer
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    fn validate(&self) -> Result<(), String> {
        if self.vocabulary.is_empty() {
            return Err("vocabulary is empty".to_string());
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "idf has {} entries for {} vocabulary terms",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        for (token, &column) in &self.vocabulary {
            if column >= self.idf.len() {
                return Err(format!(
                    "token '{}' maps to column {} outside the idf table ({} columns)",
                    token,
                    column,
                    self.idf.len()
                ));
            }
        }
        Ok(())
    }
}

/// Shared parameters of a trained linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    /// Category labels, in training class order
    pub classes: Vec<String>,
    /// One coefficient row per class; two-class models export a single
    /// row (scikit-learn convention)
    pub coefficients: Vec<Vec<f32>>,
    /// One intercept per coefficient row
    pub intercepts: Vec<f32>,
}

impl LinearParams {
    /// Feature-space width expected by this model
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map(Vec::len).unwrap_or(0)
    }

    fn validate(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err(format!(
                "expected at least 2 classes, found {}",
                self.classes.len()
            ));
        }
        let rows = self.coefficients.len();
        let binary_single_row = self.classes.len() == 2 && rows == 1;
        if rows != self.classes.len() && !binary_single_row {
            return Err(format!(
                "coefficient rows ({}) do not match classes ({})",
                rows,
                self.classes.len()
            ));
        }
        if self.intercepts.len() != rows {
            return Err(format!(
                "intercepts ({}) do not match coefficient rows ({})",
                self.intercepts.len(),
                rows
            ));
        }
        let width = self.n_features();
        if width == 0 {
            return Err("coefficient rows are empty".to_string());
        }
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err("coefficient rows have mixed widths".to_string());
        }
        Ok(())
    }
}

/// Exported parameters of the trained classifier, tagged by model kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LinearParams),
    LinearSvc(LinearParams),
}

impl ClassifierArtifact {
    /// Load and validate a classifier export
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let artifact: Self = read_json(path)?;
        artifact
            .params()
            .validate()
            .map_err(|reason| ArtifactError::Invalid {
                path: path.display().to_string(),
                reason,
            })?;
        Ok(artifact)
    }

    /// Parameters shared by both model kinds
    pub fn params(&self) -> &LinearParams {
        match self {
            ClassifierArtifact::LogisticRegression(params) => params,
            ClassifierArtifact::LinearSvc(params) => params,
        }
    }

    /// Model kind as reported in health and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::LogisticRegression(_) => "logistic_regression",
            ClassifierArtifact::LinearSvc(_) => "linear_svc",
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_artifact(value: serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(value.to_string().as_bytes()).unwrap();
        file
    }

    fn vectorizer_json() -> serde_json::Value {
        json!({
            "vocabulary": {"coffee": 0, "uber": 1},
            "idf": [1.5, 2.0]
        })
    }

    fn logistic_json() -> serde_json::Value {
        json!({
            "kind": "logistic_regression",
            "classes": ["Food", "Transportation"],
            "coefficients": [[1.0, -1.0], [-1.0, 1.0]],
            "intercepts": [0.0, 0.0]
        })
    }

    #[test]
    fn test_load_valid_vectorizer() {
        let file = write_artifact(vectorizer_json());
        let artifact = VectorizerArtifact::load(file.path()).unwrap();

        assert_eq!(artifact.n_features(), 2);
        assert!(artifact.lowercase);
        assert!(artifact.l2_normalize);
    }

    #[test]
    fn test_load_missing_file() {
        let err = VectorizerArtifact::load("/nonexistent/vectorizer.json").unwrap_err();
        assert!(matches!(err, ArtifactError::Read { .. }));
    }

    #[test]
    fn test_load_unparsable_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely not json").unwrap();

        let err = VectorizerArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }

    #[test]
    fn test_vectorizer_rejects_idf_length_mismatch() {
        let file = write_artifact(json!({
            "vocabulary": {"coffee": 0, "uber": 1},
            "idf": [1.5]
        }));

        let err = VectorizerArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_vectorizer_rejects_out_of_range_column() {
        let file = write_artifact(json!({
            "vocabulary": {"coffee": 0, "uber": 5},
            "idf": [1.5, 2.0]
        }));

        let err = VectorizerArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_load_valid_classifier() {
        let file = write_artifact(logistic_json());
        let artifact = ClassifierArtifact::load(file.path()).unwrap();

        assert_eq!(artifact.kind(), "logistic_regression");
        assert_eq!(artifact.params().n_features(), 2);
        assert_eq!(artifact.params().classes.len(), 2);
    }

    #[test]
    fn test_classifier_accepts_binary_single_row() {
        let file = write_artifact(json!({
            "kind": "linear_svc",
            "classes": ["Other", "Groceries"],
            "coefficients": [[1.0, -0.5]],
            "intercepts": [0.1]
        }));

        let artifact = ClassifierArtifact::load(file.path()).unwrap();
        assert_eq!(artifact.kind(), "linear_svc");
    }

    #[test]
    fn test_classifier_rejects_row_count_mismatch() {
        let file = write_artifact(json!({
            "kind": "logistic_regression",
            "classes": ["Food", "Transportation", "Shopping"],
            "coefficients": [[1.0, -1.0], [-1.0, 1.0]],
            "intercepts": [0.0, 0.0]
        }));

        let err = ClassifierArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_classifier_rejects_intercept_mismatch() {
        let file = write_artifact(json!({
            "kind": "logistic_regression",
            "classes": ["Food", "Transportation"],
            "coefficients": [[1.0, -1.0], [-1.0, 1.0]],
            "intercepts": [0.0]
        }));

        let err = ClassifierArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_classifier_rejects_mixed_row_widths() {
        let file = write_artifact(json!({
            "kind": "logistic_regression",
            "classes": ["Food", "Transportation"],
            "coefficients": [[1.0, -1.0], [-1.0]],
            "intercepts": [0.0, 0.0]
        }));

        let err = ClassifierArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_classifier_rejects_unknown_kind() {
        let file = write_artifact(json!({
            "kind": "random_forest",
            "classes": ["Food", "Transportation"],
            "coefficients": [[1.0, -1.0], [-1.0, 1.0]],
            "intercepts": [0.0, 0.0]
        }));

        let err = ClassifierArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }
}
