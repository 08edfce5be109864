//! TF-IDF feature transformation
//!
//! Reimplements the transform half of the trained vectorizer: token
//! counting against a fixed vocabulary, IDF weighting, and L2 row
//! normalization. Fitting happens offline; only the export is
//! consumed here.

use crate::artifact::VectorizerArtifact;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Sparse document-term matrix, one row per input text
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<Vec<(usize, f32)>>,
    n_features: usize,
}

impl FeatureMatrix {
    /// Build a matrix from precomputed sparse rows
    ///
    /// Every column index in `rows` must be below `n_features`.
    pub fn from_rows(rows: Vec<Vec<(usize, f32)>>, n_features: usize) -> Self {
        Self { rows, n_features }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Sparse `(column, value)` entries of one row
    pub fn row(&self, index: usize) -> &[(usize, f32)] {
        &self.rows[index]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(usize, f32)]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// The transform half of the trained TF-IDF vectorizer
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    l2_normalize: bool,
}

impl TfidfVectorizer {
    pub fn from_artifact(artifact: VectorizerArtifact) -> Self {
        Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            l2_normalize: artifact.l2_normalize,
        }
    }

    /// Feature-space width
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Transform a batch of texts into TF-IDF rows
    pub fn transform(&self, texts: &[&str]) -> FeatureMatrix {
        let rows = texts.iter().map(|text| self.transform_one(text)).collect();
        FeatureMatrix {
            rows,
            n_features: self.idf.len(),
        }
    }

    fn transform_one(&self, text: &str) -> Vec<(usize, f32)> {
        let source: Cow<'_, str> = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for token in tokens(&source) {
            if let Some(&column) = self.vocabulary.get(token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut row: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(column, count)| (column, count * self.idf[column]))
            .collect();

        if self.l2_normalize {
            let norm = row.iter().map(|(_, value)| value * value).sum::<f32>().sqrt();
            if norm > 0.0 {
                for (_, value) in &mut row {
                    *value /= norm;
                }
            }
        }

        row
    }
}

/// Token scan matching the training pipeline: runs of alphanumeric or
/// underscore characters at least two characters long.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vectorizer(l2_normalize: bool) -> TfidfVectorizer {
        let vocabulary: HashMap<String, usize> = [("coffee", 0), ("uber", 1), ("cinema", 2)]
            .into_iter()
            .map(|(token, column)| (token.to_string(), column))
            .collect();

        TfidfVectorizer::from_artifact(VectorizerArtifact {
            vocabulary,
            idf: vec![1.0, 2.0, 3.0],
            lowercase: true,
            l2_normalize,
        })
    }

    #[test]
    fn test_tokens_split_on_punctuation_and_length() {
        let found: Vec<&str> = tokens("uber: to work, a 5km ride!").collect();
        assert_eq!(found, vec!["uber", "to", "work", "5km", "ride"]);
    }

    #[test]
    fn test_counts_are_weighted_by_idf() {
        let matrix = vectorizer(false).transform(&["coffee coffee uber"]);

        assert_eq!(matrix.n_rows(), 1);
        assert_eq!(matrix.row(0), &[(0, 2.0), (1, 2.0)]);
    }

    #[test]
    fn test_lowercase_folds_case_before_lookup() {
        let matrix = vectorizer(false).transform(&["COFFEE Uber"]);
        assert_eq!(matrix.row(0), &[(0, 1.0), (1, 2.0)]);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let matrix = vectorizer(false).transform(&["coffee with friends"]);
        assert_eq!(matrix.row(0), &[(0, 1.0)]);
    }

    #[test]
    fn test_l2_normalization_gives_unit_rows() {
        let matrix = vectorizer(true).transform(&["uber cinema"]);

        let norm: f32 = matrix
            .row(0)
            .iter()
            .map(|(_, value)| value * value)
            .sum::<f32>()
            .sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_text_produces_empty_row() {
        let matrix = vectorizer(true).transform(&[""]);

        assert_eq!(matrix.n_rows(), 1);
        assert!(matrix.row(0).is_empty());
    }

    #[test]
    fn test_batch_transform_keeps_row_order() {
        let matrix = vectorizer(false).transform(&["coffee", "uber"]);

        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.row(0), &[(0, 1.0)]);
        assert_eq!(matrix.row(1), &[(1, 2.0)]);
    }
}
