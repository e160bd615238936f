//! The ported classification pipeline: bag-of-words features plus a
//! logistic scorer, applied exactly as the training tooling exported them.
//!
//! The JSON artifact is an immutable input. This module never trains or
//! adjusts anything; it only loads the artifact and scores text with it.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read model artifact: {0}")]
    Artifact(#[from] std::io::Error),

    #[error("failed to parse model artifact: {0}")]
    Format(#[from] serde_json::Error),

    #[error("vocabulary column {column} outside coefficient range {range}")]
    DimensionMismatch { column: usize, range: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Serialized counterpart of the trained vectorizer + classifier pair.
#[derive(Debug, Deserialize)]
pub struct LinearPipeline {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    binary: bool,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearPipeline {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn feature_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Discrete class per text: 0 below the decision boundary, 1 above.
    pub fn predict(&self, texts: &[String]) -> Result<Vec<usize>> {
        texts
            .iter()
            .map(|text| Ok(usize::from(self.decision(text)? > 0.0)))
            .collect()
    }

    /// `[P(class 0), P(class 1)]` for one text.
    pub fn predict_proba(&self, text: &str) -> Result<[f64; 2]> {
        let positive = sigmoid(self.decision(text)?);
        Ok([1.0 - positive, positive])
    }

    fn decision(&self, text: &str) -> Result<f64> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in text.split_whitespace() {
            if let Some(&column) = self.vocabulary.get(token) {
                let entry = counts.entry(column).or_insert(0.0);
                if self.binary {
                    *entry = 1.0;
                } else {
                    *entry += 1.0;
                }
            }
        }

        let mut z = self.intercept;
        for (&column, &value) in &counts {
            match self.coefficients.get(column) {
                Some(weight) => z += weight * value,
                None => {
                    return Err(PipelineError::DimensionMismatch {
                        column,
                        range: self.coefficients.len(),
                    })
                }
            }
        }
        Ok(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
pub(crate) fn sample_pipeline() -> LinearPipeline {
    serde_json::from_value(serde_json::json!({
        "vocabulary": { "love": 0, "great": 1, "hate": 2, "awful": 3 },
        "coefficients": [-1.2, -0.8, 1.5, 1.1],
        "intercept": -0.1
    }))
    .expect("sample pipeline is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicts_class_zero_for_positive_words() {
        let pipeline = sample_pipeline();
        let classes = pipeline
            .predict(&["love great".to_string()])
            .expect("prediction succeeds");
        assert_eq!(classes, vec![0]);
    }

    #[test]
    fn predicts_class_one_for_negative_words() {
        let pipeline = sample_pipeline();
        let classes = pipeline
            .predict(&["hate awful".to_string()])
            .expect("prediction succeeds");
        assert_eq!(classes, vec![1]);
    }

    #[test]
    fn ignores_out_of_vocabulary_tokens() {
        let pipeline = sample_pipeline();
        let classes = pipeline
            .predict(&["love unseen token".to_string(), "unseen only".to_string()])
            .expect("prediction succeeds");
        // unknown-only text falls back to the intercept, which leans positive
        assert_eq!(classes, vec![0, 0]);
    }

    #[test]
    fn repeated_tokens_accumulate_in_count_mode() {
        let pipeline = sample_pipeline();
        // one "love" (-1.2) does not flip "hate awful" (+2.6); three do
        let classes = pipeline
            .predict(&[
                "hate awful love".to_string(),
                "hate awful love love love".to_string(),
            ])
            .expect("prediction succeeds");
        assert_eq!(classes, vec![1, 0]);
    }

    #[test]
    fn probabilities_sum_to_one_and_rank_the_predicted_class() {
        let pipeline = sample_pipeline();
        let proba = pipeline.predict_proba("hate awful").expect("proba succeeds");
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!(proba[1] > 0.5);

        let proba = pipeline.predict_proba("love").expect("proba succeeds");
        assert!(proba[0] > 0.5);
    }

    #[test]
    fn mismatched_artifact_is_an_error_not_a_panic() {
        let pipeline: LinearPipeline = serde_json::from_value(serde_json::json!({
            "vocabulary": { "love": 7 },
            "coefficients": [0.5],
            "intercept": 0.0
        }))
        .expect("artifact parses");

        let err = pipeline
            .predict(&["love".to_string()])
            .expect_err("column 7 has no coefficient");
        assert!(matches!(
            err,
            PipelineError::DimensionMismatch { column: 7, range: 1 }
        ));
    }
}
