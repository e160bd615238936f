use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

use crate::config::ModelConfig;

use super::normalize::normalize;
use super::pipeline::LinearPipeline;

/// Sentiment classes the trained model emits. There is no neutral class:
/// text that is empty after cleaning is reported as Positive by policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    fn from_class(class: usize) -> Self {
        if class == 0 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub loaded: bool,
    pub feature_count: Option<usize>,
}

/// Wraps the loaded pipeline. Shared read-only across requests; never
/// mutated after construction.
pub struct SentimentClassifier {
    pipeline: Option<LinearPipeline>,
}

impl SentimentClassifier {
    /// Construction never fails: a missing or malformed artifact leaves the
    /// classifier unloaded, and every entry point then returns `None`.
    pub fn load(config: &ModelConfig) -> Self {
        let pipeline = match LinearPipeline::load(&config.path) {
            Ok(pipeline) => {
                info!(
                    "Sentiment model loaded from {} ({} features)",
                    config.path.display(),
                    pipeline.feature_count()
                );
                Some(pipeline)
            }
            Err(e) => {
                error!(
                    "Failed to load sentiment model from {}: {e}",
                    config.path.display()
                );
                None
            }
        };
        Self { pipeline }
    }

    #[cfg(test)]
    pub(crate) fn with_pipeline(pipeline: Option<LinearPipeline>) -> Self {
        Self { pipeline }
    }

    pub fn is_loaded(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            loaded: self.is_loaded(),
            feature_count: self.pipeline.as_ref().map(LinearPipeline::feature_count),
        }
    }

    /// Classify one comment. `None` means the prediction could not be made
    /// (unloaded model or a faulted call) and the caller should skip the
    /// comment, never substitute a label.
    pub fn classify(&self, text: &str) -> Option<Sentiment> {
        let Some(pipeline) = &self.pipeline else {
            warn!("Sentiment model not loaded; cannot classify");
            return None;
        };

        let cleaned = normalize(text);
        if cleaned.is_empty() {
            return Some(Sentiment::Positive);
        }

        match pipeline.predict(std::slice::from_ref(&cleaned)) {
            Ok(classes) => classes.first().copied().map(Sentiment::from_class),
            Err(e) => {
                error!("Sentiment prediction failed: {e}");
                None
            }
        }
    }

    /// Classify a batch in one pipeline call. The result always has the same
    /// length as the input, with empty-after-cleaning positions reported as
    /// Positive. All-or-nothing: `None` means the whole batch failed.
    pub fn classify_batch(&self, texts: &[String]) -> Option<Vec<Sentiment>> {
        let Some(pipeline) = &self.pipeline else {
            warn!("Sentiment model not loaded; cannot classify batch");
            return None;
        };

        let cleaned: Vec<String> = texts.iter().map(|text| normalize(text)).collect();
        let mut valid_indices = Vec::new();
        let mut valid_texts = Vec::new();
        for (index, text) in cleaned.into_iter().enumerate() {
            if !text.is_empty() {
                valid_indices.push(index);
                valid_texts.push(text);
            }
        }

        let mut results = vec![Sentiment::Positive; texts.len()];
        if valid_texts.is_empty() {
            return Some(results);
        }

        match pipeline.predict(&valid_texts) {
            Ok(classes) => {
                for (&index, class) in valid_indices.iter().zip(classes) {
                    results[index] = Sentiment::from_class(class);
                }
                Some(results)
            }
            Err(e) => {
                error!("Batch sentiment prediction failed: {e}");
                None
            }
        }
    }

    /// Classify with the winning class's probability. Empty-after-cleaning
    /// text is reported as Positive at even odds.
    pub fn classify_with_confidence(&self, text: &str) -> Option<(Sentiment, f64)> {
        let Some(pipeline) = &self.pipeline else {
            warn!("Sentiment model not loaded; cannot classify");
            return None;
        };

        let cleaned = normalize(text);
        if cleaned.is_empty() {
            return Some((Sentiment::Positive, 0.5));
        }

        match pipeline.predict_proba(&cleaned) {
            Ok(proba) => {
                if proba[1] > proba[0] {
                    Some((Sentiment::Negative, proba[1]))
                } else {
                    Some((Sentiment::Positive, proba[0]))
                }
            }
            Err(e) => {
                error!("Sentiment prediction failed: {e}");
                None
            }
        }
    }
}
