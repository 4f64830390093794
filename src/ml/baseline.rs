//! Majority-class baseline.
//!
//! Ignores the text and always answers with the positive-class prior seen
//! during fitting. Useful as a floor when reading evaluation metrics.

use crate::data::Dataset;
use crate::error::{Result, SentimentError};
use crate::ml::{DEFAULT_THRESHOLD, Prediction, SentimentClassifier};

/// Probabilities are kept this far away from 0 and 1 so the score stays finite.
const PROBABILITY_EPSILON: f64 = 1e-15;

/// Always predicts the most common training label.
#[derive(Debug, Clone, Default)]
pub struct MajorityClassifier {
    positive_rate: Option<f64>,
}

impl MajorityClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the positive-class prior of `dataset`.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        if dataset.is_empty() {
            return Err(SentimentError::training("training set is empty"));
        }
        self.positive_rate = Some(dataset.positive_count() as f64 / dataset.len() as f64);
        Ok(())
    }

    pub fn positive_rate(&self) -> Option<f64> {
        self.positive_rate
    }
}

impl SentimentClassifier for MajorityClassifier {
    fn predict(&self, _text: &str) -> Result<Prediction> {
        let rate = self
            .positive_rate
            .ok_or_else(|| SentimentError::prediction("majority baseline has not been fitted"))?;
        let probability = rate.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
        Ok(Prediction {
            predicted_label: rate > DEFAULT_THRESHOLD,
            probability: rate,
            score: (probability / (1.0 - probability)).ln(),
        })
    }

    fn is_trained(&self) -> bool {
        self.positive_rate.is_some()
    }

    fn name(&self) -> &str {
        "majority"
    }
}
