//! Featurization, training and the trained sentiment model.
//!
//! The pieces are wired through small traits so each can be swapped:
//! a [`Featurizer`] turns text into a [`FeatureVector`], a
//! [`BinaryTrainer`] fits a [`LinearModel`] on those vectors, and anything
//! that can score raw text implements [`SentimentClassifier`].

pub mod baseline;
pub mod featurizer;
pub mod logistic;
pub mod model;
pub mod trainer;
pub mod vector;

pub use baseline::MajorityClassifier;
pub use featurizer::{Featurizer, FeaturizerOptions, FeaturizerState, TextFeaturizer, Weighting};
pub use logistic::{
    BinaryTrainer, LinearModel, LogisticRegressionOptions, LogisticRegressionTrainer, sigmoid,
    softplus,
};
pub use model::SentimentModel;
pub use trainer::{SentimentTrainer, TrainedModel};
pub use vector::FeatureVector;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Probability above which a text is labeled positive.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Output of scoring one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// `true` for positive sentiment.
    pub predicted_label: bool,
    /// Positive-class probability in `[0, 1]`.
    pub probability: f64,
    /// Raw margin; `probability` is monotonic in it.
    pub score: f64,
}

impl Prediction {
    /// Build a prediction from a raw score, labeling by `probability > threshold`.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        let probability = sigmoid(score);
        Self {
            predicted_label: probability > threshold,
            probability,
            score,
        }
    }
}

/// Anything that maps review text to a sentiment prediction.
pub trait SentimentClassifier: Send + Sync {
    fn predict(&self, text: &str) -> Result<Prediction>;

    /// Whether the classifier has been fitted and can be used.
    fn is_trained(&self) -> bool;

    fn name(&self) -> &str;

    /// Probability cut-off for the positive label.
    fn threshold(&self) -> f64 {
        DEFAULT_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_from_score() {
        let p = Prediction::from_score(0.0, DEFAULT_THRESHOLD);
        assert_eq!(p.probability, 0.5);
        assert!(!p.predicted_label);

        let p = Prediction::from_score(2.5, DEFAULT_THRESHOLD);
        assert!(p.predicted_label);
        assert!(p.probability > 0.9);

        let p = Prediction::from_score(-2.5, DEFAULT_THRESHOLD);
        assert!(!p.predicted_label);
        assert!(p.probability < 0.1);
    }
}
