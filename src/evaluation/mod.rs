//! Scoring a classifier against a held-out test set.

pub mod metrics;

pub use metrics::{ConfusionMatrix, EvaluationMetrics};

use log::info;
use rayon::prelude::*;

use crate::data::Dataset;
use crate::error::{Result, SentimentError};
use crate::ml::{Prediction, SentimentClassifier};

/// Predict every test record and compute [`EvaluationMetrics`].
pub fn evaluate(model: &dyn SentimentClassifier, test_set: &Dataset) -> Result<EvaluationMetrics> {
    if test_set.is_empty() {
        return Err(SentimentError::evaluation("test set is empty"));
    }
    if !model.is_trained() {
        return Err(SentimentError::evaluation(format!(
            "model {} is not trained",
            model.name()
        )));
    }

    let predictions: Vec<Prediction> = test_set
        .records()
        .par_iter()
        .map(|record| model.predict(&record.text))
        .collect::<Result<_>>()?;

    let actual = test_set.labels();
    let predicted: Vec<bool> = predictions.iter().map(|p| p.predicted_label).collect();
    let scores: Vec<f64> = predictions.iter().map(|p| p.score).collect();
    let probabilities: Vec<f64> = predictions.iter().map(|p| p.probability).collect();

    let metrics = EvaluationMetrics::from_predictions(&actual, &predicted, &scores, &probabilities);
    info!(
        "Evaluated {} on {} records: accuracy {:.4}, AUC {:.4}, F1 {:.4}",
        model.name(),
        test_set.len(),
        metrics.accuracy,
        metrics.area_under_roc_curve,
        metrics.f1_score
    );
    Ok(metrics)
}
