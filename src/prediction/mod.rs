//! Applying a trained model to new text.

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::ml::SentimentClassifier;

/// Prediction for one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub input_text: String,
    /// `true` for positive sentiment.
    pub predicted_label: bool,
    /// Positive-class probability in `[0, 1]`.
    pub probability: f64,
    pub score: f64,
}

impl PredictionResult {
    /// "Positive" or "Negative".
    pub fn sentiment(&self) -> &'static str {
        if self.predicted_label {
            "Positive"
        } else {
            "Negative"
        }
    }
}

/// Holds a shared model and answers single and batch predictions.
#[derive(Clone, Default)]
pub struct PredictionEngine {
    model: Option<Arc<dyn SentimentClassifier>>,
}

impl std::fmt::Debug for PredictionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionEngine")
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .finish()
    }
}

impl PredictionEngine {
    pub fn new(model: Arc<dyn SentimentClassifier>) -> Self {
        Self { model: Some(model) }
    }

    /// An engine with no model; every prediction fails until one is set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_model(&mut self, model: Arc<dyn SentimentClassifier>) {
        self.model = Some(model);
    }

    pub fn has_model(&self) -> bool {
        self.model.as_ref().is_some_and(|m| m.is_trained())
    }

    fn model(&self) -> Result<&dyn SentimentClassifier> {
        match &self.model {
            Some(model) if model.is_trained() => Ok(&**model),
            _ => Err(SentimentError::prediction("no trained model loaded")),
        }
    }

    /// Score a single text. Any string, including the empty one, is accepted.
    pub fn predict_one(&self, text: &str) -> Result<PredictionResult> {
        let model = self.model()?;
        predict_with(model, text)
    }

    /// Score many texts in parallel; output order matches input order.
    pub fn predict_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<PredictionResult>> {
        let model = self.model()?;
        debug!("Predicting batch of {} texts with {}", texts.len(), model.name());
        texts
            .par_iter()
            .map(|text| predict_with(model, text.as_ref()))
            .collect()
    }
}

fn predict_with(model: &dyn SentimentClassifier, text: &str) -> Result<PredictionResult> {
    let prediction = model.predict(text)?;
    Ok(PredictionResult {
        input_text: text.to_string(),
        predicted_label: prediction.predicted_label,
        probability: prediction.probability,
        score: prediction.score,
    })
}
