//! End-to-end run: load, train (or load a model), evaluate, predict.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{ModelSource, PipelineConfig};
use crate::data::{DataLoader, Dataset, TrainTestSplit};
use crate::error::Result;
use crate::evaluation::{EvaluationMetrics, evaluate};
use crate::ml::{MajorityClassifier, SentimentModel, SentimentTrainer};
use crate::prediction::{PredictionEngine, PredictionResult};

/// Everything a pipeline run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub train_count: usize,
    pub test_count: usize,
    /// Wall-clock training time; `None` when the model was loaded from disk.
    pub training_millis: Option<u64>,
    pub metrics: EvaluationMetrics,
    /// Accuracy of always predicting the training-set majority label;
    /// `None` when the training split is empty.
    pub baseline_accuracy: Option<f64>,
    pub single_prediction: PredictionResult,
    pub batch_predictions: Vec<PredictionResult>,
}

/// Runs the stages in order, stopping at the first failure.
#[derive(Debug, Clone)]
pub struct SentimentPipeline {
    config: PipelineConfig,
}

impl SentimentPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read and split the input file.
    pub fn load(&self) -> Result<TrainTestSplit> {
        info!("Loading {}", self.config.input_path.display());
        DataLoader::new(&self.config.input_path)
            .with_test_fraction(self.config.test_fraction)
            .with_seed(self.config.seed)
            .load()
    }

    /// Obtain a model per [`ModelSource`], returning it with the training time.
    pub fn build_model(&self, train: &Dataset) -> Result<(SentimentModel, Option<u64>)> {
        match &self.config.model {
            ModelSource::Load(path) => Ok((SentimentModel::load(path)?, None)),
            source => {
                let trainer = SentimentTrainer::new(
                    self.config.featurizer.clone(),
                    self.config.trainer.clone(),
                )?;
                let trained = trainer.train_timed(train)?;
                if let ModelSource::TrainAndSave(path) = source {
                    trained.model.save(path)?;
                }
                let millis = u64::try_from(trained.elapsed.as_millis()).unwrap_or(u64::MAX);
                Ok((trained.model, Some(millis)))
            }
        }
    }

    pub fn run(&self) -> Result<PipelineReport> {
        let split = self.load()?;
        let (model, training_millis) = self.build_model(&split.train)?;

        let metrics = evaluate(&model, &split.test)?;
        let baseline_accuracy = self.baseline_accuracy(&split)?;

        let engine = PredictionEngine::new(Arc::new(model));
        let single_prediction = engine.predict_one(&self.config.single_text)?;
        let batch_predictions = engine.predict_batch(&self.config.batch_texts)?;

        Ok(PipelineReport {
            train_count: split.train.len(),
            test_count: split.test.len(),
            training_millis,
            metrics,
            baseline_accuracy,
            single_prediction,
            batch_predictions,
        })
    }

    fn baseline_accuracy(&self, split: &TrainTestSplit) -> Result<Option<f64>> {
        if split.train.is_empty() {
            return Ok(None);
        }
        let mut baseline = MajorityClassifier::new();
        baseline.fit(&split.train)?;
        let metrics = evaluate(&baseline, &split.test)?;
        info!("Majority baseline accuracy: {:.4}", metrics.accuracy);
        Ok(Some(metrics.accuracy))
    }
}
