//! Fits a featurizer and a linear model on a training dataset.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::data::Dataset;
use crate::error::{Result, SentimentError};
use crate::ml::featurizer::{Featurizer, FeaturizerOptions, TextFeaturizer};
use crate::ml::logistic::{BinaryTrainer, LogisticRegressionOptions, LogisticRegressionTrainer};
use crate::ml::model::SentimentModel;
use crate::ml::vector::FeatureVector;

/// A trained model with the wall-clock time it took.
#[derive(Debug)]
pub struct TrainedModel {
    pub model: SentimentModel,
    pub elapsed: Duration,
}

/// Featurize-then-fit training pipeline.
pub struct SentimentTrainer {
    featurizer_options: FeaturizerOptions,
    trainer: Arc<dyn BinaryTrainer>,
}

impl std::fmt::Debug for SentimentTrainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentTrainer")
            .field("featurizer_options", &self.featurizer_options)
            .field("trainer", &self.trainer.name())
            .finish()
    }
}

impl Default for SentimentTrainer {
    fn default() -> Self {
        Self {
            featurizer_options: FeaturizerOptions::default(),
            trainer: Arc::new(LogisticRegressionTrainer::default()),
        }
    }
}

impl SentimentTrainer {
    /// Logistic regression trainer with the given settings.
    pub fn new(
        featurizer_options: FeaturizerOptions,
        options: LogisticRegressionOptions,
    ) -> Result<Self> {
        featurizer_options.validate()?;
        Ok(Self {
            featurizer_options,
            trainer: Arc::new(LogisticRegressionTrainer::new(options)?),
        })
    }

    /// Use a custom [`BinaryTrainer`].
    pub fn with_trainer(
        featurizer_options: FeaturizerOptions,
        trainer: Arc<dyn BinaryTrainer>,
    ) -> Result<Self> {
        featurizer_options.validate()?;
        Ok(Self {
            featurizer_options,
            trainer,
        })
    }

    /// Fit the vocabulary and weights on `dataset`.
    pub fn train(&self, dataset: &Dataset) -> Result<SentimentModel> {
        if dataset.is_empty() {
            return Err(SentimentError::training("training set is empty"));
        }
        let positives = dataset.positive_count();
        if positives == 0 || positives == dataset.len() {
            warn!(
                "Training set has a single class ({} records, all {})",
                dataset.len(),
                if positives == 0 { "negative" } else { "positive" }
            );
        }

        let texts = dataset.texts();
        let mut featurizer = TextFeaturizer::new(self.featurizer_options.clone())?;
        featurizer.fit(&texts)?;
        debug!(
            "Fitted vocabulary of {} terms on {} documents",
            featurizer.dimension(),
            texts.len()
        );

        let features: Vec<FeatureVector> = texts
            .par_iter()
            .map(|text| featurizer.featurize(text))
            .collect::<Result<_>>()?;
        let labels = dataset.labels();

        let linear = self.trainer.fit(&features, &labels)?;
        SentimentModel::new(featurizer, linear)
    }

    /// [`SentimentTrainer::train`], also measuring elapsed time.
    pub fn train_timed(&self, dataset: &Dataset) -> Result<TrainedModel> {
        let start = Instant::now();
        let model = self.train(dataset)?;
        let elapsed = start.elapsed();
        info!(
            "Trained {} on {} records in {} ms",
            self.trainer.name(),
            dataset.len(),
            elapsed.as_millis()
        );
        Ok(TrainedModel { model, elapsed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LabeledRecord;
    use crate::ml::SentimentClassifier;

    fn reviews() -> Dataset {
        vec![
            LabeledRecord::new("Loved this place, amazing food", true),
            LabeledRecord::new("Great service and great prices", true),
            LabeledRecord::new("The pasta was amazing", true),
            LabeledRecord::new("I love the friendly staff", true),
            LabeledRecord::new("Horrible food, never again", false),
            LabeledRecord::new("The service was slow and rude", false),
            LabeledRecord::new("Awful, the worst meal ever", false),
            LabeledRecord::new("I hated the cold pasta", false),
        ]
        .into()
    }

    #[test]
    fn test_train_fits_training_set() {
        let model = SentimentTrainer::default().train(&reviews()).unwrap();
        assert!(model.is_trained());
        for record in reviews().iter() {
            assert_eq!(
                model.predict(&record.text).unwrap().predicted_label,
                record.label,
                "{}",
                record.text
            );
        }
    }

    #[test]
    fn test_train_is_deterministic() {
        let trainer = SentimentTrainer::default();
        let a = trainer.train(&reviews()).unwrap();
        let b = trainer.train(&reviews()).unwrap();
        assert_eq!(a.linear_model(), b.linear_model());
    }

    #[test]
    fn test_train_timed() {
        let trained = SentimentTrainer::default().train_timed(&reviews()).unwrap();
        assert!(trained.model.featurizer().dimension() > 0);
    }

    #[test]
    fn test_empty_dataset() {
        let err = SentimentTrainer::default().train(&Dataset::default()).unwrap_err();
        assert!(matches!(err, SentimentError::Training(_)));
    }
}
