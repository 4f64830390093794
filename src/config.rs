//! Pipeline configuration.
//!
//! Everything a run needs lives in one [`PipelineConfig`] value that is
//! passed down explicitly. It can be built in code, read from a JSON file,
//! or assembled from command-line flags.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::record::validate_test_fraction;
use crate::data::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION};
use crate::error::{Result, SentimentError};
use crate::ml::{FeaturizerOptions, LogisticRegressionOptions};

/// Text scored by the single-prediction step when none is given.
pub const DEFAULT_SINGLE_TEXT: &str = "this is outstading training with an amazing trainer";

/// Texts scored by the batch-prediction step when none are given.
pub const DEFAULT_BATCH_TEXTS: [&str; 2] = ["This was a horrible meal", "I love this spaghetti."];

/// How the pipeline obtains its model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    /// Train on the training split.
    #[default]
    Train,
    /// Train, then write the model to this path.
    TrainAndSave(PathBuf),
    /// Skip training and read a saved model.
    Load(PathBuf),
}

/// Full configuration of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tab-separated input file.
    pub input_path: PathBuf,
    /// Held-out fraction in (0, 1).
    pub test_fraction: f64,
    /// Seed of the train/test shuffle.
    pub seed: u64,
    pub featurizer: FeaturizerOptions,
    pub trainer: LogisticRegressionOptions,
    pub model: ModelSource,
    pub single_text: String,
    pub batch_texts: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data").join("yelp_labelled.txt"),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SPLIT_SEED,
            featurizer: FeaturizerOptions::default(),
            trainer: LogisticRegressionOptions::default(),
            model: ModelSource::default(),
            single_text: DEFAULT_SINGLE_TEXT.to_string(),
            batch_texts: DEFAULT_BATCH_TEXTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Default configuration reading `input_path`.
    pub fn new<P: Into<PathBuf>>(input_path: P) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let config: PipelineConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<()> {
        validate_test_fraction(self.test_fraction)?;
        self.featurizer.validate()?;
        self.trainer.validate()?;
        if self.input_path.as_os_str().is_empty() {
            return Err(SentimentError::invalid_config("input_path must not be empty"));
        }
        Ok(())
    }
}
