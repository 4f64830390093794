//! # Sentiment
//!
//! Binary sentiment classification of short review sentences.
//!
//! ## Pipeline
//!
//! - Load a tab-separated `text<TAB>label` file and split it with a seeded shuffle
//! - Featurize text into word and character n-grams
//! - Train an L2-regularized logistic regression
//! - Evaluate accuracy, AUC and F1 on the held-out split
//! - Predict single texts or batches

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod ml;
pub mod pipeline;
pub mod prediction;

pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::data::{DataLoader, Dataset, LabeledRecord, TrainTestSplit};
    pub use crate::error::{Result, SentimentError};
    pub use crate::evaluation::{EvaluationMetrics, evaluate};
    pub use crate::ml::{SentimentClassifier, SentimentModel, SentimentTrainer};
    pub use crate::pipeline::{PipelineReport, SentimentPipeline};
    pub use crate::prediction::{PredictionEngine, PredictionResult};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
