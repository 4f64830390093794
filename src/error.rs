//! Error types for the sentiment pipeline.
//!
//! Every stage of the pipeline reports failures through [`SentimentError`].
//! Each variant names the stage that failed so the operator can tell a
//! malformed input file apart from a solver that did not converge.
//!
//! # Examples
//!
//! ```
//! use sentiment::error::{Result, SentimentError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SentimentError::training("training set is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for sentiment pipeline operations.
///
/// This enum uses the `thiserror` crate for the `Error` implementation and
/// provides constructor helpers for the stage-specific variants.
#[derive(Error, Debug)]
pub enum SentimentError {
    /// I/O errors (reading the input file, writing a model, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line of the input file could not be parsed into a labeled record.
    #[error("Data format error at line {line}: {message}")]
    DataFormat {
        /// 1-based line number in the input file.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Training failed (empty training set, solver did not converge).
    #[error("Training error: {0}")]
    Training(String),

    /// Evaluation failed (empty test set).
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Prediction failed (no trained model available).
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model file encoding/decoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SentimentError.
pub type Result<T> = std::result::Result<T, SentimentError>;

impl From<bincode::Error> for SentimentError {
    fn from(err: bincode::Error) -> Self {
        SentimentError::Serialization(err.to_string())
    }
}

impl SentimentError {
    /// Create a new data format error for the given 1-based line.
    pub fn data_format<S: Into<String>>(line: usize, msg: S) -> Self {
        SentimentError::DataFormat {
            line,
            message: msg.into(),
        }
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        SentimentError::Training(msg.into())
    }

    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        SentimentError::Evaluation(msg.into())
    }

    /// Create a new prediction error.
    pub fn prediction<S: Into<String>>(msg: S) -> Self {
        SentimentError::Prediction(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SentimentError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SentimentError::InvalidConfig(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SentimentError::Serialization(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SentimentError::Other(msg.into())
    }

    /// Name of the pipeline stage this error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            SentimentError::DataFormat { .. } => "load",
            SentimentError::Training(_) => "train",
            SentimentError::Evaluation(_) => "evaluate",
            SentimentError::Prediction(_) => "predict",
            SentimentError::Analysis(_) => "analysis",
            SentimentError::InvalidConfig(_) => "config",
            SentimentError::Serialization(_) => "model-io",
            SentimentError::Io(_) => "io",
            SentimentError::Json(_) => "json",
            SentimentError::Other(_) => "runtime",
        }
    }

    /// The message prefixed with its stage, as printed by the binary.
    pub fn with_stage(&self) -> String {
        format!("[{}] {}", self.stage(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SentimentError::training("training set is empty");
        assert_eq!(error.to_string(), "Training error: training set is empty");

        let error = SentimentError::evaluation("test set is empty");
        assert_eq!(error.to_string(), "Evaluation error: test set is empty");

        let error = SentimentError::data_format(7, "expected 2 tab-separated fields, found 1");
        assert_eq!(
            error.to_string(),
            "Data format error at line 7: expected 2 tab-separated fields, found 1"
        );
        assert_eq!(error.stage(), "load");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let sentiment_error = SentimentError::from(io_error);

        match sentiment_error {
            SentimentError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_message_names_stage() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "cannot open reviews.tsv");
        assert_eq!(
            SentimentError::from(io_error).with_stage(),
            "[io] I/O error: cannot open reviews.tsv"
        );
        assert_eq!(
            SentimentError::invalid_config("input_path must not be empty").with_stage(),
            "[config] Invalid configuration: input_path must not be empty"
        );
    }
}
