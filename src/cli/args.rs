//! Command line argument parsing for the sentiment CLI using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Train and evaluate a review sentiment classifier
#[derive(Parser, Debug, Clone)]
#[command(name = "sentiment")]
#[command(about = "Train, evaluate and apply a binary sentiment classifier on labeled reviews")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SentimentArgs {
    /// Input TSV file (`text<TAB>label`); overrides --data-dir/--dataset
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Directory holding the bundled datasets [default: data]
    #[arg(long, env = "SENTIMENT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Bundled dataset to use when no INPUT is given [default: yelp]
    #[arg(long, value_enum)]
    pub dataset: Option<DatasetName>,

    /// Fraction of records held out for evaluation
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Seed of the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON pipeline configuration; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the trained model to this file
    #[arg(long, value_name = "FILE", conflicts_with = "load_model")]
    pub save_model: Option<PathBuf>,

    /// Use a previously saved model instead of training
    #[arg(long, value_name = "FILE")]
    pub load_model: Option<PathBuf>,

    /// Text to score; the first is the single prediction, all are batch-scored
    #[arg(long = "text", value_name = "TEXT")]
    pub texts: Vec<String>,

    /// Only check the input file and report every malformed line
    #[arg(long)]
    pub check: bool,

    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl SentimentArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// The input file: explicit INPUT, else `<data-dir>/<dataset>_labelled.txt`.
    pub fn input_path(&self) -> PathBuf {
        self.explicit_input_path().unwrap_or_else(|| {
            PathBuf::from(DEFAULT_DATA_DIR).join(DatasetName::default().file_name())
        })
    }

    /// The input file named on the command line or through `SENTIMENT_DATA_DIR`,
    /// if any of INPUT, `--data-dir` or `--dataset` was given.
    pub fn explicit_input_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.input {
            return Some(path.clone());
        }
        if self.data_dir.is_none() && self.dataset.is_none() {
            return None;
        }
        let data_dir = self
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Some(data_dir.join(self.dataset.unwrap_or_default().file_name()))
    }
}

/// Directory searched for bundled datasets when `--data-dir` is not given.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Bundled review datasets.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetName {
    #[default]
    Yelp,
    Imdb,
    Amazon,
}

impl DatasetName {
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetName::Yelp => "yelp_labelled.txt",
            DatasetName::Imdb => "imdb_labelled.txt",
            DatasetName::Amazon => "amazon_labelled.txt",
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable report
    Human,
    /// JSON output
    Json,
}
