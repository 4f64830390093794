//! The trained sentiment model and its on-disk format.
//!
//! # File layout
//!
//! ```text
//! magic    4 bytes  b"SNTM"
//! version  u32 LE
//! length   u64 LE   payload length in bytes
//! checksum u32 LE   CRC32 of the payload
//! payload           bincode-encoded featurizer state, weights and threshold
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::ml::featurizer::{Featurizer, FeaturizerState, TextFeaturizer};
use crate::ml::logistic::LinearModel;
use crate::ml::{DEFAULT_THRESHOLD, Prediction, SentimentClassifier};

const MAGIC: &[u8; 4] = b"SNTM";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ModelPayload {
    featurizer: FeaturizerState,
    linear: LinearModel,
    threshold: f64,
}

/// Fitted featurizer plus linear weights.
#[derive(Debug)]
pub struct SentimentModel {
    featurizer: TextFeaturizer,
    linear: LinearModel,
    threshold: f64,
}

impl SentimentModel {
    /// Pair a fitted featurizer with weights of the same dimension.
    pub fn new(featurizer: TextFeaturizer, linear: LinearModel) -> Result<Self> {
        if featurizer.dimension() != linear.dimension() {
            return Err(SentimentError::training(format!(
                "featurizer dimension {} does not match model dimension {}",
                featurizer.dimension(),
                linear.dimension()
            )));
        }
        Ok(Self {
            featurizer,
            linear,
            threshold: DEFAULT_THRESHOLD,
        })
    }

    /// Use a different probability cut-off for the positive label.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SentimentError::invalid_config(format!(
                "threshold must be in [0, 1], got {threshold}"
            )));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn featurizer(&self) -> &TextFeaturizer {
        &self.featurizer
    }

    pub fn linear_model(&self) -> &LinearModel {
        &self.linear
    }

    /// Terms with the largest weights, most positive first when
    /// `positive` is true, most negative first otherwise.
    pub fn strongest_terms(&self, k: usize, positive: bool) -> Vec<(&str, f64)> {
        let mut weighted: Vec<(usize, f64)> =
            self.linear.weights.iter().copied().enumerate().collect();
        if positive {
            weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
        } else {
            weighted.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        weighted
            .into_iter()
            .take(k)
            .filter_map(|(i, w)| self.featurizer.term(i).map(|t| (t, w)))
            .collect()
    }

    /// Write the model in the checksummed binary format.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = bincode::serialize(&ModelPayload {
            featurizer: self.featurizer.state(),
            linear: self.linear.clone(),
            threshold: self.threshold,
        })?;

        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(FORMAT_VERSION)?;
        writer.write_u64::<LittleEndian>(payload.len() as u64)?;
        writer.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
        writer.write_all(&payload)?;
        Ok(())
    }

    /// Read a model written by [`SentimentModel::write_to`].
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(reader, &mut magic)?;
        if &magic != MAGIC {
            return Err(SentimentError::serialization("not a sentiment model file"));
        }

        let version = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        if version != FORMAT_VERSION {
            return Err(SentimentError::serialization(format!(
                "unsupported model format version {version} (expected {FORMAT_VERSION})"
            )));
        }

        let length = reader.read_u64::<LittleEndian>().map_err(truncated)?;
        let stored_checksum = reader.read_u32::<LittleEndian>().map_err(truncated)?;

        let mut payload = Vec::new();
        reader.take(length).read_to_end(&mut payload)?;
        if payload.len() as u64 != length {
            return Err(SentimentError::serialization(format!(
                "model payload truncated: expected {length} bytes, found {}",
                payload.len()
            )));
        }
        if crc32fast::hash(&payload) != stored_checksum {
            return Err(SentimentError::serialization("model checksum mismatch"));
        }

        let decoded: ModelPayload = bincode::deserialize(&payload)?;
        let featurizer = TextFeaturizer::from_state(decoded.featurizer)?;
        Self::new(featurizer, decoded.linear)
            .map_err(|e| SentimentError::serialization(e.to_string()))?
            .with_threshold(decoded.threshold)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        info!("Saved model to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let model = Self::read_from(&mut reader)?;
        info!(
            "Loaded model from {} ({} features)",
            path.display(),
            model.linear.dimension()
        );
        Ok(model)
    }
}

impl SentimentClassifier for SentimentModel {
    fn predict(&self, text: &str) -> Result<Prediction> {
        let features = self.featurizer.featurize(text)?;
        Ok(Prediction::from_score(
            self.linear.score(&features),
            self.threshold,
        ))
    }

    fn is_trained(&self) -> bool {
        self.featurizer.is_fitted()
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(truncated)
}

fn truncated(err: std::io::Error) -> SentimentError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        SentimentError::serialization("model file truncated")
    } else {
        SentimentError::Io(err)
    }
}
