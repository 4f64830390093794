//! Tab-separated input reader.
//!
//! Each non-blank line holds exactly two fields, `text<TAB>label`, with no
//! header row. Labels are `0`/`1` or `false`/`true` (any case).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::data::record::{Dataset, LabeledRecord, TrainTestSplit, validate_test_fraction};
use crate::error::{Result, SentimentError};

/// Default held-out fraction.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Default seed for the train/test shuffle.
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Reads an input file and splits it into train/test partitions.
#[derive(Debug, Clone)]
pub struct DataLoader {
    path: PathBuf,
    test_fraction: f64,
    seed: u64,
}

impl DataLoader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SPLIT_SEED,
        }
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file, failing on the first malformed line, and split it.
    pub fn load(&self) -> Result<TrainTestSplit> {
        validate_test_fraction(self.test_fraction)?;

        let dataset = read_records(&self.path)?;
        if dataset.is_empty() {
            warn!("{} contains no records", self.path.display());
        }

        let split = dataset.train_test_split(self.test_fraction, self.seed)?;
        info!(
            "Training set: {}, test set: {}",
            split.train.len(),
            split.test.len()
        );
        Ok(split)
    }

    /// Scan the whole file and collect every malformed line instead of
    /// stopping at the first one.
    pub fn validate(&self) -> Result<Vec<SentimentError>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut problems = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            if let Err(err) = parse_line(&line?, index + 1) {
                problems.push(err);
            }
        }
        Ok(problems)
    }
}

/// Read every record of a TSV file, rejecting on the first malformed line.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        SentimentError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot open {}: {e}", path.display()),
        ))
    })?;

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        if let Some(record) = parse_line(&line?, index + 1)? {
            records.push(record);
        }
    }
    Ok(Dataset::new(records))
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<LabeledRecord>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 2 {
        return Err(SentimentError::data_format(
            line_number,
            format!(
                "expected 2 tab-separated fields (text, label), found {}",
                fields.len()
            ),
        ));
    }

    let label = parse_label(fields[1]).ok_or_else(|| {
        SentimentError::data_format(
            line_number,
            format!("unrecognized label {:?}, expected 0/1 or false/true", fields[1]),
        )
    })?;

    Ok(Some(LabeledRecord::new(fields[0], label)))
}

/// Parse a boolean label token.
pub fn parse_label(token: &str) -> Option<bool> {
    match token.trim() {
        "1" => Some(true),
        "0" => Some(false),
        t if t.eq_ignore_ascii_case("true") => Some(true),
        t if t.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}
