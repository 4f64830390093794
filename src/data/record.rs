//! Labeled records and the in-memory dataset.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};

/// One line of the input file: a sentence and whether it is positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabeledRecord {
    /// Review text.
    pub text: String,
    /// `true` for positive sentiment.
    pub label: bool,
}

impl LabeledRecord {
    pub fn new<S: Into<String>>(text: S, label: bool) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Ordered sequence of labeled records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<LabeledRecord>,
}

/// Disjoint train/test partitions of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    pub fn new(records: Vec<LabeledRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LabeledRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledRecord> {
        self.records.iter()
    }

    /// Record texts, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.text.as_str()).collect()
    }

    /// Record labels, in order.
    pub fn labels(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Number of positive records.
    pub fn positive_count(&self) -> usize {
        self.records.iter().filter(|r| r.label).count()
    }

    /// Number of negative records.
    pub fn negative_count(&self) -> usize {
        self.len() - self.positive_count()
    }

    /// Split into train and test partitions.
    ///
    /// Records are shuffled with a `StdRng` seeded from `seed`; the first
    /// `round(len * test_fraction)` shuffled records become the test set.
    /// Same seed and input order always give the same partitions.
    pub fn train_test_split(&self, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
        validate_test_fraction(test_fraction)?;

        let mut order: Vec<usize> = (0..self.records.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let test_len = test_partition_len(self.records.len(), test_fraction);
        let (test_idx, train_idx) = order.split_at(test_len);

        let pick = |indices: &[usize]| {
            Dataset::new(indices.iter().map(|&i| self.records[i].clone()).collect())
        };

        Ok(TrainTestSplit {
            train: pick(train_idx),
            test: pick(test_idx),
        })
    }
}

impl From<Vec<LabeledRecord>> for Dataset {
    fn from(records: Vec<LabeledRecord>) -> Self {
        Dataset::new(records)
    }
}

impl FromIterator<LabeledRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = LabeledRecord>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LabeledRecord;
    type IntoIter = std::slice::Iter<'a, LabeledRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// The held-out fraction must lie strictly between 0 and 1.
pub fn validate_test_fraction(test_fraction: f64) -> Result<()> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SentimentError::invalid_config(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    Ok(())
}

fn test_partition_len(total: usize, test_fraction: f64) -> usize {
    ((total as f64 * test_fraction).round() as usize).min(total)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn reviews() -> Dataset {
        Dataset::new(vec![
            LabeledRecord::new("great food", true),
            LabeledRecord::new("awful service", false),
            LabeledRecord::new("I loved it", true),
            LabeledRecord::new("never again", false),
        ])
    }

    #[test]
    fn test_split_sizes_quarter() {
        let split = reviews().train_test_split(0.25, 42).unwrap();
        assert_eq!(split.test.len(), 1);
        assert_eq!(split.train.len(), 3);
    }

    #[test]
    fn test_split_is_partition() {
        let records: Vec<LabeledRecord> = (0..103)
            .map(|i| LabeledRecord::new(format!("review number {i}"), i % 3 == 0))
            .collect();
        let dataset = Dataset::new(records.clone());

        for seed in [0, 1, 42, 9999] {
            let split = dataset.train_test_split(0.2, seed).unwrap();
            assert_eq!(split.train.len() + split.test.len(), records.len());
            assert_eq!(split.test.len(), 21);

            let train: HashSet<&LabeledRecord> = split.train.iter().collect();
            let test: HashSet<&LabeledRecord> = split.test.iter().collect();
            assert!(train.is_disjoint(&test));

            let union: HashSet<&LabeledRecord> = train.union(&test).copied().collect();
            let all: HashSet<&LabeledRecord> = records.iter().collect();
            assert_eq!(union, all);
        }
    }

    #[test]
    fn test_split_is_deterministic_for_seed() {
        let dataset = reviews();
        let a = dataset.train_test_split(0.5, 7).unwrap();
        let b = dataset.train_test_split(0.5, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        let dataset = reviews();
        for fraction in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = dataset.train_test_split(fraction, 1).unwrap_err();
            assert!(matches!(err, SentimentError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_label_counts() {
        let dataset = reviews();
        assert_eq!(dataset.positive_count(), 2);
        assert_eq!(dataset.negative_count(), 2);
        assert_eq!(dataset.texts()[0], "great food");
        assert_eq!(dataset.labels(), vec![true, false, true, false]);
    }
}
