//! Loading labeled review sentences and splitting them into train/test sets.

pub mod loader;
pub mod record;

pub use loader::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION, DataLoader, parse_line, read_records};
pub use record::{Dataset, LabeledRecord, TrainTestSplit};
