use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sentiment::config::{ModelSource, PipelineConfig};
use sentiment::data::{DataLoader, LabeledRecord};
use sentiment::error::SentimentError;
use sentiment::evaluation::evaluate;
use sentiment::ml::{MajorityClassifier, SentimentClassifier, SentimentModel, SentimentTrainer};
use sentiment::pipeline::SentimentPipeline;
use sentiment::prediction::PredictionEngine;
use tempfile::{TempDir, tempdir};

const DISHES: [&str; 10] = [
    "pasta", "pizza", "soup", "salad", "steak", "burger", "sushi", "tacos", "curry", "bread",
];

/// 80 restaurant reviews, half positive, written as `text<TAB>label`.
fn review_lines() -> Vec<String> {
    let mut lines = Vec::new();
    for dish in DISHES {
        lines.push(format!("I love the {dish}\t1"));
        lines.push(format!("The {dish} was great\t1"));
        lines.push(format!("Amazing {dish}, I love it\t1"));
        lines.push(format!("This {dish} is delicious\t1"));
        lines.push(format!("I hated the {dish}\t0"));
        lines.push(format!("The {dish} was horrible\t0"));
        lines.push(format!("This {dish} is awful\t0"));
        lines.push(format!("Worst {dish} ever, bad service\t0"));
    }
    lines
}

fn write_reviews(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("reviews_labelled.txt");
    fs::write(&path, review_lines().join("\n") + "\n").unwrap();
    path
}

fn trained_model(path: &Path) -> SentimentModel {
    let split = DataLoader::new(path).load().unwrap();
    SentimentTrainer::default().train(&split.train).unwrap()
}

#[test]
fn test_pipeline_end_to_end() {
    let dir = tempdir().unwrap();
    let input = write_reviews(&dir);

    let report = SentimentPipeline::new(PipelineConfig::new(&input))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.train_count + report.test_count, 80);
    assert_eq!(report.test_count, 16);
    assert!(report.training_millis.is_some());
    assert!(report.baseline_accuracy.is_some());
    assert!(report.metrics.accuracy >= 0.75, "accuracy {}", report.metrics.accuracy);
    assert!((0.0..=1.0).contains(&report.metrics.area_under_roc_curve));
    assert!((0.0..=1.0).contains(&report.metrics.f1_score));

    let texts: Vec<&str> = report
        .batch_predictions
        .iter()
        .map(|p| p.input_text.as_str())
        .collect();
    assert_eq!(texts, vec!["This was a horrible meal", "I love this spaghetti."]);
    assert!(!report.batch_predictions[0].predicted_label);
    assert!(report.batch_predictions[1].predicted_label);
    assert!(report.batch_predictions[1].probability > 0.5);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["train_count"], 64);
    assert!(json["metrics"]["confusion_matrix"]["tp"].is_u64());
}

#[test]
fn test_split_is_disjoint_partition() {
    let dir = tempdir().unwrap();
    let input = write_reviews(&dir);

    let split = DataLoader::new(&input).with_seed(123).load().unwrap();
    let train: HashSet<&LabeledRecord> = split.train.iter().collect();
    let test: HashSet<&LabeledRecord> = split.test.iter().collect();
    assert!(train.is_disjoint(&test));
    assert_eq!(train.len() + test.len(), 80);

    let again = DataLoader::new(&input).with_seed(123).load().unwrap();
    assert_eq!(split, again);
}

#[test]
fn test_predictions_are_idempotent_and_well_formed() {
    let dir = tempdir().unwrap();
    let model = trained_model(&write_reviews(&dir));
    let engine = PredictionEngine::new(Arc::new(model));

    let first = engine.predict_one("the sushi was great").unwrap();
    let second = engine.predict_one("the sushi was great").unwrap();
    assert_eq!(first, second);
    assert!(first.predicted_label);

    let empty = engine.predict_one("").unwrap();
    assert_eq!(empty.input_text, "");
    assert!((0.0..=1.0).contains(&empty.probability));
    assert!(empty.score.is_finite());

    let texts = ["awful", "", "I love it", "xyzzy", "the soup was horrible"];
    let batch = engine.predict_batch(&texts).unwrap();
    assert_eq!(batch.len(), texts.len());
    for (result, text) in batch.iter().zip(texts) {
        assert_eq!(result.input_text, text);
        assert_eq!(result, &engine.predict_one(text).unwrap());
    }
}

#[test]
fn test_model_persistence_round_trip() {
    let dir = tempdir().unwrap();
    let input = write_reviews(&dir);
    let model_path = dir.path().join("sentiment.model");

    let trained = SentimentPipeline::new(PipelineConfig {
        model: ModelSource::TrainAndSave(model_path.clone()),
        ..PipelineConfig::new(&input)
    })
    .unwrap()
    .run()
    .unwrap();
    assert!(model_path.exists());

    let loaded = SentimentPipeline::new(PipelineConfig {
        model: ModelSource::Load(model_path.clone()),
        ..PipelineConfig::new(&input)
    })
    .unwrap()
    .run()
    .unwrap();

    assert!(loaded.training_millis.is_none());
    assert_eq!(trained.metrics, loaded.metrics);
    for (a, b) in trained
        .batch_predictions
        .iter()
        .chain(std::iter::once(&trained.single_prediction))
        .zip(
            loaded
                .batch_predictions
                .iter()
                .chain(std::iter::once(&loaded.single_prediction)),
        )
    {
        assert_eq!(a.predicted_label, b.predicted_label);
        assert!((a.probability - b.probability).abs() < 1e-6);
    }

    let direct = SentimentModel::load(&model_path).unwrap();
    assert!(direct.is_trained());
}

#[test]
fn test_loaded_model_with_empty_training_split_has_no_baseline() {
    let dir = tempdir().unwrap();
    let model_path = dir.path().join("sentiment.model");
    trained_model(&write_reviews(&dir)).save(&model_path).unwrap();

    let single = dir.path().join("single.txt");
    fs::write(&single, "The soup was great\t1\n").unwrap();

    let report = SentimentPipeline::new(PipelineConfig {
        test_fraction: 0.5,
        model: ModelSource::Load(model_path),
        ..PipelineConfig::new(&single)
    })
    .unwrap()
    .run()
    .unwrap();

    assert_eq!(report.train_count, 0);
    assert_eq!(report.test_count, 1);
    assert_eq!(report.baseline_accuracy, None);
    assert!(report.training_millis.is_none());
}

#[test]
fn test_majority_baseline_accuracy() {
    let dir = tempdir().unwrap();
    let split = DataLoader::new(write_reviews(&dir)).load().unwrap();

    let mut baseline = MajorityClassifier::new();
    baseline.fit(&split.test).unwrap();
    let metrics = evaluate(&baseline, &split.test).unwrap();

    let majority = split.test.positive_count().max(split.test.negative_count());
    assert!((metrics.accuracy - majority as f64 / split.test.len() as f64).abs() < 1e-12);
}

#[test]
fn test_malformed_input_reports_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.txt");
    fs::write(&path, "Good food\t1\nBad food\t0\nno label at all\nFine\t1\n").unwrap();

    let err = SentimentPipeline::new(PipelineConfig::new(&path))
        .unwrap()
        .run()
        .unwrap_err();
    match err {
        SentimentError::DataFormat { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_input_fails_in_training() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "\n\n").unwrap();

    let err = SentimentPipeline::new(PipelineConfig::new(&path))
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(err, SentimentError::Training(_)));
}
