//! Criterion benchmarks for featurization, training and prediction.

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use sentiment::data::{Dataset, LabeledRecord};
use sentiment::ml::{
    BinaryTrainer, Featurizer, FeatureVector, FeaturizerOptions, LogisticRegressionTrainer,
    SentimentClassifier, SentimentTrainer, TextFeaturizer,
};

/// Generate labeled review sentences for benchmarking.
fn generate_reviews(count: usize) -> Dataset {
    let positive = [
        "great", "amazing", "delicious", "friendly", "love", "fresh", "perfect", "tasty",
    ];
    let negative = [
        "awful", "horrible", "cold", "rude", "bland", "slow", "worst", "stale",
    ];
    let neutral = [
        "the", "food", "service", "was", "place", "staff", "meal", "and", "this", "pasta",
    ];

    (0..count)
        .map(|i| {
            let label = i % 2 == 0;
            let sentiment_words = if label { &positive } else { &negative };
            let length = 6 + (i % 10);
            let words: Vec<&str> = (0..length)
                .map(|j| {
                    // Pseudo-random mix of sentiment and neutral words
                    if (i + j) % 3 == 0 {
                        sentiment_words[(i * 7 + j * 13) % sentiment_words.len()]
                    } else {
                        neutral[(i * 5 + j * 11) % neutral.len()]
                    }
                })
                .collect();
            LabeledRecord::new(words.join(" "), label)
        })
        .collect()
}

fn bench_featurization(c: &mut Criterion) {
    let mut group = c.benchmark_group("featurization");
    let dataset = generate_reviews(1000);
    let texts = dataset.texts();

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("fit_vocabulary", |b| {
        b.iter(|| {
            let mut featurizer = TextFeaturizer::new(FeaturizerOptions::default()).unwrap();
            featurizer.fit(black_box(&texts)).unwrap();
            black_box(featurizer.dimension())
        })
    });

    let mut featurizer = TextFeaturizer::new(FeaturizerOptions::default()).unwrap();
    featurizer.fit(&texts).unwrap();
    group.bench_function("featurize_documents", |b| {
        b.iter(|| {
            for text in &texts {
                black_box(featurizer.featurize(black_box(text)).unwrap());
            }
        })
    });

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    let dataset = generate_reviews(1000);
    let mut featurizer = TextFeaturizer::new(FeaturizerOptions::default()).unwrap();
    featurizer.fit(&dataset.texts()).unwrap();
    let features: Vec<FeatureVector> = dataset
        .texts()
        .iter()
        .map(|text| featurizer.featurize(text).unwrap())
        .collect();
    let labels = dataset.labels();

    group.bench_function("logistic_regression_fit", |b| {
        let trainer = LogisticRegressionTrainer::default();
        b.iter(|| black_box(trainer.fit(black_box(&features), black_box(&labels)).unwrap()))
    });

    group.bench_function("featurize_and_train", |b| {
        let trainer = SentimentTrainer::default();
        b.iter(|| black_box(trainer.train(black_box(&dataset)).unwrap()))
    });

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    let dataset = generate_reviews(1000);
    let model = SentimentTrainer::default().train(&dataset).unwrap();

    group.bench_function("predict_single", |b| {
        b.iter(|| black_box(model.predict(black_box("I love this spaghetti.")).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_featurization, bench_training, bench_prediction);
criterion_main!(benches);
