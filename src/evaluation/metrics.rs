//! Binary classification metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Probabilities are clamped into `[ε, 1 − ε]` before taking logs.
pub const LOG_LOSS_EPSILON: f64 = 1e-15;

/// Counts of predicted vs. actual labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Positive predicted positive.
    pub tp: usize,
    /// Negative predicted negative.
    pub tn: usize,
    /// Negative predicted positive.
    pub fp: usize,
    /// Positive predicted negative.
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(predicted: &[bool], actual: &[bool]) -> Self {
        let mut matrix = Self::default();
        for (&p, &a) in predicted.iter().zip(actual) {
            matrix.record(p, a);
        }
        matrix
    }

    pub fn record(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.tp += 1,
            (false, false) => self.tn += 1,
            (true, false) => self.fp += 1,
            (false, true) => self.fn_ += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    /// TP / (TP + FP)
    pub fn positive_precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// TP / (TP + FN)
    pub fn positive_recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// TN / (TN + FN)
    pub fn negative_precision(&self) -> f64 {
        ratio(self.tn, self.tn + self.fn_)
    }

    /// TN / (TN + FP)
    pub fn negative_recall(&self) -> f64 {
        ratio(self.tn, self.tn + self.fp)
    }

    /// Harmonic mean of positive precision and recall; 0 when both are 0.
    pub fn f1_score(&self) -> f64 {
        let precision = self.positive_precision();
        let recall = self.positive_recall();
        let denom = precision + recall;
        if denom == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / denom
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Area under the ROC curve via the Mann-Whitney rank statistic.
///
/// Tied scores share their average rank. Returns 0.5 when either class is
/// missing.
pub fn area_under_roc_curve(labels: &[bool], scores: &[f64]) -> f64 {
    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1 ..= end share their mean
        let average_rank = (start + 1 + end) as f64 / 2.0;
        positive_rank_sum += order[start..end]
            .iter()
            .filter(|&&i| labels[i])
            .count() as f64
            * average_rank;
        start = end;
    }

    let n_pos = n_pos as f64;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg as f64)
}

/// Area under the precision-recall curve, computed as average precision.
///
/// Tied scores are treated as one threshold. Returns 0 without positives.
pub fn area_under_precision_recall_curve(labels: &[bool], scores: &[f64]) -> f64 {
    let n_pos = labels.iter().filter(|&&l| l).count();
    if n_pos == 0 {
        return 0.0;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut tp = 0usize;
    let mut seen = 0usize;
    let mut previous_recall = 0.0;
    let mut ap = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        tp += order[start..end].iter().filter(|&&i| labels[i]).count();
        seen += end - start;

        let recall = tp as f64 / n_pos as f64;
        let precision = tp as f64 / seen as f64;
        ap += precision * (recall - previous_recall);
        previous_recall = recall;
        start = end;
    }
    ap
}

/// Mean negative log-likelihood of the labels under `probabilities`.
pub fn log_loss(labels: &[bool], probabilities: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let total: f64 = labels
        .iter()
        .zip(probabilities)
        .map(|(&label, &p)| {
            let p = p.clamp(LOG_LOSS_EPSILON, 1.0 - LOG_LOSS_EPSILON);
            if label { -p.ln() } else { -(1.0 - p).ln() }
        })
        .sum();
    total / labels.len() as f64
}

/// Entropy (in nats) of the label prior.
pub fn prior_entropy(labels: &[bool]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let p = labels.iter().filter(|&&l| l).count() as f64 / labels.len() as f64;
    if p == 0.0 || p == 1.0 {
        return 0.0;
    }
    -(p * p.ln() + (1.0 - p) * (1.0 - p).ln())
}

/// Quality of a classifier on a labeled test set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub area_under_roc_curve: f64,
    pub f1_score: f64,
    pub positive_precision: f64,
    pub positive_recall: f64,
    pub negative_precision: f64,
    pub negative_recall: f64,
    pub area_under_precision_recall_curve: f64,
    pub log_loss: f64,
    /// `(prior_entropy − log_loss) / prior_entropy`; 0 for a single-class test set.
    pub log_loss_reduction: f64,
    pub confusion_matrix: ConfusionMatrix,
}

impl EvaluationMetrics {
    /// Compute every metric from actual labels, predicted labels and
    /// positive-class probabilities (all the same length).
    /// Ranking metrics use the raw `scores`; log-loss uses `probabilities`.
    pub fn from_predictions(
        actual: &[bool],
        predicted: &[bool],
        scores: &[f64],
        probabilities: &[f64],
    ) -> Self {
        let confusion_matrix = ConfusionMatrix::from_predictions(predicted, actual);
        let log_loss = log_loss(actual, probabilities);
        let entropy = prior_entropy(actual);
        let log_loss_reduction = if entropy > 0.0 {
            (entropy - log_loss) / entropy
        } else {
            0.0
        };

        Self {
            accuracy: confusion_matrix.accuracy(),
            area_under_roc_curve: area_under_roc_curve(actual, scores),
            f1_score: confusion_matrix.f1_score(),
            positive_precision: confusion_matrix.positive_precision(),
            positive_recall: confusion_matrix.positive_recall(),
            negative_precision: confusion_matrix.negative_precision(),
            negative_recall: confusion_matrix.negative_recall(),
            area_under_precision_recall_curve: area_under_precision_recall_curve(actual, scores),
            log_loss,
            log_loss_reduction,
            confusion_matrix,
        }
    }

    /// Human-readable report.
    pub fn format(&self) -> String {
        let cm = &self.confusion_matrix;
        let mut output = String::new();
        output.push_str(&format!("Accuracy:          {:.2}%\n", self.accuracy * 100.0));
        output.push_str(&format!("AUC:               {:.2}%\n", self.area_under_roc_curve * 100.0));
        output.push_str(&format!("F1 score:          {:.2}%\n", self.f1_score * 100.0));
        output.push_str(&format!(
            "Positive P/R:      {:.4} / {:.4}\n",
            self.positive_precision, self.positive_recall
        ));
        output.push_str(&format!(
            "Negative P/R:      {:.4} / {:.4}\n",
            self.negative_precision, self.negative_recall
        ));
        output.push_str(&format!(
            "AUPRC:             {:.4}\n",
            self.area_under_precision_recall_curve
        ));
        output.push_str(&format!("Log-loss:          {:.4}\n", self.log_loss));
        output.push_str(&format!("Log-loss reduction: {:.4}\n", self.log_loss_reduction));
        output.push_str(&format!(
            "Confusion matrix:  TP={} FP={} TN={} FN={}\n",
            cm.tp, cm.fp, cm.tn, cm.fn_
        ));
        output
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
