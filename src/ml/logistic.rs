//! L2-regularized logistic regression.
//!
//! Minimizes the mean log-loss plus `λ/2 · (‖w‖² + b²)` with full-batch
//! Nesterov accelerated gradient descent. The objective is `λ`-strongly
//! convex and its gradient is `L`-Lipschitz with
//! `L = 0.25 · (max‖x‖² + 1) + λ`, so a fixed step of `1/L` and momentum
//! `(√κ − 1)/(√κ + 1)` with `κ = L/λ` converge linearly. Results are fully
//! deterministic for a given input order.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::ml::vector::FeatureVector;

/// Learns a [`LinearModel`] from labeled feature vectors.
pub trait BinaryTrainer: Send + Sync {
    fn fit(&self, features: &[FeatureVector], labels: &[bool]) -> Result<LinearModel>;

    fn name(&self) -> &str;
}

/// Solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegressionOptions {
    /// L2 penalty `λ`. Must be positive.
    pub l2_regularization: f64,
    /// Iteration cap; reaching it is a training failure.
    pub max_iterations: usize,
    /// Converged once the gradient norm drops below this.
    pub tolerance: f64,
}

impl Default for LogisticRegressionOptions {
    fn default() -> Self {
        Self {
            l2_regularization: 1e-3,
            max_iterations: 5000,
            tolerance: 1e-5,
        }
    }
}

impl LogisticRegressionOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.l2_regularization > 0.0 && self.l2_regularization.is_finite()) {
            return Err(SentimentError::invalid_config(format!(
                "l2_regularization must be a positive number, got {}",
                self.l2_regularization
            )));
        }
        if self.max_iterations == 0 {
            return Err(SentimentError::invalid_config(
                "max_iterations must be at least 1",
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(SentimentError::invalid_config(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Weights and bias of a linear classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// Raw margin `w·x + b`.
    pub fn score(&self, features: &FeatureVector) -> f64 {
        features.dot(&self.weights) + self.bias
    }

    /// Calibrated positive-class probability.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.score(features))
    }

    fn from_params(mut params: Vec<f64>) -> Self {
        let bias = params.pop().unwrap_or(0.0);
        Self {
            weights: params,
            bias,
        }
    }
}

/// Logistic function, stable for large `|z|`.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)`, stable for large `|z|`.
pub fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

/// Logistic regression trained with accelerated gradient descent.
#[derive(Debug, Clone, Default)]
pub struct LogisticRegressionTrainer {
    options: LogisticRegressionOptions,
}

impl LogisticRegressionTrainer {
    pub fn new(options: LogisticRegressionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &LogisticRegressionOptions {
        &self.options
    }

    /// Regularized mean log-loss of `model` on the given data.
    pub fn objective(&self, model: &LinearModel, features: &[FeatureVector], labels: &[bool]) -> f64 {
        if features.is_empty() {
            return 0.0;
        }
        let loss: f64 = features
            .iter()
            .zip(labels)
            .map(|(x, &y)| {
                let z = model.score(x);
                softplus(z) - if y { z } else { 0.0 }
            })
            .sum::<f64>()
            / features.len() as f64;
        let penalty = model.weights.iter().map(|w| w * w).sum::<f64>() + model.bias * model.bias;
        loss + 0.5 * self.options.l2_regularization * penalty
    }

    /// Gradient of the objective at `params` (weights followed by bias).
    fn gradient_into(
        &self,
        params: &[f64],
        features: &[FeatureVector],
        labels: &[bool],
        grad: &mut [f64],
    ) {
        let dimension = params.len() - 1;
        let (weights, bias) = params.split_at(dimension);
        let bias = bias[0];

        grad.fill(0.0);
        for (x, &y) in features.iter().zip(labels) {
            let residual = sigmoid(x.dot(weights) + bias) - if y { 1.0 } else { 0.0 };
            for (i, v) in x.iter() {
                grad[i] += residual * v;
            }
            grad[dimension] += residual;
        }

        let n = features.len() as f64;
        let lambda = self.options.l2_regularization;
        for (g, p) in grad.iter_mut().zip(params) {
            *g = *g / n + lambda * p;
        }
    }
}

impl BinaryTrainer for LogisticRegressionTrainer {
    fn fit(&self, features: &[FeatureVector], labels: &[bool]) -> Result<LinearModel> {
        if features.is_empty() {
            return Err(SentimentError::training("training set is empty"));
        }
        if features.len() != labels.len() {
            return Err(SentimentError::training(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let dimension = features[0].dimension();
        if features.iter().any(|x| x.dimension() != dimension) {
            return Err(SentimentError::training(
                "feature vectors have inconsistent dimensions",
            ));
        }

        let lambda = self.options.l2_regularization;
        let max_squared_norm = features
            .iter()
            .map(FeatureVector::squared_norm)
            .fold(0.0, f64::max);
        let lipschitz = 0.25 * (max_squared_norm + 1.0) + lambda;
        let step = 1.0 / lipschitz;
        let sqrt_kappa = (lipschitz / lambda).sqrt();
        let momentum = (sqrt_kappa - 1.0) / (sqrt_kappa + 1.0);
        debug!(
            "Training on {} examples, dimension {}, step {:.4}, momentum {:.4}",
            features.len(),
            dimension,
            step,
            momentum
        );

        let mut previous = vec![0.0; dimension + 1];
        let mut lookahead = previous.clone();
        let mut grad = vec![0.0; dimension + 1];
        let mut grad_norm = f64::INFINITY;

        for iteration in 0..self.options.max_iterations {
            self.gradient_into(&lookahead, features, labels, &mut grad);
            grad_norm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();

            if !grad_norm.is_finite() {
                return Err(SentimentError::training(format!(
                    "gradient became non-finite at iteration {iteration}"
                )));
            }
            if grad_norm < self.options.tolerance {
                info!(
                    "Logistic regression converged after {} iterations (gradient norm {:.3e})",
                    iteration, grad_norm
                );
                return Ok(LinearModel::from_params(lookahead));
            }
            if iteration % 500 == 0 {
                debug!("iteration {iteration}: gradient norm {grad_norm:.3e}");
            }

            let next: Vec<f64> = lookahead
                .iter()
                .zip(&grad)
                .map(|(p, g)| p - step * g)
                .collect();
            lookahead = next
                .iter()
                .zip(&previous)
                .map(|(x, x_prev)| x + momentum * (x - x_prev))
                .collect();
            previous = next;
        }

        Err(SentimentError::training(format!(
            "logistic regression did not converge within {} iterations (gradient norm {:.3e})",
            self.options.max_iterations, grad_norm
        )))
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}
