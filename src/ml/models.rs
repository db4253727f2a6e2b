//! Baseline risk models.

use log::debug;

use crate::error::{Error, Result};
use crate::features::FeatureMatrix;

/// Default L2 regularization strength
pub const DEFAULT_REGULARIZATION: f64 = 1e-4;
/// Default maximum gradient-descent iterations
pub const DEFAULT_MAX_ITER: usize = 2000;
/// Default convergence tolerance on the loss
pub const DEFAULT_TOL: f64 = 1e-7;

/// Binary logistic regression, fitted by batch gradient descent with L2
/// regularization and balanced class weighting.
///
/// Class weighting rescales each sample's loss and gradient contribution by
/// `n / (2 * class_count)`, so the rare fraud class carries the same total
/// weight as the majority class without resampling. Features are
/// standardized internally (per-column mean/std), which keeps gradient
/// descent well conditioned on raw transaction magnitudes.
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    feature_names: Vec<String>,
    means: Vec<f64>,
    stds: Vec<f64>,
    regularization: f64,
    learning_rate: f64,
    max_iter: usize,
    tol: f64,
    fitted: bool,
}

impl LogisticRegression {
    /// Create a new, unfitted model.
    pub fn new(regularization: f64, max_iter: usize, tol: f64) -> Self {
        LogisticRegression {
            coefficients: Vec::new(),
            intercept: 0.0,
            feature_names: Vec::new(),
            means: Vec::new(),
            stds: Vec::new(),
            regularization,
            learning_rate: 0.1,
            max_iter,
            tol,
            fitted: false,
        }
    }

    /// Sigmoid function
    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }

    /// Fitted coefficient per feature name.
    pub fn coefficients(&self) -> Vec<(String, f64)> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.coefficients.iter().copied())
            .collect()
    }

    /// Fitted intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fit the model on a design matrix and parallel 0/1 labels.
    pub fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::DimensionMismatch(format!(
                "feature matrix has {} rows but {} labels were given",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(Error::EmptyData(
                "cannot fit on an empty feature matrix".to_string(),
            ));
        }

        let n_samples = x.nrows();
        let n_features = x.ncols();

        let positives = y.iter().filter(|&&l| l == 1).count();
        let negatives = n_samples - positives;
        if positives == 0 || negatives == 0 {
            return Err(Error::InsufficientData(
                "training data must contain both classes".to_string(),
            ));
        }

        // Balanced class weights: n / (2 * class_count)
        let weight_pos = n_samples as f64 / (2.0 * positives as f64);
        let weight_neg = n_samples as f64 / (2.0 * negatives as f64);

        // Standardize columns; constant columns keep std 1 so they zero out
        let mut means = vec![0.0; n_features];
        let mut stds = vec![0.0; n_features];
        for j in 0..n_features {
            let mean = x.rows.iter().map(|r| r[j]).sum::<f64>() / n_samples as f64;
            let var = x
                .rows
                .iter()
                .map(|r| (r[j] - mean).powi(2))
                .sum::<f64>()
                / n_samples as f64;
            means[j] = mean;
            stds[j] = if var.sqrt() > 0.0 { var.sqrt() } else { 1.0 };
        }

        let scaled: Vec<Vec<f64>> = x
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, &v)| (v - means[j]) / stds[j])
                    .collect()
            })
            .collect();

        let sample_weights: Vec<f64> = y
            .iter()
            .map(|&l| if l == 1 { weight_pos } else { weight_neg })
            .collect();
        let total_weight: f64 = sample_weights.iter().sum();

        let mut coef = vec![0.0; n_features];
        let mut intercept = 0.0;
        let mut prev_loss = f64::INFINITY;

        for iteration in 0..self.max_iter {
            // Weighted gradient of the log loss
            let mut grad_coef = vec![0.0; n_features];
            let mut grad_intercept = 0.0;
            let mut loss = 0.0;

            for i in 0..n_samples {
                let mut z = intercept;
                for j in 0..n_features {
                    z += coef[j] * scaled[i][j];
                }
                let predicted = Self::sigmoid(z);
                let target = f64::from(y[i]);
                let weighted_error = sample_weights[i] * (predicted - target);

                for j in 0..n_features {
                    grad_coef[j] += weighted_error * scaled[i][j];
                }
                grad_intercept += weighted_error;

                let clamped = predicted.clamp(1e-15, 1.0 - 1e-15);
                loss -= sample_weights[i]
                    * (target * clamped.ln() + (1.0 - target) * (1.0 - clamped).ln());
            }

            for j in 0..n_features {
                grad_coef[j] = grad_coef[j] / total_weight + self.regularization * coef[j];
            }
            grad_intercept /= total_weight;

            for j in 0..n_features {
                coef[j] -= self.learning_rate * grad_coef[j];
            }
            intercept -= self.learning_rate * grad_intercept;

            loss /= total_weight;
            let l2_norm: f64 = coef.iter().map(|c| c.powi(2)).sum();
            loss += 0.5 * self.regularization * l2_norm;

            if (prev_loss - loss).abs() < self.tol {
                debug!("converged after {} iterations, loss {:.6}", iteration, loss);
                break;
            }
            prev_loss = loss;
        }

        self.coefficients = coef;
        self.intercept = intercept;
        self.feature_names = x.names.clone();
        self.means = means;
        self.stds = stds;
        self.fitted = true;

        Ok(())
    }

    /// Positive-class probability for every row of a design matrix.
    pub fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(Error::InvalidOperation(
                "model has not been fitted yet".to_string(),
            ));
        }
        if x.names != self.feature_names {
            return Err(Error::DimensionMismatch(format!(
                "feature columns differ from the fitted layout: {:?} vs {:?}",
                x.names, self.feature_names
            )));
        }

        let mut probabilities = Vec::with_capacity(x.nrows());
        for row in &x.rows {
            let mut z = self.intercept;
            for (j, &value) in row.iter().enumerate() {
                z += self.coefficients[j] * (value - self.means[j]) / self.stds[j];
            }
            probabilities.push(Self::sigmoid(z));
        }
        Ok(probabilities)
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(DEFAULT_REGULARIZATION, DEFAULT_MAX_ITER, DEFAULT_TOL)
    }
}
