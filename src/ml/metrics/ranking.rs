//! Rank-based operational metrics: review-queue simulation and the best-F1
//! operating point.
//!
//! A fraud team can only inspect a fixed fraction of the highest-risk
//! transactions, so alongside the usual curve metrics we measure what a
//! review queue of the top k% would actually catch.

use serde::{Deserialize, Serialize};

use super::classification::precision_recall_curve;
use super::{check_labeled_samples, rank_descending};
use crate::error::{Error, Result};

/// Stabilizing constant added to the F1 denominator so a (0, 0)
/// precision/recall pair divides cleanly to zero.
pub const DEFAULT_F1_STABILIZER: f64 = 1e-12;

/// Outcome of reviewing only the top-k highest-scoring transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKCapture {
    /// Number of transactions flagged for review
    pub k_flagged: usize,
    /// Fraction of flagged transactions that are fraud
    pub precision: f64,
    /// Fraction of all fraud captured by the flagged set
    pub recall: f64,
}

/// The decision threshold maximizing F1 over the precision-recall curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestF1 {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Simulate a review queue that inspects the top `k_frac` of transactions
/// by risk score.
///
/// `k = max(1, floor(k_frac * n))` items are flagged; ties among equal
/// scores resolve to the earlier input position. With zero true positives in
/// the whole set, recall is 0 rather than NaN. Pure function of its inputs.
pub fn top_k_capture(labels: &[u8], scores: &[f64], k_frac: f64) -> Result<TopKCapture> {
    check_labeled_samples(labels, scores)?;
    if !(k_frac > 0.0 && k_frac <= 1.0) {
        return Err(Error::InvalidValue(format!(
            "k_frac must be in (0, 1], got {}",
            k_frac
        )));
    }

    let n = labels.len();
    let k = ((k_frac * n as f64).floor() as usize).max(1);

    let flagged_true: usize = rank_descending(scores)
        .into_iter()
        .take(k)
        .filter(|&i| labels[i] == 1)
        .count();

    let total_positives: usize = labels.iter().filter(|&&l| l == 1).count();

    Ok(TopKCapture {
        k_flagged: k,
        precision: flagged_true as f64 / k as f64,
        recall: flagged_true as f64 / total_positives.max(1) as f64,
    })
}

/// Search all real thresholds of the precision-recall curve for the one
/// maximizing F1.
///
/// Candidate thresholds are the distinct score values, visited in descending
/// order; ties go to the first (highest-threshold) occurrence. Fewer than
/// two distinct scores leave nothing to search and are reported as an error
/// rather than silently defaulted.
pub fn find_best_f1(labels: &[u8], scores: &[f64], stabilizer: f64) -> Result<BestF1> {
    let curve = precision_recall_curve(labels, scores)?;
    if curve.len() < 2 {
        return Err(Error::InsufficientData(
            "best-F1 search needs at least two distinct score values".to_string(),
        ));
    }

    let mut best_idx = 0;
    let mut best_f1 = f64::NEG_INFINITY;
    for (i, point) in curve.iter().enumerate() {
        let f1 =
            2.0 * point.precision * point.recall / (point.precision + point.recall + stabilizer);
        if f1 > best_f1 {
            best_f1 = f1;
            best_idx = i;
        }
    }

    let best = &curve[best_idx];
    Ok(BestF1 {
        threshold: best.threshold,
        precision: best.precision,
        recall: best.recall,
        f1: best_f1,
    })
}
