//! Evaluation metrics for binary fraud classifiers.
//!
//! `classification` provides threshold and curve metrics (confusion matrix,
//! ROC, precision-recall); `ranking` provides the operational review-queue
//! metrics (top-k capture, best-F1 operating point).

pub mod classification;
pub mod ranking;

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Validate a labeled sample set: parallel lengths, non-empty, 0/1 labels.
pub(crate) fn check_labeled_samples(labels: &[u8], scores: &[f64]) -> Result<()> {
    if labels.len() != scores.len() {
        return Err(Error::DimensionMismatch(format!(
            "labels and scores differ in length: {} vs {}",
            labels.len(),
            scores.len()
        )));
    }
    if labels.is_empty() {
        return Err(Error::EmptyData(
            "cannot evaluate an empty sample set".to_string(),
        ));
    }
    if labels.iter().any(|&l| l > 1) {
        return Err(Error::InvalidValue(
            "labels must be 0 or 1".to_string(),
        ));
    }
    Ok(())
}

/// Indices of `scores` sorted by score descending.
///
/// The sort is stable, so equal scores keep their original relative order —
/// tie-breaking is deterministic for a fixed input order.
pub(crate) fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    indices
}
