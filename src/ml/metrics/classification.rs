//! Threshold and curve metrics for binary classification.

use super::{check_labeled_samples, rank_descending};
use crate::error::{Error, Result};

/// Confusion counts at a fixed decision threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confusion {
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    pub fn_: u64,
}

impl Confusion {
    /// Precision at this threshold; 0 when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        if self.tp + self.fp == 0 {
            return 0.0;
        }
        self.tp as f64 / (self.tp + self.fp) as f64
    }

    /// Recall at this threshold; 0 when there are no actual positives.
    pub fn recall(&self) -> f64 {
        if self.tp + self.fn_ == 0 {
            return 0.0;
        }
        self.tp as f64 / (self.tp + self.fn_) as f64
    }

    /// F1 at this threshold; 0 when precision and recall are both 0.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    /// 2x2 matrix layout: rows = true [negative, positive], columns =
    /// predicted [negative, positive].
    pub fn to_matrix(&self) -> [[u64; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

/// One point of the precision-recall curve, at a real score threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PrCurvePoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Count confusion outcomes at `threshold`; predicted positive means
/// `score >= threshold`.
pub fn confusion_matrix(labels: &[u8], scores: &[f64], threshold: f64) -> Result<Confusion> {
    check_labeled_samples(labels, scores)?;

    let mut c = Confusion {
        tp: 0,
        fp: 0,
        tn: 0,
        fn_: 0,
    };
    for (&label, &score) in labels.iter().zip(scores.iter()) {
        let predicted = score >= threshold;
        match (label == 1, predicted) {
            (true, true) => c.tp += 1,
            (false, true) => c.fp += 1,
            (false, false) => c.tn += 1,
            (true, false) => c.fn_ += 1,
        }
    }
    Ok(c)
}

/// Precision-recall curve over every distinct score threshold, in
/// descending threshold (increasing recall) order.
///
/// Each point corresponds to predicting positive at `score >= threshold`.
/// One point is emitted per distinct score value, so the curve length equals
/// the number of distinct scores. The canonical (recall 0, precision 1) end
/// point has no real threshold and is not part of the returned curve.
pub fn precision_recall_curve(labels: &[u8], scores: &[f64]) -> Result<Vec<PrCurvePoint>> {
    check_labeled_samples(labels, scores)?;

    let n = labels.len();
    let total_positives: u64 = labels.iter().filter(|&&l| l == 1).count() as u64;
    let order = rank_descending(scores);

    let mut points = Vec::new();
    let mut tp = 0u64;
    let mut flagged = 0u64;

    for (rank, &idx) in order.iter().enumerate() {
        flagged += 1;
        if labels[idx] == 1 {
            tp += 1;
        }

        // Emit a point only at distinct-score boundaries
        let boundary = rank + 1 == n || scores[order[rank + 1]] != scores[idx];
        if boundary {
            points.push(PrCurvePoint {
                threshold: scores[idx],
                precision: tp as f64 / flagged as f64,
                recall: if total_positives > 0 {
                    tp as f64 / total_positives as f64
                } else {
                    0.0
                },
            });
        }
    }

    Ok(points)
}

/// ROC curve as (false positive rate, true positive rate) points, from the
/// (0, 0) origin through every distinct threshold down to (1, 1).
pub fn roc_curve(labels: &[u8], scores: &[f64]) -> Result<Vec<(f64, f64)>> {
    check_labeled_samples(labels, scores)?;

    let n = labels.len();
    let positives: u64 = labels.iter().filter(|&&l| l == 1).count() as u64;
    let negatives = n as u64 - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::InsufficientData(
            "ROC curve needs at least one positive and one negative sample".to_string(),
        ));
    }

    let order = rank_descending(scores);
    let mut points = vec![(0.0, 0.0)];
    let mut tp = 0u64;
    let mut fp = 0u64;

    for (rank, &idx) in order.iter().enumerate() {
        if labels[idx] == 1 {
            tp += 1;
        } else {
            fp += 1;
        }

        let boundary = rank + 1 == n || scores[order[rank + 1]] != scores[idx];
        if boundary {
            points.push((fp as f64 / negatives as f64, tp as f64 / positives as f64));
        }
    }

    Ok(points)
}

/// Area under the ROC curve, by the trapezoidal rule.
pub fn roc_auc_score(labels: &[u8], scores: &[f64]) -> Result<f64> {
    let points = roc_curve(labels, scores)?;

    let mut auc = 0.0;
    for window in points.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        auc += (x1 - x0) * (y0 + y1) / 2.0;
    }
    Ok(auc)
}

/// Average precision: the area under the precision-recall curve as the
/// recall-weighted sum of precisions.
pub fn average_precision_score(labels: &[u8], scores: &[f64]) -> Result<f64> {
    if !labels.iter().any(|&l| l == 1) {
        return Err(Error::InsufficientData(
            "average precision needs at least one positive sample".to_string(),
        ));
    }

    let curve = precision_recall_curve(labels, scores)?;

    // The curve runs in increasing-recall order, starting from recall 0
    let mut ap = 0.0;
    let mut prev_recall = 0.0;
    for point in &curve {
        ap += (point.recall - prev_recall) * point.precision;
        prev_recall = point.recall;
    }
    Ok(ap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_matrix_counts() {
        let labels = vec![1, 0, 1, 0, 1, 0];
        let scores = vec![0.9, 0.8, 0.3, 0.2, 0.6, 0.7];

        let c = confusion_matrix(&labels, &scores, 0.5).unwrap();
        assert_eq!(c.tp, 2); // 0.9, 0.6
        assert_eq!(c.fp, 2); // 0.8, 0.7
        assert_eq!(c.fn_, 1); // 0.3
        assert_eq!(c.tn, 1); // 0.2
        assert_eq!(c.to_matrix(), [[1, 2], [1, 2]]);

        assert!((c.precision() - 0.5).abs() < 1e-12);
        assert!((c.recall() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_confusion_degenerate_rates_are_zero() {
        let c = confusion_matrix(&[0, 0], &[0.1, 0.2], 0.5).unwrap();
        assert_eq!(c.precision(), 0.0);
        assert_eq!(c.recall(), 0.0);
        assert_eq!(c.f1(), 0.0);
    }

    #[test]
    fn test_precision_recall_curve_hand_computed() {
        let labels = vec![0, 0, 1, 1];
        let scores = vec![0.1, 0.4, 0.35, 0.8];

        let curve = precision_recall_curve(&labels, &scores).unwrap();
        assert_eq!(curve.len(), 4);

        // threshold 0.8: flag {0.8} -> tp=1 of 1, recall 1/2
        assert_eq!(curve[0].threshold, 0.8);
        assert_eq!(curve[0].precision, 1.0);
        assert_eq!(curve[0].recall, 0.5);

        // threshold 0.4: flag {0.8, 0.4} -> tp=1 of 2
        assert_eq!(curve[1].threshold, 0.4);
        assert_eq!(curve[1].precision, 0.5);
        assert_eq!(curve[1].recall, 0.5);

        // threshold 0.35: flag 3 -> tp=2
        assert!((curve[2].precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(curve[2].recall, 1.0);

        // threshold 0.1: everything flagged
        assert_eq!(curve[3].precision, 0.5);
        assert_eq!(curve[3].recall, 1.0);
    }

    #[test]
    fn test_precision_recall_curve_merges_tied_scores() {
        let labels = vec![1, 0, 1];
        let scores = vec![0.5, 0.5, 0.2];

        let curve = precision_recall_curve(&labels, &scores).unwrap();
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].threshold, 0.5);
        assert_eq!(curve[0].precision, 0.5);
        assert_eq!(curve[0].recall, 0.5);
    }

    #[test]
    fn test_roc_auc_perfect_and_inverted() {
        let labels = vec![0, 0, 1, 1];
        let perfect = vec![0.1, 0.2, 0.8, 0.9];
        let inverted = vec![0.9, 0.8, 0.2, 0.1];

        assert!((roc_auc_score(&labels, &perfect).unwrap() - 1.0).abs() < 1e-12);
        assert!(roc_auc_score(&labels, &inverted).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_roc_auc_all_tied_scores_is_chance_level() {
        // A constant scorer has no ranking information
        let labels = vec![1, 0, 1, 0];
        let scores = vec![0.7, 0.7, 0.7, 0.7];
        assert!((roc_auc_score(&labels, &scores).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_roc_auc_single_class_is_error() {
        assert!(roc_auc_score(&[1, 1], &[0.1, 0.9]).is_err());
        assert!(roc_auc_score(&[0, 0], &[0.1, 0.9]).is_err());
    }

    #[test]
    fn test_roc_curve_endpoints() {
        let labels = vec![0, 1, 0, 1];
        let scores = vec![0.3, 0.6, 0.1, 0.9];

        let points = roc_curve(&labels, &scores).unwrap();
        assert_eq!(points.first(), Some(&(0.0, 0.0)));
        assert_eq!(points.last(), Some(&(1.0, 1.0)));
    }

    #[test]
    fn test_average_precision_perfect_ranking() {
        let labels = vec![0, 0, 1, 1];
        let scores = vec![0.1, 0.2, 0.8, 0.9];
        assert!((average_precision_score(&labels, &scores).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_precision_hand_computed() {
        let labels = vec![0, 0, 1, 1];
        let scores = vec![0.1, 0.4, 0.35, 0.8];

        // From the curve in test_precision_recall_curve_hand_computed:
        // AP = 0.5 * 1.0 + 0 * 0.5 + 0.5 * (2/3) + 0 * 0.5 = 5/6
        let ap = average_precision_score(&labels, &scores).unwrap();
        assert!((ap - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_precision_no_positives_is_error() {
        assert!(average_precision_score(&[0, 0], &[0.1, 0.9]).is_err());
    }
}
