//! Evaluation report: one immutable record of every metric the pipeline
//! produces for a scored test set, persisted as indented JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ml::metrics::classification::{
    average_precision_score, confusion_matrix, roc_auc_score,
};
use crate::ml::metrics::ranking::{
    find_best_f1, top_k_capture, BestF1, TopKCapture, DEFAULT_F1_STABILIZER,
};

/// Review-queue fractions evaluated by default: 0.1%, 0.5%, 1%, 2% and 5%
/// of the scored population.
pub const DEFAULT_REVIEW_FRACTIONS: [f64; 5] = [0.001, 0.005, 0.01, 0.02, 0.05];
/// Default decision threshold for the confusion-matrix view
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Evaluation settings. All of the magic numbers of the report live here so
/// they can be overridden without code changes.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Decision threshold for the confusion-matrix view
    pub threshold: f64,
    /// Review-queue fractions, one [`TopKCapture`] each
    pub review_fractions: Vec<f64>,
    /// Stabilizing constant for the best-F1 search
    pub f1_stabilizer: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            threshold: DEFAULT_DECISION_THRESHOLD,
            review_fractions: DEFAULT_REVIEW_FRACTIONS.to_vec(),
            f1_stabilizer: DEFAULT_F1_STABILIZER,
        }
    }
}

/// Complete evaluation record for one scored test set.
///
/// Immutable once built; field order in the serialized document follows the
/// struct definition. `top_k_capture` is keyed by the display string of each
/// review fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub roc_auc: f64,
    pub avg_precision: f64,
    pub threshold: f64,
    /// Rows = true [negative, positive], columns = predicted [negative, positive]
    pub confusion_matrix: [[u64; 2]; 2],
    pub top_k_capture: BTreeMap<String, TopKCapture>,
    pub best_f1: BestF1,
}

/// Build the evaluation report for a scored sample set.
pub fn build_report(labels: &[u8], scores: &[f64], config: &EvalConfig) -> Result<EvaluationReport> {
    let confusion = confusion_matrix(labels, scores, config.threshold)?;

    let mut top_k = BTreeMap::new();
    for &fraction in &config.review_fractions {
        let capture = top_k_capture(labels, scores, fraction)?;
        top_k.insert(fraction.to_string(), capture);
    }

    Ok(EvaluationReport {
        roc_auc: roc_auc_score(labels, scores)?,
        avg_precision: average_precision_score(labels, scores)?,
        threshold: config.threshold,
        confusion_matrix: confusion.to_matrix(),
        top_k_capture: top_k,
        best_f1: find_best_f1(labels, scores, config.f1_stabilizer)?,
    })
}

/// Serialize a report as indented JSON, overwriting `path`.
pub fn write_report<P: AsRef<Path>>(report: &EvaluationReport, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).map_err(Error::Json)?;
    Ok(())
}

/// Deserialize a previously written report.
pub fn read_report<P: AsRef<Path>>(path: P) -> Result<EvaluationReport> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    serde_json::from_reader(file).map_err(Error::Json)
}

/// Evaluate a scored test set and persist the report.
///
/// The write happens before the report is returned; a write failure
/// propagates and no report is returned.
pub fn evaluate_binary<P: AsRef<Path>>(
    labels: &[u8],
    scores: &[f64],
    config: &EvalConfig,
    out_path: P,
) -> Result<EvaluationReport> {
    let report = build_report(labels, scores, config)?;
    write_report(&report, out_path.as_ref())?;
    info!("evaluation report written to {}", out_path.as_ref().display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored_set() -> (Vec<u8>, Vec<f64>) {
        let labels = vec![0, 0, 0, 0, 0, 0, 1, 0, 1, 1];
        let scores = vec![0.05, 0.1, 0.15, 0.2, 0.3, 0.4, 0.55, 0.6, 0.8, 0.9];
        (labels, scores)
    }

    #[test]
    fn test_build_report_fields() {
        let (labels, scores) = scored_set();
        let report = build_report(&labels, &scores, &EvalConfig::default()).unwrap();

        assert!(report.roc_auc > 0.8);
        assert!(report.avg_precision > 0.5);
        assert_eq!(report.threshold, 0.5);
        assert_eq!(report.top_k_capture.len(), 5);

        // n = 10, so every default fraction floors to k = 1 except 5% -> still 1
        let smallest = &report.top_k_capture["0.001"];
        assert_eq!(smallest.k_flagged, 1);
        assert_eq!(smallest.precision, 1.0); // top score 0.9 is fraud

        // Confusion counts must cover every sample
        let total: u64 = report.confusion_matrix.iter().flatten().sum();
        assert_eq!(total, labels.len() as u64);
    }

    #[test]
    fn test_report_fraction_keys() {
        let (labels, scores) = scored_set();
        let report = build_report(&labels, &scores, &EvalConfig::default()).unwrap();

        let keys: Vec<&String> = report.top_k_capture.keys().collect();
        assert_eq!(keys, vec!["0.001", "0.005", "0.01", "0.02", "0.05"]);
    }

    #[test]
    fn test_report_round_trip_is_identical() {
        let (labels, scores) = scored_set();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");

        let report = evaluate_binary(&labels, &scores, &EvalConfig::default(), &path).unwrap();
        let restored = read_report(&path).unwrap();
        assert_eq!(report, restored);
    }

    #[test]
    fn test_report_overwrites_existing_file() {
        let (labels, scores) = scored_set();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(&path, "stale contents").unwrap();

        evaluate_binary(&labels, &scores, &EvalConfig::default(), &path).unwrap();
        let restored = read_report(&path).unwrap();
        assert_eq!(restored.threshold, 0.5);
    }

    #[test]
    fn test_unwritable_location_propagates() {
        let (labels, scores) = scored_set();
        let result = evaluate_binary(
            &labels,
            &scores,
            &EvalConfig::default(),
            "/nonexistent-dir/metrics.json",
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_custom_fractions() {
        let (labels, scores) = scored_set();
        let config = EvalConfig {
            review_fractions: vec![0.5],
            ..EvalConfig::default()
        };

        let report = build_report(&labels, &scores, &config).unwrap();
        assert_eq!(report.top_k_capture.len(), 1);
        // Top 5 scores: 0.9, 0.8, 0.6, 0.55, 0.4 -> 3 of the 3 frauds
        let capture = &report.top_k_capture["0.5"];
        assert_eq!(capture.k_flagged, 5);
        assert_eq!(capture.recall, 1.0);
        assert!((capture.precision - 0.6).abs() < 1e-12);
    }
}
