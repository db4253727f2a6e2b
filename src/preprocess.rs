//! Dataset preparation: time-aware splitting and class-ratio control.
//!
//! Transaction logs are temporal, so the train/test split is done on the
//! time axis instead of randomly. Each function consumes its input table and
//! returns a new one; no table is shared mutably between pipeline stages.

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::Transaction;
use crate::error::{Error, Result};

/// Default cap on non-fraud rows kept for training
pub const DEFAULT_MAX_NONFRAUD: usize = 200_000;
/// Default seed for reproducible sampling
pub const DEFAULT_SEED: u64 = 42;
/// Default fraction of rows held out for testing
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Split a transaction table into train/test partitions along the time axis.
///
/// Rows are stable-sorted ascending by `step` and cut at
/// `floor((1 - test_size) * n)`: earlier rows train, later rows test. No
/// shuffling, so no future information leaks into the training partition.
///
/// Known limitation: duplicate `step` values straddling the cutoff can land
/// on either side, because the stable sort keeps their original relative
/// order rather than enforcing a strict boundary rule.
pub fn time_split(
    rows: Vec<Transaction>,
    test_size: f64,
) -> Result<(Vec<Transaction>, Vec<Transaction>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::InvalidValue(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let mut train = rows;
    train.sort_by_key(|t| t.step);

    let cutoff = ((1.0 - test_size) * train.len() as f64).floor() as usize;
    let test = train.split_off(cutoff);

    Ok((train, test))
}

/// Keep all fraud rows, downsample non-fraud rows to a fixed cap.
///
/// Preserves the rare-event signal while keeping the training set size
/// tractable. If the non-fraud row count exceeds `max_nonfraud`, a uniform
/// without-replacement sample of exactly `max_nonfraud` rows is drawn with a
/// seeded RNG; the combined set is then shuffled with the same RNG. Output
/// is deterministic for a fixed seed and input.
pub fn stratified_downsample(
    rows: Vec<Transaction>,
    max_nonfraud: usize,
    seed: u64,
) -> Vec<Transaction> {
    let (fraud, mut nonfraud): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|t| t.is_fraud == 1);

    let mut rng = StdRng::seed_from_u64(seed);

    if nonfraud.len() > max_nonfraud {
        nonfraud.shuffle(&mut rng);
        nonfraud.truncate(max_nonfraud);
    }

    info!(
        "downsampled to {} fraud + {} non-fraud rows",
        fraud.len(),
        nonfraud.len()
    );

    let mut combined = fraud;
    combined.append(&mut nonfraud);
    combined.shuffle(&mut rng);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{fraud_count, sample_transaction};

    fn table(n: usize, fraud_every: usize) -> Vec<Transaction> {
        (0..n)
            .map(|i| {
                let is_fraud = u8::from(fraud_every > 0 && i % fraud_every == 0);
                sample_transaction(i as i64, 100.0 + i as f64, is_fraud)
            })
            .collect()
    }

    #[test]
    fn test_time_split_sizes_and_order() {
        let rows = table(10, 0);
        let (train, test) = time_split(rows, 0.2).unwrap();

        assert_eq!(train.len() + test.len(), 10);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let max_train_step = train.iter().map(|t| t.step).max().unwrap();
        let min_test_step = test.iter().map(|t| t.step).min().unwrap();
        assert!(max_train_step <= min_test_step);
    }

    #[test]
    fn test_time_split_sorts_unordered_input() {
        let mut rows = table(10, 0);
        rows.reverse();

        let (train, test) = time_split(rows, 0.3).unwrap();
        assert_eq!(train.len(), 7);
        assert!(train.iter().all(|t| t.step < 7));
        assert!(test.iter().all(|t| t.step >= 7));
    }

    #[test]
    fn test_time_split_rejects_bad_test_size() {
        assert!(time_split(table(5, 0), 0.0).is_err());
        assert!(time_split(table(5, 0), 1.0).is_err());
        assert!(time_split(table(5, 0), -0.5).is_err());
    }

    #[test]
    fn test_downsample_keeps_all_fraud() {
        let rows = table(100, 10); // 10 fraud, 90 non-fraud
        let out = stratified_downsample(rows.clone(), 50, 42);

        assert_eq!(out.len(), 10 + 50);
        assert_eq!(fraud_count(&out), 10);

        // Every fraud row from the input survives
        for t in rows.iter().filter(|t| t.is_fraud == 1) {
            assert!(out.contains(t));
        }
    }

    #[test]
    fn test_downsample_below_cap_keeps_everything() {
        let rows = table(100, 10);
        let out = stratified_downsample(rows, 200_000, 42);
        assert_eq!(out.len(), 100);
        assert_eq!(fraud_count(&out), 10);
    }

    #[test]
    fn test_downsample_is_deterministic() {
        let rows = table(200, 7);
        let a = stratified_downsample(rows.clone(), 80, 42);
        let b = stratified_downsample(rows, 80, 42);
        assert_eq!(a, b);
    }
}
