//! Derived features for transaction risk modeling.
//!
//! Classic PaySim feature engineering: balance-consistency checks,
//! zero-balance flags, relative amount, one-hot transaction types and a
//! log-transformed amount for the heavy-tailed distribution. Account id
//! columns are intentionally never featurized (high-cardinality, unstable
//! across datasets).

use crate::dataset::Transaction;
use crate::error::{Error, Result};

/// A design matrix with named columns, rows parallel to the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// Column names, in matrix column order
    pub names: Vec<String>,
    /// One row of feature values per transaction
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns
    pub fn ncols(&self) -> usize {
        self.names.len()
    }

    /// Values of a single named column
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }
}

/// Sorted distinct transaction types of a table.
///
/// Fit once on the full cleaned dataset so that train and test partitions
/// agree on the one-hot layout.
pub fn type_categories(rows: &[Transaction]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for t in rows {
        if !categories.contains(&t.tx_type) {
            categories.push(t.tx_type.clone());
        }
    }
    categories.sort();
    categories
}

/// Engineer the feature matrix for a transaction slice.
///
/// `categories` is the fitted one-hot vocabulary from [`type_categories`];
/// the first category is dropped as the encoding baseline. The label is not
/// part of the matrix; extract it with [`crate::dataset::labels`].
pub fn engineer_features(
    rows: &[Transaction],
    categories: &[String],
) -> Result<FeatureMatrix> {
    if rows.is_empty() {
        return Err(Error::EmptyData(
            "cannot engineer features for an empty table".to_string(),
        ));
    }
    if categories.is_empty() {
        return Err(Error::InvalidValue(
            "one-hot vocabulary must contain at least one category".to_string(),
        ));
    }

    let mut names: Vec<String> = [
        "step",
        "amount",
        "oldbalanceOrg",
        "newbalanceOrig",
        "oldbalanceDest",
        "newbalanceDest",
        "orig_balance_diff",
        "dest_balance_diff",
        "orig_balance_zero",
        "dest_balance_zero",
        "amount_over_orig_balance",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    // drop-first encoding: the first category is the baseline
    for category in &categories[1..] {
        names.push(format!("type_{}", category));
    }
    names.push("log_amount".to_string());

    let mut matrix_rows = Vec::with_capacity(rows.len());
    for t in rows {
        let mut row = Vec::with_capacity(names.len());

        row.push(t.step as f64);
        row.push(t.amount);
        row.push(t.oldbalance_org);
        row.push(t.newbalance_orig);
        row.push(t.oldbalance_dest);
        row.push(t.newbalance_dest);

        // Balance consistency: how far the ledger is from adding up
        row.push((t.oldbalance_org - t.newbalance_orig - t.amount).abs());
        row.push((t.newbalance_dest - t.oldbalance_dest - t.amount).abs());

        // Suspicious zero-balance flags
        row.push(if t.oldbalance_org == 0.0 { 1.0 } else { 0.0 });
        row.push(if t.oldbalance_dest == 0.0 { 1.0 } else { 0.0 });

        // Amount relative to the origin balance
        row.push(if t.oldbalance_org > 0.0 {
            t.amount / t.oldbalance_org
        } else {
            0.0
        });

        for category in &categories[1..] {
            row.push(if &t.tx_type == category { 1.0 } else { 0.0 });
        }

        row.push(t.amount.ln_1p());

        matrix_rows.push(row);
    }

    Ok(FeatureMatrix {
        names,
        rows: matrix_rows,
    })
}
