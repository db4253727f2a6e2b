//! Schema-validated CSV loading for transaction logs.

use csv::ReaderBuilder;
use log::warn;
use std::fs::File;
use std::path::Path;

use crate::dataset::{Transaction, REQUIRED_COLUMNS};
use crate::error::{Error, Result};

/// Lenient numeric coercion: anything unparsable becomes `None`.
fn coerce_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Read a transaction log from a CSV file.
///
/// The header must contain every column in [`REQUIRED_COLUMNS`]; otherwise
/// loading fails with [`Error::MissingColumns`] naming all of the missing
/// ones. Numeric fields are coerced leniently: rows whose `step`, `amount`
/// or `isFraud` cannot be parsed are dropped (the drop count is logged),
/// while unparsable balance fields become `NaN` and the row is kept.
pub fn read_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(Error::Csv)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing));
    }

    // All required columns were verified above
    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let i_step = col("step");
    let i_type = col("type");
    let i_amount = col("amount");
    let i_name_orig = col("nameOrig");
    let i_oldbalance_org = col("oldbalanceOrg");
    let i_newbalance_orig = col("newbalanceOrig");
    let i_name_dest = col("nameDest");
    let i_oldbalance_dest = col("oldbalanceDest");
    let i_newbalance_dest = col("newbalanceDest");
    let i_is_fraud = col("isFraud");

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let record = result.map_err(Error::Csv)?;
        let field = |i: usize| record.get(i).unwrap_or("");

        // Rows missing any essential numeric field are dropped, not kept as NaN
        let essentials = (
            coerce_numeric(field(i_step)),
            coerce_numeric(field(i_amount)),
            coerce_numeric(field(i_is_fraud)),
        );
        let (Some(step), Some(amount), Some(label)) = essentials else {
            dropped += 1;
            continue;
        };

        rows.push(Transaction {
            step: step as i64,
            tx_type: field(i_type).to_string(),
            amount,
            name_orig: field(i_name_orig).to_string(),
            oldbalance_org: coerce_numeric(field(i_oldbalance_org)).unwrap_or(f64::NAN),
            newbalance_orig: coerce_numeric(field(i_newbalance_orig)).unwrap_or(f64::NAN),
            name_dest: field(i_name_dest).to_string(),
            oldbalance_dest: coerce_numeric(field(i_oldbalance_dest)).unwrap_or(f64::NAN),
            newbalance_dest: coerce_numeric(field(i_newbalance_dest)).unwrap_or(f64::NAN),
            is_fraud: if label != 0.0 { 1 } else { 0 },
        });
    }

    if dropped > 0 {
        warn!(
            "dropped {} rows with unparsable step/amount/isFraud values",
            dropped
        );
    }

    Ok(rows)
}
