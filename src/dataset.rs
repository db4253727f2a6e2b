//! Transaction records for PaySim-style transaction logs.

/// Columns a transaction log must provide to be usable by the pipeline.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "step",
    "type",
    "amount",
    "nameOrig",
    "oldbalanceOrg",
    "newbalanceOrig",
    "nameDest",
    "oldbalanceDest",
    "newbalanceDest",
    "isFraud",
];

/// One row of a transaction log.
///
/// Balance fields may be `NaN` when the source value could not be coerced to
/// a number; rows with an unparsable `step`, `amount` or `isFraud` are
/// dropped at load time instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Discrete time step of the transaction
    pub step: i64,
    /// Transaction type (TRANSFER, CASH_OUT, ...)
    pub tx_type: String,
    /// Transaction amount
    pub amount: f64,
    /// Originating account id (high-cardinality, never featurized)
    pub name_orig: String,
    /// Origin balance before the transaction
    pub oldbalance_org: f64,
    /// Origin balance after the transaction
    pub newbalance_orig: f64,
    /// Destination account id (high-cardinality, never featurized)
    pub name_dest: String,
    /// Destination balance before the transaction
    pub oldbalance_dest: f64,
    /// Destination balance after the transaction
    pub newbalance_dest: f64,
    /// Ground-truth fraud label (0 or 1)
    pub is_fraud: u8,
}

/// Extract the label vector from a transaction slice.
pub fn labels(rows: &[Transaction]) -> Vec<u8> {
    rows.iter().map(|t| t.is_fraud).collect()
}

/// Number of fraud rows in a transaction slice.
pub fn fraud_count(rows: &[Transaction]) -> usize {
    rows.iter().filter(|t| t.is_fraud == 1).count()
}

#[cfg(test)]
pub(crate) fn sample_transaction(step: i64, amount: f64, is_fraud: u8) -> Transaction {
    Transaction {
        step,
        tx_type: "TRANSFER".to_string(),
        amount,
        name_orig: format!("C{}", step),
        oldbalance_org: amount * 2.0,
        newbalance_orig: amount,
        name_dest: format!("M{}", step),
        oldbalance_dest: 0.0,
        newbalance_dest: amount,
        is_fraud,
    }
}
