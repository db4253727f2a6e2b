//! File format support module

pub mod csv;

pub use csv::read_transactions;
