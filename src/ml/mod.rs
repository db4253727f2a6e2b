//! Model training and evaluation module

pub mod evaluation;
pub mod metrics;
pub mod models;
