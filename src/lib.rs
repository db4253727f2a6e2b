//! fraudrs: an offline fraud-detection baseline for PaySim-style
//! transaction logs.
//!
//! The pipeline loads a labeled transaction CSV, engineers
//! balance-consistency features, trains a class-weighted logistic
//! regression, and evaluates it with fraud-specific operational metrics: a
//! top-k review-queue simulation and a best-F1 operating point, alongside
//! ROC-AUC and average precision. Results are persisted as an indented JSON
//! report plus ROC / precision-recall curve images.

pub mod dataset;
pub mod error;
pub mod features;
pub mod io;
pub mod ml;
pub mod preprocess;
pub mod vis;

// Re-export commonly used types
pub use dataset::Transaction;
pub use error::{Error, Result};
pub use features::FeatureMatrix;
pub use ml::evaluation::{evaluate_binary, EvalConfig, EvaluationReport};
pub use ml::metrics::ranking::{find_best_f1, top_k_capture, BestF1, TopKCapture};
pub use ml::models::LogisticRegression;
pub use vis::CurvePlotConfig;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
