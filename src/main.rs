//! Pipeline entry point: load, preprocess, train, evaluate, plot.

use fraudrs::dataset;
use fraudrs::error::Result;
use fraudrs::features::{engineer_features, type_categories};
use fraudrs::io::read_transactions;
use fraudrs::ml::evaluation::{evaluate_binary, EvalConfig};
use fraudrs::ml::metrics::classification::{precision_recall_curve, roc_curve};
use fraudrs::ml::models::LogisticRegression;
use fraudrs::preprocess::{
    stratified_downsample, time_split, DEFAULT_MAX_NONFRAUD, DEFAULT_SEED, DEFAULT_TEST_SIZE,
};
use fraudrs::vis::{ensure_figures_dir, plot_pr_curve_png, plot_roc_curve_png, CurvePlotConfig};

const DEFAULT_DATA_PATH: &str = "data/raw/paysim.csv";
const RESULTS_DIR: &str = "results";
const METRICS_PATH: &str = "results/metrics.json";
const FIGURES_DIR: &str = "reports/figures";

fn main() -> Result<()> {
    let data_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    println!("Loading transactions from {}", data_path);
    let transactions = read_transactions(&data_path)?;
    println!(
        "Loaded {} rows ({} fraud)",
        transactions.len(),
        dataset::fraud_count(&transactions)
    );

    let transactions = stratified_downsample(transactions, DEFAULT_MAX_NONFRAUD, DEFAULT_SEED);

    // One-hot vocabulary is fitted before the split so both partitions agree
    let categories = type_categories(&transactions);

    let (train, test) = time_split(transactions, DEFAULT_TEST_SIZE)?;
    println!("Split: {} train rows / {} test rows", train.len(), test.len());

    let x_train = engineer_features(&train, &categories)?;
    let y_train = dataset::labels(&train);
    let x_test = engineer_features(&test, &categories)?;
    let y_test = dataset::labels(&test);

    let mut model = LogisticRegression::default();
    model.fit(&x_train, &y_train)?;
    let scores = model.predict_proba(&x_test)?;

    std::fs::create_dir_all(RESULTS_DIR)?;
    let report = evaluate_binary(&y_test, &scores, &EvalConfig::default(), METRICS_PATH)?;

    println!("Done. Metrics (high level):");
    println!("  roc_auc       = {:.4}", report.roc_auc);
    println!("  avg_precision = {:.4}", report.avg_precision);
    println!(
        "  best F1 operating point: threshold={:.4} precision={:.4} recall={:.4} f1={:.4}",
        report.best_f1.threshold,
        report.best_f1.precision,
        report.best_f1.recall,
        report.best_f1.f1
    );
    println!("Top-k capture (review queue simulation):");
    for (fraction, capture) in &report.top_k_capture {
        println!(
            "  {:>6}: k_flagged={} precision={:.4} recall={:.4}",
            fraction, capture.k_flagged, capture.precision, capture.recall
        );
    }

    ensure_figures_dir(FIGURES_DIR)?;

    let roc_points = roc_curve(&y_test, &scores)?;
    plot_roc_curve_png(
        &roc_points,
        report.roc_auc,
        format!("{}/roc_curve.png", FIGURES_DIR),
        &CurvePlotConfig::roc(),
    )?;

    let pr = precision_recall_curve(&y_test, &scores)?;
    // Prepend the canonical (recall 0, precision 1) end point for display
    let mut pr_points = vec![(0.0, 1.0)];
    pr_points.extend(pr.iter().map(|p| (p.recall, p.precision)));
    plot_pr_curve_png(
        &pr_points,
        report.avg_precision,
        format!("{}/pr_curve.png", FIGURES_DIR),
        &CurvePlotConfig::pr(),
    )?;
    println!("Curves written to {}", FIGURES_DIR);

    Ok(())
}
