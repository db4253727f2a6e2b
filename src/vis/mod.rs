//! Plotting of evaluation curves via Plotters.
//!
//! ROC and precision-recall curves are rendered as line charts on the unit
//! square, in PNG or SVG form.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Png,
    Svg,
}

/// Settings for a curve plot
#[derive(Debug, Clone)]
pub struct CurvePlotConfig {
    /// Title
    pub title: String,
    /// X-axis label
    pub x_label: String,
    /// Y-axis label
    pub y_label: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for CurvePlotConfig {
    fn default() -> Self {
        CurvePlotConfig {
            title: "Curve".to_string(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl CurvePlotConfig {
    /// Conventional ROC-curve labeling
    pub fn roc() -> Self {
        CurvePlotConfig {
            title: "ROC Curve".to_string(),
            x_label: "False Positive Rate".to_string(),
            y_label: "True Positive Rate".to_string(),
            ..Default::default()
        }
    }

    /// Conventional precision-recall labeling
    pub fn pr() -> Self {
        CurvePlotConfig {
            title: "Precision-Recall Curve".to_string(),
            x_label: "Recall".to_string(),
            y_label: "Precision".to_string(),
            ..Default::default()
        }
    }
}

/// Make sure the figures directory exists.
///
/// If a non-directory file occupies the path it is removed first, then the
/// directory (and any missing parents) is created.
pub fn ensure_figures_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() && !path.is_dir() {
        fs::remove_file(path).map_err(Error::Io)?;
    }
    fs::create_dir_all(path).map_err(Error::Io)?;
    Ok(())
}

/// Plot a ROC curve (with the chance diagonal) as a PNG image.
pub fn plot_roc_curve_png<P: AsRef<Path>>(
    points: &[(f64, f64)],
    roc_auc: f64,
    path: P,
    settings: &CurvePlotConfig,
) -> Result<()> {
    let legend = format!("ROC (AUC = {:.4})", roc_auc);
    draw_curve(points, &legend, true, path, settings, OutputFormat::Png)
}

/// Plot a ROC curve (with the chance diagonal) as an SVG image.
pub fn plot_roc_curve_svg<P: AsRef<Path>>(
    points: &[(f64, f64)],
    roc_auc: f64,
    path: P,
    settings: &CurvePlotConfig,
) -> Result<()> {
    let legend = format!("ROC (AUC = {:.4})", roc_auc);
    draw_curve(points, &legend, true, path, settings, OutputFormat::Svg)
}

/// Plot a precision-recall curve as a PNG image. `points` are
/// (recall, precision) pairs.
pub fn plot_pr_curve_png<P: AsRef<Path>>(
    points: &[(f64, f64)],
    avg_precision: f64,
    path: P,
    settings: &CurvePlotConfig,
) -> Result<()> {
    let legend = format!("PR (AP = {:.4})", avg_precision);
    draw_curve(points, &legend, false, path, settings, OutputFormat::Png)
}

/// Plot a precision-recall curve as an SVG image. `points` are
/// (recall, precision) pairs.
pub fn plot_pr_curve_svg<P: AsRef<Path>>(
    points: &[(f64, f64)],
    avg_precision: f64,
    path: P,
    settings: &CurvePlotConfig,
) -> Result<()> {
    let legend = format!("PR (AP = {:.4})", avg_precision);
    draw_curve(points, &legend, false, path, settings, OutputFormat::Svg)
}

/// Backend selection for the unit-square curve plot
fn draw_curve<P: AsRef<Path>>(
    points: &[(f64, f64)],
    legend: &str,
    with_diagonal: bool,
    path: P,
    settings: &CurvePlotConfig,
    format: OutputFormat,
) -> Result<()> {
    if points.is_empty() {
        return Err(Error::EmptyData("no curve points to plot".to_string()));
    }

    let size = (settings.width, settings.height);
    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
            render_curve(&root, points, legend, with_diagonal, settings)
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path.as_ref(), size).into_drawing_area();
            render_curve(&root, points, legend, with_diagonal, settings)
        }
    }
}

/// Backend-independent chart body
fn render_curve<DB>(
    root: &DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    legend: &str,
    with_diagonal: bool,
    settings: &CurvePlotConfig,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&settings.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(-0.02f64..1.02f64, -0.02f64..1.02f64)?;

    chart
        .configure_mesh()
        .x_labels(11)
        .y_labels(11)
        .x_desc(&settings.x_label)
        .y_desc(&settings.y_label)
        .draw()?;

    if with_diagonal {
        chart.draw_series(LineSeries::new(
            vec![(0.0, 0.0), (1.0, 1.0)],
            &BLACK.mix(0.3),
        ))?;
    }

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))?
        .label(legend.to_owned())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_figures_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let figures = dir.path().join("reports").join("figures");

        ensure_figures_dir(&figures).unwrap();
        assert!(figures.is_dir());

        // Idempotent
        ensure_figures_dir(&figures).unwrap();
        assert!(figures.is_dir());
    }

    #[test]
    fn test_ensure_figures_dir_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let figures = dir.path().join("figures");
        std::fs::write(&figures, "not a directory").unwrap();

        ensure_figures_dir(&figures).unwrap();
        assert!(figures.is_dir());
    }

    #[test]
    fn test_empty_curve_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roc.png");
        let result = plot_roc_curve_png(&[], 0.5, &path, &CurvePlotConfig::roc());
        assert!(matches!(result, Err(Error::EmptyData(_))));
    }
}
