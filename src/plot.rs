//! Chart rendering for the simulation pipelines.
//!
//! All charts are rendered to PNG files with plotters. Panel helpers draw
//! onto sub-areas of one bitmap so the report functions can compose grids.

use std::path::Path;

use ndarray::Array1;
use plotters::coord::Shift;
use plotters::prelude::*;

pub type PlotResult = Result<(), Box<dyn std::error::Error>>;

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// One actual-vs-predicted series pair for a line panel.
pub struct SeriesPair<'a> {
    pub title: &'a str,
    pub y_label: &'a str,
    pub actual_label: &'a str,
    pub predicted_label: &'a str,
    pub actual: &'a Array1<f64>,
    pub predicted: &'a Array1<f64>,
}

/// Side-by-side line charts of held-out actual vs. predicted values,
/// one panel per series pair.
pub fn prediction_lines_report(path: &Path, pairs: &[SeriesPair]) -> PlotResult {
    ensure_parent_dir(path)?;
    let root = BitMapBackend::new(path, (600 * pairs.len() as u32, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((1, pairs.len()));
    for (panel, pair) in panels.iter().zip(pairs) {
        line_panel(panel, pair)?;
    }

    root.present()?;
    Ok(())
}

/// The 2x3 report of the boosting pipeline: actual-vs-predicted scatters,
/// permutation-importance bars, and smart-tech usage summaries.
#[allow(clippy::too_many_arguments)]
pub fn boosting_report(
    path: &Path,
    energy_actual: &Array1<f64>,
    energy_predicted: &Array1<f64>,
    comfort_actual: &Array1<f64>,
    comfort_predicted: &Array1<f64>,
    feature_names: &[&str],
    energy_importance: &Array1<f64>,
    comfort_importance: &Array1<f64>,
    smart_tech: &[(&str, Array1<f64>)],
) -> PlotResult {
    ensure_parent_dir(path)?;
    let root = BitMapBackend::new(path, (1600, 900)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 3));
    scatter_panel(
        &panels[0],
        "Energy Consumption: Actual vs Predicted",
        "Actual Energy (kWh)",
        "Predicted Energy (kWh)",
        energy_actual,
        energy_predicted,
        BLUE,
    )?;
    importance_bars(
        &panels[1],
        "Energy Model Feature Importance (Permutation)",
        feature_names,
        energy_importance,
        BLUE,
    )?;
    mean_usage_bars(&panels[2], "Average Smart Tech Usage", smart_tech)?;
    scatter_panel(
        &panels[3],
        "Comfort Index: Actual vs Predicted",
        "Actual Comfort",
        "Predicted Comfort",
        comfort_actual,
        comfort_predicted,
        GREEN,
    )?;
    importance_bars(
        &panels[4],
        "Comfort Model Feature Importance (Permutation)",
        feature_names,
        comfort_importance,
        GREEN,
    )?;
    distribution_boxplots(&panels[5], "Smart Tech Feature Distributions", smart_tech)?;

    root.present()?;
    Ok(())
}

fn line_panel(area: &Panel, pair: &SeriesPair) -> PlotResult {
    let n = pair.actual.len();
    let (lo, hi) = padded_range(pair.actual.iter().chain(pair.predicted.iter()));

    let mut chart = ChartBuilder::on(area)
        .caption(pair.title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..n.max(1) as f64, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc("Test Sample")
        .y_desc(pair.y_label)
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            pair.actual.iter().enumerate().map(|(i, &v)| (i as f64, v)),
            BLUE,
        ))?
        .label(pair.actual_label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            pair.predicted
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v)),
            RED,
        ))?
        .label(pair.predicted_label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn scatter_panel(
    area: &Panel,
    title: &str,
    x_label: &str,
    y_label: &str,
    actual: &Array1<f64>,
    predicted: &Array1<f64>,
    color: RGBColor,
) -> PlotResult {
    let (lo, hi) = padded_range(actual.iter().chain(predicted.iter()));

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(lo..hi, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    chart.draw_series(
        actual
            .iter()
            .zip(predicted.iter())
            .map(|(&a, &p)| Circle::new((a, p), 3, color.mix(0.6).filled())),
    )?;

    // identity line: perfect predictions fall on it
    chart.draw_series(LineSeries::new(vec![(lo, lo), (hi, hi)], RED))?;

    Ok(())
}

fn importance_bars(
    area: &Panel,
    title: &str,
    names: &[&str],
    importances: &Array1<f64>,
    color: RGBColor,
) -> PlotResult {
    let top = importances.iter().cloned().fold(0.0f64, f64::max) * 1.1 + 1e-9;
    let bottom = importances.iter().cloned().fold(0.0f64, f64::min).min(0.0) * 1.1;
    let n = names.len() as u32;
    let labels: Vec<String> = names.iter().map(|s| s.to_string()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(55)
        .build_cartesian_2d((0u32..n).into_segmented(), bottom..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
                .get(*i as usize)
                .cloned()
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .label_style(("sans-serif", 9))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(color.filled())
            .margin(4)
            .data(importances.iter().enumerate().map(|(i, &v)| (i as u32, v))),
    )?;

    Ok(())
}

fn mean_usage_bars(area: &Panel, title: &str, entries: &[(&str, Array1<f64>)]) -> PlotResult {
    let means: Vec<f64> = entries
        .iter()
        .map(|(_, col)| col.mean().unwrap_or(0.0))
        .collect();
    let right = means.iter().cloned().fold(0.0f64, f64::max) * 1.2 + 1e-9;
    let n = entries.len() as u32;
    let labels: Vec<String> = entries.iter().map(|(name, _)| name.to_string()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(110)
        .build_cartesian_2d(0f64..right, (0u32..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(entries.len())
        .y_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
                .get(*i as usize)
                .cloned()
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .label_style(("sans-serif", 10))
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(RGBColor(255, 165, 0).filled())
            .margin(8)
            .data(means.iter().enumerate().map(|(i, &v)| (i as u32, v))),
    )?;

    Ok(())
}

fn distribution_boxplots(area: &Panel, title: &str, entries: &[(&str, Array1<f64>)]) -> PlotResult {
    let (lo, hi) = padded_range(entries.iter().flat_map(|(_, col)| col.iter()));
    let labels: Vec<&str> = entries.iter().map(|(name, _)| *name).collect();

    // Quartiles reports its values as f32, so the y axis is f32 here.
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(labels[..].into_segmented(), lo as f32..hi as f32)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .label_style(("sans-serif", 10))
        .draw()?;

    chart.draw_series(entries.iter().map(|(name, col)| {
        let values: Vec<f64> = col.to_vec();
        Boxplot::new_vertical(SegmentValue::CenterOf(name), &Quartiles::new(&values))
    }))?;

    Ok(())
}

/// Min/max over the given values with 5 % padding on both sides.
fn padded_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-6);
    (lo - pad, hi + pad)
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
