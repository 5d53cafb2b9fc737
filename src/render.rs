//! Figure rendering: one scatter layer per condition with its confidence
//! ellipse drawn beneath it.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::FontStyle;
use tracing::info;

use crate::config::AppConfig;
use crate::core::ellipse::ConfidenceEllipse;
use crate::sheet::ConditionSamples;

const ZERO_LINE: RGBColor = RGBColor(128, 128, 128);

/// Render the composite figure and write it to `out_path`.
pub fn render_figure(
    out_path: &Path,
    title: &str,
    conditions: &[ConditionSamples],
    cfg: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    let mut outlines = Vec::with_capacity(conditions.len());
    for cond in conditions {
        let ellipse = ConfidenceEllipse::from_samples(&cond.xs, &cond.ys, cfg.ellipse.n_std)?;
        info!(
            label = %cond.label,
            n = cond.xs.len(),
            mean_x = ellipse.center.0,
            mean_y = ellipse.center.1,
            pearson = ellipse.pearson,
            "condition summary"
        );
        outlines.push(ellipse.outline(cfg.ellipse.segments));
    }

    let (x_range, y_range) = data_ranges(conditions, &outlines);

    let root =
        BitMapBackend::new(out_path, (cfg.figure.width, cfg.figure.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title_font = ("sans-serif", cfg.figure.title_font_size)
        .into_font()
        .style(FontStyle::Bold);
    let axis_font = ("sans-serif", cfg.figure.axis_font_size)
        .into_font()
        .style(FontStyle::Bold);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, title_font)
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("Δ X")
        .y_desc("Δ Y")
        .axis_desc_style(axis_font)
        .label_style(("sans-serif", cfg.figure.tick_font_size))
        .x_labels(cfg.figure.ticks)
        .y_labels(cfg.figure.ticks)
        .draw()?;

    if y_range.contains(&0.0) {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x_range.start, 0.0), (x_range.end, 0.0)],
            ZERO_LINE,
        )))?;
    }
    if x_range.contains(&0.0) {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, y_range.start), (0.0, y_range.end)],
            ZERO_LINE,
        )))?;
    }

    // Ellipses first so every scatter layer sits on top of them.
    for (outline, style) in outlines.iter().zip(&cfg.conditions) {
        let face = RGBColor(style.face[0], style.face[1], style.face[2]);
        let edge = RGBColor(style.edge[0], style.edge[1], style.edge[2]);
        chart.draw_series(std::iter::once(Polygon::new(
            outline.clone(),
            face.mix(style.fill_alpha).filled(),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(outline.clone(), edge)))?;
    }

    for (cond, style) in conditions.iter().zip(&cfg.conditions) {
        let face = RGBColor(style.face[0], style.face[1], style.face[2]);
        chart
            .draw_series(
                cond.xs
                    .iter()
                    .zip(cond.ys.iter())
                    .map(|(&x, &y)| Circle::new((x, y), 3, face.filled())),
            )?
            .label(cond.label.clone())
            .legend(move |(x, y)| Circle::new((x, y), 3, face.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", cfg.figure.legend_font_size))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Axis ranges covering every scatter point and ellipse outline, padded 5%.
/// Non-finite coordinates (degenerate samples) are ignored; an empty figure
/// falls back to a unit window around the origin.
fn data_ranges(
    conditions: &[ConditionSamples],
    outlines: &[Vec<(f64, f64)>],
) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    let scatter = conditions
        .iter()
        .flat_map(|c| c.xs.iter().copied().zip(c.ys.iter().copied()));
    let boundary = outlines.iter().flat_map(|o| o.iter().copied());
    for (x, y) in scatter.chain(boundary) {
        if x.is_finite() && y.is_finite() {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !x_min.is_finite() || !y_min.is_finite() {
        return (-1.0..1.0, -1.0..1.0);
    }

    let x_pad = ((x_max - x_min) * 0.05).max(1e-6);
    let y_pad = ((y_max - y_min) * 0.05).max(1e-6);
    (
        (x_min - x_pad)..(x_max + x_pad),
        (y_min - y_pad)..(y_max + y_pad),
    )
}
