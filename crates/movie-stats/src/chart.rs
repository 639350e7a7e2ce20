//! Dual-axis line chart rendering.
//!
//! Charts are drawn with `plotters` onto an in-memory SVG document: average
//! budget against the left axis, the selected secondary metric against the
//! right axis, release years along the bottom.

use crate::error::{MovieStatsError, Result};
use crate::query::{BUDGET_AXIS_LABEL, ChartColor, ChartData};
use plotters::prelude::*;
use std::ops::Range;
use tracing::debug;

/// Canvas size in pixels.
pub const CANVAS_SIZE: (u32, u32) = (1600, 1200);

/// Base font size for labels, ticks and legend.
pub const FONT_SIZE: u32 = 15;

const FONT_FAMILY: &str = "sans-serif";
const TITLE_SIZE: u32 = 30;
const LINE_WIDTH: u32 = 3;

fn render_err(e: impl std::fmt::Display) -> MovieStatsError {
    MovieStatsError::Render(e.to_string())
}

fn color(c: ChartColor) -> RGBColor {
    let (r, g, b) = c.rgb();
    RGBColor(r, g, b)
}

/// Render `data` as an SVG document.
///
/// Every plotted year gets its own x-axis label. `NaN` values are gaps: the
/// line breaks around them.
///
/// # Errors
///
/// Returns [`MovieStatsError::Render`] when there is nothing to plot or the
/// backend fails.
pub fn render_chart(
    data: &ChartData,
    primary_color: ChartColor,
    secondary_color: ChartColor,
) -> Result<String> {
    let (Some(&first), Some(&last)) = (data.years.first(), data.years.last()) else {
        return Err(MovieStatsError::Render(format!(
            "no data to plot for language '{}'",
            data.language_code
        )));
    };

    let primary = color(primary_color);
    let secondary = color(secondary_color);
    let x_range = year_range(first, last);
    let primary_range = value_range(&data.primary.values);
    let secondary_range = value_range(&data.secondary.values);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CANVAS_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let title = format!(
            "{} Movies: {} vs. {}",
            data.language_name, BUDGET_AXIS_LABEL, data.secondary.label
        );

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT_FAMILY, TITLE_SIZE))
            .margin(30)
            .x_label_area_size(90)
            .y_label_area_size(110)
            .right_y_label_area_size(110)
            .build_cartesian_2d(
                x_range.clone().with_key_points(data.years.clone()),
                primary_range,
            )
            .map_err(render_err)?
            .set_secondary_coord(x_range, secondary_range);

        let year_formatter = |year: &i32| year.to_string();
        chart
            .configure_mesh()
            .x_labels(data.years.len())
            .x_label_formatter(&year_formatter)
            .x_label_style(
                (FONT_FAMILY, FONT_SIZE)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_label_style((FONT_FAMILY, FONT_SIZE).into_font().color(&primary))
            .x_desc("Release Year")
            .y_desc(BUDGET_AXIS_LABEL)
            .axis_desc_style((FONT_FAMILY, FONT_SIZE).into_font().color(&primary))
            .light_line_style(BLACK.mix(0.05))
            .bold_line_style(BLACK.mix(0.15))
            .draw()
            .map_err(render_err)?;

        chart
            .configure_secondary_axes()
            .y_desc(data.secondary.label.as_str())
            .label_style((FONT_FAMILY, FONT_SIZE).into_font().color(&secondary))
            .axis_desc_style((FONT_FAMILY, FONT_SIZE).into_font().color(&secondary))
            .draw()
            .map_err(render_err)?;

        let primary_style = primary.stroke_width(LINE_WIDTH);
        chart
            .draw_series(
                segments(&data.years, &data.primary.values)
                    .into_iter()
                    .flat_map(|segment| LineSeries::new(segment, primary_style)),
            )
            .map_err(render_err)?
            .label(data.primary.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], primary_style));

        let secondary_style = secondary.stroke_width(LINE_WIDTH);
        chart
            .draw_secondary_series(
                segments(&data.years, &data.secondary.values)
                    .into_iter()
                    .flat_map(|segment| LineSeries::new(segment, secondary_style)),
            )
            .map_err(render_err)?
            .label(data.secondary.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], secondary_style));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT_FAMILY, FONT_SIZE))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    debug!(
        "Rendered {} chart for '{}' ({} years, {} bytes)",
        data.metric,
        data.language_code,
        data.years.len(),
        svg.len()
    );
    Ok(svg)
}

/// X range covering `[first, last]`, widened around a single year.
fn year_range(first: i32, last: i32) -> Range<i32> {
    if first == last {
        (first - 1)..(last + 1)
    } else {
        first..last
    }
}

/// Y range from zero to just above the largest finite value.
fn value_range(values: &[f64]) -> Range<f64> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if max.is_finite() && max > 0.0 {
        0.0..max * 1.1
    } else {
        0.0..1.0
    }
}

/// Split a series into runs of consecutive finite points.
fn segments(years: &[i32], values: &[f64]) -> Vec<Vec<(i32, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (&year, &value) in years.iter().zip(values) {
        if value.is_finite() {
            current.push((year, value));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
