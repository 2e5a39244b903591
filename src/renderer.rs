//! # Text Rendering
//!
//! Turns a [`TideSeries`] into something a terminal can show: a table of
//! times and heights, the day's high and low waters, and a coarse ASCII
//! curve. Everything renders to a `String` so the output can be tested.

use crate::synth::{Extreme, ExtremeKind};
use crate::TideSeries;
use std::fmt::Write;

/// Rows of the ASCII chart.
const ROWS: usize = 20;
/// Space for Y-axis labels
const Y_AXIS_WIDTH: usize = 7;

/// Format decimal hours as `HH:MM`, wrapping past midnight.
pub fn format_hours(hours: f64) -> String {
    let total = (hours * 60.0).round() as i64;
    let minutes = total.rem_euclid(24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Right-aligned height with two decimals.
fn format_height(height: f64) -> String {
    format!("{height:6.2}")
}

/// Table of every sample, one per line.
pub fn render_table(series: &TideSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {} ({})", series.station, series.date, series.method);
    for sample in &series.samples {
        let _ = writeln!(out, "  {}  {}", format_hours(sample.hours), format_height(sample.height));
    }
    out
}

/// High and low waters, one per line.
pub fn render_extremes(extremes: &[Extreme]) -> String {
    let mut out = String::new();
    for e in extremes {
        let label = match e.kind {
            ExtremeKind::High => "HW",
            ExtremeKind::Low => "LW",
        };
        let _ = writeln!(out, "  {label}  {}  {}", format_hours(e.hours), format_height(e.height));
    }
    out
}

/// ASCII plot of the series, one column per sample.
pub fn render_ascii(series: &TideSeries) -> String {
    let Some((min, max)) = series.range() else {
        return String::from("(no samples)\n");
    };
    let span = if max > min { max - min } else { 1.0 };

    let height_to_row = |height: f64| {
        let normalized = (height - min) / span;
        ((1.0 - normalized) * (ROWS as f64 - 1.0)).round() as usize
    };

    let columns = series.samples.len() + Y_AXIS_WIDTH;
    let mut grid = vec![vec![' '; columns]; ROWS];

    // Labels for top, middle and bottom rows
    for value in [max, (min + max) / 2.0, min] {
        let row = height_to_row(value).min(ROWS - 1);
        let label = format!("{:<width$}", format!("{value:.2}"), width = Y_AXIS_WIDTH - 1);
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
    }
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }

    for (column, sample) in series.samples.iter().enumerate() {
        let row = height_to_row(sample.height).min(ROWS - 1);
        grid[row][column + Y_AXIS_WIDTH] = '•';
    }

    let mut out = String::new();
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    // Hour markers below the chart
    let padding = " ".repeat(Y_AXIS_WIDTH);
    let markers: String = series
        .samples
        .iter()
        .map(|s| {
            let minutes = (s.hours * 60.0).round() as i64;
            if minutes % 360 == 0 {
                '|'
            } else {
                ' '
            }
        })
        .collect();
    let _ = writeln!(out, "{padding}{markers}");
    out
}

/// Print the ASCII chart to stdout.
pub fn draw_ascii(series: &TideSeries) {
    print!("{}", render_ascii(series));
}
