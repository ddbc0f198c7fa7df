// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown output generation for chart specs.
//!
//! Each chart becomes a section with one table row per label and one column
//! per series, which is how the CLI prints charts to a terminal.

use crate::chart::ChartSpec;
use std::fmt::Write;

/// Render several charts, one section each.
pub fn render_charts(charts: &[ChartSpec]) -> String {
    let mut output = String::new();

    if charts.is_empty() {
        writeln!(output, "_No charts._").unwrap();
        return output;
    }

    for (i, chart) in charts.iter().enumerate() {
        if i > 0 {
            writeln!(output).unwrap();
        }
        output.push_str(&render_chart(chart));
    }

    output
}

/// Render a single chart as a Markdown table.
pub fn render_chart(chart: &ChartSpec) -> String {
    let mut output = String::new();

    writeln!(output, "## {}", chart.title).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "_y: {}_", chart.y_axis).unwrap();
    writeln!(output).unwrap();

    write!(output, "| {} |", header_or(&chart.x_axis, "label")).unwrap();
    for series in &chart.series {
        write!(output, " {} |", series.name).unwrap();
    }
    writeln!(output).unwrap();

    write!(output, "|---|").unwrap();
    for _ in &chart.series {
        write!(output, "---:|").unwrap();
    }
    writeln!(output).unwrap();

    for (row, label) in chart.labels.iter().enumerate() {
        write!(output, "| {} |", label).unwrap();
        for series in &chart.series {
            write!(output, " {} |", format_value(series.values[row])).unwrap();
        }
        writeln!(output).unwrap();
    }

    for line in &chart.reference_lines {
        writeln!(output).unwrap();
        writeln!(output, "Reference: {} = {}", line.name, format_value(line.value)).unwrap();
    }

    output
}

fn header_or<'a>(title: &'a str, fallback: &'a str) -> &'a str {
    if title.is_empty() {
        fallback
    } else {
        title
    }
}

/// Format a value without trailing noise: integers as-is, everything else
/// with three decimals.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.3}", value)
    }
}
