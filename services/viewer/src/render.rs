// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chart.js rendering of chart specs.
//!
//! A [`ChartBoard`] owns the chart areas currently on the page. Rendering a
//! new set of specs disposes every previous area first, so a page never shows
//! charts of two selections at once. Each area is a canvas plus a Chart.js
//! configuration; the emitted script destroys any chart instance still bound
//! to a canvas before creating the new one.

use benchscope_benchmarks::{AxisScale, ChartKind, ChartSpec};
use serde_json::{json, Value};
use std::fmt::Write;

/// Series colours, assigned in series order.
const PALETTE: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

const REFERENCE_COLOR: &str = "#7f7f7f";

/// One drawn chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArea {
    /// Id of the canvas element.
    pub canvas_id: String,
    /// Chart title.
    pub title: String,
    /// Chart.js configuration object.
    pub config: Value,
}

/// The chart container of a page.
#[derive(Debug, Default)]
pub struct ChartBoard {
    areas: Vec<ChartArea>,
    disposed: usize,
}

impl ChartBoard {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every area with one per spec.
    pub fn render(&mut self, charts: &[ChartSpec]) -> &[ChartArea] {
        self.clear();
        self.areas = charts
            .iter()
            .enumerate()
            .map(|(index, spec)| ChartArea {
                canvas_id: format!("chart-{index}"),
                title: spec.title.clone(),
                config: chart_config(spec),
            })
            .collect();
        &self.areas
    }

    /// Dispose every area.
    pub fn clear(&mut self) {
        self.disposed += self.areas.len();
        self.areas.clear();
    }

    /// Areas currently drawn.
    pub fn areas(&self) -> &[ChartArea] {
        &self.areas
    }

    /// Areas disposed over the board's lifetime.
    pub fn disposed(&self) -> usize {
        self.disposed
    }

    /// Canvases and the script drawing them.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div id=\"charts\">\n");
        for area in &self.areas {
            writeln!(
                html,
                "  <div class=\"chart\"><canvas id=\"{}\" aria-label=\"{}\"></canvas></div>",
                area.canvas_id,
                escape_html(&area.title)
            )
            .unwrap();
        }
        html.push_str("</div>\n");

        if self.areas.is_empty() {
            return html;
        }

        html.push_str("<script>\n");
        for area in &self.areas {
            writeln!(
                html,
                "(function () {{\n  const canvas = document.getElementById(\"{id}\");\n  const previous = Chart.getChart(canvas);\n  if (previous) {{ previous.destroy(); }}\n  new Chart(canvas, {config});\n}})();",
                id = area.canvas_id,
                config = script_json(&area.config)
            )
            .unwrap();
        }
        html.push_str("</script>\n");
        html
    }
}

/// Build the Chart.js configuration of one spec.
pub fn chart_config(spec: &ChartSpec) -> Value {
    let kind = match spec.kind {
        ChartKind::Line => "line",
        ChartKind::Bar => "bar",
    };
    let y_type = match spec.y_scale {
        AxisScale::Linear => "linear",
        AxisScale::Logarithmic => "logarithmic",
    };

    let mut datasets: Vec<Value> = spec
        .series
        .iter()
        .enumerate()
        .map(|(index, series)| {
            let color = PALETTE[index % PALETTE.len()];
            json!({
                "label": series.name,
                "data": series.values,
                "borderColor": color,
                "backgroundColor": color,
                "fill": false,
            })
        })
        .collect();

    for line in &spec.reference_lines {
        datasets.push(json!({
            "type": "line",
            "label": line.name,
            "data": vec![line.value; spec.len()],
            "borderColor": REFERENCE_COLOR,
            "borderDash": [6, 4],
            "pointRadius": 0,
            "fill": false,
        }));
    }

    json!({
        "type": kind,
        "data": {
            "labels": spec.labels,
            "datasets": datasets,
        },
        "options": {
            "responsive": true,
            "plugins": {
                "title": { "display": true, "text": spec.title },
            },
            "scales": {
                "x": { "title": { "display": !spec.x_axis.is_empty(), "text": spec.x_axis } },
                "y": {
                    "type": y_type,
                    "title": { "display": !spec.y_axis.is_empty(), "text": spec.y_axis },
                },
            },
        },
    })
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JSON safe to embed in a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}
