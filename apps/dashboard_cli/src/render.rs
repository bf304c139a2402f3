use std::fmt::Write as _;

use aggregation::{ChartResult, Series};
use client_core::{DashboardSnapshot, View};
use shared::protocol::MetricValue;

/// Plain-text rendering of a snapshot for terminals.
pub fn render_text(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (generation {})", snapshot.title, snapshot.generation);
    let quick = snapshot.quick_filter.label();
    if !quick.is_empty() {
        let _ = writeln!(out, "Quick filter: {quick}");
    }
    if snapshot.active_filters.is_empty() {
        let _ = writeln!(out, "Filters: none");
    } else {
        let _ = writeln!(out, "Filters: {}", snapshot.active_filters.join(", "));
    }

    match &snapshot.view {
        View::Dashboard(view) => {
            for metric in &view.metrics {
                let value = match &metric.value {
                    MetricValue::Number(n) => format!("{n}"),
                    MetricValue::Text(t) => t.clone(),
                };
                let _ = writeln!(out, "  {}: {value} ({:+}%)", metric.label, metric.change);
            }
            for (title, result) in [
                ("Top Users", &view.top_users),
                ("Active vs Enabled Users", &view.active_users),
                ("Staff Speaking", &view.staff_speaking),
                ("Times", &view.times),
                ("Consents", &view.consents),
            ] {
                write_chart(&mut out, title, result);
            }
        }
        View::Report(view) => {
            let _ = writeln!(out, "Records: {}", view.record_count);
            for chart in &view.charts {
                write_chart(&mut out, &chart.title, &chart.result);
            }
        }
        View::Unrecognized { slug } => {
            let _ = writeln!(out, "Unknown report '{slug}'");
        }
    }
    out
}

fn write_chart(out: &mut String, title: &str, result: &ChartResult) {
    let set = match result {
        ChartResult::Empty => {
            let _ = writeln!(out, "\n{title}\n  No data available");
            return;
        }
        ChartResult::Data(set) => set,
    };
    let _ = writeln!(out, "\n{}", set.title);
    if let Some(subtitle) = &set.subtitle {
        let _ = writeln!(out, "  {subtitle}");
    }
    match &set.series {
        Series::Categorical { points } => {
            for point in points {
                let _ = writeln!(out, "  {:<28} {}", point.label, point.value);
            }
        }
        Series::Table { columns, rows } => {
            let header: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
            let _ = writeln!(out, "  {:<14} {}", "", header.join(" | "));
            for row in rows {
                let cells: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
                let _ = writeln!(out, "  {:<14} {}", row.key, cells.join(" | "));
            }
        }
    }
}
