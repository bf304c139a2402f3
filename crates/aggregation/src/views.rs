use serde::Serialize;
use shared::{
    domain::FilterContext,
    protocol::{DashboardData, Metric, RawRecord},
    reports::{ColumnSpec, ReportKind},
};

use crate::{
    charts::{ChartKind, ChartOutput},
    palette::{full_label, Palette},
    series::{ChartResult, Series, SeriesSet},
    transforms::{Pivot, Tally},
};

/// Chart-ready form of the six dashboard outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub metrics: Vec<Metric>,
    pub top_users: ChartResult,
    pub active_users: ChartResult,
    pub staff_speaking: ChartResult,
    pub times: ChartResult,
    pub consents: ChartResult,
}

/// One report section: data table plus every chart routed to the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub report: ReportKind,
    pub title: &'static str,
    pub columns: &'static [ColumnSpec],
    pub record_count: usize,
    pub records: Vec<RawRecord>,
    pub charts: Vec<ChartOutput>,
}

pub fn report_view(
    report: ReportKind,
    records: Vec<RawRecord>,
    filters: &FilterContext,
) -> ReportView {
    let charts = ChartKind::for_report(report)
        .iter()
        .map(|chart| chart.build(&records, filters))
        .collect();
    ReportView {
        report,
        title: report.title(),
        columns: report.columns(),
        record_count: records.len(),
        records,
        charts,
    }
}

pub fn dashboard_view(data: &DashboardData) -> DashboardView {
    DashboardView {
        metrics: data.metrics.clone(),
        top_users: top_users(data),
        active_users: pair(
            "Active vs Enabled Users",
            ("Active", data.active_users.active),
            (
                "Inactive",
                data.active_users
                    .enabled
                    .saturating_sub(data.active_users.active)
                    .max(0),
            ),
            Palette::ACTIVE_USERS,
            data.active_users.active == 0 && data.active_users.enabled == 0,
        ),
        staff_speaking: pair(
            "Staff Speaking",
            ("Non-Staff", data.staff_speaking.non_staff),
            ("Staff", data.staff_speaking.staff),
            Palette::STAFF_SPEAKING,
            data.staff_speaking.staff == 0 && data.staff_speaking.non_staff == 0,
        ),
        times: times(data),
        consents: pair(
            "Consents",
            ("Listening Session", data.consents.listening),
            ("Dictation Session", data.consents.dictation),
            Palette::CONSENTS,
            data.consents.listening == 0 && data.consents.dictation == 0,
        ),
    }
}

fn top_users(data: &DashboardData) -> ChartResult {
    if data.top_users.is_empty() {
        return ChartResult::Empty;
    }
    let tally = Tally {
        entries: data
            .top_users
            .iter()
            .map(|user| (user.name.clone(), user.visits as f64))
            .collect(),
        skipped: 0,
    };
    ChartResult::Data(SeriesSet {
        title: "Top Users".to_string(),
        subtitle: None,
        series: Series::categorical(tally, Palette::CATEGORY, full_label),
    })
}

fn pair(
    title: &str,
    first: (&str, i64),
    second: (&str, i64),
    palette: Palette,
    no_data: bool,
) -> ChartResult {
    if no_data {
        return ChartResult::Empty;
    }
    let tally = Tally {
        entries: vec![
            (first.0.to_string(), first.1 as f64),
            (second.0.to_string(), second.1 as f64),
        ],
        skipped: 0,
    };
    ChartResult::Data(SeriesSet {
        title: title.to_string(),
        subtitle: None,
        series: Series::categorical(tally, palette, full_label),
    })
}

fn times(data: &DashboardData) -> ChartResult {
    if data.times.is_empty() {
        return ChartResult::Empty;
    }
    let table = Pivot {
        columns: vec![
            "Recording".to_string(),
            "Processing".to_string(),
            "Created to Sign".to_string(),
        ],
        rows: data
            .times
            .iter()
            .map(|row| {
                (
                    row.month.clone(),
                    vec![row.recording, row.processing, row.created_to_sign],
                )
            })
            .collect(),
        skipped: 0,
    };
    ChartResult::Data(SeriesSet {
        title: "Times".to_string(),
        subtitle: None,
        series: Series::table(table, Palette::TIMES, full_label),
    })
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
