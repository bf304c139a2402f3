use serde::Serialize;
use shared::{domain::FilterContext, error::DashboardError, protocol::RawRecord, reports::ReportKind};
use tracing::debug;

use crate::{
    palette::{full_label, short_label, Palette},
    series::{ChartResult, Series, SeriesSet},
    transforms::{self, Pivot, Tally, TOP_ACTIONS, TREND_WINDOW_DAYS},
};

/// Every chart a report section can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    AuditStatus,
    AuditActions,
    AccessTrend,
    AccessType,
    ServiceUsage,
    RecommendationPriority,
    RecommendationStatus,
    DeliveryFrequency,
    SigningTrend,
    SignedStatus,
    PractitionerVisits,
    SyncSeverity,
    SyncStatus,
    UnsignedPending,
    UnsignedByPractitioner,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutput {
    pub kind: ChartKind,
    pub title: String,
    pub result: ChartResult,
}

impl ChartKind {
    /// Charts shown for a report, in display order.
    pub fn for_report(report: ReportKind) -> &'static [ChartKind] {
        match report {
            ReportKind::Audit => &[ChartKind::AuditStatus, ChartKind::AuditActions],
            ReportKind::PatientAccess => &[ChartKind::AccessTrend, ChartKind::AccessType],
            ReportKind::PatientService => &[ChartKind::ServiceUsage],
            ReportKind::Recommendation => &[
                ChartKind::RecommendationPriority,
                ChartKind::RecommendationStatus,
            ],
            ReportKind::Delivery => &[ChartKind::DeliveryFrequency],
            ReportKind::Signed => &[ChartKind::SigningTrend, ChartKind::SignedStatus],
            ReportKind::Practitioner => &[ChartKind::PractitionerVisits],
            ReportKind::Sync => &[ChartKind::SyncSeverity, ChartKind::SyncStatus],
            ReportKind::Unsigned => &[
                ChartKind::UnsignedPending,
                ChartKind::UnsignedByPractitioner,
            ],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::AuditStatus => "Status Distribution",
            ChartKind::AuditActions => "Action Types by Practitioner",
            ChartKind::AccessTrend => "Access Trends by Practitioner (Last 14 Days)",
            ChartKind::AccessType => "Access Type Distribution",
            ChartKind::ServiceUsage => "Service Usage Comparison",
            ChartKind::RecommendationPriority => "Priority Distribution",
            ChartKind::RecommendationStatus => "Status Breakdown",
            ChartKind::DeliveryFrequency => "Frequency Distribution",
            ChartKind::SigningTrend => "Signing Trends by Practitioner (Last 14 Days)",
            ChartKind::SignedStatus => "Status Distribution by Practitioner",
            ChartKind::PractitionerVisits => "Practitioner Visits Comparison",
            ChartKind::SyncSeverity => "Severity Distribution",
            ChartKind::SyncStatus => "Status Breakdown",
            ChartKind::UnsignedPending => "Days Pending by Practitioner",
            ChartKind::UnsignedByPractitioner => "Unsigned Notes by Practitioner",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ChartKind::AuditStatus
            | ChartKind::AccessType
            | ChartKind::RecommendationStatus
            | ChartKind::SyncStatus => Palette::CATEGORY,
            ChartKind::AuditActions => Palette::ACTIONS,
            ChartKind::AccessTrend => Palette::ACCESS_TREND,
            ChartKind::SigningTrend => Palette::SIGNING_TREND,
            ChartKind::SignedStatus => Palette::SIGNED_STATUS,
            ChartKind::UnsignedPending => Palette::PENDING,
            ChartKind::ServiceUsage => Palette::GREEN,
            ChartKind::RecommendationPriority => Palette::ORANGE,
            ChartKind::DeliveryFrequency => Palette::PURPLE,
            ChartKind::PractitionerVisits => Palette::BLUE,
            ChartKind::SyncSeverity | ChartKind::UnsignedByPractitioner => Palette::RED,
        }
    }

    fn display_title(&self, filters: &FilterContext) -> String {
        match (self, filters.selector_label()) {
            (ChartKind::SigningTrend, Some(label)) => format!("{} - {label}", self.title()),
            _ => self.title().to_string(),
        }
    }

    /// Aggregates `records` for this chart. Never fails: empty or fully
    /// malformed input yields [`ChartResult::Empty`].
    pub fn build(&self, records: &[RawRecord], filters: &FilterContext) -> ChartOutput {
        let title = self.display_title(filters);
        let result = match self.aggregate(records, &title) {
            Ok(set) => ChartResult::Data(set),
            Err(err) => {
                debug!(chart = ?self, error = %err, "chart has no data");
                ChartResult::Empty
            }
        };
        ChartOutput {
            kind: *self,
            title,
            result,
        }
    }

    fn aggregate(&self, records: &[RawRecord], title: &str) -> Result<SeriesSet, DashboardError> {
        let palette = self.palette();
        let total = records.len();
        let set = match self {
            ChartKind::AuditStatus => counts(records, "status", palette, title)?,
            ChartKind::AccessType => counts(records, "accessType", palette, title)?,
            ChartKind::RecommendationPriority => counts(records, "priority", palette, title)?,
            ChartKind::RecommendationStatus => counts(records, "status", palette, title)?,
            ChartKind::DeliveryFrequency => counts(records, "frequency", palette, title)?,
            ChartKind::SyncSeverity => counts(records, "severity", palette, title)?,
            ChartKind::SyncStatus => counts(records, "status", palette, title)?,
            ChartKind::AuditActions => {
                let table = transforms::pivot(records, "practitioner", "action")?;
                with_subtitle(
                    by_practitioner(transforms::top_rows(table, TOP_ACTIONS), palette, title),
                    format!("{total} total actions"),
                )
            }
            ChartKind::AccessTrend => {
                let table = transforms::daily_buckets(
                    records,
                    "practitioner",
                    "accessDate",
                    TREND_WINDOW_DAYS,
                )?;
                with_subtitle(
                    by_practitioner(table, palette, title),
                    format!("{total} total accesses"),
                )
            }
            ChartKind::SigningTrend => {
                let table = transforms::daily_buckets(
                    records,
                    "practitioner",
                    "signedDate",
                    TREND_WINDOW_DAYS,
                )?;
                with_subtitle(
                    by_practitioner(table, palette, title),
                    format!("{total} total notes"),
                )
            }
            ChartKind::SignedStatus => signed_status(records, palette, title)?,
            ChartKind::UnsignedPending => {
                let table = transforms::pending_buckets(records, "practitioner", "daysPending")?;
                with_subtitle(
                    by_practitioner(table, palette, title),
                    format!("{total} total unsigned notes"),
                )
            }
            ChartKind::ServiceUsage => {
                let tally = transforms::value_series(records, "serviceName", "usageCount")?;
                categorical(tally, palette, full_label, title)
            }
            ChartKind::PractitionerVisits => {
                let tally = transforms::value_series(records, "practitionerName", "visits")?;
                categorical(tally, palette, short_label, title)
            }
            ChartKind::UnsignedByPractitioner => {
                let tally = transforms::group_counts(records, "practitioner")?.sorted_descending();
                categorical(tally, palette, short_label, title)
            }
        };
        Ok(set)
    }
}

fn categorical(tally: Tally, palette: Palette, label: fn(&str) -> String, title: &str) -> SeriesSet {
    SeriesSet {
        title: title.to_string(),
        subtitle: None,
        series: Series::categorical(tally, palette, label),
    }
}

fn counts(
    records: &[RawRecord],
    field: &str,
    palette: Palette,
    title: &str,
) -> Result<SeriesSet, DashboardError> {
    let tally = transforms::group_counts(records, field)?;
    Ok(categorical(tally, palette, full_label, title))
}

fn by_practitioner(table: Pivot, palette: Palette, title: &str) -> SeriesSet {
    SeriesSet {
        title: title.to_string(),
        subtitle: None,
        series: Series::table(table, palette, short_label),
    }
}

fn with_subtitle(mut set: SeriesSet, subtitle: String) -> SeriesSet {
    set.subtitle = Some(subtitle);
    set
}

/// Practitioner x status comparison; a single practitioner collapses to a
/// plain status breakdown for that practitioner.
fn signed_status(
    records: &[RawRecord],
    palette: Palette,
    title: &str,
) -> Result<SeriesSet, DashboardError> {
    let table = transforms::pivot(records, "practitioner", "status")?;
    let total = records.len();
    if let [practitioner] = table.columns.as_slice() {
        let tally = Tally {
            entries: table
                .rows
                .iter()
                .map(|(status, values)| (status.clone(), values.first().copied().unwrap_or(0.0)))
                .collect(),
            skipped: table.skipped,
        };
        return Ok(SeriesSet {
            title: format!("Status Distribution - {practitioner}"),
            subtitle: Some(format!("{total} notes")),
            series: Series::categorical(tally, Palette::CATEGORY, full_label),
        });
    }
    Ok(with_subtitle(
        by_practitioner(table, palette, title),
        format!("{total} total notes"),
    ))
}

#[cfg(test)]
#[path = "tests/charts_tests.rs"]
mod tests;
