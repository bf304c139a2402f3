//! Pure transforms from raw report records to chart-ready series.
//!
//! Every function here is deterministic and total: malformed records are
//! skipped, and empty input becomes [`ChartResult::Empty`] rather than an
//! empty series.

pub mod charts;
pub mod palette;
pub mod series;
pub mod transforms;
pub mod views;

pub use charts::{ChartKind, ChartOutput};
pub use palette::{short_label, Palette};
pub use series::{ChartResult, Column, Point, Row, Series, SeriesSet};
pub use views::{dashboard_view, report_view, DashboardView, ReportView};
