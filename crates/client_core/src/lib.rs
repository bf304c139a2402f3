pub mod fetch;
pub mod filter_state;
pub mod query;
pub mod store;

pub use fetch::{FetchOrchestrator, FetchedData, HttpReportApi, MissingReportApi, ReportApi};
pub use filter_state::{subtract_calendar_months, FilterAction, FilterState};
pub use query::query_params;
pub use store::{DashboardSnapshot, DashboardStore, RefreshOutcome, StoreEvent, View};
