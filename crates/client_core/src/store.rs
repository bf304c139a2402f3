use std::sync::Arc;

use aggregation::{dashboard_view, report_view, DashboardView, ReportView};
use serde::Serialize;
use shared::{
    domain::{FilterContext, QuickFilter},
    error::FilterError,
    protocol::FilterOptions,
    reports::section_title,
};
use tokio::{
    sync::{broadcast, broadcast::error::RecvError, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    fetch::{FetchOrchestrator, FetchedData, ReportApi},
    filter_state::{FilterAction, FilterState},
};

/// What a section shows once its data is aggregated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Dashboard(DashboardView),
    Report(ReportView),
    Unrecognized { slug: String },
}

/// Immutable result of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub generation: u64,
    pub report: String,
    pub title: &'static str,
    pub filters: FilterContext,
    pub quick_filter: QuickFilter,
    pub active_filters: Vec<String>,
    pub view: View,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    FiltersChanged { generation: u64 },
    ReportChanged { generation: u64, report: String },
    SnapshotCommitted { generation: u64 },
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Committed(Arc<DashboardSnapshot>),
    /// Filters or report changed while the fetch was in flight; the result
    /// was dropped.
    Stale { started: u64, current: u64 },
}

impl RefreshOutcome {
    pub fn snapshot(&self) -> Option<&Arc<DashboardSnapshot>> {
        match self {
            RefreshOutcome::Committed(snapshot) => Some(snapshot),
            RefreshOutcome::Stale { .. } => None,
        }
    }
}

struct StoreState {
    filter_state: FilterState,
    report: String,
    generation: u64,
    snapshot: Option<Arc<DashboardSnapshot>>,
}

/// Single owner of filter state and the last committed snapshot.
///
/// Every accepted change bumps `generation`; a refresh only commits if the
/// generation it started with is still current.
pub struct DashboardStore {
    fetcher: FetchOrchestrator,
    inner: Mutex<StoreState>,
    events: broadcast::Sender<StoreEvent>,
}

impl DashboardStore {
    pub fn new(api: Arc<dyn ReportApi>, report: impl Into<String>) -> Arc<Self> {
        Self::with_filter_state(api, report, FilterState::default())
    }

    pub fn with_filter_state(
        api: Arc<dyn ReportApi>,
        report: impl Into<String>,
        filter_state: FilterState,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            fetcher: FetchOrchestrator::new(api),
            inner: Mutex::new(StoreState {
                filter_state,
                report: report.into(),
                generation: 0,
                snapshot: None,
            }),
            events,
        })
    }

    pub async fn dispatch(&self, action: FilterAction) -> Result<bool, FilterError> {
        let generation = {
            let mut guard = self.inner.lock().await;
            if !guard.filter_state.reduce(action)? {
                return Ok(false);
            }
            guard.generation += 1;
            guard.generation
        };
        debug!(generation, "filters changed");
        let _ = self.events.send(StoreEvent::FiltersChanged { generation });
        Ok(true)
    }

    /// Switches the visible section. Returns `false` if it was already shown.
    pub async fn set_report(&self, report: impl Into<String>) -> bool {
        let report = report.into();
        let generation = {
            let mut guard = self.inner.lock().await;
            if guard.report == report {
                return false;
            }
            guard.report = report.clone();
            guard.generation += 1;
            guard.generation
        };
        debug!(generation, report = %report, "report changed");
        let _ = self.events.send(StoreEvent::ReportChanged { generation, report });
        true
    }

    /// Fetches and aggregates the current section. The lock is not held
    /// while requests are in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (started, report, filter_state) = {
            let guard = self.inner.lock().await;
            (
                guard.generation,
                guard.report.clone(),
                guard.filter_state.clone(),
            )
        };
        let filters = filter_state.filters().clone();

        let view = match self.fetcher.fetch(&report, &filters).await {
            FetchedData::Dashboard(data) => View::Dashboard(dashboard_view(&data)),
            FetchedData::Records {
                kind: Some(kind),
                records,
            } => View::Report(report_view(kind, records, &filters)),
            FetchedData::Records { kind: None, .. } => View::Unrecognized {
                slug: report.clone(),
            },
        };

        let snapshot = {
            let mut guard = self.inner.lock().await;
            if guard.generation != started {
                let current = guard.generation;
                debug!(started, current, "discarding stale refresh");
                return RefreshOutcome::Stale { started, current };
            }
            let snapshot = Arc::new(DashboardSnapshot {
                generation: started,
                title: section_title(&report),
                report,
                active_filters: filters.describe(),
                filters,
                quick_filter: filter_state.quick_filter(),
                view,
            });
            guard.snapshot = Some(Arc::clone(&snapshot));
            snapshot
        };
        info!(
            generation = snapshot.generation,
            report = %snapshot.report,
            "snapshot committed"
        );
        let _ = self.events.send(StoreEvent::SnapshotCommitted {
            generation: snapshot.generation,
        });
        RefreshOutcome::Committed(snapshot)
    }

    /// Dispatches `action` and refreshes if it was accepted.
    pub async fn apply(&self, action: FilterAction) -> Result<Option<RefreshOutcome>, FilterError> {
        if !self.dispatch(action).await? {
            return Ok(None);
        }
        Ok(Some(self.refresh().await))
    }

    pub async fn snapshot(&self) -> Option<Arc<DashboardSnapshot>> {
        self.inner.lock().await.snapshot.clone()
    }

    pub async fn filter_state(&self) -> FilterState {
        self.inner.lock().await.filter_state.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.inner.lock().await.generation
    }

    pub async fn filter_options(&self) -> FilterOptions {
        self.fetcher.fetch_filter_options().await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Refreshes after every filter or report change until aborted.
    pub fn spawn_refresh_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.subscribe_events();
        let store = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(StoreEvent::FiltersChanged { .. } | StoreEvent::ReportChanged { .. }) => {
                        store.refresh().await;
                    }
                    Ok(StoreEvent::SnapshotCommitted { .. }) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "refresh loop lagged behind store events");
                        store.refresh().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
