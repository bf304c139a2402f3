use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use super::*;
use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{
    domain::{DateRange, FilterKind},
    error::DashboardError,
};
use tokio::sync::{oneshot, Notify};

use crate::fetch::MissingReportApi;

struct GatedApi {
    body: Value,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    entered: Notify,
    calls: AtomicUsize,
}

impl GatedApi {
    fn open(body: Value) -> Self {
        Self {
            body,
            gate: Mutex::new(None),
            entered: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn gated(body: Value, gate: oneshot::Receiver<()>) -> Self {
        let api = Self::open(body);
        Self {
            gate: Mutex::new(Some(gate)),
            ..api
        }
    }
}

#[async_trait]
impl ReportApi for GatedApi {
    async fn get_json(
        &self,
        _path: &str,
        _query: &[(&'static str, String)],
    ) -> Result<Value, DashboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().await.take();
        self.entered.notify_one();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(self.body.clone())
    }
}

fn unsigned_rows() -> Value {
    json!([
        { "noteId": "N-1", "practitioner": "Dr. A Smith", "daysPending": 2 },
        { "noteId": "N-2", "practitioner": "Dr. B Jones", "daysPending": 11 },
    ])
}

#[tokio::test]
async fn refresh_commits_a_report_snapshot() {
    let api = Arc::new(GatedApi::open(unsigned_rows()));
    let store = DashboardStore::new(api.clone(), "unsigned");

    let outcome = store.refresh().await;
    let snapshot = outcome.snapshot().expect("committed");
    assert_eq!(snapshot.generation, 0);
    assert_eq!(snapshot.title, "Unsigned Notes");
    let View::Report(view) = &snapshot.view else {
        panic!("expected a report view");
    };
    assert_eq!(view.record_count, 2);
    assert_eq!(view.charts.len(), 2);
    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.snapshot().await.as_ref(), Some(snapshot));
}

#[tokio::test]
async fn refresh_started_before_a_filter_change_is_discarded() {
    let (release, gate) = oneshot::channel();
    let api = Arc::new(GatedApi::gated(unsigned_rows(), gate));
    let store = DashboardStore::new(api.clone(), "unsigned");

    let in_flight = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.refresh().await }
    });
    api.entered.notified().await;

    assert!(store
        .dispatch(FilterAction::SetPractitioner(Some("Dr. B Jones".into())))
        .await
        .expect("dispatch"));
    release.send(()).expect("release gate");

    let outcome = in_flight.await.expect("join");
    assert!(matches!(
        outcome,
        RefreshOutcome::Stale {
            started: 0,
            current: 1
        }
    ));
    assert!(store.snapshot().await.is_none());

    let outcome = store.refresh().await;
    let snapshot = outcome.snapshot().expect("committed");
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.filters.practitioner.as_deref(), Some("Dr. B Jones"));
    assert_eq!(snapshot.active_filters, vec!["Practitioner: Dr. B Jones"]);
}

#[tokio::test]
async fn rejected_or_no_op_actions_do_not_advance_the_generation() {
    let store = DashboardStore::new(Arc::new(MissingReportApi), "dashboard");
    let mut events = store.subscribe_events();

    let start = chrono::NaiveDate::from_ymd_opt(2024, 2, 1).expect("date");
    let end = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    assert!(store
        .dispatch(FilterAction::SetDateRange(DateRange::new(start, end)))
        .await
        .is_err());
    assert!(store
        .apply(FilterAction::ClearOne(FilterKind::Program))
        .await
        .expect("apply")
        .is_none());

    assert_eq!(store.generation().await, 0);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn failed_dashboard_commits_empty_charts() {
    let store = DashboardStore::new(Arc::new(MissingReportApi), "dashboard");

    let outcome = store.refresh().await;
    let snapshot = outcome.snapshot().expect("committed");
    assert_eq!(snapshot.title, "Dashboard");
    let View::Dashboard(view) = &snapshot.view else {
        panic!("expected the dashboard view");
    };
    assert!(view.metrics.is_empty());
    assert!(view.active_users.is_empty());
    assert!(view.times.is_empty());
}

#[tokio::test]
async fn unrecognized_report_commits_without_fetching() {
    let api = Arc::new(GatedApi::open(json!([])));
    let store = DashboardStore::new(api.clone(), "billing");

    let outcome = store.refresh().await;
    let snapshot = outcome.snapshot().expect("committed");
    assert_eq!(snapshot.title, "Report");
    assert_eq!(
        snapshot.view,
        View::Unrecognized {
            slug: "billing".into()
        }
    );
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn report_switch_bumps_generation_once() {
    let store = DashboardStore::new(Arc::new(MissingReportApi), "dashboard");
    let mut events = store.subscribe_events();

    assert!(store.set_report("sync").await);
    assert!(!store.set_report("sync").await);
    assert_eq!(
        events.recv().await.expect("event"),
        StoreEvent::ReportChanged {
            generation: 1,
            report: "sync".into()
        }
    );
    assert_eq!(store.generation().await, 1);
}

#[tokio::test]
async fn refresh_loop_follows_filter_changes() {
    let api = Arc::new(GatedApi::open(unsigned_rows()));
    let store = DashboardStore::new(api, "unsigned");
    let mut events = store.subscribe_events();
    let refresh_loop = store.spawn_refresh_loop();

    store
        .dispatch(FilterAction::SetLocation(Some("North".into())))
        .await
        .expect("dispatch");

    let committed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Ok(StoreEvent::SnapshotCommitted { generation }) => return generation,
                Ok(_) => continue,
                Err(err) => panic!("event stream failed: {err}"),
            }
        }
    })
    .await
    .expect("snapshot committed in time");
    refresh_loop.abort();

    assert_eq!(committed, 1);
    let snapshot = store.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.filters.location.as_deref(), Some("North"));
}

#[tokio::test]
async fn snapshot_serializes_with_tagged_view() {
    let store = DashboardStore::new(Arc::new(GatedApi::open(unsigned_rows())), "unsigned");
    let outcome = store.refresh().await;
    let snapshot = outcome.snapshot().expect("committed");

    let value = serde_json::to_value(snapshot.as_ref()).expect("serialize");
    assert_eq!(value["view"]["kind"], "report");
    assert_eq!(value["view"]["report"], "unsigned");
    assert_eq!(value["quick_filter"], "last3_months");
    assert_eq!(value["view"]["charts"][0]["result"]["state"], "data");
}
