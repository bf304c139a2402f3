use super::*;
use serde_json::json;
use shared::protocol::{ActiveUsersData, ConsentsData, StaffSpeakingData, TimesData, TopUser};

#[test]
fn default_dashboard_data_renders_as_empty_states() {
    let view = dashboard_view(&DashboardData::default());
    assert!(view.metrics.is_empty());
    assert!(view.top_users.is_empty());
    assert!(view.active_users.is_empty());
    assert!(view.staff_speaking.is_empty());
    assert!(view.times.is_empty());
    assert!(view.consents.is_empty());
}

#[test]
fn dashboard_view_derives_inactive_users_and_pairs() {
    let data = DashboardData {
        active_users: ActiveUsersData {
            active: 12,
            enabled: 20,
        },
        staff_speaking: StaffSpeakingData {
            staff: 3,
            non_staff: 9,
        },
        consents: ConsentsData {
            listening: 0,
            dictation: 4,
        },
        top_users: vec![TopUser {
            name: "Dr. A Smith".to_string(),
            visits: 41,
            total_time: Some("12h".to_string()),
        }],
        times: vec![TimesData {
            month: "2024-01".to_string(),
            recording: 1.5,
            processing: 0.5,
            created_to_sign: 24.0,
        }],
        ..DashboardData::default()
    };

    let view = dashboard_view(&data);
    let active = view.active_users.series().expect("active users");
    assert_eq!(active.point("Active"), Some(12.0));
    assert_eq!(active.point("Inactive"), Some(8.0));

    let staff = view.staff_speaking.series().expect("staff speaking");
    assert_eq!(staff.points()[0].key, "Non-Staff");
    assert_eq!(staff.points()[0].color, "#ff9800");

    let consents = view.consents.series().expect("consents");
    assert_eq!(consents.point("Listening Session"), Some(0.0));

    let times = view.times.series().expect("times");
    assert_eq!(times.cell("2024-01", "Created to Sign"), Some(24.0));
    assert_eq!(
        view.top_users.series().expect("top users").point("Dr. A Smith"),
        Some(41.0)
    );
}

#[test]
fn inactive_users_never_go_negative() {
    let data = DashboardData {
        active_users: ActiveUsersData {
            active: 9,
            enabled: 4,
        },
        ..DashboardData::default()
    };
    let view = dashboard_view(&data);
    assert_eq!(
        view.active_users.series().expect("series").point("Inactive"),
        Some(0.0)
    );
}

#[test]
fn extreme_user_counts_do_not_overflow() {
    let data = DashboardData {
        active_users: ActiveUsersData {
            active: i64::MAX,
            enabled: -2,
        },
        ..DashboardData::default()
    };
    let view = dashboard_view(&data);
    let series = view.active_users.series().expect("series");
    assert_eq!(series.point("Inactive"), Some(0.0));

    let data = DashboardData {
        active_users: ActiveUsersData {
            active: i64::MIN,
            enabled: i64::MAX,
        },
        ..DashboardData::default()
    };
    let view = dashboard_view(&data);
    assert_eq!(
        view.active_users.series().expect("series").point("Inactive"),
        Some(i64::MAX as f64)
    );
}

#[test]
fn report_view_builds_every_routed_chart() {
    let records = vec![
        RawRecord::try_from(json!({
            "noteId": "N-1",
            "practitioner": "Dr. A Smith",
            "createdDate": "2024-01-02",
            "daysPending": 9,
        }))
        .expect("record"),
        RawRecord::try_from(json!({
            "noteId": "N-2",
            "practitioner": "Dr. B Jones",
            "createdDate": "2024-01-05",
            "daysPending": 2,
        }))
        .expect("record"),
    ];

    let view = report_view(ReportKind::Unsigned, records, &FilterContext::default());
    assert_eq!(view.title, "Unsigned Notes");
    assert_eq!(view.record_count, 2);
    assert_eq!(view.columns.len(), 5);
    let kinds: Vec<ChartKind> = view.charts.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ChartKind::UnsignedPending, ChartKind::UnsignedByPractitioner]
    );
    assert!(view.charts.iter().all(|c| !c.result.is_empty()));
}

#[test]
fn report_view_without_records_has_only_empty_charts() {
    let view = report_view(ReportKind::Sync, Vec::new(), &FilterContext::default());
    assert_eq!(view.record_count, 0);
    assert_eq!(view.charts.len(), 2);
    assert!(view.charts.iter().all(|c| c.result.is_empty()));
}
