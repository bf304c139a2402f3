use super::*;
use serde_json::json;

fn record(value: Value) -> RawRecord {
    RawRecord::try_from(value).expect("object")
}

#[test]
fn text_treats_null_and_blank_as_missing() {
    let row = record(json!({
        "name": "Dr. A Smith",
        "blank": "  ",
        "nothing": null,
        "count": 4,
        "flag": true,
        "nested": { "a": 1 },
    }));

    assert_eq!(row.text("name").as_deref(), Some("Dr. A Smith"));
    assert_eq!(row.text("blank"), None);
    assert_eq!(row.text("nothing"), None);
    assert_eq!(row.text("missing"), None);
    assert_eq!(row.text("count").as_deref(), Some("4"));
    assert_eq!(row.text("flag").as_deref(), Some("true"));
    assert_eq!(row.text("nested"), None);
    assert!(row.get("nothing").is_none());
}

#[test]
fn number_accepts_numeric_strings_only() {
    let row = record(json!({ "a": 3, "b": "7.5", "c": "soon", "d": null }));
    assert_eq!(row.number("a"), Some(3.0));
    assert_eq!(row.number("b"), Some(7.5));
    assert_eq!(row.number("c"), None);
    assert_eq!(row.number("d"), None);
}

#[test]
fn non_objects_are_not_records() {
    assert!(RawRecord::try_from(json!("row")).is_err());
    assert!(RawRecord::try_from(json!([1, 2])).is_err());
}

#[test]
fn dashboard_payloads_use_camel_case() {
    let staff: StaffSpeakingData =
        serde_json::from_value(json!({ "staff": 2, "nonStaff": 9 })).expect("staff");
    assert_eq!(staff.non_staff, 9);

    let metric: Metric =
        serde_json::from_value(json!({ "label": "Avg Time", "value": "4m" })).expect("metric");
    assert_eq!(metric.value, MetricValue::Text("4m".into()));
    assert_eq!(metric.change, 0.0);

    let user: TopUser = serde_json::from_value(json!({ "name": "Dr. B Jones", "visits": 12 }))
        .expect("top user");
    assert_eq!(user.total_time, None);
}
