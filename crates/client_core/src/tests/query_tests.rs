use super::*;
use chrono::NaiveDate;
use shared::domain::{DateRange, MonthRange};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn empty_filters_send_no_parameters() {
    assert!(query_params(&FilterContext::default()).is_empty());
}

#[test]
fn date_range_and_selectors_in_fixed_order() {
    let filters = FilterContext {
        date_range: Some(DateRange::new(date(2024, 1, 5), date(2024, 2, 9))),
        practitioner: Some("Dr. A Smith".into()),
        location: Some("North".into()),
        ..FilterContext::default()
    };

    assert_eq!(
        query_params(&filters),
        vec![
            ("start_date", "2024-01-05".to_string()),
            ("end_date", "2024-02-09".to_string()),
            ("practitioner", "Dr. A Smith".to_string()),
            ("location", "North".to_string()),
        ]
    );
}

#[test]
fn month_range_is_sent_as_year_month() {
    let filters = FilterContext {
        month_range: Some(MonthRange::new(
            "2024-01".parse().expect("month"),
            "2024-03".parse().expect("month"),
        )),
        program: Some("Cardiology".into()),
        ..FilterContext::default()
    };

    assert_eq!(
        query_params(&filters),
        vec![
            ("start_month", "2024-01".to_string()),
            ("end_month", "2024-03".to_string()),
            ("program", "Cardiology".to_string()),
        ]
    );
}

#[test]
fn never_sends_both_range_kinds() {
    let filters = FilterContext {
        date_range: Some(DateRange::new(date(2024, 1, 1), date(2024, 1, 2))),
        month_range: Some(MonthRange::new(
            "2024-01".parse().expect("month"),
            "2024-02".parse().expect("month"),
        )),
        ..FilterContext::default()
    };

    let names: Vec<&str> = query_params(&filters).iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["start_date", "end_date"]);
}
