use super::*;
use shared::domain::YearMonth;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn month(raw: &str) -> YearMonth {
    raw.parse().expect("valid month")
}

#[test]
fn last_three_months_from_month_end_keeps_the_day() {
    let mut state = FilterState::default();
    let changed = state
        .reduce(FilterAction::ApplyLast3Months {
            today: date(2024, 1, 31),
        })
        .expect("reduce");

    assert!(changed);
    assert_eq!(
        state.filters().date_range,
        Some(DateRange::new(date(2023, 10, 31), date(2024, 1, 31)))
    );
    assert_eq!(state.quick_filter(), QuickFilter::Last3Months);
}

#[test]
fn missing_day_in_target_month_overflows_forward() {
    assert_eq!(
        subtract_calendar_months(date(2024, 5, 31), 3),
        Some(date(2024, 3, 2))
    );
    assert_eq!(
        subtract_calendar_months(date(2023, 5, 31), 3),
        Some(date(2023, 3, 3))
    );
    assert_eq!(
        subtract_calendar_months(date(2024, 2, 15), 3),
        Some(date(2023, 11, 15))
    );
}

#[test]
fn month_range_after_date_range_clears_the_date_range() {
    let mut state = FilterState::default();
    state
        .reduce(FilterAction::SetDateRange(DateRange::new(
            date(2024, 1, 1),
            date(2024, 1, 31),
        )))
        .expect("date range");
    state
        .reduce(FilterAction::SetMonthRange(MonthRange::new(
            month("2024-01"),
            month("2024-03"),
        )))
        .expect("month range");

    assert_eq!(state.filters().date_range, None);
    assert_eq!(
        state.filters().month_range,
        Some(MonthRange::new(month("2024-01"), month("2024-03")))
    );
    assert_eq!(state.quick_filter(), QuickFilter::Custom);
}

#[test]
fn date_range_after_month_range_clears_the_month_range() {
    let mut state = FilterState::default();
    state
        .reduce(FilterAction::SetMonthRange(MonthRange::new(
            month("2024-01"),
            month("2024-01"),
        )))
        .expect("month range");
    state
        .reduce(FilterAction::SetDateRange(DateRange::new(
            date(2024, 2, 1),
            date(2024, 2, 1),
        )))
        .expect("date range");

    assert_eq!(state.filters().month_range, None);
    assert!(state.filters().date_range.is_some());
}

#[test]
fn inverted_range_is_rejected_and_state_is_kept() {
    let mut state = FilterState::default();
    state
        .reduce(FilterAction::SetPractitioner(Some("Dr. A Smith".into())))
        .expect("practitioner");
    let before = state.clone();

    let err = state
        .reduce(FilterAction::SetDateRange(DateRange::new(
            date(2024, 3, 1),
            date(2024, 2, 1),
        )))
        .expect_err("must reject");
    assert_eq!(
        err,
        FilterError::InvalidRange {
            start: "2024-03-01".into(),
            end: "2024-02-01".into(),
        }
    );
    assert_eq!(state, before);

    assert!(state
        .reduce(FilterAction::SetMonthRange(MonthRange::new(
            month("2024-05"),
            month("2024-04"),
        )))
        .is_err());
    assert_eq!(state, before);
}

#[test]
fn blank_selector_clears_the_field() {
    let mut state = FilterState::default();
    state
        .reduce(FilterAction::SetProgram(Some("Cardiology".into())))
        .expect("program");
    assert_eq!(state.filters().program.as_deref(), Some("Cardiology"));

    let changed = state
        .reduce(FilterAction::SetProgram(Some("   ".into())))
        .expect("blank program");
    assert!(changed);
    assert_eq!(state.filters().program, None);
}

#[test]
fn unchanged_state_is_not_accepted() {
    let mut state = FilterState::default();
    assert!(!state.reduce(FilterAction::ClearAll).expect("clear"));
    assert!(!state
        .reduce(FilterAction::SetLocation(None))
        .expect("location"));

    state
        .reduce(FilterAction::SetLocation(Some("North".into())))
        .expect("location");
    assert!(!state
        .reduce(FilterAction::SetLocation(Some("North".into())))
        .expect("same location"));
}

#[test]
fn clearing_the_last_range_restores_the_default_indicator() {
    let mut state = FilterState::default();
    state
        .reduce(FilterAction::SetDateRange(DateRange::new(
            date(2024, 1, 1),
            date(2024, 1, 31),
        )))
        .expect("date range");
    state
        .reduce(FilterAction::SetLocation(Some("North".into())))
        .expect("location");
    assert_eq!(state.quick_filter(), QuickFilter::Custom);

    state
        .reduce(FilterAction::ClearOne(FilterKind::Location))
        .expect("clear location");
    assert_eq!(state.quick_filter(), QuickFilter::Custom);

    state
        .reduce(FilterAction::ClearOne(FilterKind::Date))
        .expect("clear date");
    assert_eq!(state.filters().date_range, None);
    assert_eq!(state.quick_filter(), QuickFilter::Last3Months);
}

#[test]
fn clear_all_resets_every_field() {
    let mut state = FilterState::default();
    for action in [
        FilterAction::SetMonthRange(MonthRange::new(month("2023-11"), month("2024-01"))),
        FilterAction::SetPractitioner(Some("Dr. A Smith".into())),
        FilterAction::SetProgram(Some("Cardiology".into())),
        FilterAction::SetLocation(Some("North".into())),
    ] {
        state.reduce(action).expect("reduce");
    }

    assert!(state.reduce(FilterAction::ClearAll).expect("clear all"));
    assert_eq!(state, FilterState::default());
    assert!(state.filters().is_empty());
    assert_eq!(state.quick_filter().label(), "Last 3 Months");
}

#[test]
fn quick_filter_keeps_selectors() {
    let mut state = FilterState::default();
    state
        .reduce(FilterAction::SetMonthRange(MonthRange::new(
            month("2023-01"),
            month("2023-02"),
        )))
        .expect("month range");
    state
        .reduce(FilterAction::SetPractitioner(Some("Dr. A Smith".into())))
        .expect("practitioner");

    state
        .reduce(FilterAction::ApplyLast3Months {
            today: date(2024, 6, 10),
        })
        .expect("quick filter");
    assert_eq!(state.filters().month_range, None);
    assert_eq!(state.filters().practitioner.as_deref(), Some("Dr. A Smith"));
    assert_eq!(
        state.filters().date_range,
        Some(DateRange::new(date(2024, 3, 10), date(2024, 6, 10)))
    );
}
