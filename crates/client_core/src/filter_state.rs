use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use shared::{
    domain::{DateRange, FilterContext, FilterKind, MonthRange, QuickFilter},
    error::FilterError,
};

/// Months covered by the "Last 3 Months" quick filter.
pub const QUICK_FILTER_MONTHS: u32 = 3;

/// Every way the filter bar can change the active filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetDateRange(DateRange),
    SetMonthRange(MonthRange),
    SetPractitioner(Option<String>),
    SetProgram(Option<String>),
    SetLocation(Option<String>),
    ClearOne(FilterKind),
    ClearAll,
    ApplyLast3Months { today: NaiveDate },
}

/// Filter context plus the quick-filter indicator shown next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    filters: FilterContext,
    quick_filter: QuickFilter,
}

impl FilterState {
    pub fn filters(&self) -> &FilterContext {
        &self.filters
    }

    pub fn quick_filter(&self) -> QuickFilter {
        self.quick_filter
    }

    /// Applies `action`. Returns `Ok(true)` when the state changed and
    /// `Ok(false)` for a no-op. On error the state is left untouched.
    pub fn reduce(&mut self, action: FilterAction) -> Result<bool, FilterError> {
        let mut next = self.clone();
        match action {
            FilterAction::SetDateRange(range) => {
                if !range.is_ordered() {
                    return Err(invalid_range(range.start, range.end));
                }
                next.filters.date_range = Some(range);
                next.filters.month_range = None;
                next.quick_filter = QuickFilter::Custom;
            }
            FilterAction::SetMonthRange(range) => {
                if !range.is_ordered() {
                    return Err(invalid_range(range.start, range.end));
                }
                next.filters.month_range = Some(range);
                next.filters.date_range = None;
                next.quick_filter = QuickFilter::Custom;
            }
            FilterAction::SetPractitioner(value) => next.filters.practitioner = selector(value),
            FilterAction::SetProgram(value) => next.filters.program = selector(value),
            FilterAction::SetLocation(value) => next.filters.location = selector(value),
            FilterAction::ClearOne(kind) => {
                match kind {
                    FilterKind::Date => next.filters.date_range = None,
                    FilterKind::Month => next.filters.month_range = None,
                    FilterKind::Practitioner => next.filters.practitioner = None,
                    FilterKind::Program => next.filters.program = None,
                    FilterKind::Location => next.filters.location = None,
                }
                if !next.filters.has_range() {
                    next.quick_filter = QuickFilter::default();
                }
            }
            FilterAction::ClearAll => next = FilterState::default(),
            FilterAction::ApplyLast3Months { today } => {
                let start = subtract_calendar_months(today, QUICK_FILTER_MONTHS)
                    .ok_or_else(|| invalid_range("out of range", today))?;
                next.filters.date_range = Some(DateRange::new(start, today));
                next.filters.month_range = None;
                next.quick_filter = QuickFilter::Last3Months;
            }
        }

        if next == *self {
            return Ok(false);
        }
        *self = next;
        Ok(true)
    }
}

fn invalid_range(start: impl ToString, end: impl ToString) -> FilterError {
    FilterError::InvalidRange {
        start: start.to_string(),
        end: end.to_string(),
    }
}

fn selector(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Moves `date` back by `months` calendar months, keeping the day of month.
///
/// A day the target month does not have overflows into the following month
/// (2024-05-31 minus 3 months is 2024-03-02), matching how browsers resolve
/// `Date.setMonth`.
pub fn subtract_calendar_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 - months as i32;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    match NaiveDate::from_ymd_opt(year, month, date.day()) {
        Some(same_day) => Some(same_day),
        None => first.checked_add_signed(Duration::days(i64::from(date.day()) - 1)),
    }
}

#[cfg(test)]
#[path = "tests/filter_state_tests.rs"]
mod tests;
