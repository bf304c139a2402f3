use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Calendar month in `YYYY-MM` form, as accepted by the reporting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = FilterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || FilterError::InvalidMonth(raw.to_string());
        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl MonthRange {
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

/// One clearable filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Date,
    Month,
    Practitioner,
    Program,
    Location,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Date,
        FilterKind::Month,
        FilterKind::Practitioner,
        FilterKind::Program,
        FilterKind::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Date => "date",
            FilterKind::Month => "month",
            FilterKind::Practitioner => "practitioner",
            FilterKind::Program => "program",
            FilterKind::Location => "location",
        }
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| FilterError::UnknownKind(raw.to_string()))
    }
}

/// The active combination of report filters.
///
/// `date_range` and `month_range` are never both set; the reducer in
/// `client_core` is the only writer and keeps that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_range: Option<MonthRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practitioner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl FilterContext {
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none()
            && self.month_range.is_none()
            && self.practitioner.is_none()
            && self.program.is_none()
            && self.location.is_none()
    }

    pub fn has_range(&self) -> bool {
        self.date_range.is_some() || self.month_range.is_some()
    }

    /// First active selector, used to qualify chart titles.
    pub fn selector_label(&self) -> Option<&str> {
        self.practitioner
            .as_deref()
            .or(self.program.as_deref())
            .or(self.location.as_deref())
    }

    /// Human-readable tags for every active filter, in display order.
    pub fn describe(&self) -> Vec<String> {
        let mut tags = Vec::new();
        if let Some(range) = &self.date_range {
            tags.push(format!("Date: {} - {}", range.start, range.end));
        }
        if let Some(range) = &self.month_range {
            tags.push(format!("Month: {} - {}", range.start, range.end));
        }
        if let Some(value) = &self.practitioner {
            tags.push(format!("Practitioner: {value}"));
        }
        if let Some(value) = &self.program {
            tags.push(format!("Program: {value}"));
        }
        if let Some(value) = &self.location {
            tags.push(format!("Location: {value}"));
        }
        tags
    }
}

/// UI-only quick filter indicator. It never influences fetching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickFilter {
    #[default]
    Last3Months,
    Custom,
}

impl QuickFilter {
    pub fn label(&self) -> &'static str {
        match self {
            QuickFilter::Last3Months => "Last 3 Months",
            QuickFilter::Custom => "",
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
