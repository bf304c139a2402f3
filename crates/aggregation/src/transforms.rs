use std::collections::{BTreeSet, HashMap};

use shared::{error::DashboardError, protocol::RawRecord};
use tracing::debug;

pub const UNKNOWN: &str = "Unknown";
pub const TREND_WINDOW_DAYS: usize = 14;
pub const TOP_ACTIONS: usize = 6;
pub const PENDING_BUCKETS: [&str; 3] = ["0-3 days", "4-7 days", "8+ days"];

/// Ordered `(key, value)` pairs, before colors are assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub entries: Vec<(String, f64)>,
    pub skipped: usize,
}

impl Tally {
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| *value)
    }

    /// Stable descending sort by value; ties keep first-seen order.
    pub fn sorted_descending(mut self) -> Self {
        self.entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }
}

/// Row-per-category, column-per-group table, before colors are assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivot {
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<f64>)>,
    pub skipped: usize,
}

impl Pivot {
    pub fn row(&self, key: &str) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<f64> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.row(row).and_then(|values| values.get(index).copied())
    }
}

/// Counter that remembers first-seen key order.
#[derive(Debug, Default)]
struct OrderedCounts {
    keys: Vec<String>,
    index: HashMap<String, usize>,
    counts: Vec<f64>,
}

impl OrderedCounts {
    fn add(&mut self, key: &str, amount: f64) {
        match self.index.get(key) {
            Some(&slot) => self.counts[slot] += amount,
            None => {
                self.index.insert(key.to_string(), self.keys.len());
                self.keys.push(key.to_string());
                self.counts.push(amount);
            }
        }
    }

    fn get(&self, key: &str) -> f64 {
        self.index
            .get(key)
            .map(|&slot| self.counts[slot])
            .unwrap_or(0.0)
    }

    fn keys(&self) -> &[String] {
        &self.keys
    }

    fn into_entries(self) -> Vec<(String, f64)> {
        self.keys.into_iter().zip(self.counts).collect()
    }
}

/// `outer -> inner -> count`, both levels in first-seen order.
#[derive(Debug, Default)]
struct Grouping {
    outer: OrderedCounts,
    inner: Vec<OrderedCounts>,
}

impl Grouping {
    fn add(&mut self, outer: &str, inner: &str) {
        self.outer.add(outer, 1.0);
        let slot = self.outer.index[outer];
        if slot == self.inner.len() {
            self.inner.push(OrderedCounts::default());
        }
        self.inner[slot].add(inner, 1.0);
    }

    fn is_empty(&self) -> bool {
        self.outer.keys().is_empty()
    }

    /// Union of inner keys across all outer groups, first-seen order.
    fn inner_keys(&self) -> Vec<String> {
        let mut seen = OrderedCounts::default();
        for group in &self.inner {
            for key in group.keys() {
                seen.add(key, 0.0);
            }
        }
        seen.keys
    }

    fn into_pivot(self, row_keys: Vec<String>, skipped: usize) -> Pivot {
        let rows = row_keys
            .into_iter()
            .map(|row| {
                let values = self.inner.iter().map(|group| group.get(&row)).collect();
                (row, values)
            })
            .collect();
        Pivot {
            columns: self.outer.keys,
            rows,
            skipped,
        }
    }
}

fn ensure_records(records: &[RawRecord]) -> Result<(), DashboardError> {
    if records.is_empty() {
        return Err(DashboardError::EmptyInput);
    }
    Ok(())
}

fn key_or_unknown(record: &RawRecord, field: &str) -> String {
    record.text(field).unwrap_or_else(|| UNKNOWN.to_string())
}

fn skip(index: usize, field: &str) {
    debug!(error = %DashboardError::malformed(index, field), "skipping malformed record");
}

/// Counts records by the value of `field`, first-seen order. Missing values
/// are counted under [`UNKNOWN`], so the counts always sum to `records.len()`.
pub fn group_counts(records: &[RawRecord], field: &str) -> Result<Tally, DashboardError> {
    ensure_records(records)?;
    let mut counts = OrderedCounts::default();
    for record in records {
        counts.add(&key_or_unknown(record, field), 1.0);
    }
    Ok(Tally {
        entries: counts.into_entries(),
        skipped: 0,
    })
}

/// One entry per record pairing `name_field` with `value_field`. Records
/// missing either are skipped.
pub fn value_series(
    records: &[RawRecord],
    name_field: &str,
    value_field: &str,
) -> Result<Tally, DashboardError> {
    ensure_records(records)?;
    let mut tally = Tally::default();
    for (index, record) in records.iter().enumerate() {
        let Some(name) = record.text(name_field) else {
            skip(index, name_field);
            tally.skipped += 1;
            continue;
        };
        let Some(value) = record.number(value_field) else {
            skip(index, value_field);
            tally.skipped += 1;
            continue;
        };
        tally.entries.push((name, value));
    }
    if tally.entries.is_empty() {
        return Err(DashboardError::EmptyInput);
    }
    Ok(tally)
}

/// Two-dimensional count: one row per distinct `inner` value, one column
/// per distinct `outer` value. Columns are keyed by the full outer value.
pub fn pivot(records: &[RawRecord], outer: &str, inner: &str) -> Result<Pivot, DashboardError> {
    ensure_records(records)?;
    let mut grouping = Grouping::default();
    for record in records {
        grouping.add(&key_or_unknown(record, outer), &key_or_unknown(record, inner));
    }
    let rows = grouping.inner_keys();
    Ok(grouping.into_pivot(rows, 0))
}

/// Keeps the `n` rows with the largest totals. The sort is stable, so equal
/// totals keep their original order and re-applying is a no-op.
pub fn top_rows(mut pivot: Pivot, n: usize) -> Pivot {
    pivot.rows.sort_by(|a, b| {
        let total_a: f64 = a.1.iter().sum();
        let total_b: f64 = b.1.iter().sum();
        total_b.total_cmp(&total_a)
    });
    pivot.rows.truncate(n);
    pivot
}

/// Date component of a date or datetime string: everything before the first
/// space or `T`.
pub fn date_part(raw: &str) -> Option<&str> {
    raw.trim()
        .split([' ', 'T'])
        .next()
        .filter(|date| !date.is_empty())
}

/// Per-day counts for the most recent `window` distinct dates, ascending,
/// one column per `outer` value, zero-filled. Records without a date are
/// skipped.
pub fn daily_buckets(
    records: &[RawRecord],
    outer: &str,
    date_field: &str,
    window: usize,
) -> Result<Pivot, DashboardError> {
    ensure_records(records)?;
    let mut grouping = Grouping::default();
    let mut dates = BTreeSet::new();
    let mut skipped = 0;
    for (index, record) in records.iter().enumerate() {
        let raw = record.text(date_field);
        let Some(date) = raw.as_deref().and_then(date_part) else {
            skip(index, date_field);
            skipped += 1;
            continue;
        };
        dates.insert(date.to_string());
        grouping.add(&key_or_unknown(record, outer), date);
    }
    if grouping.is_empty() {
        return Err(DashboardError::EmptyInput);
    }

    // ISO dates sort correctly as strings.
    let keep = dates.len().saturating_sub(window);
    let rows = dates.into_iter().skip(keep).collect();
    Ok(grouping.into_pivot(rows, skipped))
}

pub fn pending_bucket(days: f64) -> &'static str {
    if days > 7.0 {
        PENDING_BUCKETS[2]
    } else if days > 3.0 {
        PENDING_BUCKETS[1]
    } else {
        PENDING_BUCKETS[0]
    }
}

/// Buckets `value_field` into the fixed pending ranges, one column per
/// `outer` value. Rows are always the three buckets in fixed order.
pub fn pending_buckets(
    records: &[RawRecord],
    outer: &str,
    value_field: &str,
) -> Result<Pivot, DashboardError> {
    ensure_records(records)?;
    let mut grouping = Grouping::default();
    let mut skipped = 0;
    for (index, record) in records.iter().enumerate() {
        let Some(days) = record.number(value_field) else {
            skip(index, value_field);
            skipped += 1;
            continue;
        };
        grouping.add(&key_or_unknown(record, outer), pending_bucket(days));
    }
    if grouping.is_empty() {
        return Err(DashboardError::EmptyInput);
    }
    let rows = PENDING_BUCKETS.iter().map(|b| b.to_string()).collect();
    Ok(grouping.into_pivot(rows, skipped))
}

#[cfg(test)]
#[path = "tests/transforms_tests.rs"]
mod tests;
