use serde::Serialize;

use crate::{
    palette::Palette,
    transforms::{Pivot, Tally},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

/// One plotted series of a table chart. `key` is the grouping identity,
/// `label` is what the axis legend shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub color: &'static str,
}

/// A table row; `values[i]` belongs to `columns[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub key: String,
    pub values: Vec<f64>,
}

impl Row {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Series {
    Categorical { points: Vec<Point> },
    Table { columns: Vec<Column>, rows: Vec<Row> },
}

impl Series {
    pub fn categorical(tally: Tally, palette: Palette, label: fn(&str) -> String) -> Self {
        let points = tally
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, (key, value))| Point {
                label: label(&key),
                key,
                value,
                color: palette.color(index),
            })
            .collect();
        Series::Categorical { points }
    }

    pub fn table(pivot: Pivot, palette: Palette, label: fn(&str) -> String) -> Self {
        let columns = pivot
            .columns
            .into_iter()
            .enumerate()
            .map(|(index, key)| Column {
                label: label(&key),
                key,
                color: palette.color(index),
            })
            .collect();
        let rows = pivot
            .rows
            .into_iter()
            .map(|(key, values)| Row { key, values })
            .collect();
        Series::Table { columns, rows }
    }

    /// Number of plotted elements: points, or rows of a table.
    pub fn len(&self) -> usize {
        match self {
            Series::Categorical { points } => points.len(),
            Series::Table { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> &[Point] {
        match self {
            Series::Categorical { points } => points,
            Series::Table { .. } => &[],
        }
    }

    pub fn columns(&self) -> &[Column] {
        match self {
            Series::Table { columns, .. } => columns,
            Series::Categorical { .. } => &[],
        }
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            Series::Table { rows, .. } => rows,
            Series::Categorical { .. } => &[],
        }
    }

    /// Categorical value by point key.
    pub fn point(&self, key: &str) -> Option<f64> {
        self.points()
            .iter()
            .find(|point| point.key == key)
            .map(|point| point.value)
    }

    /// Table cell by row key and column key.
    pub fn cell(&self, row: &str, column: &str) -> Option<f64> {
        let index = self.columns().iter().position(|c| c.key == column)?;
        self.rows()
            .iter()
            .find(|r| r.key == row)
            .and_then(|r| r.values.get(index).copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSet {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub series: Series,
}

/// Outcome of one chart's aggregation. `Empty` is distinct from a series
/// whose categories all counted zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ChartResult {
    Empty,
    Data(SeriesSet),
}

impl ChartResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, ChartResult::Empty)
    }

    pub fn data(&self) -> Option<&SeriesSet> {
        match self {
            ChartResult::Data(set) => Some(set),
            ChartResult::Empty => None,
        }
    }

    pub fn series(&self) -> Option<&Series> {
        self.data().map(|set| &set.series)
    }
}
