use thiserror::Error;

/// Failures surfaced while fetching or aggregating report data.
///
/// None of these reach the presentation layer: network and batch failures
/// are replaced by defaults, malformed records are skipped and empty input
/// becomes an explicit no-data result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("request to {endpoint} failed: {message}")]
    Network { endpoint: String, message: String },
    #[error("{failed} of {total} dashboard requests failed")]
    PartialBatchFailure { failed: usize, total: usize },
    #[error("record {index} has no usable `{field}` value")]
    MalformedRecord { index: usize, field: String },
    #[error("no records to aggregate")]
    EmptyInput,
}

impl DashboardError {
    pub fn network(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed(index: usize, field: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            field: field.into(),
        }
    }
}

/// Rejected filter transitions. The previous filter state is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },
    #[error("invalid month `{0}`, expected YYYY-MM")]
    InvalidMonth(String),
    #[error("unknown filter kind `{0}`")]
    UnknownKind(String),
}
