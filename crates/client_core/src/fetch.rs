use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::FilterContext,
    error::DashboardError,
    protocol::{DashboardData, FilterOptions, RawRecord},
    reports::{ReportKind, DASHBOARD_SLUG},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::query::query_params;

pub const METRICS_ENDPOINT: &str = "/api/metrics";
pub const TOP_USERS_ENDPOINT: &str = "/api/top-users";
pub const ACTIVE_USERS_ENDPOINT: &str = "/api/active-users";
pub const STAFF_SPEAKING_ENDPOINT: &str = "/api/staff-speaking";
pub const TIMES_ENDPOINT: &str = "/api/times";
pub const CONSENTS_ENDPOINT: &str = "/api/consents";
pub const FILTER_OPTIONS_ENDPOINT: &str = "/api/filter-options";

/// The dashboard batch, in the order results are assembled.
pub const DASHBOARD_ENDPOINTS: [&str; 6] = [
    METRICS_ENDPOINT,
    TOP_USERS_ENDPOINT,
    ACTIVE_USERS_ENDPOINT,
    STAFF_SPEAKING_ENDPOINT,
    TIMES_ENDPOINT,
    CONSENTS_ENDPOINT,
];

/// Transport to the reporting API.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// GETs `path` with `query` and returns the decoded JSON body.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Value, DashboardError>;
}

pub struct MissingReportApi;

#[async_trait]
impl ReportApi for MissingReportApi {
    async fn get_json(
        &self,
        path: &str,
        _query: &[(&'static str, String)],
    ) -> Result<Value, DashboardError> {
        Err(DashboardError::network(
            path,
            "reporting API unavailable: no base URL configured",
        ))
    }
}

pub struct HttpReportApi {
    http: Client,
    base_url: Url,
}

impl HttpReportApi {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    pub fn from_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid reporting API base URL `{base_url}`"))?;
        Self::new(base_url, timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl ReportApi for HttpReportApi {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Value, DashboardError> {
        let response = self
            .http
            .get(self.endpoint_url(path))
            .query(query)
            .send()
            .await
            .map_err(|err| DashboardError::network(path, err))?
            .error_for_status()
            .map_err(|err| DashboardError::network(path, err))?;
        response
            .json()
            .await
            .map_err(|err| DashboardError::network(path, err))
    }
}

/// Data behind one section, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedData {
    Dashboard(DashboardData),
    /// `kind` is `None` for a slug with no entry in the report table; such
    /// requests are never sent and carry no records.
    Records {
        kind: Option<ReportKind>,
        records: Vec<RawRecord>,
    },
}

/// Issues the requests a section needs. Failures never propagate: every
/// method logs and falls back to empty data.
#[derive(Clone)]
pub struct FetchOrchestrator {
    api: Arc<dyn ReportApi>,
}

impl FetchOrchestrator {
    pub fn new(api: Arc<dyn ReportApi>) -> Self {
        Self { api }
    }

    pub async fn fetch(&self, report: &str, filters: &FilterContext) -> FetchedData {
        if report == DASHBOARD_SLUG {
            return FetchedData::Dashboard(self.fetch_dashboard(filters).await);
        }
        let Some(kind) = ReportKind::from_slug(report) else {
            warn!(report, "unrecognized report; nothing to fetch");
            return FetchedData::Records {
                kind: None,
                records: Vec::new(),
            };
        };
        FetchedData::Records {
            kind: Some(kind),
            records: self.fetch_report(kind, filters).await,
        }
    }

    /// Fetches the six dashboard outputs concurrently. The batch is
    /// all-or-nothing: one failed request commits the defaults for all six.
    pub async fn fetch_dashboard(&self, filters: &FilterContext) -> DashboardData {
        let query = query_params(filters);
        let responses = join_all(
            DASHBOARD_ENDPOINTS
                .into_iter()
                .map(|endpoint| self.api.get_json(endpoint, &query)),
        )
        .await;

        match assemble_dashboard(responses) {
            Ok(data) => {
                info!(metrics = data.metrics.len(), "dashboard data loaded");
                data
            }
            Err(err) => {
                warn!(error = %err, "dashboard batch discarded; using defaults");
                DashboardData::default()
            }
        }
    }

    pub async fn fetch_report(&self, kind: ReportKind, filters: &FilterContext) -> Vec<RawRecord> {
        let endpoint = kind.endpoint();
        let body = match self.api.get_json(endpoint, &query_params(filters)).await {
            Ok(body) => body,
            Err(err) => {
                warn!(report = kind.slug(), error = %err, "report request failed");
                return Vec::new();
            }
        };
        let items = match body {
            Value::Array(items) => items,
            Value::Null => {
                debug!(report = kind.slug(), "report returned no body");
                return Vec::new();
            }
            other => {
                let err = DashboardError::network(
                    endpoint,
                    format!("expected an array, got {}", json_kind(&other)),
                );
                warn!(report = kind.slug(), error = %err, "report response discarded");
                return Vec::new();
            }
        };

        let records: Vec<RawRecord> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match RawRecord::try_from(item) {
                Ok(record) => Some(record),
                Err(_) => {
                    warn!(
                        report = kind.slug(),
                        error = %DashboardError::malformed(index, "record"),
                        "dropping non-object record"
                    );
                    None
                }
            })
            .collect();
        info!(report = kind.slug(), records = records.len(), "report data loaded");
        records
    }

    pub async fn fetch_filter_options(&self) -> FilterOptions {
        let result = self
            .api
            .get_json(FILTER_OPTIONS_ENDPOINT, &[])
            .await
            .and_then(|body| decode(FILTER_OPTIONS_ENDPOINT, body));
        match result {
            Ok(options) => options,
            Err(err) => {
                warn!(error = %err, "filter options unavailable");
                FilterOptions::default()
            }
        }
    }
}

fn assemble_dashboard(
    responses: Vec<Result<Value, DashboardError>>,
) -> Result<DashboardData, DashboardError> {
    let total = responses.len();
    let mut failed = 0;
    let mut bodies = Vec::with_capacity(total);
    for (endpoint, response) in DASHBOARD_ENDPOINTS.into_iter().zip(responses) {
        match response {
            Ok(body) => bodies.push(body),
            Err(err) => {
                warn!(endpoint, error = %err, "dashboard request failed");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(DashboardError::PartialBatchFailure { failed, total });
    }

    let Ok([metrics, top_users, active_users, staff_speaking, times, consents]) =
        <[Value; 6]>::try_from(bodies)
    else {
        return Err(DashboardError::PartialBatchFailure { failed: total, total });
    };
    decode_dashboard(metrics, top_users, active_users, staff_speaking, times, consents).map_err(
        |err| {
            warn!(error = %err, "dashboard payload rejected");
            DashboardError::PartialBatchFailure { failed: 1, total }
        },
    )
}

fn decode_dashboard(
    metrics: Value,
    top_users: Value,
    active_users: Value,
    staff_speaking: Value,
    times: Value,
    consents: Value,
) -> Result<DashboardData, DashboardError> {
    Ok(DashboardData {
        metrics: decode(METRICS_ENDPOINT, metrics)?,
        top_users: decode(TOP_USERS_ENDPOINT, top_users)?,
        active_users: decode(ACTIVE_USERS_ENDPOINT, active_users)?,
        staff_speaking: decode(STAFF_SPEAKING_ENDPOINT, staff_speaking)?,
        times: decode(TIMES_ENDPOINT, times)?,
        consents: decode(CONSENTS_ENDPOINT, consents)?,
    })
}

/// A `null` body decodes to the output's default.
fn decode<T: DeserializeOwned + Default>(endpoint: &str, body: Value) -> Result<T, DashboardError> {
    if body.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(body)
        .map_err(|err| DashboardError::network(endpoint, format!("invalid payload: {err}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
