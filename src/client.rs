#![cfg(feature = "web")]
//! HTTP clients for the two backend services the dashboard reads from.

use log::{info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;

use crate::error::DashboardError;
use crate::model::{ObservationRow, StructuralSummary};
use crate::query::MetricQuery;

pub const ANALYZE_FALLBACK: &str = "Failed to analyze file. Please try again.";
pub const SAMPLE_FALLBACK: &str =
    "Failed to load sample data. Please ensure the backend is running.";

/// Client for the XML analysis service (`/api/analyze`, `/api/sample-metrics`).
#[derive(Clone, Debug)]
pub struct AnalysisClient {
    http: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Uploads one XML document as the multipart field `file`.
    ///
    /// # Errors
    /// * `DashboardError::Upstream` when the service rejects the file; its
    ///   `detail` carries the service's explanation if it gave one
    /// * `DashboardError::Transport` / `DashboardError::Decode` for network or
    ///   payload failures
    pub async fn analyze(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<StructuralSummary, DashboardError> {
        let url = format!("{}/api/analyze", self.base_url);
        info!("uploading {} ({} bytes) to {}", file_name, contents.len(), url);

        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("application/xml")?;
        let form = Form::new().part("file", part);

        let response = self.http.post(&url).multipart(form).send().await?;
        read_json(response).await
    }

    pub async fn sample_metrics(&self) -> Result<StructuralSummary, DashboardError> {
        let url = format!("{}/api/sample-metrics", self.base_url);
        info!("loading sample metrics from {}", url);
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }
}

/// Client for the metric query service (`/metric_json`).
#[derive(Clone, Debug)]
pub struct MetricsClient {
    http: Client,
    host: String,
}

impl MetricsClient {
    pub fn new(http: Client, host: &str) -> Self {
        Self {
            http,
            host: host.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_rows(
        &self,
        query: &MetricQuery,
    ) -> Result<Vec<ObservationRow>, DashboardError> {
        let url = format!("{}/metric_json", self.host);
        info!("querying {}?{}", url, query.query_string());
        let response = self.http.get(&url).query(&query.params()).send().await?;
        read_json(response).await
    }

    /// Like [`MetricsClient::fetch_rows`], but any failure is logged and
    /// reported as an empty result set.
    pub async fn fetch_rows_or_empty(&self, query: &MetricQuery) -> Vec<ObservationRow> {
        match self.fetch_rows(query).await {
            Ok(rows) => {
                info!("metric query returned {} rows", rows.len());
                rows
            }
            Err(e) => {
                warn!("metric query failed, showing no results: {}", e);
                Vec::new()
            }
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, DashboardError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(DashboardError::Upstream {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }
    Ok(serde_json::from_slice(&body)?)
}

/// The `detail` string of a JSON error body such as `{"detail": "bad xml"}`.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("detail")?.as_str().map(str::to_string)
}
