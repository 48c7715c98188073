#![cfg(feature = "web")]

mod common;

use common::backend::{self, BROKEN_XML};
use ecfr_dashboard::client::{
    ANALYZE_FALLBACK, AnalysisClient, MetricsClient, SAMPLE_FALLBACK, error_detail,
};
use ecfr_dashboard::error::DashboardError;
use ecfr_dashboard::query::MetricQuery;

fn query(agencies: &str) -> MetricQuery {
    MetricQuery::parse("Lexical diversity", "Subpart", "2022-01-01", "2022-03-31", agencies)
        .unwrap()
}

#[tokio::test]
async fn analyze_returns_summary() {
    let base = backend::spawn(backend::router()).await;
    let client = AnalysisClient::new(reqwest::Client::new(), &format!("{}/", base));

    let summary = client
        .analyze("title-25.xml", b"<ECFR></ECFR>".to_vec())
        .await
        .unwrap();
    assert_eq!(summary.total_elements, 65432);
    assert_eq!(summary.element_distribution.entries()[0].0, "P");
}

#[tokio::test]
async fn analyze_surfaces_service_detail() {
    let base = backend::spawn(backend::router()).await;
    let client = AnalysisClient::new(reqwest::Client::new(), &base);

    let err = client
        .analyze("title-25.xml", format!("{} ...", BROKEN_XML).into_bytes())
        .await
        .unwrap_err();
    match &err {
        DashboardError::Upstream { status, detail } => {
            assert_eq!(*status, 400);
            assert_eq!(detail.as_deref(), Some("bad xml"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.user_message(ANALYZE_FALLBACK), "bad xml");
}

#[tokio::test]
async fn non_string_detail_falls_back() {
    let base = backend::spawn(backend::router()).await;
    let client = reqwest::Client::new();

    // No `file` field at all: the service answers 422 with a structured detail
    let response = client
        .post(format!("{}/api/analyze", base))
        .multipart(reqwest::multipart::Form::new().text("other", "x"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body = response.bytes().await.unwrap();
    assert_eq!(error_detail(&body), None);
}

#[tokio::test]
async fn sample_failure_uses_generic_message() {
    let base = backend::spawn(backend::failing_router()).await;
    let client = AnalysisClient::new(reqwest::Client::new(), &base);

    let err = client.sample_metrics().await.unwrap_err();
    assert!(matches!(err, DashboardError::Upstream { status: 500, detail: None }));
    assert_eq!(err.user_message(SAMPLE_FALLBACK), SAMPLE_FALLBACK);
}

#[tokio::test]
async fn unreachable_service_uses_generic_message() {
    let client = AnalysisClient::new(reqwest::Client::new(), &backend::closed_port());

    let err = client.sample_metrics().await.unwrap_err();
    assert!(matches!(err, DashboardError::Transport(_)));
    assert_eq!(err.user_message(SAMPLE_FALLBACK), SAMPLE_FALLBACK);
}

#[tokio::test]
async fn fetch_rows_sends_query_params() {
    let host = backend::spawn(backend::router()).await;
    let client = MetricsClient::new(reqwest::Client::new(), &host);

    let rows = client.fetch_rows(&query("BIA,NSF")).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].agency, "BIA");
    assert_eq!(rows[1].agency, "NSF");
    assert_eq!(rows[0].title_text(), "Lexical diversity");
    assert_eq!(rows[0].level_text(), "4");
    assert_eq!(rows[0].date, "2022-01-01");
    assert_eq!(rows[1].numeric_value(), 20.0);
}

#[tokio::test]
async fn failed_queries_read_as_no_rows() {
    let host = backend::spawn(backend::router()).await;
    let client = MetricsClient::new(reqwest::Client::new(), &host);

    assert!(client.fetch_rows(&query("OBJECT")).await.is_err());
    assert!(client.fetch_rows_or_empty(&query("OBJECT")).await.is_empty());
    assert!(client.fetch_rows_or_empty(&query("BROKEN")).await.is_empty());
    assert!(client.fetch_rows_or_empty(&query("NONE")).await.is_empty());

    let offline = MetricsClient::new(reqwest::Client::new(), &backend::closed_port());
    assert!(offline.fetch_rows_or_empty(&query("BIA")).await.is_empty());
}

#[test]
fn error_detail_reads_only_string_details() {
    assert_eq!(error_detail(br#"{"detail": "bad xml"}"#), Some("bad xml".to_string()));
    assert_eq!(error_detail(br#"{"detail": 3}"#), None);
    assert_eq!(error_detail(b"Internal Server Error"), None);
}
