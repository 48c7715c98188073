//! In-process stand-in for the analysis and metric query services.

use axum::{
    Json, Router,
    extract::{Multipart, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::SUMMARY_JSON;

/// Uploads starting with this are rejected with `{"detail": "bad xml"}`.
pub const BROKEN_XML: &str = "<broken";

async fn analyze(mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let contents = field.bytes().await.unwrap_or_default();
        if !file_name.ends_with(".xml") || contents.starts_with(BROKEN_XML.as_bytes()) {
            return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "bad xml" }))).into_response();
        }
        return ([(header::CONTENT_TYPE, "application/json")], SUMMARY_JSON).into_response();
    }
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": [{ "msg": "field required" }] })),
    )
        .into_response()
}

async fn sample_metrics() -> Response {
    ([(header::CONTENT_TYPE, "application/json")], SUMMARY_JSON).into_response()
}

/// One row per requested agency. Title echoes the metric, Level echoes the
/// level index and Date echoes the start date. Special agency names trigger
/// failure modes.
async fn metric_json(Query(params): Query<HashMap<String, String>>) -> Response {
    let agencies = params.get("agencies").cloned().unwrap_or_default();
    match agencies.as_str() {
        "BROKEN" => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "OBJECT" => return Json(json!({ "error": "not a list" })).into_response(),
        "NONE" => return Json(json!([])).into_response(),
        _ => {}
    }

    let rows: Vec<Value> = agencies
        .split(',')
        .enumerate()
        .map(|(i, agency)| {
            json!({
                "agency_slug": agency,
                "Title": params.get("metric_name"),
                "Level_Name": "Chapter",
                "Level": params.get("level"),
                "Date": params.get("start_dt"),
                "Value": (i + 1) * 10,
            })
        })
        .collect();
    Json(rows).into_response()
}

pub fn router() -> Router {
    counting_router().0
}

/// Same backend, plus the number of `/api/analyze` calls it has received.
pub fn counting_router() -> (Router, Arc<AtomicUsize>) {
    let analyze_calls = Arc::new(AtomicUsize::new(0));
    let counter = analyze_calls.clone();
    let router = Router::new()
        .route(
            "/api/analyze",
            post(move |multipart: Multipart| {
                counter.fetch_add(1, Ordering::SeqCst);
                analyze(multipart)
            }),
        )
        .route("/api/sample-metrics", get(sample_metrics))
        .route("/metric_json", get(metric_json));
    (router, analyze_calls)
}

/// A backend that fails every request with a plain-text 500.
pub fn failing_router() -> Router {
    Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") })
}

pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Address nothing is listening on.
pub fn closed_port() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
