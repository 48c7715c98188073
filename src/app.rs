#![cfg(feature = "web")]
use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::client::{ANALYZE_FALLBACK, AnalysisClient, MetricsClient, SAMPLE_FALLBACK};
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::export::to_csv;
use crate::graph::{ChartKind, render_chart};
use crate::pages::Pages;
use crate::query::QueryForm;
use crate::stacked::StackedChart;
use crate::state::{LoadedSummary, QueryPanel, ResultTab, UploadPanel};
use crate::summary::SummaryView;

pub const SAMPLE_LABEL: &str = "Sample Data";

pub struct AppState {
    config: DashboardConfig,
    analysis: AnalysisClient,
    metrics: MetricsClient,
    pages: Pages,
    upload: Mutex<UploadPanel>,
    query: Mutex<QueryPanel>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(AppState {
            analysis: AnalysisClient::new(http.clone(), &config.api_url),
            metrics: MetricsClient::new(http, &config.query_host),
            pages: Pages::new()?,
            upload: Mutex::new(UploadPanel::default()),
            query: Mutex::new(QueryPanel::default()),
            config,
        })
    }
}

// Panel state stays usable even if a handler panicked while holding the lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// Unknown tab names are ignored rather than rejected.
#[derive(Deserialize)]
struct ViewQuery {
    tab: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_landing))
        .route("/health", get(health))
        .route("/upload", get(serve_upload).post(upload_file))
        .route("/upload/sample", post(load_sample))
        .route("/upload/charts/:chart", get(summary_chart))
        .route("/metrics", get(serve_metrics).post(submit_query))
        .route("/metrics/sort", post(toggle_sort))
        .route("/metrics/chart.svg", get(stacked_chart))
        .route("/metrics/export.csv", get(export_rows))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}

pub async fn run(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = config.bind_addr.clone();
    info!(
        "analysis service: {}, query service: {}",
        config.api_url, config.query_host
    );
    let app = router(Arc::new(AppState::new(config)?));

    // Start server
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_landing(State(state): State<Arc<AppState>>) -> Result<Html<String>, DashboardError> {
    Ok(Html(state.pages.index()?))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "ECFR Metrics Dashboard is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn serve_upload(State(state): State<Arc<AppState>>) -> Result<Html<String>, DashboardError> {
    let panel = lock(&state.upload);
    Ok(Html(state.pages.upload(&panel)?))
}

async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, DashboardError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return reject_upload(&state, e),
        };

        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let contents = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return reject_upload(&state, e),
        };
        if !file_name.is_empty() && !contents.is_empty() {
            upload = Some((file_name, contents));
        }
    }

    // Nothing selected: nothing to send, nothing changes
    let Some((file_name, contents)) = upload else {
        let panel = lock(&state.upload);
        return Ok(Html(state.pages.upload(&panel)?));
    };

    let ticket = lock(&state.upload).begin();
    let outcome = state
        .analysis
        .analyze(&file_name, contents)
        .await
        .map(|summary| LoadedSummary {
            label: file_name.clone(),
            summary,
        })
        .map_err(|e| {
            error!("Error uploading file {}: {}", file_name, e);
            e.user_message(ANALYZE_FALLBACK)
        });

    let mut panel = lock(&state.upload);
    panel.complete(ticket, outcome);
    Ok(Html(state.pages.upload(&panel)?))
}

// The request body itself could not be read, e.g. it exceeded the upload limit.
fn reject_upload(state: &AppState, e: MultipartError) -> Result<Html<String>, DashboardError> {
    error!("Error reading upload: {}", e);
    let mut panel = lock(&state.upload);
    let ticket = panel.begin();
    panel.complete(ticket, Err(format!("Upload rejected: {}", e.body_text())));
    Ok(Html(state.pages.upload(&panel)?))
}

async fn load_sample(State(state): State<Arc<AppState>>) -> Result<Html<String>, DashboardError> {
    let ticket = lock(&state.upload).begin();
    let outcome = state
        .analysis
        .sample_metrics()
        .await
        .map(|summary| LoadedSummary {
            label: SAMPLE_LABEL.to_string(),
            summary,
        })
        .map_err(|e| {
            error!("Error loading sample data: {}", e);
            e.user_message(SAMPLE_FALLBACK)
        });

    let mut panel = lock(&state.upload);
    panel.complete(ticket, outcome);
    Ok(Html(state.pages.upload(&panel)?))
}

async fn summary_chart(
    Path(chart): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, DashboardError> {
    let Ok(kind) = chart.parse::<ChartKind>() else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let summary = lock(&state.upload)
        .state()
        .data()
        .map(|loaded| loaded.summary.clone());
    let Some(summary) = summary else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    match render_chart(&SummaryView::from_summary(&summary), kind)? {
        Some(svg) => Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

async fn serve_metrics(
    Query(view): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, DashboardError> {
    let mut panel = lock(&state.query);
    if let Some(tab) = view.tab.as_deref().and_then(ResultTab::from_name) {
        panel.tab = tab;
    }
    Ok(Html(state.pages.metrics(&panel)?))
}

async fn submit_query(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QueryForm>,
) -> Result<Html<String>, DashboardError> {
    let query = match form.to_query() {
        Ok(query) => query,
        Err(e) => {
            let mut panel = lock(&state.query);
            panel.reject_form(form, e.to_string());
            return Ok(Html(state.pages.metrics(&panel)?));
        }
    };

    let ticket = lock(&state.query).begin_fetch(form);
    let rows = state.metrics.fetch_rows_or_empty(&query).await;

    let mut panel = lock(&state.query);
    panel.complete_fetch(ticket, rows);
    Ok(Html(state.pages.metrics(&panel)?))
}

async fn toggle_sort(State(state): State<Arc<AppState>>) -> Redirect {
    lock(&state.query).toggle_sort();
    Redirect::to("/metrics")
}

async fn stacked_chart(State(state): State<Arc<AppState>>) -> Response {
    let panel = lock(&state.query);
    match panel.rows() {
        Some(rows) if !rows.is_empty() => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            StackedChart::from_rows(rows).to_svg_document(),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn export_rows(State(state): State<Arc<AppState>>) -> Response {
    let panel = lock(&state.query);
    match panel.rows() {
        Some(rows) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"ecfr-metrics.csv\"",
                ),
            ],
            to_csv(rows, panel.sort),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
