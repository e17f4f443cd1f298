//! HTTP dashboard server using Axum
//!
//! Serves the latest run report as JSON. The server holds no market state of
//! its own: a report is published into [`AppState`] by the CLI-style run
//! helper, either on demand (`POST /api/run`) or by the periodic refresh
//! loop in the api-server binary.

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::db::FileHistoryStore;
use crate::metrics::Metrics;
use crate::models::report::{ReportSummary, RunReport, SymbolAnalysis};
use crate::models::signal::Importance;
use crate::pipeline::Pipeline;
use crate::services::market_data::MarketDataError;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub report: Arc<RwLock<Option<RunReport>>>,
    pub pipeline: Option<Arc<Pipeline>>,
    pub history_store: Option<Arc<FileHistoryStore>>,
    run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        metrics: Arc<Metrics>,
        pipeline: Option<Arc<Pipeline>>,
        history_store: Option<Arc<FileHistoryStore>>,
    ) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            report: Arc::new(RwLock::new(None)),
            pipeline,
            history_store,
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("no market data provider configured")]
    NotConfigured,

    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "crosswatch-signal-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Full latest report, 404 until the first run completes.
async fn get_report(State(state): State<AppState>) -> Result<Json<RunReport>, StatusCode> {
    let report = state.report.read().await;
    report.clone().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_summary(State(state): State<AppState>) -> Result<Json<ReportSummary>, StatusCode> {
    let report = state.report.read().await;
    report
        .as_ref()
        .map(|r| Json(r.summary()))
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
struct AlertsQuery {
    importance: Option<String>,
}

/// Alerts from the latest report, optionally filtered to one importance
/// tier.
async fn get_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertsQuery>,
) -> Result<Json<Value>, StatusCode> {
    let tier = match params.importance.as_deref() {
        None => None,
        Some(raw) => Some(parse_importance(raw).ok_or(StatusCode::BAD_REQUEST)?),
    };

    let report = state.report.read().await;
    let report = report.as_ref().ok_or(StatusCode::NOT_FOUND)?;
    let alerts: Vec<_> = report
        .alerts
        .iter()
        .filter(|a| tier.map_or(true, |t| a.importance == t))
        .collect();
    Ok(Json(json!(alerts)))
}

async fn get_symbol_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<SymbolAnalysis>, StatusCode> {
    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let analysis = pipeline
        .analyze_single(&symbol)
        .await
        .map_err(|e| match e {
            MarketDataError::Unavailable { .. } => StatusCode::NOT_FOUND,
            _ => {
                error!(error = %e, symbol = %symbol, "single-symbol analysis failed");
                StatusCode::BAD_GATEWAY
            }
        })?;
    Ok(Json(analysis))
}

async fn trigger_run(State(state): State<AppState>) -> Result<Json<ReportSummary>, StatusCode> {
    match run_analysis(&state).await {
        Ok(summary) => Ok(Json(summary)),
        Err(RunError::NotConfigured) => Err(StatusCode::SERVICE_UNAVAILABLE),
        Err(e) => {
            error!(error = %e, "analysis run failed");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

/// Execute one full analysis run and publish the report into state.
///
/// Runs are serialized: the history file is read-modify-written here, so
/// two concurrent triggers must not interleave.
pub async fn run_analysis(state: &AppState) -> Result<ReportSummary, RunError> {
    let pipeline = state.pipeline.as_ref().ok_or(RunError::NotConfigured)?;
    let store = state.history_store.as_ref().ok_or(RunError::NotConfigured)?;
    let _guard = state.run_lock.lock().await;

    let started = Instant::now();
    let symbols = pipeline.ranked_symbols().await?;
    let mut history = store.load();
    let report = pipeline.run(&symbols, &mut history).await;
    if let Err(e) = store.save(&history) {
        error!(error = %e, "failed to persist alert history after run");
    }
    state
        .metrics
        .observe_run(&report, started.elapsed().as_secs_f64(), history.len());

    let summary = report.summary();
    *state.report.write().await = Some(report);
    info!(
        total_alerts = summary.total_alerts,
        symbols_analyzed = summary.symbols_analyzed,
        "published run report: {} alerts over {} symbols",
        summary.total_alerts,
        summary.symbols_analyzed
    );
    Ok(summary)
}

fn parse_importance(raw: &str) -> Option<Importance> {
    match raw.to_ascii_uppercase().as_str() {
        "HIGH" => Some(Importance::High),
        "MEDIUM" => Some(Importance::Medium),
        "LOW" => Some(Importance::Low),
        _ => None,
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/report", get(get_report))
        .route("/api/summary", get(get_summary))
        .route("/api/alerts", get(get_alerts))
        .route("/api/analysis/{symbol}", get(get_symbol_analysis))
        .route("/api/run", post(trigger_run))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
