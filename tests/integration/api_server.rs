//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, the metrics middleware, and run triggering.

#[path = "test_utils.rs"]
mod shared;

#[path = "api_server/test_utils.rs"]
mod test_utils;

use serde_json::Value;

use crosswatch::models::signal::Importance;

use test_utils::{sample_report, TestApiServer};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "crosswatch-signal-engine");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected http_requests_total metric"
    );
    assert!(
        body.contains("http_request_duration_seconds"),
        "Expected http_request_duration_seconds metric"
    );
}

#[tokio::test]
async fn report_endpoints_return_404_before_first_run() {
    let app = TestApiServer::new().await;
    assert_eq!(app.server.get("/api/report").await.status_code(), 404);
    assert_eq!(app.server.get("/api/summary").await.status_code(), 404);
    assert_eq!(app.server.get("/api/alerts").await.status_code(), 404);
}

#[tokio::test]
async fn report_endpoint_serves_published_report() {
    let app = TestApiServer::new().await;
    app.publish_report(sample_report()).await;

    let response = app.server.get("/api/report").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_alerts"], 2);
    assert_eq!(body["golden_crosses"], 2);
    assert_eq!(body["alerts"][0]["symbol"], "BTCUSDT");
    assert_eq!(body["alerts"][0]["importance"], "HIGH");
}

#[tokio::test]
async fn summary_endpoint_serves_counts_only() {
    let app = TestApiServer::new().await;
    app.publish_report(sample_report()).await;

    let response = app.server.get("/api/summary").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_alerts"], 2);
    assert_eq!(body["high_importance"], 1);
    assert_eq!(body["unique_symbols"], 2);
    assert!(body.get("alerts").is_none());
}

#[tokio::test]
async fn alerts_endpoint_filters_by_importance() {
    let app = TestApiServer::new().await;
    app.publish_report(sample_report()).await;

    let all: Value = app.server.get("/api/alerts").await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let response = app
        .server
        .get("/api/alerts")
        .add_query_param("importance", "HIGH")
        .await;
    assert_eq!(response.status_code(), 200);
    let high: Value = response.json();
    assert_eq!(high.as_array().unwrap().len(), 1);
    assert_eq!(high[0]["symbol"], "BTCUSDT");

    // Lowercase is accepted too.
    let response = app
        .server
        .get("/api/alerts")
        .add_query_param("importance", "medium")
        .await;
    let medium: Value = response.json();
    assert_eq!(medium.as_array().unwrap().len(), 1);

    let response = app
        .server
        .get("/api/alerts")
        .add_query_param("importance", "bogus")
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn run_endpoint_requires_a_configured_pipeline() {
    let app = TestApiServer::new().await;
    let response = app.server.post("/api/run").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn run_endpoint_executes_and_publishes_a_report() {
    let app = TestApiServer::with_pipeline().await;

    let response = app.server.post("/api/run").await;
    assert_eq!(response.status_code(), 200);
    let summary: Value = response.json();
    assert_eq!(summary["total_alerts"], 1);
    assert_eq!(summary["high_importance"], 1);

    let report: Value = app.server.get("/api/report").await.json();
    assert_eq!(report["alerts"][0]["symbol"], "BTCUSDT");
    assert_eq!(report["alerts"][0]["event_type"], "GOLDEN_CROSS");

    // Re-running against the now-persisted history suppresses the alert.
    let second: Value = app.server.post("/api/run").await.json();
    assert_eq!(second["total_alerts"], 0);
    assert_eq!(second["duplicates_suppressed"], 1);
}

#[tokio::test]
async fn analysis_endpoint_requires_a_configured_pipeline() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/analysis/BTCUSDT").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn analysis_endpoint_serves_single_symbol_details() {
    let app = TestApiServer::with_pipeline().await;

    let response = app.server.get("/api/analysis/BTCUSDT").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["symbol"], "BTCUSDT");
    assert_eq!(body["data_points"], 201);
    assert_eq!(body["crossovers"].as_array().unwrap().len(), 1);

    let missing = app.server.get("/api/analysis/NOPEUSDT").await;
    assert_eq!(missing.status_code(), 404);
}

#[test]
fn importance_is_serialized_uppercase() {
    // Guards the wire format used by the importance filter.
    let json = serde_json::to_string(&Importance::High).unwrap();
    assert_eq!(json, "\"HIGH\"");
}
