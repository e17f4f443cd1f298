//! Test harness for the API server: an axum-test server over AppState.

use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use crosswatch::config::AnalysisConfig;
use crosswatch::core::http::{create_router, AppState};
use crosswatch::db::FileHistoryStore;
use crosswatch::metrics::Metrics;
use crosswatch::models::report::RunReport;
use crosswatch::models::signal::{
    ClassifiedAlert, CrossoverEvent, CrossoverPair, EventType, Importance, MaKind, Strength,
};
use crosswatch::pipeline::Pipeline;

use super::shared::{golden_cross_series, StaticMarketDataProvider};

pub struct TestApiServer {
    pub server: TestServer,
    pub state: AppState,
    // Keeps the history directory alive for the server's lifetime.
    _history_dir: Option<TempDir>,
}

impl TestApiServer {
    /// Report-only server: no provider, no history store.
    pub async fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics registry"));
        let state = AppState::new(metrics, None, None);
        let server = TestServer::new(create_router(state.clone())).expect("test server");
        Self {
            server,
            state,
            _history_dir: None,
        }
    }

    /// Server wired to an in-memory provider so runs can be triggered.
    pub async fn with_pipeline() -> Self {
        let provider = Arc::new(
            StaticMarketDataProvider::new().with_symbol("BTCUSDT", golden_cross_series()),
        );
        let config = AnalysisConfig {
            ma_periods: vec![20, 200],
            crossover_pairs: vec![CrossoverPair::new(20, 200, MaKind::Sma)],
            ..AnalysisConfig::default()
        };
        let pipeline = Arc::new(Pipeline::new(provider, config));

        let history_dir = tempfile::tempdir().expect("history dir");
        let store = Arc::new(FileHistoryStore::new(
            history_dir.path().join("alert_history.json"),
        ));

        let metrics = Arc::new(Metrics::new().expect("metrics registry"));
        let state = AppState::new(metrics, Some(pipeline), Some(store));
        let server = TestServer::new(create_router(state.clone())).expect("test server");
        Self {
            server,
            state,
            _history_dir: Some(history_dir),
        }
    }

    /// Publish a pre-built report, as a finished run would.
    pub async fn publish_report(&self, report: RunReport) {
        *self.state.report.write().await = Some(report);
    }
}

pub fn sample_alert(symbol: &str, importance: Importance, separation_pct: f64) -> ClassifiedAlert {
    ClassifiedAlert {
        event: CrossoverEvent {
            symbol: symbol.to_string(),
            pair: CrossoverPair::new(50, 200, MaKind::Sma),
            event_type: EventType::GoldenCross,
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            fast_value: 106.0,
            slow_value: 100.0,
            current_price: 107.0,
            separation_pct,
        },
        importance,
        strength: Strength::Strong,
    }
}

pub fn sample_report() -> RunReport {
    RunReport::build(
        3,
        vec![
            sample_alert("BTCUSDT", Importance::High, 6.0),
            sample_alert("ETHUSDT", Importance::Medium, 3.0),
        ],
        Vec::new(),
        0,
    )
}
