//! Crosswatch API Server
//!
//! Serves the latest run report over HTTP. A run can be triggered with
//! `POST /api/run`; setting `EVAL_INTERVAL_SECONDS` also refreshes the
//! report on a fixed interval.

use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use crosswatch::config::{self, AnalysisConfig};
use crosswatch::core::http::{run_analysis, start_server, AppState};
use crosswatch::db::FileHistoryStore;
use crosswatch::logging;
use crosswatch::metrics::Metrics;
use crosswatch::pipeline::Pipeline;
use crosswatch::services::binance::BinanceMarketDataProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let eval_interval: u64 = env::var("EVAL_INTERVAL_SECONDS")
        .ok()
        .and_then(|i| i.parse().ok())
        .unwrap_or(0);

    let environment = config::get_environment();
    info!("Starting Crosswatch API Server");
    info!(environment = %environment, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let config = AnalysisConfig::from_env()?;
    let metrics = Arc::new(Metrics::new()?);
    let provider = Arc::new(
        BinanceMarketDataProvider::new().with_interval(config.timeframe.clone()),
    );
    let pipeline = Arc::new(Pipeline::new(provider, config));
    let history_store = Arc::new(FileHistoryStore::new(config::get_history_path()));

    let state = AppState::new(metrics, Some(pipeline), Some(history_store));

    // Periodic refresh keeps the dashboard current without manual triggers.
    if eval_interval > 0 {
        info!(
            interval = eval_interval,
            "report refresh: every {} seconds", eval_interval
        );
        let refresh_state = state.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(tokio::time::Duration::from_secs(eval_interval));
            loop {
                ticker.tick().await;
                if let Err(e) = run_analysis(&refresh_state).await {
                    warn!(error = %e, "scheduled analysis run failed");
                }
            }
        });
    } else {
        info!("no EVAL_INTERVAL_SECONDS set; runs are triggered via POST /api/run");
    }

    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, server_state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
