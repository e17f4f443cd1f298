//! Crosswatch CLI
//!
//! One-shot analysis run: rank the top symbols by 24h volume, detect and
//! classify MA crossovers, print the dashboard, export CSV/JSON, and
//! persist the alert history. Set `SYMBOL` to analyze a single symbol
//! instead of the full ranked set.

use chrono::Utc;
use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crosswatch::config::{self, AnalysisConfig};
use crosswatch::db::FileHistoryStore;
use crosswatch::export;
use crosswatch::logging;
use crosswatch::pipeline::Pipeline;
use crosswatch::services::binance::BinanceMarketDataProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let environment = config::get_environment();
    info!("Starting Crosswatch analysis");
    info!(environment = %environment, "Environment");

    let config = AnalysisConfig::from_env()?;
    let provider = Arc::new(
        BinanceMarketDataProvider::new().with_interval(config.timeframe.clone()),
    );
    let pipeline = Pipeline::new(provider, config.clone());

    // Single-symbol mode: detailed analysis, no dedup, no exports.
    if let Ok(symbol) = env::var("SYMBOL") {
        let analysis = pipeline
            .analyze_single(&symbol)
            .await
            .map_err(|e| format!("analysis of {symbol} failed: {e}"))?;
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    // Symbol ranking is the one fatal step: without a symbol list there is
    // nothing to analyze.
    let symbols = pipeline
        .ranked_symbols()
        .await
        .map_err(|e| format!("failed to fetch ranked symbols: {e}"))?;
    if symbols.is_empty() {
        return Err("symbol ranking returned no symbols".into());
    }

    let store = FileHistoryStore::new(config::get_history_path());
    let mut history = store.load();

    let started = Instant::now();
    let report = pipeline.run(&symbols, &mut history).await;
    info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        total_alerts = report.total_alerts,
        "analysis finished in {:.2}s",
        started.elapsed().as_secs_f64()
    );

    if let Err(e) = store.save(&history) {
        error!(error = %e, "failed to persist alert history");
    }

    print!("{}", export::console::render_dashboard(&report));

    let data_dir = config::get_data_dir();
    let date = Utc::now().format("%Y-%m-%d");
    export::write_alerts_csv(&report, &data_dir.join(format!("crossover_alerts_{date}.csv")))?;
    export::write_report_json(&report, &data_dir.join(format!("analysis_report_{date}.json")))?;
    info!(dir = %data_dir.display(), "exports written to {}", data_dir.display());

    Ok(())
}
