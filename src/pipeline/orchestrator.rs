//! Run orchestration: fan out per-symbol analysis, deduplicate, aggregate.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::indicators::trend;
use crate::models::market::Candle;
use crate::models::report::{RunReport, SkippedSymbol, SymbolAnalysis};
use crate::models::signal::ClassifiedAlert;
use crate::services::market_data::{MarketDataError, MarketDataProvider};
use crate::signals::{classifier, dedup::AlertHistory, detector};

pub struct Pipeline {
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    config: AnalysisConfig,
}

struct SymbolOutcome {
    symbol: String,
    alerts: Vec<ClassifiedAlert>,
    skips: Vec<SkippedSymbol>,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn MarketDataProvider + Send + Sync>, config: AnalysisConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full pipeline over `symbols`.
    ///
    /// Symbols are analyzed by concurrent tasks bounded by
    /// `max_concurrency`; per-symbol failures become skip entries and never
    /// abort the run. Candidate alerts are then deduplicated against
    /// `history` in a single sequential pass, and accepted alerts are
    /// recorded into it. The caller persists the history afterwards.
    pub async fn run(&self, symbols: &[String], history: &mut AlertHistory) -> RunReport {
        info!(
            symbol_count = symbols.len(),
            pair_count = self.config.crossover_pairs.len(),
            "starting run over {} symbols",
            symbols.len()
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for symbol in symbols {
            let provider = self.provider.clone();
            let config = self.config.clone();
            let semaphore = semaphore.clone();
            let symbol = symbol.clone();
            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return SymbolOutcome {
                            skips: vec![SkippedSymbol::new(&symbol, "concurrency limiter closed")],
                            symbol,
                            alerts: Vec::new(),
                        };
                    }
                };
                analyze_symbol_task(provider, config, symbol).await
            });
        }

        let mut outcomes = Vec::with_capacity(symbols.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!(error = %e, "symbol analysis task failed to join"),
            }
        }
        // Task completion order is nondeterministic; sort so dedup and the
        // report are stable across runs.
        outcomes.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let mut accepted = Vec::new();
        let mut skipped = Vec::new();
        let mut candidates = 0usize;
        let mut suppressed = 0usize;
        for outcome in outcomes {
            skipped.extend(outcome.skips);
            for alert in outcome.alerts {
                candidates += 1;
                let key = alert.key();
                if history.should_emit(&key, alert.event.timestamp, self.config.dedup_window()) {
                    history.record(&key, alert.event.timestamp);
                    accepted.push(alert);
                } else {
                    suppressed += 1;
                    debug!(key = %key, "suppressed duplicate alert for {}", key);
                }
            }
        }

        info!(
            candidates,
            accepted = accepted.len(),
            suppressed,
            skipped = skipped.len(),
            "run finished: {} candidates, {} accepted, {} suppressed",
            candidates,
            accepted.len(),
            suppressed
        );
        RunReport::build(symbols.len(), accepted, skipped, suppressed)
    }

    /// Ranked symbol names from the provider, using the configured count.
    pub async fn ranked_symbols(&self) -> Result<Vec<String>, MarketDataError> {
        let ranked = self
            .provider
            .get_ranked_symbols(self.config.top_symbols_count)
            .await?;
        Ok(ranked.into_iter().map(|s| s.symbol).collect())
    }

    /// On-demand analysis of one symbol: latest MA values plus any current
    /// crossovers, classified but not deduplicated.
    pub async fn analyze_single(&self, symbol: &str) -> Result<SymbolAnalysis, MarketDataError> {
        let candles = self
            .provider
            .get_candles(symbol, self.config.history_limit())
            .await?;
        let last = candles.last().ok_or_else(|| MarketDataError::Unavailable {
            symbol: symbol.to_string(),
            reason: "no candles returned".to_string(),
        })?;

        let (crossovers, _skips) = analyze_symbol(symbol, &candles, &self.config);
        Ok(SymbolAnalysis {
            symbol: symbol.to_string(),
            timestamp: last.timestamp,
            close_price: last.close,
            data_points: candles.len(),
            moving_averages: trend::latest_snapshots(&candles, &self.config.ma_periods),
            crossovers,
        })
    }
}

async fn analyze_symbol_task(
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    config: AnalysisConfig,
    symbol: String,
) -> SymbolOutcome {
    let candles = match provider.get_candles(&symbol, config.history_limit()).await {
        Ok(candles) if !candles.is_empty() => candles,
        Ok(_) => {
            return SymbolOutcome {
                skips: vec![SkippedSymbol::new(&symbol, "no candles returned")],
                symbol,
                alerts: Vec::new(),
            };
        }
        Err(e) => {
            debug!(symbol = %symbol, error = %e, "fetch failed for {}", symbol);
            return SymbolOutcome {
                skips: vec![SkippedSymbol::new(&symbol, format!("fetch failed: {e}"))],
                symbol,
                alerts: Vec::new(),
            };
        }
    };

    let (alerts, skips) = analyze_symbol(&symbol, &candles, &config);
    SymbolOutcome {
        symbol,
        alerts,
        skips,
    }
}

/// Pure per-symbol analysis: for each configured pair, compute both MA
/// series, detect a crossover, and classify it. Pair-level failures become
/// skip entries; the remaining pairs still run.
pub fn analyze_symbol(
    symbol: &str,
    candles: &[Candle],
    config: &AnalysisConfig,
) -> (Vec<ClassifiedAlert>, Vec<SkippedSymbol>) {
    let mut alerts = Vec::new();
    let mut skips = Vec::new();

    let current_price = match candles.last() {
        Some(candle) => candle.close,
        None => {
            skips.push(SkippedSymbol::new(symbol, "empty price series"));
            return (alerts, skips);
        }
    };

    for pair in &config.crossover_pairs {
        let fast = match trend::compute(candles, pair.fast_period, pair.kind) {
            Ok(series) => series,
            Err(e) => {
                skips.push(SkippedSymbol::new(symbol, format!("{}: {e}", pair.name())));
                continue;
            }
        };
        let slow = match trend::compute(candles, pair.slow_period, pair.kind) {
            Ok(series) => series,
            Err(e) => {
                skips.push(SkippedSymbol::new(symbol, format!("{}: {e}", pair.name())));
                continue;
            }
        };

        match detector::detect(symbol, pair, &fast, &slow, current_price) {
            Ok(Some(event)) => alerts.push(classifier::classify(event, config)),
            Ok(None) => {}
            Err(e) => skips.push(SkippedSymbol::new(symbol, format!("{}: {e}", pair.name()))),
        }
    }

    (alerts, skips)
}
