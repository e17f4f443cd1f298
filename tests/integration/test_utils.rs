//! Shared fixtures: an in-memory market data provider and candle builders.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;

use crosswatch::models::market::{Candle, RankedSymbol};
use crosswatch::services::market_data::{MarketDataError, MarketDataProvider};

pub fn start_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn daily_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Candle::new(
                close,
                close + 0.5,
                close - 0.5,
                close,
                1000.0,
                start_date() + Duration::days(i as i64),
            )
        })
        .collect()
}

/// 201 daily closes: 200 days of gentle decline keep SMA(20) under
/// SMA(200), then a final jump flips the order with a separation beyond
/// the high threshold.
pub fn golden_cross_series() -> Vec<Candle> {
    golden_cross_series_with_jump(400.0)
}

pub fn golden_cross_series_with_jump(final_close: f64) -> Vec<Candle> {
    let mut closes: Vec<f64> = (0..200).map(|i| 110.0 - 0.05 * i as f64).collect();
    closes.push(final_close);
    daily_candles(&closes)
}

/// In-memory provider serving pre-seeded candle series. Symbols registered
/// as failing return `Unavailable`, mimicking a fetch outage.
#[derive(Default)]
pub struct StaticMarketDataProvider {
    candles: HashMap<String, Vec<Candle>>,
    failing: Vec<String>,
}

impl StaticMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.candles.insert(symbol.to_string(), candles);
        self
    }

    pub fn with_failing(mut self, symbol: &str) -> Self {
        self.failing.push(symbol.to_string());
        self
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        if self.failing.iter().any(|s| s == symbol) {
            return Err(MarketDataError::Unavailable {
                symbol: symbol.to_string(),
                reason: "simulated outage".to_string(),
            });
        }
        let candles = self
            .candles
            .get(symbol)
            .ok_or_else(|| MarketDataError::Unavailable {
                symbol: symbol.to_string(),
                reason: "unknown symbol".to_string(),
            })?;
        let skip = candles.len().saturating_sub(limit);
        Ok(candles[skip..].to_vec())
    }

    async fn get_ranked_symbols(
        &self,
        count: usize,
    ) -> Result<Vec<RankedSymbol>, MarketDataError> {
        let mut symbols: Vec<String> = self
            .candles
            .keys()
            .cloned()
            .chain(self.failing.iter().cloned())
            .collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(i, symbol)| RankedSymbol {
                symbol,
                quote_volume: 1_000_000.0 - i as f64,
                price_change_pct: 0.0,
            })
            .collect())
    }
}
