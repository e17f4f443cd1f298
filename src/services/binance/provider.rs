//! Binance REST market data provider.
//!
//! Uses only public endpoints: `/api/v3/ticker/24hr` for volume ranking and
//! `/api/v3/klines` for historical candles. Requests retry with exponential
//! backoff; rate limiting is the provider's concern, never the pipeline's.

use backon::{ExponentialBuilder, Retryable};
use chrono::DateTime;
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::market::{Candle, RankedSymbol};
use crate::services::binance::types::{RawKline, Ticker24h};
use crate::services::market_data::{MarketDataError, MarketDataProvider};

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
/// Hard cap imposed by the klines endpoint.
const MAX_KLINE_LIMIT: usize = 1000;

pub struct BinanceMarketDataProvider {
    client: reqwest::Client,
    base_url: String,
    interval: String,
    retry: ExponentialBuilder,
}

impl BinanceMarketDataProvider {
    pub fn new() -> Self {
        let base_url =
            env::var("BINANCE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            interval: "1d".to_string(),
            retry: ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(500))
                .with_max_times(3),
        }
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    /// Override the retry policy (tests use near-zero delays).
    pub fn with_retry(mut self, retry: ExponentialBuilder) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MarketDataError> {
        let fetch = || async {
            self.client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<T>()
                .await
        };

        fetch
            .retry(self.retry.clone())
            .notify(|err: &reqwest::Error, dur: Duration| {
                warn!(error = %err, backoff_ms = dur.as_millis() as u64, "retrying Binance request");
            })
            .await
            .map_err(MarketDataError::Http)
    }
}

impl Default for BinanceMarketDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for BinanceMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let limit = limit.min(MAX_KLINE_LIMIT);
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, self.interval, limit
        );

        let rows: Vec<RawKline> = self.fetch_json(&url).await?;
        if rows.is_empty() {
            return Err(MarketDataError::Unavailable {
                symbol: symbol.to_string(),
                reason: "empty kline response".to_string(),
            });
        }

        let mut candles = Vec::with_capacity(rows.len());
        for row in rows {
            let (open_time, open, high, low, close, volume, ..) = row;
            let timestamp = DateTime::from_timestamp_millis(open_time).ok_or_else(|| {
                MarketDataError::Decode(format!("invalid kline open time {open_time}"))
            })?;
            candles.push(Candle::new(
                parse_decimal("open", &open)?,
                parse_decimal("high", &high)?,
                parse_decimal("low", &low)?,
                parse_decimal("close", &close)?,
                parse_decimal("volume", &volume)?,
                timestamp,
            ));
        }
        candles.sort_by_key(|c| c.timestamp);

        debug!(
            symbol = %symbol,
            count = candles.len(),
            "fetched {} candles for {}",
            candles.len(),
            symbol
        );
        Ok(candles)
    }

    async fn get_ranked_symbols(
        &self,
        count: usize,
    ) -> Result<Vec<RankedSymbol>, MarketDataError> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);
        let tickers: Vec<Ticker24h> = self.fetch_json(&url).await?;

        // USDT pairs with a positive quote volume; unparseable rows are
        // dropped rather than failing the whole ranking.
        let mut ranked: Vec<RankedSymbol> = tickers
            .into_iter()
            .filter(|t| t.symbol.ends_with("USDT"))
            .filter_map(|t| {
                let quote_volume: f64 = t.quote_volume.parse().ok()?;
                if quote_volume <= 0.0 {
                    return None;
                }
                let price_change_pct = t.price_change_percent.parse().unwrap_or(0.0);
                Some(RankedSymbol {
                    symbol: t.symbol,
                    quote_volume,
                    price_change_pct,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.quote_volume
                .partial_cmp(&a.quote_volume)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(count);

        info!(
            count = ranked.len(),
            "selected top {} symbols by 24h quote volume",
            ranked.len()
        );
        Ok(ranked)
    }
}

fn parse_decimal(field: &str, value: &str) -> Result<f64, MarketDataError> {
    value
        .parse()
        .map_err(|_| MarketDataError::Decode(format!("invalid {field} value {value:?}")))
}
