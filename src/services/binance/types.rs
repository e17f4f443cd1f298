//! Wire types for the Binance public REST API.

use serde::Deserialize;

/// One entry of `/api/v3/ticker/24hr`. Numeric fields arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker24h {
    pub symbol: String,
    #[serde(rename = "quoteVolume")]
    pub quote_volume: String,
    #[serde(rename = "priceChangePercent")]
    pub price_change_percent: String,
}

/// One `/api/v3/klines` row:
/// `[open_time, open, high, low, close, volume, close_time,
///   quote_volume, trades, taker_base, taker_quote, ignore]`.
pub type RawKline = (
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    u64,
    String,
    String,
    String,
);
