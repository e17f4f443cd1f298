use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV candle. Series are ordered by ascending timestamp with no
/// duplicate timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// A symbol selected by the ranking source, ordered by descending 24h quote
/// volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedSymbol {
    pub symbol: String,
    pub quote_volume: f64,
    pub price_change_pct: f64,
}
