//! Market data provider interface consumed by the pipeline.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::market::{Candle, RankedSymbol};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("no data available for {symbol}: {reason}")]
    Unavailable { symbol: String, reason: String },

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait MarketDataProvider {
    /// Historical candles for a symbol, oldest first.
    async fn get_candles(&self, symbol: &str, limit: usize)
        -> Result<Vec<Candle>, MarketDataError>;

    /// Symbols ranked by descending 24h quote volume.
    async fn get_ranked_symbols(&self, count: usize)
        -> Result<Vec<RankedSymbol>, MarketDataError>;
}
