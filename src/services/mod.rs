//! External collaborators: market data sources.

pub mod binance;
pub mod market_data;

pub use market_data::{MarketDataError, MarketDataProvider};
