//! Typed analysis configuration with environment overrides.
//!
//! Defaults match the product conventions: 20/50/200 periods, the classic
//! SMA 20/50, SMA 50/200 and EMA 20/50 crossover pairs, and 5%/2%
//! separation thresholds. Every knob is overridable through the
//! environment; nothing is hardcoded in the pipeline logic.

use chrono::Duration;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::signal::{CrossoverPair, MaKind};

/// Deployment environment, used to pick the log format.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Directory for exports and the alert history file.
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

pub fn get_history_path() -> PathBuf {
    get_data_dir().join("alert_history.json")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("crossover pair {0}: fast_period must be positive and less than slow_period")]
    InvalidPair(String),

    #[error("crossover pair {0} uses a period missing from ma_periods")]
    UnknownPeriod(String),

    #[error("ma_periods must be non-empty and positive")]
    InvalidPeriods,

    #[error("separation thresholds must satisfy 0 <= medium <= high")]
    InvalidThresholds,

    #[error("dedup window must not be negative")]
    InvalidDedupWindow,
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Periods computed by the MA engine for snapshots and pair validation.
    pub ma_periods: Vec<u32>,
    pub crossover_pairs: Vec<CrossoverPair>,
    /// Slow periods at or above this count as long-horizon pairs.
    pub long_horizon_threshold: u32,
    pub high_separation_pct: f64,
    pub medium_separation_pct: f64,
    /// Minimum re-alert interval per identity key. Defaults to one daily
    /// candle.
    pub dedup_window_secs: i64,
    pub top_symbols_count: usize,
    pub historical_days: usize,
    pub timeframe: String,
    pub max_concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ma_periods: vec![20, 50, 200],
            crossover_pairs: vec![
                CrossoverPair::new(20, 50, MaKind::Sma),
                CrossoverPair::new(50, 200, MaKind::Sma),
                CrossoverPair::new(20, 50, MaKind::Ema),
            ],
            long_horizon_threshold: 200,
            high_separation_pct: 5.0,
            medium_separation_pct: 2.0,
            dedup_window_secs: 86_400,
            top_symbols_count: 100,
            historical_days: 365,
            timeframe: "1d".to_string(),
            max_concurrency: 8,
        }
    }
}

impl AnalysisConfig {
    /// Defaults overridden by environment variables, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(count) = parse_env("TOP_SYMBOLS_COUNT") {
            config.top_symbols_count = count;
        }
        if let Some(days) = parse_env("HISTORICAL_DAYS") {
            config.historical_days = days;
        }
        if let Some(threshold) = parse_env("LONG_HORIZON_THRESHOLD") {
            config.long_horizon_threshold = threshold;
        }
        if let Some(pct) = parse_env("HIGH_SEPARATION_PCT") {
            config.high_separation_pct = pct;
        }
        if let Some(pct) = parse_env("MEDIUM_SEPARATION_PCT") {
            config.medium_separation_pct = pct;
        }
        if let Some(secs) = parse_env("DEDUP_WINDOW_SECS") {
            config.dedup_window_secs = secs;
        }
        if let Some(limit) = parse_env("MAX_CONCURRENCY") {
            config.max_concurrency = limit;
        }
        if let Ok(timeframe) = env::var("TIMEFRAME") {
            if !timeframe.is_empty() {
                config.timeframe = timeframe;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ma_periods.is_empty() || self.ma_periods.iter().any(|&p| p == 0) {
            return Err(ConfigError::InvalidPeriods);
        }
        for pair in &self.crossover_pairs {
            if pair.fast_period == 0 || pair.fast_period >= pair.slow_period {
                return Err(ConfigError::InvalidPair(pair.name()));
            }
            if !self.ma_periods.contains(&pair.fast_period)
                || !self.ma_periods.contains(&pair.slow_period)
            {
                return Err(ConfigError::UnknownPeriod(pair.name()));
            }
        }
        if !(self.medium_separation_pct >= 0.0
            && self.medium_separation_pct <= self.high_separation_pct)
        {
            return Err(ConfigError::InvalidThresholds);
        }
        if self.dedup_window_secs < 0 {
            return Err(ConfigError::InvalidDedupWindow);
        }
        Ok(())
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::seconds(self.dedup_window_secs)
    }

    /// Candle count requested per symbol.
    pub fn history_limit(&self) -> usize {
        self.historical_days
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.parse().ok())
}
