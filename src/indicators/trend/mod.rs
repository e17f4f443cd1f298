//! Trend indicators: simple and exponential moving averages.

pub mod ema;
pub mod sma;

pub use ema::compute_ema;
pub use sma::compute_sma;

use crate::indicators::error::IndicatorError;
use crate::models::market::Candle;
use crate::models::report::MaSnapshot;
use crate::models::signal::{MaKind, MaSeries};

/// Compute a moving average of the requested kind.
pub fn compute(candles: &[Candle], period: u32, kind: MaKind) -> Result<MaSeries, IndicatorError> {
    match kind {
        MaKind::Sma => compute_sma(candles, period),
        MaKind::Ema => compute_ema(candles, period),
    }
}

/// Latest value of each configured period, both kinds. Periods with
/// insufficient history are skipped rather than reported as errors.
pub fn latest_snapshots(candles: &[Candle], periods: &[u32]) -> Vec<MaSnapshot> {
    let mut snapshots = Vec::new();
    for &period in periods {
        for kind in [MaKind::Sma, MaKind::Ema] {
            if let Ok(series) = compute(candles, period, kind) {
                if let Some(point) = series.last() {
                    snapshots.push(MaSnapshot {
                        kind,
                        period,
                        value: point.value,
                    });
                }
            }
        }
    }
    snapshots
}
