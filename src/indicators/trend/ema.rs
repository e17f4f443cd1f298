//! EMA (Exponential Moving Average) indicator

use crate::indicators::error::IndicatorError;
use crate::models::market::Candle;
use crate::models::signal::{MaKind, MaPoint, MaSeries};

/// Compute the EMA series for a specific period.
///
/// The first value is seeded with the SMA of the first `period` closes;
/// subsequent values use the smoothing factor `alpha = 2 / (period + 1)`.
/// The recursion depends on every preceding close, so callers must pass the
/// full available history rather than a truncated tail.
pub fn compute_ema(candles: &[Candle], period: u32) -> Result<MaSeries, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod(period));
    }
    let window = period as usize;
    if candles.len() < window {
        return Err(IndicatorError::InsufficientData {
            required: period,
            actual: candles.len(),
        });
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed: f64 = candles[..window].iter().map(|c| c.close).sum::<f64>() / window as f64;

    let mut points = Vec::with_capacity(candles.len() - window + 1);
    points.push(MaPoint {
        timestamp: candles[window - 1].timestamp,
        value: seed,
    });

    let mut prev = seed;
    for candle in &candles[window..] {
        let value = candle.close * alpha + prev * (1.0 - alpha);
        points.push(MaPoint {
            timestamp: candle.timestamp,
            value,
        });
        prev = value;
    }

    Ok(MaSeries {
        kind: MaKind::Ema,
        period,
        points,
    })
}
