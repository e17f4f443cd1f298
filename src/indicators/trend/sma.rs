//! SMA (Simple Moving Average) indicator

use crate::indicators::error::IndicatorError;
use crate::models::market::Candle;
use crate::models::signal::{MaKind, MaPoint, MaSeries};

/// Compute the SMA series for a specific period.
///
/// The first `period - 1` candles have no defined value and are omitted, so
/// the result holds `candles.len() - period + 1` points aligned to the
/// source timestamps.
pub fn compute_sma(candles: &[Candle], period: u32) -> Result<MaSeries, IndicatorError> {
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

    let mut points = Vec::with_capacity(candles.len() - window + 1);
    let mut sum: f64 = candles[..window].iter().map(|c| c.close).sum();
    points.push(MaPoint {
        timestamp: candles[window - 1].timestamp,
        value: sum / window as f64,
    });

    for i in window..candles.len() {
        sum += candles[i].close - candles[i - window].close;
        points.push(MaPoint {
            timestamp: candles[i].timestamp,
            value: sum / window as f64,
        });
    }

    Ok(MaSeries {
        kind: MaKind::Sma,
        period,
        points,
    })
}
