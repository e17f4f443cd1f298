//! Unit tests for the SMA indicator

use chrono::{Duration, TimeZone, Utc};
use crosswatch::indicators::trend::compute_sma;
use crosswatch::indicators::IndicatorError;
use crosswatch::models::market::Candle;

fn daily_candles(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
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
                start + Duration::days(i as i64),
            )
        })
        .collect()
}

#[test]
fn test_sma_output_length() {
    let candles = daily_candles(&vec![100.0; 50]);
    for period in [1u32, 2, 5, 20, 50] {
        let series = compute_sma(&candles, period).unwrap();
        assert_eq!(series.len(), candles.len() - period as usize + 1);
    }
}

#[test]
fn test_sma_values() {
    let candles = daily_candles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let series = compute_sma(&candles, 3).unwrap();
    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    assert_eq!(values.len(), 3);
    for (got, expected) in values.iter().zip([2.0, 3.0, 4.0]) {
        assert!((got - expected).abs() < 1e-12, "got {got}, expected {expected}");
    }
}

#[test]
fn test_sma_timestamps_align_to_source() {
    let candles = daily_candles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let series = compute_sma(&candles, 3).unwrap();
    // First defined value sits on the third candle.
    assert_eq!(series.points[0].timestamp, candles[2].timestamp);
    assert_eq!(series.last().unwrap().timestamp, candles[4].timestamp);
}

#[test]
fn test_sma_insufficient_data() {
    let candles = daily_candles(&vec![100.0; 10]);
    let err = compute_sma(&candles, 20).unwrap_err();
    assert_eq!(
        err,
        IndicatorError::InsufficientData {
            required: 20,
            actual: 10
        }
    );
}

#[test]
fn test_sma_rejects_zero_period() {
    let candles = daily_candles(&[1.0, 2.0]);
    assert_eq!(
        compute_sma(&candles, 0).unwrap_err(),
        IndicatorError::InvalidPeriod(0)
    );
}
