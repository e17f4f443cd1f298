//! Crossover detection between a fast and a slow moving-average series.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::signal::{CrossoverEvent, CrossoverPair, EventType, MaSeries};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The two series share fewer than the two common timestamps a crossing
    /// comparison needs.
    #[error("misaligned series for {pair}: no common timestamps in the crossing window")]
    MisalignedSeries { pair: String },
}

#[derive(Debug, Clone, Copy)]
struct AlignedPoint {
    timestamp: DateTime<Utc>,
    fast: f64,
    slow: f64,
}

/// Detect a crossover at the latest common timestamp of the two series.
///
/// Returns `Ok(None)` when either series has fewer than two points or the
/// relative order of fast and slow is unchanged. Equality at t-1 counts as
/// the below-or-equal state for a golden cross and the above-or-equal state
/// for a death cross; equality never triggers an event by itself.
pub fn detect(
    symbol: &str,
    pair: &CrossoverPair,
    fast: &MaSeries,
    slow: &MaSeries,
    current_price: f64,
) -> Result<Option<CrossoverEvent>, SignalError> {
    if fast.len() < 2 || slow.len() < 2 {
        return Ok(None);
    }

    let (prev, last) = match align_last_two(fast, slow) {
        Some(points) => points,
        None => {
            return Err(SignalError::MisalignedSeries { pair: pair.name() });
        }
    };

    let golden = prev.fast <= prev.slow && last.fast > last.slow;
    let death = prev.fast >= prev.slow && last.fast < last.slow;
    debug_assert!(!(golden && death), "crossover directions are mutually exclusive");

    let event_type = if golden {
        EventType::GoldenCross
    } else if death {
        EventType::DeathCross
    } else {
        return Ok(None);
    };

    Ok(Some(CrossoverEvent {
        symbol: symbol.to_string(),
        pair: *pair,
        event_type,
        timestamp: last.timestamp,
        fast_value: last.fast,
        slow_value: last.slow,
        current_price,
        separation_pct: separation_pct(last.fast, last.slow),
    }))
}

/// Relative percentage gap between the fast and slow values.
pub fn separation_pct(fast: f64, slow: f64) -> f64 {
    if slow == 0.0 {
        return 0.0;
    }
    ((fast - slow) / slow).abs() * 100.0
}

/// Walk both series back from their tails and collect the last two
/// timestamps present in both, returned as (previous, latest).
fn align_last_two(fast: &MaSeries, slow: &MaSeries) -> Option<(AlignedPoint, AlignedPoint)> {
    let mut i = fast.len();
    let mut j = slow.len();
    let mut matched: Vec<AlignedPoint> = Vec::with_capacity(2);

    while i > 0 && j > 0 && matched.len() < 2 {
        let f = &fast.points[i - 1];
        let s = &slow.points[j - 1];
        if f.timestamp == s.timestamp {
            matched.push(AlignedPoint {
                timestamp: f.timestamp,
                fast: f.value,
                slow: s.value,
            });
            i -= 1;
            j -= 1;
        } else if f.timestamp > s.timestamp {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    if matched.len() == 2 {
        // Collected tail-first: matched[1] is the older point.
        Some((matched[1], matched[0]))
    } else {
        None
    }
}
