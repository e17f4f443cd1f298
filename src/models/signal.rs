//! Signal pipeline data models: MA series, crossover events, alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moving average flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaKind {
    Sma,
    Ema,
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaKind::Sma => write!(f, "SMA"),
            MaKind::Ema => write!(f, "EMA"),
        }
    }
}

/// One computed moving-average value, aligned to a source candle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A moving-average series aligned to its source candles.
///
/// The first `period - 1` candles have no defined value and are omitted, so
/// `points.len() == candles.len() - period + 1` whenever the source was long
/// enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaSeries {
    pub kind: MaKind,
    pub period: u32,
    pub points: Vec<MaPoint>,
}

impl MaSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&MaPoint> {
        self.points.last()
    }
}

/// A configured fast/slow pair to watch for crossovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrossoverPair {
    pub fast_period: u32,
    pub slow_period: u32,
    pub kind: MaKind,
}

impl CrossoverPair {
    pub fn new(fast_period: u32, slow_period: u32, kind: MaKind) -> Self {
        Self {
            fast_period,
            slow_period,
            kind,
        }
    }

    /// Stable name used in reports and skip reasons, e.g. `SMA_50_200`.
    pub fn name(&self) -> String {
        format!("{}_{}_{}", self.kind, self.fast_period, self.slow_period)
    }
}

/// Crossover direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    GoldenCross,
    DeathCross,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::GoldenCross => write!(f, "GOLDEN_CROSS"),
            EventType::DeathCross => write!(f, "DEATH_CROSS"),
        }
    }
}

/// A detected crossover at the latest common timestamp of a pair.
/// Immutable once created by the detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub symbol: String,
    pub pair: CrossoverPair,
    pub event_type: EventType,
    /// Timestamp of the crossing candle.
    pub timestamp: DateTime<Utc>,
    pub fast_value: f64,
    pub slow_value: f64,
    /// Most recent close of the source series.
    pub current_price: f64,
    /// `|fast - slow| / slow * 100` at the crossing point.
    pub separation_pct: f64,
}

/// Alert importance tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    /// Numeric rank for ordering, HIGH first.
    pub fn rank(&self) -> u8 {
        match self {
            Importance::High => 3,
            Importance::Medium => 2,
            Importance::Low => 1,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Importance::High => write!(f, "HIGH"),
            Importance::Medium => write!(f, "MEDIUM"),
            Importance::Low => write!(f, "LOW"),
        }
    }
}

/// Signal strength label, derived from separation alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Strength {
    Strong,
    Medium,
    Weak,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Strong => write!(f, "STRONG"),
            Strength::Medium => write!(f, "MEDIUM"),
            Strength::Weak => write!(f, "WEAK"),
        }
    }
}

/// Terminal alert form: a crossover event plus its classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedAlert {
    #[serde(flatten)]
    pub event: CrossoverEvent,
    pub importance: Importance,
    pub strength: Strength,
}

impl ClassifiedAlert {
    pub fn key(&self) -> AlertKey {
        AlertKey {
            symbol: self.event.symbol.clone(),
            fast_period: self.event.pair.fast_period,
            slow_period: self.event.pair.slow_period,
            kind: self.event.pair.kind,
            event_type: self.event.event_type,
        }
    }
}

/// Deduplication identity: two alerts with the same key are "the same
/// alert" across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub symbol: String,
    pub fast_period: u32,
    pub slow_period: u32,
    pub kind: MaKind,
    pub event_type: EventType,
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}_{}_{}:{}",
            self.symbol, self.kind, self.fast_period, self.slow_period, self.event_type
        )
    }
}
