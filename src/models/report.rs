//! Run-level reporting structures consumed by exporters and the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::signal::{ClassifiedAlert, EventType, Importance, MaKind};

/// A symbol (or symbol/pair) the run could not analyze, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

impl SkippedSymbol {
    pub fn new(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

/// Aggregated result of one pipeline run. Alerts are ordered by importance
/// (HIGH first) then separation descending; skipped symbols are always
/// listed, never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub symbols_analyzed: usize,
    pub total_alerts: usize,
    pub golden_crosses: usize,
    pub death_crosses: usize,
    pub high_importance: usize,
    pub medium_importance: usize,
    pub low_importance: usize,
    pub duplicates_suppressed: usize,
    pub alerts: Vec<ClassifiedAlert>,
    pub skipped: Vec<SkippedSymbol>,
}

impl RunReport {
    pub fn build(
        symbols_analyzed: usize,
        mut alerts: Vec<ClassifiedAlert>,
        skipped: Vec<SkippedSymbol>,
        duplicates_suppressed: usize,
    ) -> Self {
        alerts.sort_by(|a, b| {
            b.importance
                .rank()
                .cmp(&a.importance.rank())
                .then_with(|| {
                    b.event
                        .separation_pct
                        .partial_cmp(&a.event.separation_pct)
                        .unwrap_or(Ordering::Equal)
                })
        });

        let golden_crosses = alerts
            .iter()
            .filter(|a| a.event.event_type == EventType::GoldenCross)
            .count();
        let death_crosses = alerts.len() - golden_crosses;
        let count_tier = |tier: Importance| alerts.iter().filter(|a| a.importance == tier).count();

        Self {
            generated_at: Utc::now(),
            symbols_analyzed,
            total_alerts: alerts.len(),
            golden_crosses,
            death_crosses,
            high_importance: count_tier(Importance::High),
            medium_importance: count_tier(Importance::Medium),
            low_importance: count_tier(Importance::Low),
            duplicates_suppressed,
            alerts,
            skipped,
        }
    }

    pub fn summary(&self) -> ReportSummary {
        let unique_symbols: HashSet<&str> = self
            .alerts
            .iter()
            .map(|a| a.event.symbol.as_str())
            .collect();
        ReportSummary {
            generated_at: self.generated_at,
            symbols_analyzed: self.symbols_analyzed,
            total_alerts: self.total_alerts,
            golden_crosses: self.golden_crosses,
            death_crosses: self.death_crosses,
            high_importance: self.high_importance,
            medium_importance: self.medium_importance,
            low_importance: self.low_importance,
            duplicates_suppressed: self.duplicates_suppressed,
            unique_symbols: unique_symbols.len(),
            symbols_skipped: self.skipped.len(),
        }
    }
}

/// Counts-only view of a report, served by the dashboard summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub generated_at: DateTime<Utc>,
    pub symbols_analyzed: usize,
    pub total_alerts: usize,
    pub golden_crosses: usize,
    pub death_crosses: usize,
    pub high_importance: usize,
    pub medium_importance: usize,
    pub low_importance: usize,
    pub duplicates_suppressed: usize,
    pub unique_symbols: usize,
    pub symbols_skipped: usize,
}

/// Latest value of one moving average, reported in single-symbol analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaSnapshot {
    pub kind: MaKind,
    pub period: u32,
    pub value: f64,
}

/// Detailed on-demand analysis of a single symbol. Crossovers here are
/// classified but not deduplicated against the alert history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub close_price: f64,
    pub data_points: usize,
    pub moving_averages: Vec<MaSnapshot>,
    pub crossovers: Vec<ClassifiedAlert>,
}
