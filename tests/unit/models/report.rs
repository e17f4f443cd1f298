//! Unit tests for run report aggregation

use chrono::{TimeZone, Utc};
use crosswatch::models::report::{RunReport, SkippedSymbol};
use crosswatch::models::signal::{
    ClassifiedAlert, CrossoverEvent, CrossoverPair, EventType, Importance, MaKind, Strength,
};

fn alert(
    symbol: &str,
    event_type: EventType,
    importance: Importance,
    separation_pct: f64,
) -> ClassifiedAlert {
    ClassifiedAlert {
        event: CrossoverEvent {
            symbol: symbol.to_string(),
            pair: CrossoverPair::new(50, 200, MaKind::Sma),
            event_type,
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            fast_value: 105.0,
            slow_value: 100.0,
            current_price: 106.0,
            separation_pct,
        },
        importance,
        strength: Strength::Medium,
    }
}

#[test]
fn test_alerts_ordered_by_importance_then_separation() {
    let alerts = vec![
        alert("AAAUSDT", EventType::GoldenCross, Importance::Low, 1.0),
        alert("BBBUSDT", EventType::GoldenCross, Importance::High, 6.0),
        alert("CCCUSDT", EventType::DeathCross, Importance::Medium, 4.0),
        alert("DDDUSDT", EventType::GoldenCross, Importance::High, 9.0),
        alert("EEEUSDT", EventType::DeathCross, Importance::Medium, 2.5),
    ];
    let report = RunReport::build(10, alerts, Vec::new(), 0);

    let order: Vec<&str> = report
        .alerts
        .iter()
        .map(|a| a.event.symbol.as_str())
        .collect();
    assert_eq!(
        order,
        vec!["DDDUSDT", "BBBUSDT", "CCCUSDT", "EEEUSDT", "AAAUSDT"]
    );
}

#[test]
fn test_counts_by_type_and_tier() {
    let alerts = vec![
        alert("AAAUSDT", EventType::GoldenCross, Importance::High, 6.0),
        alert("BBBUSDT", EventType::DeathCross, Importance::Medium, 3.0),
        alert("CCCUSDT", EventType::DeathCross, Importance::Low, 1.0),
    ];
    let skipped = vec![SkippedSymbol::new("ZZZUSDT", "fetch failed: timeout")];
    let report = RunReport::build(4, alerts, skipped, 2);

    assert_eq!(report.symbols_analyzed, 4);
    assert_eq!(report.total_alerts, 3);
    assert_eq!(report.golden_crosses, 1);
    assert_eq!(report.death_crosses, 2);
    assert_eq!(report.high_importance, 1);
    assert_eq!(report.medium_importance, 1);
    assert_eq!(report.low_importance, 1);
    assert_eq!(report.duplicates_suppressed, 2);
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn test_summary_counts_unique_symbols() {
    let alerts = vec![
        alert("AAAUSDT", EventType::GoldenCross, Importance::High, 6.0),
        alert("AAAUSDT", EventType::DeathCross, Importance::Low, 1.0),
        alert("BBBUSDT", EventType::GoldenCross, Importance::Medium, 3.0),
    ];
    let report = RunReport::build(5, alerts, Vec::new(), 0);
    let summary = report.summary();

    assert_eq!(summary.total_alerts, 3);
    assert_eq!(summary.unique_symbols, 2);
    assert_eq!(summary.symbols_skipped, 0);
}

#[test]
fn test_empty_run_report() {
    let report = RunReport::build(0, Vec::new(), Vec::new(), 0);
    assert_eq!(report.total_alerts, 0);
    assert_eq!(report.golden_crosses, 0);
    assert_eq!(report.death_crosses, 0);
    assert!(report.alerts.is_empty());
}
