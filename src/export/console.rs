//! Plain-text dashboard rendering for the CLI.

use std::fmt::Write;

use crate::models::report::RunReport;
use crate::models::signal::Importance;

const RULE: &str = "============================================================";

/// Render the run report as the CLI dashboard text.
pub fn render_dashboard(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "CROSSWATCH ALERT DASHBOARD");
    let _ = writeln!(out, "{RULE}");

    if report.total_alerts == 0 {
        let _ = writeln!(out, "No alerts this run.");
    } else {
        let _ = writeln!(out, "Total alerts:    {}", report.total_alerts);
        let _ = writeln!(out, "Golden crosses:  {}", report.golden_crosses);
        let _ = writeln!(out, "Death crosses:   {}", report.death_crosses);
        let _ = writeln!(out, "High priority:   {}", report.high_importance);
        let _ = writeln!(out, "Medium priority: {}", report.medium_importance);
        let _ = writeln!(out, "Low priority:    {}", report.low_importance);
    }
    let _ = writeln!(out, "Symbols analyzed: {}", report.symbols_analyzed);
    let _ = writeln!(out, "Duplicates suppressed: {}", report.duplicates_suppressed);
    let _ = writeln!(out, "Skipped: {}", report.skipped.len());

    let high: Vec<_> = report
        .alerts
        .iter()
        .filter(|a| a.importance == Importance::High)
        .take(10)
        .collect();
    if !high.is_empty() {
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "HIGH PRIORITY ALERTS");
        for alert in high {
            let event = &alert.event;
            let _ = writeln!(
                out,
                "  {} {} ({})  price ${:.4}  separation {:.2}%  strength {}",
                event.symbol,
                event.event_type,
                event.pair.name(),
                event.current_price,
                event.separation_pct,
                alert.strength,
            );
        }
    }

    let _ = writeln!(out, "{RULE}");
    out
}
