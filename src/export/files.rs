//! CSV and JSON report writers.

use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::models::report::RunReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

const CSV_HEADER: &str = "crossing_timestamp,symbol,event_type,importance,strength,\
crossover,ma_kind,fast_period,slow_period,current_price,fast_ma_value,slow_ma_value,\
separation_pct";

/// Write the report's alerts as CSV, one row per alert in report order.
pub fn write_alerts_csv(report: &RunReport, path: &Path) -> Result<(), ExportError> {
    let mut out = String::with_capacity(64 * (report.alerts.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for alert in &report.alerts {
        let event = &alert.event;
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{:.8},{:.8},{:.8},{:.4}\n",
            event.timestamp.to_rfc3339(),
            event.symbol,
            event.event_type,
            alert.importance,
            alert.strength,
            event.pair.name(),
            event.pair.kind,
            event.pair.fast_period,
            event.pair.slow_period,
            event.current_price,
            event.fast_value,
            event.slow_value,
            event.separation_pct,
        ));
    }

    write_file(path, out.as_bytes())?;
    info!(
        path = %path.display(),
        alerts = report.alerts.len(),
        "exported {} alerts to CSV",
        report.alerts.len()
    );
    Ok(())
}

/// Write the full report (alerts, counts, skips) as pretty JSON.
pub fn write_report_json(report: &RunReport, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(report)?;
    write_file(path, json.as_bytes())?;
    info!(path = %path.display(), "exported run report to JSON");
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}
