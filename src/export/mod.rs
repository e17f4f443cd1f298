//! Report sinks: file exports and the console dashboard.

pub mod console;
pub mod files;

pub use files::{write_alerts_csv, write_report_json, ExportError};
