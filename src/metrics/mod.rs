//! Prometheus metrics shared by the binaries.

use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

use crate::models::report::RunReport;

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: Counter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,
    pub runs_total: Counter,
    pub run_duration_seconds: Histogram,
    pub symbols_analyzed_total: Counter,
    pub alerts_emitted_total: Counter,
    pub alerts_suppressed_total: Counter,
    pub history_entries: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = Counter::with_opts(Opts::new(
            "http_requests_total",
            "Total HTTP requests received",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = Gauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        ))?;
        let runs_total =
            Counter::with_opts(Opts::new("runs_total", "Completed analysis runs"))?;
        let run_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "run_duration_seconds",
            "Analysis run duration in seconds",
        ))?;
        let symbols_analyzed_total = Counter::with_opts(Opts::new(
            "symbols_analyzed_total",
            "Symbols processed across all runs",
        ))?;
        let alerts_emitted_total = Counter::with_opts(Opts::new(
            "alerts_emitted_total",
            "Alerts accepted after deduplication",
        ))?;
        let alerts_suppressed_total = Counter::with_opts(Opts::new(
            "alerts_suppressed_total",
            "Duplicate alerts suppressed by the history",
        ))?;
        let history_entries = Gauge::with_opts(Opts::new(
            "history_entries",
            "Entries in the alert history after the last run",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(run_duration_seconds.clone()))?;
        registry.register(Box::new(symbols_analyzed_total.clone()))?;
        registry.register(Box::new(alerts_emitted_total.clone()))?;
        registry.register(Box::new(alerts_suppressed_total.clone()))?;
        registry.register(Box::new(history_entries.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            runs_total,
            run_duration_seconds,
            symbols_analyzed_total,
            alerts_emitted_total,
            alerts_suppressed_total,
            history_entries,
        })
    }

    /// Record the outcome of one analysis run.
    pub fn observe_run(&self, report: &RunReport, duration_secs: f64, history_len: usize) {
        self.runs_total.inc();
        self.run_duration_seconds.observe(duration_secs);
        self.symbols_analyzed_total
            .inc_by(report.symbols_analyzed as f64);
        self.alerts_emitted_total.inc_by(report.total_alerts as f64);
        self.alerts_suppressed_total
            .inc_by(report.duplicates_suppressed as f64);
        self.history_entries.set(history_len as f64);
    }

    /// Export all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
