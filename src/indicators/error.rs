use thiserror::Error;

/// Errors raised by indicator computations. All are recoverable: the
/// orchestrator converts them into per-symbol skip entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("insufficient data: need {required} candles, got {actual}")]
    InsufficientData { required: u32, actual: usize },

    #[error("invalid period: {0}")]
    InvalidPeriod(u32),
}
