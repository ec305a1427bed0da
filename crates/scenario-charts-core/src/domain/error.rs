//! Domain-level error taxonomy for scenario charts.

use chrono::NaiveDate;

/// Scenario chart domain errors.
///
/// Missing or partial raw data is not an error: it is reported through
/// [`Availability::Unavailable`](crate::domain::Availability). These variants
/// cover malformed input and queries that cannot be answered.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("invalid projection: {0}")]
    InvalidProjection(String),

    #[error("horizon unreachable: {days} days from {start} precedes every record")]
    HorizonUnreachable { days: i64, start: NaiveDate },

    #[error("value out of range: {value} is not a finite number")]
    OutOfRange { value: f64 },

    #[error("invalid zone thresholds: {0}")]
    InvalidThresholds(String),

    #[error("invalid intervention policy: {0}")]
    InvalidPolicy(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scenario chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;
