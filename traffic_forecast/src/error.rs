//! Error types for the traffic_forecast crate

use thiserror::Error;
use traffic_feed::FeedError;

/// Custom error types for the traffic_forecast crate
///
/// Degenerate forecasting input (short windows, empty evaluations) is not an
/// error; those cases return empty or absent results instead.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error from invalid configuration or parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the sample source
    #[error("Feed error: {0}")]
    FeedError(#[from] FeedError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV export
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON parsing
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
