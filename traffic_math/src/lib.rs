//! # Traffic Math
//!
//! Numeric building blocks for the traffic forecasting crates.
//! This crate provides least-squares trend fitting over short sample windows
//! and the guarded arithmetic (clamping, averaging, error aggregation) that
//! keeps forecasts free of `NaN`.

use thiserror::Error;

pub mod bounds;
pub mod trend;

pub use bounds::{clamp_finite, floor_finite, mean, mean_absolute_error, root_mean_squared_error};
pub use trend::{recent, trend_slope, LinearTrend};

/// Errors that can occur in trend and error calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for traffic math operations
pub type Result<T> = std::result::Result<T, MathError>;
