//! Bounded and aggregate arithmetic
//!
//! Forecast outputs are always clamped through these helpers so that a
//! `NaN` produced upstream collapses onto a bound instead of leaking out.

use crate::{MathError, Result};

/// Clamp `value` into `[min, max]`, mapping `NaN` to `min`
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Raise `value` to at least `floor`, mapping `NaN` and `+inf` to `floor`
pub fn floor_finite(value: f64, floor: f64) -> f64 {
    if value.is_finite() {
        value.max(floor)
    } else {
        floor
    }
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean absolute error between paired forecasts and actual values
pub fn mean_absolute_error(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    check_pairs(forecast, actual)?;

    let sum: f64 = forecast
        .iter()
        .zip(actual.iter())
        .map(|(f, a)| (f - a).abs())
        .sum();

    Ok(sum / forecast.len() as f64)
}

/// Root mean squared error between paired forecasts and actual values
pub fn root_mean_squared_error(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    check_pairs(forecast, actual)?;

    let sum: f64 = forecast
        .iter()
        .zip(actual.iter())
        .map(|(f, a)| (f - a).powi(2))
        .sum();

    Ok((sum / forecast.len() as f64).sqrt())
}

fn check_pairs(forecast: &[f64], actual: &[f64]) -> Result<()> {
    if forecast.len() != actual.len() {
        return Err(MathError::InvalidInput(format!(
            "Forecast length ({}) doesn't match actual length ({})",
            forecast.len(),
            actual.len()
        )));
    }

    if forecast.is_empty() {
        return Err(MathError::InsufficientData(
            "Need at least one forecast/actual pair".to_string(),
        ));
    }

    Ok(())
}
