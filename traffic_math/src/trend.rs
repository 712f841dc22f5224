//! Least-squares trend estimation for short time series
//!
//! Samples are indexed by position (x = 0, 1, ..., n-1), so the slope is the
//! expected change per sample interval.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Denominators below this magnitude are treated as a flat series
const DEGENERATE_DENOMINATOR: f64 = 1e-10;

/// Ordinary least-squares line fitted against sample position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
    points: usize,
}

impl LinearTrend {
    /// Fit a line through `values` using the closed-form sums
    ///
    /// slope = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
    ///
    /// A degenerate denominator or a non-finite slope yields a flat line
    /// through the mean instead of an error.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Need at least 2 points to fit a trend, got {}",
                values.len()
            )));
        }

        let n = values.len() as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_x2 = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let denominator = n * sum_x2 - sum_x * sum_x;
        let slope = if denominator.abs() < DEGENERATE_DENOMINATOR {
            0.0
        } else {
            let slope = (n * sum_xy - sum_x * sum_y) / denominator;
            if slope.is_finite() {
                slope
            } else {
                0.0
            }
        };

        let intercept = (sum_y - slope * sum_x) / n;

        Ok(Self {
            slope,
            intercept: if intercept.is_finite() { intercept } else { 0.0 },
            points: values.len(),
        })
    }

    /// Change per sample interval
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Fitted value at position 0
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of points the line was fitted on
    pub fn points(&self) -> usize {
        self.points
    }

    /// Value of the line `steps_ahead` intervals past the last fitted point
    pub fn project(&self, steps_ahead: usize) -> f64 {
        let x = (self.points + steps_ahead - 1) as f64;
        self.slope * x + self.intercept
    }
}

/// Slope of `values`, or 0 when there are fewer than two points
pub fn trend_slope(values: &[f64]) -> f64 {
    LinearTrend::fit(values).map_or(0.0, |trend| trend.slope())
}

/// The trailing `n` elements of `values` (all of them if fewer)
pub fn recent<T>(values: &[T], n: usize) -> &[T] {
    &values[values.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn test_linear_trend() {
        let trend = LinearTrend::fit(&[10.0, 20.0, 30.0]).unwrap();

        assert_abs_diff_eq!(trend.slope(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(trend.intercept(), 10.0, epsilon = 1e-9);
        assert_eq!(trend.points(), 3);

        // One interval past the last point
        assert_abs_diff_eq!(trend.project(1), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_increasing_congestion_window() {
        let slope = trend_slope(&[40.0, 45.0, 50.0, 55.0, 60.0]);
        assert_abs_diff_eq!(slope, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_noisy_series_slope_sign() {
        let slope = trend_slope(&[50.0, 48.0, 47.5, 44.0, 41.0]);
        assert!(slope < 0.0);
    }

    #[rstest]
    #[case(&[])]
    #[case(&[42.0])]
    fn test_insufficient_points(#[case] values: &[f64]) {
        assert!(matches!(
            LinearTrend::fit(values),
            Err(MathError::InsufficientData(_))
        ));
        assert_eq!(trend_slope(values), 0.0);
    }

    #[test]
    fn test_flat_series() {
        let trend = LinearTrend::fit(&[30.0, 30.0, 30.0, 30.0]).unwrap();
        assert_eq!(trend.slope(), 0.0);
        assert_abs_diff_eq!(trend.intercept(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_values_give_flat_trend() {
        assert_eq!(trend_slope(&[1.0, f64::NAN, 3.0]), 0.0);
        assert_eq!(trend_slope(&[1.0, f64::INFINITY]), 0.0);
    }

    #[rstest]
    #[case(5, &[3.0, 4.0, 5.0, 6.0, 7.0])]
    #[case(2, &[6.0, 7.0])]
    #[case(10, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])]
    fn test_recent(#[case] n: usize, #[case] expected: &[f64]) {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(recent(&values, n), expected);
    }
}
