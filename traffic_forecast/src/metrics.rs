//! Reliability of past forecasts against realized samples
//!
//! Predictions and actuals are paired by position: `predictions[i]` is
//! compared with `actuals[i]`. Callers holding samples on a different cadence
//! should line them up first with [`crate::history::align_actuals`].

use crate::data::Prediction;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use traffic_feed::Sample;
use traffic_math::{mean_absolute_error, root_mean_squared_error};

/// Accuracy percentages, 100 minus the mean absolute error
///
/// Values below zero are legitimate: they mean the average miss exceeded 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityScore {
    pub congestion_accuracy: f64,
    pub speed_accuracy: f64,
}

/// Detailed evaluation of one prediction run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityReport {
    #[serde(flatten)]
    pub score: ReliabilityScore,
    /// Number of prediction/actual pairs evaluated
    pub pairs: usize,
    pub congestion_mae: f64,
    pub speed_mae: f64,
    pub congestion_rmse: f64,
    pub speed_rmse: f64,
}

impl fmt::Display for ReliabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reliability over {} pairs:", self.pairs)?;
        writeln!(
            f,
            "  Congestion accuracy: {:.1}% (MAE {:.2}, RMSE {:.2})",
            self.score.congestion_accuracy, self.congestion_mae, self.congestion_rmse
        )?;
        write!(
            f,
            "  Speed accuracy:      {:.1}% (MAE {:.2}, RMSE {:.2})",
            self.score.speed_accuracy, self.speed_mae, self.speed_rmse
        )
    }
}

/// Evaluate predictions against actuals matched by index
///
/// Returns `None` when either side is empty. Predictions past the end of
/// `actuals` are ignored.
pub fn evaluate_reliability(
    predictions: &[Prediction],
    actuals: &[Sample],
) -> Option<ReliabilityReport> {
    let pairs = predictions.len().min(actuals.len());
    if pairs == 0 {
        debug!(
            predictions = predictions.len(),
            actuals = actuals.len(),
            "no pairs to evaluate"
        );
        return None;
    }

    let predictions = &predictions[..pairs];
    let actuals = &actuals[..pairs];

    let predicted_congestion: Vec<f64> = predictions.iter().map(|p| p.predicted_congestion).collect();
    let actual_congestion: Vec<f64> = actuals.iter().map(|s| s.congestion_level).collect();
    let predicted_speed: Vec<f64> = predictions.iter().map(|p| p.predicted_speed).collect();
    let actual_speed: Vec<f64> = actuals.iter().map(|s| s.average_speed).collect();

    // Lengths match and are non-zero, so these cannot fail
    let congestion_mae = mean_absolute_error(&predicted_congestion, &actual_congestion).ok()?;
    let speed_mae = mean_absolute_error(&predicted_speed, &actual_speed).ok()?;
    let congestion_rmse = root_mean_squared_error(&predicted_congestion, &actual_congestion).ok()?;
    let speed_rmse = root_mean_squared_error(&predicted_speed, &actual_speed).ok()?;

    let report = ReliabilityReport {
        score: ReliabilityScore {
            congestion_accuracy: 100.0 - congestion_mae,
            speed_accuracy: 100.0 - speed_mae,
        },
        pairs,
        congestion_mae,
        speed_mae,
        congestion_rmse,
        speed_rmse,
    };

    debug!(
        pairs,
        congestion_accuracy = report.score.congestion_accuracy,
        speed_accuracy = report.score.speed_accuracy,
        "evaluated reliability"
    );

    Some(report)
}

/// Accuracy of past predictions, `None` when there is nothing to compare
pub fn calculate_reliability(
    predictions: &[Prediction],
    actuals: &[Sample],
) -> Option<ReliabilityScore> {
    evaluate_reliability(predictions, actuals).map(|report| report.score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PredictionFactors;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn prediction(congestion: f64, speed: f64) -> Prediction {
        Prediction {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 7, 8, 0, 0).unwrap(),
            predicted_congestion: congestion,
            predicted_speed: speed,
            confidence: 100.0,
            factors: PredictionFactors::default(),
        }
    }

    fn actual(congestion: f64, speed: f64) -> Sample {
        Sample::new(
            Utc.with_ymd_and_hms(2024, 5, 7, 8, 0, 0).unwrap(),
            "city-center",
            speed,
            400,
            congestion,
        )
    }

    #[test]
    fn test_single_pair_accuracy() {
        let score = calculate_reliability(&[prediction(60.0, 30.0)], &[actual(50.0, 35.0)]).unwrap();
        assert_eq!(
            score,
            ReliabilityScore {
                congestion_accuracy: 90.0,
                speed_accuracy: 95.0
            }
        );
    }

    #[test]
    fn test_absent_when_either_side_empty() {
        assert_eq!(calculate_reliability(&[], &[actual(50.0, 35.0)]), None);
        assert_eq!(calculate_reliability(&[prediction(60.0, 30.0)], &[]), None);
        assert_eq!(evaluate_reliability(&[], &[]), None);
    }

    #[test]
    fn test_extra_predictions_are_skipped() {
        let predictions = [prediction(60.0, 30.0), prediction(70.0, 20.0), prediction(80.0, 10.0)];
        let actuals = [actual(50.0, 35.0), actual(60.0, 25.0)];

        let report = evaluate_reliability(&predictions, &actuals).unwrap();
        assert_eq!(report.pairs, 2);
        assert_abs_diff_eq!(report.score.congestion_accuracy, 90.0);
        assert_abs_diff_eq!(report.score.speed_accuracy, 95.0);
    }

    #[test]
    fn test_pairing_ignores_timestamps() {
        let mut late = actual(50.0, 35.0);
        late.timestamp += Duration::hours(3);

        let score = calculate_reliability(&[prediction(60.0, 30.0)], &[late]).unwrap();
        assert_eq!(score.congestion_accuracy, 90.0);
    }

    #[test]
    fn test_accuracy_can_go_negative() {
        let score = calculate_reliability(&[prediction(0.0, 150.0)], &[actual(100.0, 10.0)]).unwrap();
        assert_eq!(score.congestion_accuracy, 0.0);
        assert_eq!(score.speed_accuracy, -40.0);
    }

    #[test]
    fn test_rmse_exceeds_mae_on_uneven_errors() {
        let predictions = [prediction(50.0, 30.0), prediction(50.0, 30.0)];
        let actuals = [actual(50.0, 30.0), actual(60.0, 30.0)];

        let report = evaluate_reliability(&predictions, &actuals).unwrap();
        assert_abs_diff_eq!(report.congestion_mae, 5.0);
        assert_abs_diff_eq!(report.congestion_rmse, 50.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(report.speed_rmse, 0.0);
    }

    #[test]
    fn test_report_display_and_json() {
        let report = evaluate_reliability(&[prediction(60.0, 30.0)], &[actual(50.0, 35.0)]).unwrap();

        let text = report.to_string();
        assert!(text.contains("Reliability over 1 pairs"));
        assert!(text.contains("Congestion accuracy: 90.0%"));

        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["congestionAccuracy"], 90.0);
        assert_eq!(json["speedAccuracy"], 95.0);
        assert_eq!(json["pairs"], 1);
    }
}
