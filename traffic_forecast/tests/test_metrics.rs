use approx::assert_abs_diff_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use traffic_feed::Sample;
use traffic_forecast::{
    align_actuals, calculate_reliability, evaluate_reliability, Prediction, PredictionFactors,
    PredictionHistory, PredictionRun, ReliabilityScore,
};

fn issued() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 7, 17, 0, 0).unwrap()
}

fn create_predictions(values: &[(f64, f64)]) -> Vec<Prediction> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(congestion, speed))| Prediction {
            timestamp: issued() + Duration::minutes(15 * (i as i64 + 1)),
            predicted_congestion: congestion,
            predicted_speed: speed,
            confidence: 100.0 - 8.0 * i as f64,
            factors: PredictionFactors::default(),
        })
        .collect()
}

fn create_actuals(values: &[(f64, f64)]) -> Vec<Sample> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(congestion, speed))| {
            Sample::new(
                issued() + Duration::minutes(15 * (i as i64 + 1)),
                "south-bridge",
                speed,
                380,
                congestion,
            )
        })
        .collect()
}

#[test]
fn test_reliability_exactness() {
    let score = calculate_reliability(&create_predictions(&[(60.0, 30.0)]), &create_actuals(&[(50.0, 35.0)]));

    assert_eq!(
        score,
        Some(ReliabilityScore {
            congestion_accuracy: 90.0,
            speed_accuracy: 95.0,
        })
    );
}

#[test]
fn test_reliability_absence() {
    let predictions = create_predictions(&[(60.0, 30.0)]);
    let actuals = create_actuals(&[(50.0, 35.0)]);

    assert_eq!(calculate_reliability(&[], &actuals), None);
    assert_eq!(calculate_reliability(&predictions, &[]), None);
}

#[test]
fn test_reliability_averages_over_pairs() {
    let predictions = create_predictions(&[(60.0, 30.0), (70.0, 25.0), (65.0, 28.0)]);
    let actuals = create_actuals(&[(50.0, 35.0), (72.0, 25.0), (65.0, 20.0)]);

    let report = evaluate_reliability(&predictions, &actuals).unwrap();

    assert_eq!(report.pairs, 3);
    assert_abs_diff_eq!(report.congestion_mae, 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(report.speed_mae, 13.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(report.score.congestion_accuracy, 96.0, epsilon = 1e-12);
    assert!(report.congestion_rmse >= report.congestion_mae);
}

#[test]
fn test_stored_run_scored_after_alignment() {
    let predictions = create_predictions(&[(60.0, 30.0), (70.0, 25.0), (65.0, 28.0)]);
    let mut history = PredictionHistory::default();
    history.record(PredictionRun::new("south-bridge", issued(), predictions.clone()));

    // Readings every 5 minutes for the first 30 minutes
    let readings: Vec<Sample> = (1..=6)
        .map(|k| {
            Sample::new(
                issued() + Duration::minutes(5 * k),
                "south-bridge",
                30.0,
                380,
                if k % 3 == 0 { 60.0 } else { 0.0 },
            )
        })
        .collect();

    let aligned = align_actuals(&predictions, &readings, issued());
    assert_eq!(aligned.len(), 2);
    assert_eq!(aligned[0].timestamp, issued() + Duration::minutes(15));

    let report = history.latest("south-bridge").unwrap().evaluate(&readings).unwrap();
    assert_eq!(report.pairs, 2);
    assert_abs_diff_eq!(report.score.congestion_accuracy, 100.0 - 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(report.score.speed_accuracy, 100.0 - 2.5, epsilon = 1e-12);
}

#[test]
fn test_report_json_shape() {
    let report = evaluate_reliability(&create_predictions(&[(60.0, 30.0)]), &create_actuals(&[(50.0, 35.0)])).unwrap();
    let json = serde_json::to_string(&report).unwrap();

    assert_eq!(
        json,
        r#"{"congestionAccuracy":90.0,"speedAccuracy":95.0,"pairs":1,"congestionMae":10.0,"speedMae":5.0,"congestionRmse":10.0,"speedRmse":5.0}"#
    );
}
