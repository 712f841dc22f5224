//! Summary helpers for displaying readings

use serde::{Deserialize, Serialize};
use std::fmt;
use traffic_feed::Sample;
use traffic_math::mean;

/// Coarse congestion band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionStatus {
    Low,
    Moderate,
    High,
}

impl CongestionStatus {
    /// Band for a congestion percentage: below 50 low, below 70 moderate
    ///
    /// `NaN` is reported as low.
    pub fn from_level(level: f64) -> Self {
        if level >= 70.0 {
            CongestionStatus::High
        } else if level >= 50.0 {
            CongestionStatus::Moderate
        } else {
            CongestionStatus::Low
        }
    }

    /// Label shown next to a reading
    pub fn label(&self) -> &'static str {
        match self {
            CongestionStatus::Low => "Low",
            CongestionStatus::Moderate => "Moderate",
            CongestionStatus::High => "High",
        }
    }
}

impl fmt::Display for CongestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean congestion and speed over a set of samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficAverages {
    pub congestion: f64,
    pub speed: f64,
}

/// Average congestion and speed; zeros for an empty slice
pub fn calculate_averages(samples: &[Sample]) -> TrafficAverages {
    let congestion: Vec<f64> = samples.iter().map(|s| s.congestion_level).collect();
    let speed: Vec<f64> = samples.iter().map(|s| s.average_speed).collect();

    TrafficAverages {
        congestion: mean(&congestion).unwrap_or(0.0),
        speed: mean(&speed).unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, CongestionStatus::Low)]
    #[case(49.9, CongestionStatus::Low)]
    #[case(50.0, CongestionStatus::Moderate)]
    #[case(69.99, CongestionStatus::Moderate)]
    #[case(70.0, CongestionStatus::High)]
    #[case(100.0, CongestionStatus::High)]
    #[case(f64::NAN, CongestionStatus::Low)]
    fn test_congestion_status(#[case] level: f64, #[case] expected: CongestionStatus) {
        assert_eq!(CongestionStatus::from_level(level), expected);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(CongestionStatus::Moderate.label(), "Moderate");
        assert_eq!(CongestionStatus::High.to_string(), "High");
        assert_eq!(serde_json::to_string(&CongestionStatus::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_calculate_averages() {
        let at = Utc.with_ymd_and_hms(2024, 5, 7, 8, 0, 0).unwrap();
        let samples = vec![
            Sample::new(at, "city-center", 30.0, 400, 60.0),
            Sample::new(at, "city-center", 40.0, 420, 70.0),
        ];

        assert_eq!(
            calculate_averages(&samples),
            TrafficAverages {
                congestion: 65.0,
                speed: 35.0
            }
        );
        assert_eq!(calculate_averages(&[]), TrafficAverages::default());
    }
}
