//! Forecast output records

use crate::factors::WeatherCondition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contextual factors that shaped one forecast point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFactors {
    /// Hour-of-day multiplier for the forecast instant
    pub time_of_day_factor: f64,
    /// Assumed weather, absent when the model does not simulate weather
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_condition: Option<WeatherCondition>,
    /// Weather multiplier, 1.0 when weather is absent
    pub weather_impact: f64,
    /// Month-of-year multiplier
    pub seasonal_factor: f64,
}

impl Default for PredictionFactors {
    fn default() -> Self {
        Self {
            time_of_day_factor: 1.0,
            weather_condition: None,
            weather_impact: 1.0,
            seasonal_factor: 1.0,
        }
    }
}

/// One forecast point at a fixed offset from the last observed sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub timestamp: DateTime<Utc>,
    /// Congestion percentage, always within [0, 100]
    pub predicted_congestion: f64,
    /// Speed, never below the configured floor
    pub predicted_speed: f64,
    /// Heuristic certainty, non-increasing along a sequence
    pub confidence: f64,
    #[serde(flatten)]
    pub factors: PredictionFactors,
}
