//! Forecast configuration
//!
//! All tunable constants of the forecasters live here. The defaults are the
//! dashboard's: six 15-minute steps, a five-sample trend window, confidence
//! falling 8 points per step from 100 to a floor of 60.

use crate::error::{ForecastError, Result};
use crate::factors::WeatherCondition;
use chrono::{Duration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// How the contextual forecaster chooses weather for each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "condition", rename_all = "camelCase")]
pub enum WeatherMode {
    /// Uniform draw from the injected random source
    Random,
    /// Always the given condition
    Fixed(WeatherCondition),
    /// No weather enrichment
    Disabled,
}

/// Fixed coefficients combining trend and context into a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactorWeights {
    /// Congestion points per unit of congestion trend per step
    pub trend: f64,
    /// Congestion points removed per unit of speed trend per step
    pub speed_trend: f64,
    /// Congestion points per unit of time-of-day deviation from 1
    pub time_of_day: f64,
    /// Congestion points per unit of weather deviation from 1
    pub weather: f64,
    /// Congestion points per unit of seasonal deviation from 1
    pub seasonal: f64,
    /// Fractional speed loss per 100 points of congestion increase
    pub speed_congestion_sensitivity: f64,
    /// Fractional speed loss per unit of weather deviation from 1
    pub speed_weather_sensitivity: f64,
}

impl FactorWeights {
    fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("trend", self.trend),
            ("speedTrend", self.speed_trend),
            ("timeOfDay", self.time_of_day),
            ("weather", self.weather),
            ("seasonal", self.seasonal),
            ("speedCongestionSensitivity", self.speed_congestion_sensitivity),
            ("speedWeatherSensitivity", self.speed_weather_sensitivity),
        ]
        .into_iter()
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            trend: 1.0,
            speed_trend: 0.5,
            time_of_day: 15.0,
            weather: 20.0,
            seasonal: 20.0,
            speed_congestion_sensitivity: 0.8,
            speed_weather_sensitivity: 0.3,
        }
    }
}

/// Forecaster settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastConfig {
    /// Minutes between consecutive forecast points
    pub step_minutes: u32,
    /// Horizon used when the caller does not pass one
    pub default_horizon: usize,
    /// Number of trailing samples used for trend fitting
    pub trend_window: usize,
    /// Confidence at the first step
    pub confidence_start: f64,
    /// Confidence lost per additional step
    pub confidence_decay: f64,
    /// Lowest confidence ever reported
    pub confidence_floor: f64,
    /// Lowest speed ever predicted
    pub speed_floor: f64,
    /// Offset from UTC used for hour-of-day, weekday and month lookups
    pub utc_offset_minutes: i32,
    pub weather: WeatherMode,
    pub weights: FactorWeights,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            step_minutes: 15,
            default_horizon: 6,
            trend_window: 5,
            confidence_start: 100.0,
            confidence_decay: 8.0,
            confidence_floor: 60.0,
            speed_floor: 5.0,
            utc_offset_minutes: 0,
            weather: WeatherMode::Random,
            weights: FactorWeights::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&contents)?;
        debug!(path = %path.as_ref().display(), "loaded forecast config");
        Ok(config)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.step_minutes == 0 {
            return Err(ForecastError::InvalidParameter(
                "stepMinutes must be positive".to_string(),
            ));
        }

        if self.default_horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "defaultHorizon must be at least 1".to_string(),
            ));
        }

        if self.trend_window < 2 {
            return Err(ForecastError::InvalidParameter(
                "trendWindow must be at least 2".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.confidence_start)
            || !(0.0..=100.0).contains(&self.confidence_floor)
        {
            return Err(ForecastError::InvalidParameter(
                "confidenceStart and confidenceFloor must be between 0 and 100".to_string(),
            ));
        }

        if self.confidence_floor > self.confidence_start {
            return Err(ForecastError::InvalidParameter(format!(
                "confidenceFloor ({}) exceeds confidenceStart ({})",
                self.confidence_floor, self.confidence_start
            )));
        }

        if !(self.confidence_decay.is_finite() && self.confidence_decay >= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "confidenceDecay must be a non-negative number".to_string(),
            ));
        }

        if !(self.speed_floor.is_finite() && self.speed_floor > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "speedFloor must be positive".to_string(),
            ));
        }

        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(ForecastError::InvalidParameter(format!(
                "utcOffsetMinutes out of range: {}",
                self.utc_offset_minutes
            )));
        }

        if let Some((name, value)) = self
            .weights
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(ForecastError::InvalidParameter(format!(
                "weight {} must be a non-negative number, got {}",
                name, value
            )));
        }

        Ok(())
    }

    /// Time between forecast points
    pub fn step_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.step_minutes))
    }

    /// Offset for local-time lookups, UTC if out of range
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// Confidence for a 1-based forecast `step`
    pub fn confidence_at(&self, step: usize) -> f64 {
        let decayed = self.confidence_start - step.saturating_sub(1) as f64 * self.confidence_decay;
        decayed.max(self.confidence_floor)
    }
}
