//! Flat records and CSV export
//!
//! [`Prediction`] nests its factors and [`Sample`] carries no status, so both
//! are flattened into one-row records before being handed to the `csv`
//! writer. Any `Serialize` record type can be exported.

use crate::data::Prediction;
use crate::error::{ForecastError, Result};
use crate::factors::WeatherCondition;
use crate::utils::CongestionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;
use traffic_feed::Sample;

/// One prediction as a CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub location_id: String,
    /// 1-based forecast step
    pub step: usize,
    pub timestamp: DateTime<Utc>,
    pub predicted_congestion: f64,
    pub predicted_speed: f64,
    pub confidence: f64,
    pub status: CongestionStatus,
    pub time_of_day_factor: f64,
    pub weather_condition: Option<WeatherCondition>,
    pub weather_impact: f64,
    pub seasonal_factor: f64,
}

/// One observed sample as a CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRecord {
    pub timestamp: DateTime<Utc>,
    pub location_id: String,
    pub average_speed: f64,
    pub total_vehicles: u32,
    pub congestion_level: f64,
    pub status: CongestionStatus,
}

impl From<&Sample> for SampleRecord {
    fn from(sample: &Sample) -> Self {
        Self {
            timestamp: sample.timestamp,
            location_id: sample.location_id.clone(),
            average_speed: sample.average_speed,
            total_vehicles: sample.total_vehicles,
            congestion_level: sample.congestion_level,
            status: CongestionStatus::from_level(sample.congestion_level),
        }
    }
}

/// Flatten a prediction run into rows
pub fn prediction_records(location_id: &str, predictions: &[Prediction]) -> Vec<PredictionRecord> {
    predictions
        .iter()
        .enumerate()
        .map(|(i, p)| PredictionRecord {
            location_id: location_id.to_string(),
            step: i + 1,
            timestamp: p.timestamp,
            predicted_congestion: p.predicted_congestion,
            predicted_speed: p.predicted_speed,
            confidence: p.confidence,
            status: CongestionStatus::from_level(p.predicted_congestion),
            time_of_day_factor: p.factors.time_of_day_factor,
            weather_condition: p.factors.weather_condition,
            weather_impact: p.factors.weather_impact,
            seasonal_factor: p.factors.seasonal_factor,
        })
        .collect()
}

/// Flatten samples into rows
pub fn sample_records(samples: &[Sample]) -> Vec<SampleRecord> {
    samples.iter().map(SampleRecord::from).collect()
}

/// Write `records` as CSV with a header row; nothing is written when empty
pub fn write_records<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render `records` as a CSV string, empty for no records
pub fn to_csv_string<T: Serialize>(records: &[T]) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    String::from_utf8(buffer).map_err(|e| ForecastError::InvalidParameter(e.to_string()))
}

/// Write `records` to a CSV file, replacing it if present
pub fn write_csv<P: AsRef<Path>, T: Serialize>(path: P, records: &[T]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_records(file, records)?;
    debug!(path = %path.as_ref().display(), rows = records.len(), "wrote csv");
    Ok(())
}
