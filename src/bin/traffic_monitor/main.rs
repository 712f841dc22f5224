//! Entry point for the `traffic_monitor` demo.
//!
//! Runs one monitoring session on a simulated clock:
//! - Loads settings from environment variables or `.env`
//! - Initializes structured logging
//! - Bootstraps a live window from the mock sample source
//! - Ticks through simulated readings, printing each new prediction run and
//!   the reliability of the latest run as its steps are realized
//!
//! # Environment Variables
//! See [`config::load_from_env`] for the session settings, plus:
//! - `TRAFFIC_LOG_LEVEL` (optional) – log verbosity (default: `info`)
//! - `FORCE_COLOR` (optional) – force colored output on or off
use std::{env, io::IsTerminal};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use dotenvy::dotenv;
use tracing_subscriber::filter::EnvFilter;

use traffic_feed::{Clock, MockSampleSource};
use traffic_forecast::export::{prediction_records, write_csv};
use traffic_forecast::{
    ContextualForecaster, CongestionStatus, FactorTables, ForecastConfig, MonitorOptions,
    Prediction, TrafficMonitor,
};

mod config;

/// Spacing of simulated readings.
const TICK_MINUTES: i64 = 5;

fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let settings = config::load_from_env()?;
    settings.log_config();

    let mut forecast_config = match &settings.forecast_config {
        Some(path) => ForecastConfig::from_json_file(path)
            .with_context(|| format!("Failed to load forecast config {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    if let Some(horizon) = settings.horizon {
        forecast_config.default_horizon = horizon;
    }
    if let Some(step_minutes) = settings.step_minutes {
        forecast_config.step_minutes = step_minutes;
    }

    let forecaster = ContextualForecaster::new(forecast_config, FactorTables::default())?;

    let clock = Clock::manual(Utc::now(), Duration::minutes(TICK_MINUTES));
    let source = match settings.seed {
        Some(seed) => MockSampleSource::seeded(seed),
        None => MockSampleSource::new(),
    }
    .with_clock(clock)
    .with_interval(Duration::minutes(TICK_MINUTES))
    .strict();

    let options = MonitorOptions {
        location_id: settings.location_id.clone(),
        predict_every: settings.predict_every,
        ..MonitorOptions::default()
    };
    let mut monitor = match settings.seed {
        Some(seed) => TrafficMonitor::seeded(source, forecaster, options, seed),
        None => TrafficMonitor::new(source, forecaster, options),
    };

    let initial = monitor.bootstrap()?;
    if initial.is_empty() {
        tracing::warn!("insufficient data for predictions");
    } else {
        print_run("Initial predictions", &initial);
    }

    for _ in 0..settings.ticks {
        let outcome = monitor.tick()?;
        let sample = &outcome.sample;
        tracing::info!(
            "{} {:5.1}% ({}) {:5.1} mph {} vehicles",
            sample.timestamp.format("%H:%M"),
            sample.congestion_level,
            CongestionStatus::from_level(sample.congestion_level),
            sample.average_speed,
            sample.total_vehicles
        );

        if let Some(report) = &outcome.reliability {
            println!("{report}");
        }
        if let Some(predictions) = &outcome.predictions {
            print_run("New predictions", predictions);
        }
    }

    if let Some(path) = &settings.export_csv {
        if let Some(run) = monitor.history().latest(&settings.location_id) {
            write_csv(path, &prediction_records(&run.location_id, &run.predictions))?;
            tracing::info!("Exported {} predictions to {}", run.predictions.len(), path.display());
        }
    }

    Ok(())
}

fn print_run(title: &str, predictions: &[Prediction]) {
    println!("{title}:");
    for prediction in predictions {
        let weather = prediction
            .factors
            .weather_condition
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        println!(
            "  {}  {:5.1}% {:<8}  {:5.1} mph  {:3.0}% confident  {}",
            prediction.timestamp.format("%H:%M"),
            prediction.predicted_congestion,
            CongestionStatus::from_level(prediction.predicted_congestion).label(),
            prediction.predicted_speed,
            prediction.confidence,
            weather
        );
    }
}

/// Initialize the global tracing subscriber.
///
/// Target, file and line number are included. Colors follow `FORCE_COLOR`
/// when set and TTY detection otherwise. `RUST_LOG` wins over
/// `TRAFFIC_LOG_LEVEL`, which defaults to `info`.
fn init_tracing() {
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("TRAFFIC_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "info",
        };
        EnvFilter::new(level)
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
