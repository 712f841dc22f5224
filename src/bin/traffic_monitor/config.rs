//! Settings for the `traffic_monitor` binary
//!
//! Everything is read from environment variables, optionally seeded from a
//! `.env` file by the caller, so `env::var` lookups stay in this module.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Parse an optional environment variable into `$ty`.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
    };
}

/// Runtime settings for one monitoring session.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Location to monitor.
    pub location_id: String,

    /// Readings to simulate after bootstrapping.
    pub ticks: u32,

    /// Seed for both the sample generator and the forecaster, entropy if unset.
    pub seed: Option<u64>,

    /// Forecast steps per run, overriding the forecast config.
    pub horizon: Option<usize>,

    /// Minutes between forecast steps, overriding the forecast config.
    pub step_minutes: Option<u32>,

    /// Ticks between prediction runs.
    pub predict_every: usize,

    /// JSON forecast config file.
    pub forecast_config: Option<PathBuf>,

    /// CSV file receiving the final prediction run.
    pub export_csv: Option<PathBuf>,
}

/// Load settings from environment variables with defaults.
///
/// Optional:
/// - `TRAFFIC_LOCATION` – location id (default: `city-center`)
/// - `TRAFFIC_TICKS` – simulated readings (default: 36)
/// - `TRAFFIC_SEED` – RNG seed (default: entropy)
/// - `FORECAST_HORIZON` – steps per run (default: from config, 6)
/// - `FORECAST_STEP_MINUTES` – minutes per step (default: from config, 15)
/// - `TRAFFIC_PREDICT_EVERY` – ticks between runs (default: 3)
/// - `FORECAST_CONFIG` – path to a JSON `ForecastConfig`
/// - `TRAFFIC_EXPORT_CSV` – path for the final run as CSV
pub fn load_from_env() -> Result<MonitorSettings> {
    let location_id = env::var("TRAFFIC_LOCATION").unwrap_or_else(|_| "city-center".to_string());
    let ticks = parse_env!("TRAFFIC_TICKS", u32).unwrap_or(36);
    let seed = parse_env!("TRAFFIC_SEED", u64);
    let horizon = parse_env!("FORECAST_HORIZON", usize);
    let step_minutes = parse_env!("FORECAST_STEP_MINUTES", u32);
    let predict_every = parse_env!("TRAFFIC_PREDICT_EVERY", usize).unwrap_or(3);

    if predict_every == 0 {
        return Err(anyhow!("TRAFFIC_PREDICT_EVERY must be at least 1"));
    }

    Ok(MonitorSettings {
        location_id,
        ticks,
        seed,
        horizon,
        step_minutes,
        predict_every,
        forecast_config: env::var_os("FORECAST_CONFIG").map(PathBuf::from),
        export_csv: env::var_os("TRAFFIC_EXPORT_CSV").map(PathBuf::from),
    })
}

impl MonitorSettings {
    /// Log the loaded settings.
    pub fn log_config(&self) {
        let or_default = |value: Option<String>| value.unwrap_or_else(|| "(default)".to_string());

        tracing::info!("Configuration loaded:");
        tracing::info!("  TRAFFIC_LOCATION      : {}", self.location_id);
        tracing::info!("  TRAFFIC_TICKS         : {}", self.ticks);
        tracing::info!("  TRAFFIC_SEED          : {}", or_default(self.seed.map(|s| s.to_string())));
        tracing::info!("  FORECAST_HORIZON      : {}", or_default(self.horizon.map(|h| h.to_string())));
        tracing::info!(
            "  FORECAST_STEP_MINUTES : {}",
            or_default(self.step_minutes.map(|m| m.to_string()))
        );
        tracing::info!("  TRAFFIC_PREDICT_EVERY : {}", self.predict_every);
        tracing::info!(
            "  FORECAST_CONFIG       : {}",
            or_default(self.forecast_config.as_ref().map(|p| p.display().to_string()))
        );
        tracing::info!(
            "  TRAFFIC_EXPORT_CSV    : {}",
            or_default(self.export_csv.as_ref().map(|p| p.display().to_string()))
        );
    }
}
