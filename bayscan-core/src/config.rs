//! Configuration for the Bayscan engine.
//!
//! Mirrors the flat key list the engine recognizes: location, tide, weather,
//! scheduler, alerts, marine, server, plus a `database_url` for the
//! persistence layer. Loaded via the `config` crate with precedence
//! (lowest to highest): compiled-in [`Default`], an optional TOML file,
//! then `BAYSCAN_*` environment variables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration structure for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed forecast location.
    pub location: LocationConfig,
    /// Tide data source configuration.
    pub tide: TideConfig,
    /// Weather data source configuration.
    pub weather: WeatherConfig,
    /// Scheduler intervals.
    pub scheduler: SchedulerConfig,
    /// Per-species alert thresholds (bite_score, 0-100).
    #[serde(default)]
    pub alerts: HashMap<String, i32>,
    /// Marine hazard configuration.
    pub marine: MarineConfig,
    /// HTTP server bind configuration.
    pub server: ServerConfig,
    /// Connection string for the persistence layer.
    pub database_url: String,
}

/// Fixed dock/forecast location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Human-readable location name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// IANA timezone name the write API interprets local timestamps in.
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: "Mobile Bay Dock".to_string(),
            latitude: 30.3960,
            longitude: -88.0399,
            timezone: "America/Chicago".to_string(),
        }
    }
}

/// Tide data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TideConfig {
    /// NOAA tide-prediction station id.
    pub prediction_station_id: String,
    /// NOAA real-time-conditions station id.
    pub realtime_station_id: String,
    /// Base URL of the tide API.
    pub api_url: String,
}

impl Default for TideConfig {
    fn default() -> Self {
        Self {
            prediction_station_id: "8735180".to_string(),
            realtime_station_id: "8736897".to_string(),
            api_url: "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter".to_string(),
        }
    }
}

/// Weather data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the weather API.
    pub api_url: String,
    /// User-Agent header required by some providers (e.g. NWS).
    pub user_agent: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.weather.gov".to_string(),
            user_agent: "bayscan (info@bayscan.dev)".to_string(),
        }
    }
}

/// Scheduler interval configuration, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Interval between ingestion + forecast-compute runs.
    pub fetch_interval_minutes: u64,
    /// Interval between forecast-window recomputes, if run independently of fetch.
    pub forecast_compute_interval_minutes: u64,
    /// Interval between environment snapshot captures.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_minutes: u64,
    /// Interval between periodic (decay) score recalculations.
    #[serde(default = "default_periodic_recalc")]
    pub periodic_recalc_minutes: u64,
}

fn default_snapshot_interval() -> u64 {
    10
}

fn default_periodic_recalc() -> u64 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fetch_interval_minutes: 30,
            forecast_compute_interval_minutes: 30,
            snapshot_interval_minutes: default_snapshot_interval(),
            periodic_recalc_minutes: default_periodic_recalc(),
        }
    }
}

/// Marine-hazard related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarineConfig {
    /// NOAA marine forecast zone identifier.
    pub zone: String,
    /// Fetch interval, in minutes.
    pub fetch_interval_minutes: u64,
    /// Safety-score thresholds per hazard level.
    #[serde(default)]
    pub safety_thresholds: HashMap<String, i32>,
    /// Bite-score penalties applied by the forecast builder per safety level.
    #[serde(default)]
    pub bite_score_penalties: HashMap<String, i32>,
}

impl Default for MarineConfig {
    fn default() -> Self {
        let mut bite_score_penalties = HashMap::new();
        bite_score_penalties.insert("UNSAFE".to_string(), 20);
        bite_score_penalties.insert("CAUTION".to_string(), 8);

        let mut safety_thresholds = HashMap::new();
        safety_thresholds.insert("CAUTION".to_string(), 60);
        safety_thresholds.insert("UNSAFE".to_string(), 30);

        Self {
            zone: "GMZ650".to_string(),
            fetch_interval_minutes: 60,
            safety_thresholds,
            bite_score_penalties,
        }
    }
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Enable verbose/debug behavior (extra logging, relaxed CORS).
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            debug: false,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut alerts = HashMap::new();
        alerts.insert("speckled_trout".to_string(), 70);
        alerts.insert("redfish".to_string(), 70);
        alerts.insert("flounder".to_string(), 65);

        Self {
            location: LocationConfig::default(),
            tide: TideConfig::default(),
            weather: WeatherConfig::default(),
            scheduler: SchedulerConfig::default(),
            alerts,
            marine: MarineConfig::default(),
            server: ServerConfig::default(),
            database_url: "sqlite://bayscan.db".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration with the standard precedence: compiled-in
    /// defaults, an optional TOML file, then `BAYSCAN_*` environment
    /// variable overrides.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let defaults = EngineConfig::default();
        let defaults_json = serde_json::to_string(&defaults)
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(&defaults_json, config::FileFormat::Json));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        } else {
            builder = builder
                .add_source(config::File::with_name("config/bayscan").required(false))
                .add_source(config::File::with_name("bayscan").required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("BAYSCAN")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate invariants that can't be expressed in the type system alone.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be greater than 0".to_string());
        }
        if self.database_url.is_empty() {
            errors.push("database_url is required".to_string());
        }
        if self.scheduler.snapshot_interval_minutes == 0 {
            errors.push("scheduler.snapshot_interval_minutes must be greater than 0".to_string());
        }
        if self.location.timezone.is_empty() {
            errors.push("location.timezone is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut config = EngineConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_has_five_zones_worth_of_alert_thresholds_unset_is_fine() {
        let config = EngineConfig::default();
        assert!(config.alerts.contains_key("speckled_trout"));
    }
}
