//! Shared data-model records (§3), used by the persistence, environmental
//! client, scoring, forecast, and HTTP layers alike.

use crate::{ClarityBand, CloudCover, PressureTrend, SpeciesKey, TideStage, TimeOfDay, ZoneId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tide height observation or prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideSample {
    /// Timestamp the sample applies to.
    pub time: DateTime<Utc>,
    /// Height in feet, relative to station datum.
    pub height_ft: f64,
}

/// A weather observation or forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPoint {
    /// Timestamp the reading applies to.
    pub time: DateTime<Utc>,
    /// Air temperature, °F.
    pub air_temp_f: f64,
    /// Water temperature, °F, if available.
    pub water_temp_f: Option<f64>,
    /// Wind speed, mph.
    pub wind_speed_mph: f64,
    /// Cardinal wind direction (16-point compass), if available.
    pub wind_direction: Option<String>,
    /// Barometric pressure trend.
    pub pressure_trend: PressureTrend,
    /// Cloud cover.
    pub cloud_cover: CloudCover,
    /// Whether this point is a forecast rather than an observation.
    pub is_forecast: bool,
}

/// Sunrise/sunset/moon-phase data for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AstronomicalDay {
    /// Calendar date (UTC) this record describes.
    pub date: chrono::NaiveDate,
    /// Sunrise, local time of day.
    pub sunrise: chrono::NaiveTime,
    /// Sunset, local time of day.
    pub sunset: chrono::NaiveTime,
    /// Moon phase in `[0, 1)`, 0 = new moon, 0.5 = full moon.
    pub moon_phase: f64,
}

/// A marine hazard forecast for the dock's NOAA zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineCondition {
    /// Timestamp the reading applies to.
    pub time: DateTime<Utc>,
    /// Significant wave height, feet.
    pub wave_height_ft: f64,
    /// Hazard narrative, if any (small craft advisory text etc.).
    pub hazard_text: Option<String>,
}

/// A single appended environmental snapshot (§4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// Capture time.
    pub captured_at: DateTime<Utc>,
    /// Interpolated tide height at capture time, feet.
    pub tide_height_ft: f64,
    /// Derived tide stage.
    pub tide_stage: TideStage,
    /// Tide change rate, normalized to `[0, 1]` against 2 ft/hr.
    pub tide_change_rate: f64,
    /// Air temperature, °F.
    pub air_temp_f: f64,
    /// Water temperature, °F, if known.
    pub water_temp_f: Option<f64>,
    /// Wind speed, mph.
    pub wind_speed_mph: f64,
    /// Cardinal wind direction, if known.
    pub wind_direction: Option<String>,
    /// Barometric pressure trend.
    pub pressure_trend: PressureTrend,
    /// Cloud cover.
    pub cloud_cover: CloudCover,
    /// Derived time of day.
    pub time_of_day: TimeOfDay,
    /// Today's moon phase, `[0, 1)`.
    pub moon_phase: f64,
    /// Whether this reading came from a forecast rather than a live observation.
    pub from_forecast: bool,
    /// Derived dock_lights_on = time_of_day in {dusk, night}.
    pub dock_lights_on: bool,
}

/// A logged catch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catch {
    /// Species caught.
    pub species: SpeciesKey,
    /// Zone the catch was made in.
    pub zone: ZoneId,
    /// When the catch happened.
    pub timestamp: DateTime<Utc>,
    /// Number of fish landed in this entry.
    pub quantity: i32,
}

/// A logged sighting of bait activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaitLog {
    /// Bait species observed.
    pub bait_species: SpeciesKey,
    /// Zone the sighting was made in.
    pub zone: ZoneId,
    /// When the sighting happened.
    pub timestamp: DateTime<Utc>,
    /// Coarse quantity estimate ("plenty", "some", or unspecified).
    pub quantity_estimate: Option<String>,
}

/// A logged predator sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredatorLog {
    /// Predator species observed.
    pub species: SpeciesKey,
    /// Zone the sighting was made in.
    pub zone: ZoneId,
    /// When the sighting happened.
    pub timestamp: DateTime<Utc>,
}

/// An evaluated alert, comparing a species' current bite score to its
/// configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Species the alert concerns.
    pub species: SpeciesKey,
    /// Threshold that was crossed, 0-100.
    pub threshold: i32,
    /// Score observed at evaluation time.
    pub observed_score: f64,
    /// When the alert fired.
    pub fired_at: DateTime<Utc>,
}
