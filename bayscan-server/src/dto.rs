//! JSON request/response shapes for the HTTP surface (§6).

use bayscan_core::{ConfidenceLevel, OverallTier, ScoreRating, SpeciesKey, ZoneId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One species' current score summary, used in [`CurrentResponse::species`]
/// and [`CurrentResponse::top_species`].
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesSummary {
    pub species: String,
    pub species_name: String,
    pub zone_id: String,
    pub bite_score: f64,
    pub rating: ScoreRating,
}

/// A zone and the score that put it among the current top zones.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneSummary {
    pub zone_id: String,
    pub bite_score: f64,
}

/// Depth guidance for the current top zone.
#[derive(Debug, Clone, Serialize)]
pub struct DepthInfo {
    pub zone_id: String,
    pub recommended_depth_ft: f64,
    pub depth_range_ft: (f64, f64),
}

/// `GET /current` response (§6).
#[derive(Debug, Clone, Serialize)]
pub struct CurrentResponse {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub overall_score: f64,
    pub tide_state: String,
    pub tide_height: f64,
    pub air_temp_f: f64,
    pub water_temp_f: Option<f64>,
    pub wind_speed: f64,
    pub wind_direction: Option<String>,
    pub wind_gust: Option<f64>,
    pub moon_phase: f64,
    pub conditions_summary: String,
    pub depth_info: DepthInfo,
    pub top_species: Vec<SpeciesSummary>,
    pub species: Vec<SpeciesSummary>,
    pub clarity: String,
    pub clarity_tip: String,
    pub confidence: ConfidenceLevel,
    pub rig_of_moment: Option<String>,
    pub best_zones: Vec<ZoneSummary>,
    pub pro_tip: Option<String>,
    pub current_strength: String,
    pub moon_tide_window: String,
}

/// `GET /zone-bite-scores` response (§6).
#[derive(Debug, Clone, Serialize)]
pub struct ZoneBiteScoreResponse {
    pub species: String,
    pub species_name: String,
    pub zone_id: String,
    pub bite_score: f64,
    pub rating: ScoreRating,
    pub confidence: ConfidenceLevel,
    pub reason_summary: String,
    pub tip: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub data_source: &'static str,
}

/// A species' score within one forecast window. Forecast windows aren't
/// zone-specific (§4.10's window builder scores per species only), unlike
/// [`SpeciesSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct ForecastSpeciesScore {
    pub species: String,
    pub species_name: String,
    pub bite_score: f64,
    pub label: bayscan_core::BiteLabel,
}

/// One scored 2-hour window within a `GET /forecast` response.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastWindowDto {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub overall_tier: OverallTier,
    pub top_species: Vec<ForecastSpeciesScore>,
}

/// `GET /forecast` response.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    pub windows: Vec<ForecastWindowDto>,
}

/// One hour of a `GET /hourly-outlook` response.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyOutlookEntry {
    pub hour_start: DateTime<Utc>,
    pub overall_tier: OverallTier,
    pub top_species: Vec<ForecastSpeciesScore>,
}

/// `GET /hourly-outlook` response.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyOutlookResponse {
    pub hours: Vec<HourlyOutlookEntry>,
}

/// `GET /alerts` response entry.
#[derive(Debug, Clone, Serialize)]
pub struct AlertDto {
    pub species: String,
    pub species_name: String,
    pub threshold: i32,
    pub observed_score: f64,
    pub fired_at: DateTime<Utc>,
}

/// `GET /tide` response.
#[derive(Debug, Clone, Serialize)]
pub struct TideResponse {
    pub tide_height_ft: f64,
    pub tide_stage: String,
    pub tide_change_rate: f64,
    pub captured_at: DateTime<Utc>,
}

/// `GET /species/{key}` response.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesDetailResponse {
    pub species: String,
    pub species_name: String,
    pub tier: &'static str,
    pub running_factor: f64,
    pub zone_scores: Vec<SpeciesSummary>,
}

/// `GET /bait-forecast` response entry.
#[derive(Debug, Clone, Serialize)]
pub struct BaitForecastEntry {
    pub bait_species: String,
    pub bait_name: String,
    pub zone_id: String,
    pub bait_score: f64,
    pub baseline_label: &'static str,
}

/// `GET /bait/{key}` response.
#[derive(Debug, Clone, Serialize)]
pub struct BaitDetailResponse {
    pub bait_species: String,
    pub bait_name: String,
    pub zone_scores: Vec<BaitForecastEntry>,
}

/// Acknowledgement returned from every successful write (§7's "return the
/// persisted id and a short message" rule).
#[derive(Debug, Clone, Serialize)]
pub struct WriteAck {
    pub id: i64,
    pub message: String,
}

/// `DELETE` acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteAck {
    pub deleted: bool,
}

fn default_quantity() -> i32 {
    1
}

/// `POST /catches` request body. Only `species`/`zone_id`/`quantity`/
/// `timestamp` persist to the catch record itself; `presentation`/`rig_type`
/// feeds the rig-effect learning update, `predator_seen_recently` and
/// `notes` are accepted for forward compatibility but not yet stored —
/// see DESIGN.md.
#[derive(Debug, Clone, Deserialize)]
pub struct CatchRequest {
    pub zone_id: String,
    pub species: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub size: Option<f64>,
    pub kept: Option<bool>,
    pub bait_used: Option<String>,
    pub presentation: Option<String>,
    pub rig_type: Option<String>,
    pub predator_seen_recently: Option<bool>,
    pub days_since_last_checked: Option<f64>,
    pub notes: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// `POST /bait-logs` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct BaitLogRequest {
    pub zone_id: String,
    pub bait_species: String,
    pub quantity_estimate: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// `POST /predator-logs` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PredatorLogRequest {
    pub zone_id: String,
    pub species: String,
    pub timestamp: Option<DateTime<Utc>>,
}

pub(crate) fn species_key(s: &str) -> SpeciesKey {
    SpeciesKey::new(s.to_string())
}

pub(crate) fn zone_id_str(zone: ZoneId) -> String {
    zone.number().to_string()
}
