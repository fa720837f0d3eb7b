//! The environmental snapshot bite/bait scoring reads from, derived from
//! [`bayscan_core::EnvironmentSnapshot`] plus the fields the composition
//! formulas need that the raw snapshot doesn't carry directly.

use bayscan_core::{ClarityBand, CloudCover, EnvironmentSnapshot, PressureTrend, TideStage, TimeOfDay};

/// Snapshot of conditions a single bite/bait score is computed against.
#[derive(Debug, Clone)]
pub struct Conditions {
    /// Water temperature, °F, if known.
    pub water_temp_f: Option<f64>,
    /// Air temperature, °F.
    pub air_temp_f: f64,
    /// Air temperature 24 hours prior, °F, for the cold-snap penalty.
    pub air_temp_24h_ago_f: Option<f64>,
    /// Derived tide stage.
    pub tide_stage: TideStage,
    /// Tide change rate, normalized `[0, 1]`.
    pub tide_change_rate: f64,
    /// Current speed, ft/s.
    pub current_speed_ft_s: f64,
    /// Wind speed, mph.
    pub wind_speed_mph: f64,
    /// Cardinal wind direction, if known.
    pub wind_direction: Option<String>,
    /// Barometric pressure trend.
    pub pressure_trend: PressureTrend,
    /// Cloud cover.
    pub cloud_cover: CloudCover,
    /// Part of day.
    pub time_of_day: TimeOfDay,
    /// Today's moon phase, `[0, 1)`.
    pub moon_phase: f64,
    /// Water clarity.
    pub water_clarity: ClarityBand,
    /// Salinity, ppt, if known.
    pub salinity_ppt: Option<f64>,
    /// Salinity 24 hours prior, ppt, if known.
    pub salinity_24h_ago_ppt: Option<f64>,
    /// Calendar month, 1-based.
    pub month: u32,
}

impl Conditions {
    /// Build from an environment snapshot, leaving fields the snapshot
    /// doesn't carry (24h deltas, salinity) unset.
    pub fn from_snapshot(snapshot: &EnvironmentSnapshot, month: u32) -> Self {
        Self {
            water_temp_f: snapshot.water_temp_f,
            air_temp_f: snapshot.air_temp_f,
            air_temp_24h_ago_f: None,
            tide_stage: snapshot.tide_stage,
            tide_change_rate: snapshot.tide_change_rate,
            current_speed_ft_s: 0.0,
            wind_speed_mph: snapshot.wind_speed_mph,
            wind_direction: snapshot.wind_direction.clone(),
            pressure_trend: snapshot.pressure_trend,
            cloud_cover: snapshot.cloud_cover,
            time_of_day: snapshot.time_of_day,
            moon_phase: snapshot.moon_phase,
            water_clarity: ClarityBand::Clean,
            salinity_ppt: None,
            salinity_24h_ago_ppt: None,
            month,
        }
    }

    /// True if the 24-hour air temperature drop exceeds 10 °F (cold snap).
    pub fn is_cold_snap(&self) -> bool {
        self.air_temp_24h_ago_f
            .is_some_and(|prior| prior - self.air_temp_f > 10.0)
    }

    /// True if the 24-hour salinity change exceeds 5 ppt in magnitude.
    pub fn is_rapid_salinity_change(&self) -> bool {
        match (self.salinity_ppt, self.salinity_24h_ago_ppt) {
            (Some(now), Some(prior)) => (now - prior).abs() > 5.0,
            _ => false,
        }
    }
}
