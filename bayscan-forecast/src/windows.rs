//! Forecast window builder (§4.10): buckets a horizon into fixed-width
//! windows and scores each one against projected conditions.

use crate::safety;
use bayscan_core::config::MarineConfig;
use bayscan_core::{clamp, BiteLabel, SafetyLevel, SpeciesKey};
use bayscan_scoring::Conditions;
use chrono::{DateTime, Duration, Utc};

/// Default window width.
pub const DEFAULT_WINDOW_HOURS: i64 = 2;
/// Default forecast horizon.
pub const DEFAULT_HORIZON_HOURS: i64 = 24;
/// Horizon ceiling; callers that request more are clamped down to this.
pub const MAX_HORIZON_HOURS: i64 = 48;

/// Divide `[start, start + horizon_hours)` into fixed `window_hours`-wide
/// buckets, clamping the horizon to [`MAX_HORIZON_HOURS`].
pub fn window_bounds(
    start: DateTime<Utc>,
    horizon_hours: i64,
    window_hours: i64,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let horizon_hours = horizon_hours.clamp(window_hours, MAX_HORIZON_HOURS);
    let mut bounds = Vec::new();
    let mut t = start;
    let end = start + Duration::hours(horizon_hours);
    while t < end {
        let window_end = (t + Duration::hours(window_hours)).min(end);
        bounds.push((t, window_end));
        t = window_end;
    }
    bounds
}

/// The projected conditions and marine hazard reading for one window.
#[derive(Debug, Clone)]
pub struct WindowSlice {
    /// Window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
    /// Conditions projected for this window (from tide predictions + weather forecast).
    pub conditions: Conditions,
    /// Projected significant wave height, feet.
    pub wave_height_ft: f64,
    /// Hazard narrative, if any.
    pub hazard_text: Option<String>,
}

/// A single scored forecast window.
#[derive(Debug, Clone)]
pub struct ForecastWindow {
    /// Window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
    /// `running_factor * env_score * 100`, minus the marine-hazard penalty,
    /// clamped to `[0, 100]`.
    pub bite_score: f64,
    /// Label derived from `bite_score` (thresholds 71/41/21).
    pub label: BiteLabel,
    /// Marine safety level projected for this window.
    pub safety: SafetyLevel,
}

/// Score one window slice for `species`.
pub fn score_window(species: &SpeciesKey, slice: &WindowSlice, marine: &MarineConfig) -> ForecastWindow {
    let running_factor = bayscan_rules::seasonality::running_factor(species, slice.conditions.month);
    let profile = bayscan_rules::species::profile(species);
    let (_, env_score) = bayscan_scoring::bite::combined_env_score(profile.as_ref(), &slice.conditions);

    let safety = safety::classify(slice.wave_height_ft, slice.hazard_text.as_deref(), marine);
    let penalty = safety::bite_score_penalty(safety, marine);

    let raw = running_factor * env_score * 100.0 - penalty;
    let bite_score = clamp(raw, 0.0, 100.0);

    ForecastWindow {
        start: slice.start,
        end: slice.end,
        bite_score,
        label: BiteLabel::from_score(bite_score),
        safety,
    }
}

/// Score every window slice for `species`.
pub fn build_windows(species: &SpeciesKey, slices: &[WindowSlice], marine: &MarineConfig) -> Vec<ForecastWindow> {
    slices.iter().map(|slice| score_window(species, slice, marine)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_cover_the_full_horizon_without_gaps() {
        let start = Utc::now();
        let bounds = window_bounds(start, 24, 2);
        assert_eq!(bounds.len(), 12);
        assert_eq!(bounds[0].0, start);
        assert_eq!(bounds.last().unwrap().1, start + Duration::hours(24));
        for pair in bounds.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn horizon_request_beyond_the_cap_is_clamped() {
        let start = Utc::now();
        let bounds = window_bounds(start, 1000, 2);
        assert_eq!(bounds.last().unwrap().1, start + Duration::hours(MAX_HORIZON_HOURS));
    }
}
