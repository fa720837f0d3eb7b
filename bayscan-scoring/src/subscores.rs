//! The six pure, table-driven sub-score functions (§4.4). Each returns a
//! value in `[0, 1]`; species-dependent ones (`wind_score`, `temp_score`)
//! fall back to a neutral 0.5 when no profile is supplied, per §7's
//! "missing profile → default neutral sub-scores" rule.

use bayscan_core::{clamp01, CloudCover, PressureTrend, TideStage};
use bayscan_rules::species::{cloud_score as cloud_sub_score, pressure_sub_score, TempPreference, WindPreference};

/// Tide sub-score: moving stages scale from 0.6 up to 1.0 with
/// `tide_change_rate`; high/low sit at a flat 0.6; slack stays flat at 0.4.
pub fn tide_score(stage: TideStage, tide_change_rate: f64) -> f64 {
    let rate = clamp01(tide_change_rate);
    match stage {
        TideStage::Incoming | TideStage::Outgoing => 0.6 + 0.4 * rate,
        TideStage::High | TideStage::Low => 0.6,
        TideStage::Slack => 0.4,
    }
}

/// Wind sub-score. Without a profile, every wind reading scores the neutral
/// baseline (0.6).
pub fn wind_score(wind_speed_mph: f64, wind_direction: Option<&str>, wind: Option<&WindPreference>) -> f64 {
    let Some(wind) = wind else { return 0.6 };

    let is_favorable = wind_direction.is_some_and(|d| wind.favorable_directions.contains(&d));
    let is_unfavorable = wind_direction.is_some_and(|d| wind.unfavorable_directions.contains(&d));

    if is_favorable && wind_speed_mph <= wind.light_ideal_max {
        return 1.0;
    }
    if is_unfavorable && wind_speed_mph > 15.0 {
        return 0.2;
    }

    if wind.light_ideal_max <= 0.0 {
        return 0.6;
    }
    let t = clamp01(wind_speed_mph / wind.light_ideal_max);
    0.7 + (0.6 - 0.7) * t
}

/// Temperature sub-score, using water temperature when present, else air.
/// Without a profile, every reading scores the neutral baseline (0.5).
pub fn temp_score(water_temp_f: Option<f64>, air_temp_f: f64, temp: Option<&TempPreference>) -> f64 {
    let Some(temp) = temp else { return 0.5 };
    let t = water_temp_f.unwrap_or(air_temp_f);

    if t < temp.workable_min || t > temp.workable_max {
        return 0.0;
    }

    let mid = (temp.ideal_min + temp.ideal_max) / 2.0;
    if t >= temp.ideal_min && t <= temp.ideal_max {
        let half_span = (temp.ideal_max - temp.ideal_min).max(f64::EPSILON) / 2.0;
        let dist = (t - mid).abs() / half_span;
        return 1.0 - 0.5 * dist;
    }

    if t < temp.ideal_min {
        let span = (temp.ideal_min - temp.workable_min).max(f64::EPSILON);
        0.5 * clamp01((t - temp.workable_min) / span)
    } else {
        let span = (temp.workable_max - temp.ideal_max).max(f64::EPSILON);
        0.5 * clamp01((temp.workable_max - t) / span)
    }
}

/// Barometric pressure sub-score, fixed and species-independent.
pub fn pressure_score(trend: PressureTrend) -> f64 {
    pressure_sub_score(trend)
}

/// Moon-phase sub-score: triangular, peaking at 1.0 at new (0.0) and full
/// (0.5), trough of 0.4 at the quarters (0.25, 0.75).
pub fn moon_score(moon_phase: f64) -> f64 {
    let phase = moon_phase.rem_euclid(1.0);
    let local = phase.rem_euclid(0.5);
    let dist = local.min(0.5 - local);
    1.0 - (dist / 0.25) * 0.6
}

/// Cloud-cover sub-score, fixed and species-independent: fish favor low light.
pub fn cloud_score(cover: CloudCover) -> f64 {
    cloud_sub_score(cover)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tide_score_peaks_for_fast_moving_water() {
        assert_eq!(tide_score(TideStage::Incoming, 1.0), 1.0);
        assert_eq!(tide_score(TideStage::Incoming, 0.0), 0.6);
        assert_eq!(tide_score(TideStage::Slack, 1.0), 0.4);
    }

    #[test]
    fn wind_score_without_profile_is_neutral() {
        assert_eq!(wind_score(20.0, Some("N"), None), 0.6);
    }

    #[test]
    fn temp_score_peaks_at_ideal_midpoint() {
        let temp = TempPreference {
            ideal_min: 65.0,
            ideal_max: 75.0,
            workable_min: 55.0,
            workable_max: 85.0,
            bonus_in_ideal: 5.0,
            penalty_out_of_workable: -4.0,
        };
        assert_eq!(temp_score(Some(70.0), 70.0, Some(&temp)), 1.0);
        assert_eq!(temp_score(Some(50.0), 50.0, Some(&temp)), 0.0);
    }

    #[test]
    fn moon_score_peaks_at_new_and_full() {
        assert_eq!(moon_score(0.0), 1.0);
        assert_eq!(moon_score(0.5), 1.0);
        assert!((moon_score(0.25) - 0.4).abs() < 1e-9);
    }
}
