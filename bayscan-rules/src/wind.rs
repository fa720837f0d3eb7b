//! Cold-north-wind detection and the depth-shift rule it drives (§4.5).

use crate::zones;
use bayscan_core::SpeciesKey;

const NORTH_WIND_DIRECTIONS: &[&str] = &["N", "NNE", "NE", "NNW", "NW"];
const COLD_TEMP_THRESHOLD_F: f64 = 60.0;

/// True if the direction is one of the five north-derived compass points.
pub fn is_north_wind(direction: Option<&str>) -> bool {
    direction
        .map(|d| NORTH_WIND_DIRECTIONS.contains(&d.to_uppercase().as_str()))
        .unwrap_or(false)
}

fn is_cold(air_temp_f: Option<f64>, water_temp_f: Option<f64>) -> bool {
    air_temp_f.is_some_and(|t| t <= COLD_TEMP_THRESHOLD_F)
        || water_temp_f.is_some_and(|t| t <= COLD_TEMP_THRESHOLD_F)
}

/// Strong penalty: north wind, >= 10 mph, and cold air or water.
pub fn has_strong_penalty(
    direction: Option<&str>,
    speed_mph: Option<f64>,
    air_temp_f: Option<f64>,
    water_temp_f: Option<f64>,
) -> bool {
    if !is_north_wind(direction) {
        return false;
    }
    match speed_mph {
        Some(speed) if speed >= 10.0 => is_cold(air_temp_f, water_temp_f),
        _ => false,
    }
}

/// Moderate penalty: any north wind while the dock is a shallow location,
/// regardless of speed or temperature.
pub fn has_moderate_penalty(direction: Option<&str>) -> bool {
    is_north_wind(direction) && zones::average_dock_depth() < 6.0
}

/// Recommended depth shift, in feet, for a species under the current wind
/// conditions. Capped by the caller at [`zones::MAX_ZONE_DEPTH_FT`].
pub fn depth_shift_ft(
    species: &SpeciesKey,
    direction: Option<&str>,
    speed_mph: Option<f64>,
    air_temp_f: Option<f64>,
    water_temp_f: Option<f64>,
) -> f64 {
    let shallow = matches!(species.as_str(), "speckled_trout" | "redfish" | "mullet");
    let mid = matches!(species.as_str(), "white_trout" | "croaker" | "blue_crab");

    if has_strong_penalty(direction, speed_mph, air_temp_f, water_temp_f) {
        if shallow {
            3.0
        } else if mid {
            2.0
        } else {
            1.0
        }
    } else if has_moderate_penalty(direction) {
        if shallow {
            1.0
        } else {
            0.0
        }
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_penalty_requires_cold_and_speed() {
        assert!(has_strong_penalty(Some("NW"), Some(12.0), Some(55.0), None));
        assert!(!has_strong_penalty(Some("NW"), Some(5.0), Some(55.0), None));
        assert!(!has_strong_penalty(Some("NW"), Some(12.0), Some(70.0), Some(70.0)));
        assert!(!has_strong_penalty(Some("SE"), Some(12.0), Some(55.0), None));
    }

    #[test]
    fn shallow_species_shift_more_under_strong_penalty() {
        let trout = SpeciesKey::from("speckled_trout");
        let shark = SpeciesKey::from("shark");
        assert_eq!(depth_shift_ft(&trout, Some("N"), Some(15.0), Some(50.0), None), 3.0);
        assert_eq!(depth_shift_ft(&shark, Some("N"), Some(15.0), Some(50.0), None), 1.0);
    }

    #[test]
    fn no_wind_means_no_shift() {
        let trout = SpeciesKey::from("speckled_trout");
        assert_eq!(depth_shift_ft(&trout, Some("SE"), Some(15.0), Some(50.0), None), 0.0);
    }
}
