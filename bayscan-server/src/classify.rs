//! Translates a logged catch's raw conditions into the coarse bands
//! [`bayscan_scoring::learning::CatchConditions`] needs, using the exact
//! favorable/unfavorable direction matching [`bayscan_scoring::bite`]'s
//! `condition_match` applies when scoring, and the fixed current-speed
//! thresholds documented on [`CurrentBand`] itself.

use bayscan_core::{CurrentBand, SpeciesKey, WindBand};
use bayscan_rules::species::SpeciesProfile;

/// Classify a wind direction against a species' preference table. Species
/// with no full profile (tier 2) have no wind preference table, so their
/// catches are always logged as neutral.
pub fn wind_band(profile: Option<&SpeciesProfile>, direction: Option<&str>) -> WindBand {
    let Some(profile) = profile else {
        return WindBand::Neutral;
    };
    match direction {
        Some(d) if profile.wind.favorable_directions.contains(&d) => WindBand::Favorable,
        Some(d) if profile.wind.unfavorable_directions.contains(&d) => WindBand::Unfavorable,
        _ => WindBand::Neutral,
    }
}

/// Classify a current speed, ft/s, into a [`CurrentBand`] using the fixed
/// global thresholds the type documents (< 0.3 low, < 0.6 medium, else high).
pub fn current_band(current_speed_ft_s: f64) -> CurrentBand {
    if current_speed_ft_s < 0.3 {
        CurrentBand::Low
    } else if current_speed_ft_s < 0.6 {
        CurrentBand::Medium
    } else {
        CurrentBand::High
    }
}

/// Every species key the engine recognizes anywhere: the seasonality table,
/// plus the bait/predator/prey rosters seasonality doesn't cover.
pub fn is_known_species(species: &SpeciesKey) -> bool {
    bayscan_rules::seasonality::SEASONALITY_TABLE
        .iter()
        .any(|entry| entry.species == species.as_str())
        || bayscan_rules::species::BAIT_SPECIES.contains(&species.as_str())
        || bayscan_rules::species::PREY_SPECIES.contains(&species.as_str())
        || bayscan_rules::species::PREDATOR_SPECIES.contains(&species.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayscan_rules::species;

    #[test]
    fn tier_two_species_with_no_profile_logs_neutral_wind() {
        assert_eq!(wind_band(None, Some("N")), WindBand::Neutral);
    }

    #[test]
    fn known_profile_species_is_recognized() {
        assert!(is_known_species(&SpeciesKey::new("redfish")));
        assert!(is_known_species(&SpeciesKey::new("live_shrimp")));
        assert!(!is_known_species(&SpeciesKey::new("narwhal")));
    }

    #[test]
    fn current_band_thresholds_match_the_documented_cutoffs() {
        assert_eq!(current_band(0.1), CurrentBand::Low);
        assert_eq!(current_band(0.4), CurrentBand::Medium);
        assert_eq!(current_band(0.9), CurrentBand::High);
    }

    #[test]
    fn favorable_direction_classifies_favorable() {
        let trout = species::profile(&SpeciesKey::new("speckled_trout")).unwrap();
        let favorable = trout.wind.favorable_directions.first().copied();
        if let Some(d) = favorable {
            assert_eq!(wind_band(Some(&trout), Some(d)), WindBand::Favorable);
        }
    }
}
