//! Monthly presence ("running factor") tables for the fourteen tracked species.
//!
//! Running factor scale: 0.0 essentially absent, 0.3 present but low
//! numbers, 0.6 decent presence, 1.0 peak season.

use bayscan_core::SpeciesKey;

/// One running-factor value per calendar month (index 0 = January).
pub type MonthlyFactors = [f64; 12];

/// A species' full-year running-factor table plus its display name.
pub struct SeasonalityEntry {
    /// Canonical species key.
    pub species: &'static str,
    /// Human-readable display name.
    pub display_name: &'static str,
    /// Running factor for each month, January first.
    pub monthly: MonthlyFactors,
}

/// All fourteen tracked species, in the order the original tables list them.
pub static SEASONALITY_TABLE: &[SeasonalityEntry] = &[
    SeasonalityEntry {
        species: "speckled_trout",
        display_name: "Speckled Trout",
        monthly: [1.0, 0.6, 0.8, 0.8, 1.0, 1.0, 1.0, 0.6, 0.4, 0.6, 1.0, 1.0],
    },
    SeasonalityEntry {
        species: "redfish",
        display_name: "Redfish",
        monthly: [1.0, 0.6, 0.8, 0.8, 1.0, 1.0, 1.0, 0.6, 0.6, 0.8, 0.8, 0.8],
    },
    SeasonalityEntry {
        species: "flounder",
        display_name: "Flounder",
        monthly: [0.2, 0.6, 0.8, 1.0, 1.0, 0.8, 0.8, 0.6, 0.6, 1.0, 1.0, 0.6],
    },
    SeasonalityEntry {
        species: "sheepshead",
        display_name: "Sheepshead",
        monthly: [0.8, 0.8, 1.0, 1.0, 0.8, 0.4, 0.4, 0.4, 0.6, 0.8, 1.0, 1.0],
    },
    SeasonalityEntry {
        species: "mullet",
        display_name: "Mullet",
        monthly: [0.4, 0.4, 0.6, 0.8, 0.9, 1.0, 1.0, 1.0, 1.0, 1.0, 0.8, 0.5],
    },
    SeasonalityEntry {
        species: "mackerel",
        display_name: "Mackerel",
        monthly: [0.0, 0.0, 0.0, 0.2, 0.6, 0.8, 1.0, 1.0, 0.8, 0.8, 0.4, 0.0],
    },
    SeasonalityEntry {
        species: "croaker",
        display_name: "Croaker",
        monthly: [0.3, 0.3, 0.5, 0.7, 0.9, 1.0, 1.0, 1.0, 0.9, 0.7, 0.5, 0.3],
    },
    SeasonalityEntry {
        species: "stingray",
        display_name: "Stingray",
        monthly: [0.3, 0.3, 0.5, 0.7, 0.9, 1.0, 1.0, 1.0, 0.9, 0.7, 0.5, 0.4],
    },
    SeasonalityEntry {
        species: "shark",
        display_name: "Shark",
        monthly: [0.2, 0.2, 0.3, 0.6, 0.8, 1.0, 1.0, 1.0, 0.9, 0.7, 0.3, 0.2],
    },
    SeasonalityEntry {
        species: "black_drum",
        display_name: "Black Drum",
        monthly: [0.8, 0.6, 0.8, 0.8, 0.8, 0.8, 1.0, 0.6, 0.8, 1.0, 1.0, 1.0],
    },
    SeasonalityEntry {
        species: "tripletail",
        display_name: "Tripletail (Blackfish)",
        monthly: [0.0, 0.0, 0.0, 0.2, 0.6, 1.0, 1.0, 1.0, 0.8, 0.8, 0.6, 0.0],
    },
    SeasonalityEntry {
        species: "jack_crevalle",
        display_name: "Jack Crevalle",
        monthly: [0.0, 0.0, 0.0, 0.2, 0.4, 0.8, 1.0, 1.0, 1.0, 1.0, 0.6, 0.0],
    },
    SeasonalityEntry {
        species: "white_trout",
        display_name: "White Trout",
        monthly: [0.8, 0.6, 0.6, 0.6, 0.8, 0.8, 1.0, 0.6, 0.8, 0.8, 0.8, 0.8],
    },
    SeasonalityEntry {
        species: "blue_crab",
        display_name: "Blue Crab",
        monthly: [0.2, 0.2, 0.4, 0.6, 0.8, 1.0, 1.0, 1.0, 0.8, 0.6, 0.4, 0.2],
    },
];

/// Look up a species' running factor for a 1-based month number.
///
/// Returns `0.0` for an unknown species or an out-of-range month, matching
/// the graceful-degradation rule for unrecognized species keys.
pub fn running_factor(species: &SpeciesKey, month: u32) -> f64 {
    if !(1..=12).contains(&month) {
        return 0.0;
    }
    SEASONALITY_TABLE
        .iter()
        .find(|entry| entry.species == species.as_str())
        .map(|entry| entry.monthly[(month - 1) as usize])
        .unwrap_or(0.0)
}

/// True if the species' running factor for the given month meets `threshold`
/// (defaults to 0.4, "fair or better", at call sites that don't override it).
pub fn is_running(species: &SpeciesKey, month: u32, threshold: f64) -> bool {
    running_factor(species, month) >= threshold
}

/// Display name for a species key, title-casing unknown keys as a fallback.
pub fn display_name(species: &SpeciesKey) -> String {
    SEASONALITY_TABLE
        .iter()
        .find(|entry| entry.species == species.as_str())
        .map(|entry| entry.display_name.to_string())
        .unwrap_or_else(|| {
            species
                .as_str()
                .split('_')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_species_peaks_in_expected_month() {
        let trout = SpeciesKey::from("speckled_trout");
        assert_eq!(running_factor(&trout, 6), 1.0);
    }

    #[test]
    fn unknown_species_defaults_to_zero() {
        let ghost = SpeciesKey::from("ghost_shark");
        assert_eq!(running_factor(&ghost, 6), 0.0);
        assert_eq!(display_name(&ghost), "Ghost Shark");
    }

    #[test]
    fn month_out_of_range_is_zero() {
        let trout = SpeciesKey::from("speckled_trout");
        assert_eq!(running_factor(&trout, 0), 0.0);
        assert_eq!(running_factor(&trout, 13), 0.0);
    }
}
