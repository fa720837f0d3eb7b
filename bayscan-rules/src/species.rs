//! Species tiers and per-species environmental preference profiles.

use bayscan_core::{CloudCover, PressureTrend, SpeciesKey, TideStage};

/// Scoring tier. Tier 1 species get the full [`SpeciesProfile`]-driven
/// composition in §4.5; Tier 2 species use the simplified
/// `seasonal_baseline + simple_condition_match + structure_match` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Full analytics.
    One,
    /// Simplified analytics.
    Two,
}

/// Main-focus species with detailed scoring.
pub const TIER_1_SPECIES: &[&str] = &[
    "speckled_trout",
    "redfish",
    "flounder",
    "sheepshead",
    "black_drum",
];

/// Supporting species scored via the simplified path.
pub const TIER_2_SPECIES: &[&str] = &[
    "croaker",
    "white_trout",
    "menhaden",
    "mullet",
    "jack_crevalle",
    "blue_crab",
];

/// Species that double as live/cut bait.
pub const BAIT_SPECIES: &[&str] = &["menhaden", "mullet", "live_shrimp", "fiddler_crab"];

/// Species whose presence suppresses nearby prey activity.
pub const PREDATOR_SPECIES: &[&str] = &["jack_crevalle", "shark"];

/// Prey species eligible for [`crate::species::SpeciesProfile`]'s predator
/// penalty (§4.5's `predator_modifier`).
pub const PREY_SPECIES: &[&str] = &[
    "speckled_trout",
    "white_trout",
    "menhaden",
    "mullet",
    "shrimp",
];

/// Scoring tier for a species key. Unknown keys default to Tier 2, the same
/// fallback the simplified path already tolerates gracefully.
pub fn tier(species: &SpeciesKey) -> Tier {
    if TIER_1_SPECIES.contains(&species.as_str()) {
        Tier::One
    } else {
        Tier::Two
    }
}

/// Whether the species is tracked primarily as bait.
pub fn is_bait_species(species: &SpeciesKey) -> bool {
    BAIT_SPECIES.contains(&species.as_str())
}

/// Whether the species triggers a predator penalty on nearby prey.
pub fn is_predator_species(species: &SpeciesKey) -> bool {
    PREDATOR_SPECIES.contains(&species.as_str())
}

/// Whether the species is eligible to receive a predator penalty.
pub fn is_prey_species(species: &SpeciesKey) -> bool {
    PREY_SPECIES.contains(&species.as_str())
}

/// A signed preference score keyed by a small label set, with a neutral
/// default for labels not present in the map.
#[derive(Debug, Clone, Copy)]
pub struct TidePreference {
    /// Preference score for each tide stage.
    pub incoming: f64,
    /// Preference score for the outgoing stage.
    pub outgoing: f64,
    /// Preference score near high water.
    pub high: f64,
    /// Preference score near low water.
    pub low: f64,
    /// Preference score when the tide is slack.
    pub slack: f64,
}

impl TidePreference {
    /// Look up the preference score for a tide stage.
    pub fn score(&self, stage: TideStage) -> f64 {
        match stage {
            TideStage::Incoming => self.incoming,
            TideStage::Outgoing => self.outgoing,
            TideStage::High => self.high,
            TideStage::Low => self.low,
            TideStage::Slack => self.slack,
        }
    }
}

/// Barometric pressure preference, one value per trend.
#[derive(Debug, Clone, Copy)]
pub struct PressurePreference {
    /// Score while pressure is falling.
    pub falling: f64,
    /// Score while pressure is stable.
    pub stable: f64,
    /// Score while pressure is rising slowly.
    pub rising_slow: f64,
    /// Score while pressure is rising quickly.
    pub rising_fast: f64,
}

impl PressurePreference {
    /// Look up the preference score for a pressure trend.
    pub fn score(&self, trend: PressureTrend) -> f64 {
        match trend {
            PressureTrend::Falling => self.falling,
            PressureTrend::Stable => self.stable,
            PressureTrend::RisingSlow => self.rising_slow,
            PressureTrend::RisingFast => self.rising_fast,
        }
    }
}

/// Water temperature tolerance band.
#[derive(Debug, Clone, Copy)]
pub struct TempPreference {
    /// Lower bound of the ideal range, °F.
    pub ideal_min: f64,
    /// Upper bound of the ideal range, °F.
    pub ideal_max: f64,
    /// Lower bound of the workable range, °F.
    pub workable_min: f64,
    /// Upper bound of the workable range, °F.
    pub workable_max: f64,
    /// Bonus applied when within the ideal range.
    pub bonus_in_ideal: f64,
    /// Penalty applied when outside the workable range.
    pub penalty_out_of_workable: f64,
}

/// Wind direction/speed preference.
#[derive(Debug, Clone)]
pub struct WindPreference {
    /// Cardinal directions considered favorable.
    pub favorable_directions: &'static [&'static str],
    /// Cardinal directions considered unfavorable.
    pub unfavorable_directions: &'static [&'static str],
    /// Speed, in mph, above which a favorable/calm reading stops improving.
    pub light_ideal_max: f64,
    /// Bonus applied for a favorable direction within `light_ideal_max`.
    pub bonus_favorable: f64,
    /// Penalty applied for an unfavorable direction above 15 mph.
    pub penalty_unfavorable_strong: f64,
}

/// Current-speed tolerance, ft/s.
#[derive(Debug, Clone, Copy)]
pub struct CurrentPreference {
    /// Lower bound of the preferred moving-water range.
    pub ideal_min: f64,
    /// Upper bound of the preferred moving-water range.
    pub ideal_max: f64,
    /// Bonus applied when current speed falls in the ideal range.
    pub bonus_moving: f64,
    /// Penalty applied when current speed is near zero (slack water).
    pub penalty_slack: f64,
}

impl CurrentPreference {
    /// Score contribution for a given current speed, ft/s.
    pub fn score(&self, current_speed_ft_s: f64) -> f64 {
        if current_speed_ft_s < 0.05 {
            self.penalty_slack
        } else if current_speed_ft_s >= self.ideal_min && current_speed_ft_s <= self.ideal_max {
            self.bonus_moving
        } else {
            0.0
        }
    }
}

/// Structure-type preference bonuses, used by `structure_match` (§4.5).
#[derive(Debug, Clone, Copy, Default)]
pub struct StructurePreference {
    /// Bonus for pilings.
    pub pilings: f64,
    /// Bonus for rubble.
    pub rubble: f64,
    /// Bonus for open water (usually negative).
    pub open_water: f64,
    /// Bonus when the species has a strong general preference for depth.
    pub deep_preference_bonus: f64,
}

/// Full environmental preference profile for a Tier 1 species.
#[derive(Debug, Clone)]
pub struct SpeciesProfile {
    /// Canonical species key.
    pub species: &'static str,
    /// Water temperature tolerance.
    pub water_temp: TempPreference,
    /// Tide stage preference.
    pub tide_stage: TidePreference,
    /// Barometric pressure preference.
    pub pressure: PressurePreference,
    /// Current-speed preference.
    pub current: CurrentPreference,
    /// Wind preference.
    pub wind: WindPreference,
    /// Structure preference bonuses.
    pub structure: StructurePreference,
    /// Bonus applied when current speed > 0.3 ft/s AND the zone has pilings.
    pub current_structure_bonus: f64,
    /// Salinity preferred range, in ppt.
    pub salinity_preferred: (f64, f64),
    /// Whether the species tolerates salinity outside its preferred range.
    pub salinity_tolerant: bool,
    /// Green-light bonus applied in Zone 4 at evening/night.
    pub green_light_night_bonus: f64,
    /// Whether the light bonus is damped in muddy water.
    pub requires_decent_clarity: bool,
    /// Per-species sub-score weights (tide, wind, temp, pressure, moon, cloud).
    pub weights: SubScoreWeights,
}

/// Weighting of the six §4.4 sub-scores in a species' combined environmental
/// score. Defaults to an even 0.5 split when a species has no override.
#[derive(Debug, Clone, Copy)]
pub struct SubScoreWeights {
    /// Weight of the tide sub-score.
    pub tide: f64,
    /// Weight of the wind sub-score.
    pub wind: f64,
    /// Weight of the temperature sub-score.
    pub temp: f64,
    /// Weight of the pressure sub-score.
    pub pressure: f64,
    /// Weight of the moon sub-score.
    pub moon: f64,
    /// Weight of the cloud sub-score.
    pub cloud: f64,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            tide: 0.5,
            wind: 0.5,
            temp: 0.5,
            pressure: 0.5,
            moon: 0.5,
            cloud: 0.5,
        }
    }
}

impl SubScoreWeights {
    fn new(tide: f64, wind: f64, temp: f64, pressure: f64, moon: f64, cloud: f64) -> Self {
        Self {
            tide,
            wind,
            temp,
            pressure,
            moon,
            cloud,
        }
    }
}

/// The combined environmental score: a weighted mean of the six sub-scores,
/// clamped to `[0, 1]`.
pub fn combined_environmental_score(
    weights: &SubScoreWeights,
    tide: f64,
    wind: f64,
    temp: f64,
    pressure: f64,
    moon: f64,
    cloud: f64,
) -> f64 {
    let total_weight =
        weights.tide + weights.wind + weights.temp + weights.pressure + weights.moon + weights.cloud;
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted = weights.tide * tide
        + weights.wind * wind
        + weights.temp * temp
        + weights.pressure * pressure
        + weights.moon * moon
        + weights.cloud * cloud;
    (weighted / total_weight).clamp(0.0, 1.0)
}

fn speckled_trout() -> SpeciesProfile {
    SpeciesProfile {
        species: "speckled_trout",
        water_temp: TempPreference {
            ideal_min: 65.0,
            ideal_max: 78.0,
            workable_min: 58.0,
            workable_max: 85.0,
            bonus_in_ideal: 5.0,
            penalty_out_of_workable: -4.0,
        },
        tide_stage: TidePreference {
            incoming: 4.0,
            outgoing: 2.0,
            high: 0.0,
            low: 0.0,
            slack: -4.0,
        },
        pressure: PressurePreference {
            falling: 3.0,
            stable: 1.0,
            rising_slow: 0.0,
            rising_fast: -3.0,
        },
        current: CurrentPreference {
            ideal_min: 0.3,
            ideal_max: 1.0,
            bonus_moving: 3.0,
            penalty_slack: -2.0,
        },
        wind: WindPreference {
            favorable_directions: &["SE", "S", "SW", "E"],
            unfavorable_directions: &["N", "NW", "NE"],
            light_ideal_max: 12.0,
            bonus_favorable: 3.0,
            penalty_unfavorable_strong: -4.0,
        },
        structure: StructurePreference {
            pilings: 3.0,
            rubble: 0.0,
            open_water: -1.0,
            deep_preference_bonus: 0.0,
        },
        current_structure_bonus: 0.0,
        salinity_preferred: (15.0, 30.0),
        salinity_tolerant: true,
        green_light_night_bonus: 4.0,
        requires_decent_clarity: true,
        weights: SubScoreWeights::default(),
    }
}

fn redfish() -> SpeciesProfile {
    SpeciesProfile {
        species: "redfish",
        water_temp: TempPreference {
            ideal_min: 65.0,
            ideal_max: 80.0,
            workable_min: 55.0,
            workable_max: 88.0,
            bonus_in_ideal: 4.0,
            penalty_out_of_workable: -2.0,
        },
        tide_stage: TidePreference {
            incoming: 5.0,
            outgoing: 4.0,
            high: 1.0,
            low: -1.0,
            slack: -5.0,
        },
        pressure: PressurePreference {
            falling: 2.0,
            stable: 1.0,
            rising_slow: 0.0,
            rising_fast: -1.0,
        },
        current: CurrentPreference {
            ideal_min: 0.2,
            ideal_max: 0.8,
            bonus_moving: 2.0,
            penalty_slack: -1.0,
        },
        wind: WindPreference {
            favorable_directions: &["SE", "S", "SW"],
            unfavorable_directions: &[],
            light_ideal_max: 15.0,
            bonus_favorable: 2.0,
            penalty_unfavorable_strong: -1.0,
        },
        structure: StructurePreference {
            pilings: 5.0,
            rubble: 5.0,
            open_water: -2.0,
            deep_preference_bonus: 0.0,
        },
        current_structure_bonus: 3.0,
        salinity_preferred: (10.0, 35.0),
        salinity_tolerant: true,
        green_light_night_bonus: 2.0,
        requires_decent_clarity: false,
        weights: SubScoreWeights::new(0.6, 0.4, 0.5, 0.4, 0.5, 0.4),
    }
}

fn flounder() -> SpeciesProfile {
    SpeciesProfile {
        species: "flounder",
        water_temp: TempPreference {
            ideal_min: 65.0,
            ideal_max: 75.0,
            workable_min: 58.0,
            workable_max: 82.0,
            bonus_in_ideal: 5.0,
            penalty_out_of_workable: -5.0,
        },
        tide_stage: TidePreference {
            incoming: 3.0,
            outgoing: 4.0,
            high: -1.0,
            low: 0.0,
            slack: -6.0,
        },
        pressure: PressurePreference {
            falling: 3.0,
            stable: 2.0,
            rising_slow: 0.0,
            rising_fast: -4.0,
        },
        current: CurrentPreference {
            ideal_min: 0.1,
            ideal_max: 0.6,
            bonus_moving: 2.0,
            penalty_slack: -3.0,
        },
        wind: WindPreference {
            favorable_directions: &["SE", "S", "SW"],
            unfavorable_directions: &["N", "NW"],
            light_ideal_max: 10.0,
            bonus_favorable: 2.0,
            penalty_unfavorable_strong: -5.0,
        },
        structure: StructurePreference {
            pilings: 5.0,
            rubble: 6.0,
            open_water: -3.0,
            deep_preference_bonus: 0.0,
        },
        current_structure_bonus: 0.0,
        salinity_preferred: (18.0, 32.0),
        salinity_tolerant: false,
        green_light_night_bonus: 3.0,
        requires_decent_clarity: true,
        weights: SubScoreWeights::new(0.5, 0.6, 0.6, 0.5, 0.4, 0.5),
    }
}

fn sheepshead() -> SpeciesProfile {
    SpeciesProfile {
        species: "sheepshead",
        water_temp: TempPreference {
            ideal_min: 55.0,
            ideal_max: 70.0,
            workable_min: 48.0,
            workable_max: 78.0,
            bonus_in_ideal: 4.0,
            penalty_out_of_workable: -3.0,
        },
        tide_stage: TidePreference {
            incoming: 3.0,
            outgoing: 3.0,
            high: 1.0,
            low: 1.0,
            slack: -3.0,
        },
        pressure: PressurePreference {
            falling: 2.0,
            stable: 1.0,
            rising_slow: 1.0,
            rising_fast: -1.0,
        },
        current: CurrentPreference {
            ideal_min: 0.0,
            ideal_max: 0.5,
            bonus_moving: 1.0,
            penalty_slack: 0.0,
        },
        wind: WindPreference {
            favorable_directions: &[],
            unfavorable_directions: &[],
            light_ideal_max: 20.0,
            bonus_favorable: 1.0,
            penalty_unfavorable_strong: -1.0,
        },
        structure: StructurePreference {
            pilings: 6.0,
            rubble: 4.0,
            open_water: -6.0,
            deep_preference_bonus: 0.0,
        },
        current_structure_bonus: 4.0,
        salinity_preferred: (15.0, 32.0),
        salinity_tolerant: true,
        green_light_night_bonus: 1.0,
        requires_decent_clarity: false,
        weights: SubScoreWeights::new(0.4, 0.3, 0.5, 0.4, 0.5, 0.4),
    }
}

fn black_drum() -> SpeciesProfile {
    SpeciesProfile {
        species: "black_drum",
        water_temp: TempPreference {
            ideal_min: 60.0,
            ideal_max: 75.0,
            workable_min: 50.0,
            workable_max: 85.0,
            bonus_in_ideal: 3.0,
            penalty_out_of_workable: -2.0,
        },
        tide_stage: TidePreference {
            incoming: 2.0,
            outgoing: 2.0,
            high: 1.0,
            low: 1.0,
            slack: -2.0,
        },
        pressure: PressurePreference {
            falling: 1.0,
            stable: 1.0,
            rising_slow: 0.0,
            rising_fast: 0.0,
        },
        current: CurrentPreference {
            ideal_min: 0.1,
            ideal_max: 0.7,
            bonus_moving: 1.0,
            penalty_slack: -1.0,
        },
        wind: WindPreference {
            favorable_directions: &[],
            unfavorable_directions: &[],
            light_ideal_max: 18.0,
            bonus_favorable: 1.0,
            penalty_unfavorable_strong: 0.0,
        },
        structure: StructurePreference {
            pilings: 4.0,
            rubble: 4.0,
            open_water: -1.0,
            deep_preference_bonus: 1.0,
        },
        current_structure_bonus: 2.0,
        salinity_preferred: (12.0, 35.0),
        salinity_tolerant: true,
        green_light_night_bonus: 1.0,
        requires_decent_clarity: false,
        weights: SubScoreWeights::new(0.4, 0.3, 0.4, 0.3, 0.5, 0.4),
    }
}

/// Look up the full profile for a Tier 1 species. Returns `None` for Tier 2
/// or unrecognized species, which use the simplified scoring path instead.
pub fn profile(species: &SpeciesKey) -> Option<SpeciesProfile> {
    match species.as_str() {
        "speckled_trout" => Some(speckled_trout()),
        "redfish" => Some(redfish()),
        "flounder" => Some(flounder()),
        "sheepshead" => Some(sheepshead()),
        "black_drum" => Some(black_drum()),
        _ => None,
    }
}

/// Cloud-cover sub-score, fixed independent of species (§4.4): fish favor
/// low light.
pub fn cloud_score(cover: CloudCover) -> f64 {
    match cover {
        CloudCover::Overcast => 1.0,
        CloudCover::PartlyCloudy => 0.7,
        CloudCover::Clear => 0.5,
    }
}

/// Pressure sub-score, fixed independent of species (§4.4).
pub fn pressure_sub_score(trend: PressureTrend) -> f64 {
    match trend {
        PressureTrend::Falling => 1.0,
        PressureTrend::Stable => 0.8,
        PressureTrend::RisingSlow => 0.5,
        PressureTrend::RisingFast => 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier1_species_all_have_profiles() {
        for key in TIER_1_SPECIES {
            assert!(profile(&SpeciesKey::from(*key)).is_some());
        }
    }

    #[test]
    fn tier2_species_have_no_full_profile() {
        assert!(profile(&SpeciesKey::from("croaker")).is_none());
    }

    #[test]
    fn unknown_species_defaults_to_tier_two() {
        assert_eq!(tier(&SpeciesKey::from("nonexistent")), Tier::Two);
    }

    #[test]
    fn combined_score_clamps_and_weights() {
        let weights = SubScoreWeights::default();
        let score = combined_environmental_score(&weights, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(score, 1.0);
        let score = combined_environmental_score(&weights, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(score, 0.0);
    }
}
