//! Bait-species condition-match rules (§4.6).

use bayscan_core::{ClarityBand, SpeciesKey, TideStage, TimeOfDay, ZoneId};

/// Environmental snapshot the bait condition-match rules read from.
#[derive(Debug, Clone, Copy)]
pub struct BaitConditions {
    /// Part of day.
    pub time_of_day: TimeOfDay,
    /// Tide stage.
    pub tide_stage: TideStage,
    /// Water temperature, °F (falls back to air temperature upstream if absent).
    pub water_temperature: f64,
    /// Cardinal wind direction, if known.
    pub wind_direction: Option<&'static str>,
    /// Current speed, ft/s.
    pub current_speed: f64,
    /// Water clarity.
    pub water_clarity: ClarityBand,
    /// Calendar month, 1-based, used by the fiddler crab seasonal rule.
    pub month: u32,
}

/// Condition-match score for a bait species in a zone, in the documented
/// `±5..±15` range. Returns `0.0` for a bait species with no rule table.
pub fn condition_match_for_bait(bait: &SpeciesKey, zone: ZoneId, conditions: &BaitConditions) -> f64 {
    let zone_num = zone.number();
    match bait.as_str() {
        "live_shrimp" => {
            let mut score = 0.0;
            if zone_num == 4
                && matches!(conditions.time_of_day, TimeOfDay::Evening | TimeOfDay::Night)
            {
                score += 10.0;
            }
            if conditions.tide_stage == TideStage::Incoming {
                score += 5.0;
            }
            if conditions.water_temperature < 55.0 {
                score -= 8.0;
            } else if conditions.water_temperature >= 65.0 {
                score += 3.0;
            }
            score
        }
        "menhaden" => {
            let mut score = 0.0;
            let favorable_wind = matches!(conditions.wind_direction, Some("SE") | Some("S") | Some("SW"));
            if favorable_wind && matches!(zone_num, 1 | 3 | 5) {
                score += 8.0;
            }
            if conditions.current_speed > 0.4 && matches!(zone_num, 1 | 3 | 5) {
                score += 5.0;
            }
            score
        }
        "mullet" => {
            let mut score = 0.0;
            if matches!(zone_num, 1 | 2) && conditions.tide_stage == TideStage::Incoming {
                score += 8.0;
            }
            if conditions.water_temperature >= 70.0 {
                score += 4.0;
            }
            score
        }
        "fiddler_crab" => {
            let mut score = 0.0;
            if matches!(conditions.month, 12 | 1 | 2 | 3) {
                score += 10.0;
            } else {
                score -= 5.0;
            }
            if matches!(zone_num, 1 | 3 | 5) {
                score += 3.0;
            }
            score
        }
        _ => 0.0,
    }
}

/// Quantity estimate recorded on a bait log, used by
/// `recent_bait_logs_modifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityEstimate {
    /// Plenty observed.
    Plenty,
    /// Some observed.
    Some,
    /// A few / unspecified.
    Few,
}

impl QuantityEstimate {
    fn base_value(self) -> f64 {
        match self {
            QuantityEstimate::Plenty => 4.0,
            QuantityEstimate::Some => 2.0,
            QuantityEstimate::Few => 1.0,
        }
    }
}

/// Sum `base(quantity) * 0.75^hours_ago` over recent bait logs, capped at +8.
pub fn recent_bait_logs_modifier(logs: &[(QuantityEstimate, f64)]) -> f64 {
    let total: f64 = logs
        .iter()
        .map(|(quantity, hours_ago)| quantity.base_value() * 0.75_f64.powf(*hours_ago))
        .sum();
    total.min(8.0)
}

/// Green-light attraction bonus, only nonzero in Zone 4 at evening/night,
/// damped ×0.3 in muddy water for bait species whose profile requires
/// decent clarity.
pub fn light_modifier_for_bait(bait: &SpeciesKey, zone: ZoneId, conditions: &BaitConditions) -> f64 {
    if zone.number() != 4 {
        return 0.0;
    }
    if !matches!(conditions.time_of_day, TimeOfDay::Evening | TimeOfDay::Night) {
        return 0.0;
    }

    let (bonus, requires_decent_clarity) = match bait.as_str() {
        "live_shrimp" => (10.0, true),
        "menhaden" => (2.0, false),
        "mullet" => (2.0, false),
        "fiddler_crab" => (0.0, false),
        _ => (0.0, false),
    };

    if requires_decent_clarity && conditions.water_clarity == ClarityBand::Muddy {
        bonus * 0.3
    } else {
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_conditions() -> BaitConditions {
        BaitConditions {
            time_of_day: TimeOfDay::Night,
            tide_stage: TideStage::Incoming,
            water_temperature: 70.0,
            wind_direction: Some("SE"),
            current_speed: 0.5,
            water_clarity: ClarityBand::Clean,
            month: 7,
        }
    }

    #[test]
    fn shrimp_gets_zone4_night_bonus() {
        let shrimp = SpeciesKey::from("live_shrimp");
        let score = condition_match_for_bait(&shrimp, ZoneId::Zone4, &base_conditions());
        assert_eq!(score, 10.0 + 5.0 + 3.0);
    }

    #[test]
    fn fiddler_crab_favors_winter() {
        let fiddler = SpeciesKey::from("fiddler_crab");
        let mut winter = base_conditions();
        winter.month = 1;
        let mut summer = base_conditions();
        summer.month = 7;
        assert!(
            condition_match_for_bait(&fiddler, ZoneId::Zone1, &winter)
                > condition_match_for_bait(&fiddler, ZoneId::Zone1, &summer)
        );
    }

    #[test]
    fn recent_logs_modifier_caps_at_eight() {
        let logs = vec![
            (QuantityEstimate::Plenty, 0.0),
            (QuantityEstimate::Plenty, 0.0),
            (QuantityEstimate::Plenty, 0.0),
        ];
        assert_eq!(recent_bait_logs_modifier(&logs), 8.0);
    }

    #[test]
    fn muddy_water_damps_shrimp_light_bonus() {
        let shrimp = SpeciesKey::from("live_shrimp");
        let mut muddy = base_conditions();
        muddy.water_clarity = ClarityBand::Muddy;
        assert_eq!(light_modifier_for_bait(&shrimp, ZoneId::Zone4, &muddy), 3.0);
    }
}
