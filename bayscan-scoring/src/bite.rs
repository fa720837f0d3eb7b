//! Bite scoring core (§4.5): composes the seasonal baseline, condition
//! match, structure match, clarity/salinity modifier, recent-activity
//! modifier, and predator modifier into a single zone-aware bite score.

use crate::conditions::Conditions;
use crate::error::ScoringResult;
use crate::subscores;
use bayscan_core::{clamp, ConfidenceLevel, SpeciesKey, ZoneId};
use bayscan_db::DatabasePool;
use bayscan_rules::species::{self, SpeciesProfile, Tier};
use bayscan_rules::zones;
use chrono::{DateTime, Utc};

/// Step breakpoints mapping a species' monthly running factor to the
/// 0-90 seasonal baseline (§4.1).
const BASELINE_BREAKPOINTS: &[(f64, f64)] = &[
    (0.0, 0.0),
    (0.2, 20.0),
    (0.3, 30.0),
    (0.4, 40.0),
    (0.5, 50.0),
    (0.6, 60.0),
    (0.7, 70.0),
    (0.8, 80.0),
    (0.9, 85.0),
    (1.0, 90.0),
];

/// Map a running factor to the seasonal baseline, linearly interpolating
/// between the documented breakpoints.
pub fn seasonal_baseline(running_factor: f64) -> f64 {
    let rf = clamp(running_factor, 0.0, 1.0);
    for window in BASELINE_BREAKPOINTS.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if rf <= x1 {
            if (x1 - x0).abs() < f64::EPSILON {
                return y1;
            }
            let t = (rf - x0) / (x1 - x0);
            return y0 + (y1 - y0) * t;
        }
    }
    90.0
}

/// Descriptive label for a seasonal baseline value.
pub fn baseline_label(baseline: f64) -> &'static str {
    if baseline <= 0.0 {
        "N/A"
    } else if baseline <= 20.0 {
        "Poor"
    } else if baseline <= 40.0 {
        "Fair"
    } else if baseline <= 60.0 {
        "Good"
    } else if baseline <= 80.0 {
        "Great"
    } else {
        "Excellent"
    }
}

/// A per-species catch or predator sighting used in the breakdown's
/// human-readable summary.
#[derive(Debug, Clone)]
pub struct BreakdownEntry {
    /// Species key of the sighting.
    pub species: String,
    /// Hours before "now" the sighting was logged.
    pub hours_ago: f64,
}

/// Supporting detail attached to a [`BiteScoreResult`] for UI display.
#[derive(Debug, Clone)]
pub struct BiteScoreBreakdown {
    /// Descriptive label for the seasonal baseline.
    pub baseline_label: &'static str,
    /// The six §4.4 sub-scores, in tide/wind/temp/pressure/moon/cloud order.
    pub env_factors: [f64; 6],
    /// Total historical catch count for this (species, zone), the same
    /// count [`cache`](crate::cache) uses for confidence-weighted smoothing.
    pub recent_catches_count: i64,
    /// Predator sightings considered by the predator modifier.
    pub recent_predators: Vec<BreakdownEntry>,
}

/// Full composed result of scoring one (species, zone, conditions, date).
#[derive(Debug, Clone)]
pub struct BiteScoreResult {
    /// Final composed score, clamped to `[0, 100]`.
    pub bite_score: f64,
    /// Seasonal component.
    pub seasonal_baseline: f64,
    /// Condition-match component.
    pub condition_match: f64,
    /// Structure-match component.
    pub structure_match: f64,
    /// Clarity/salinity component.
    pub clarity_salinity: f64,
    /// Recent-activity component.
    pub recent_activity: f64,
    /// Predator-penalty component (negative or zero).
    pub predator_penalty: f64,
    /// External-indicators component (currently always 0.0; see DESIGN.md).
    pub external_indicators: f64,
    /// Confidence, from historical catch count for this (species, zone).
    pub confidence: ConfidenceLevel,
    /// Scoring tier used.
    pub tier: Tier,
    /// Supporting detail for UI display.
    pub breakdown: BiteScoreBreakdown,
}

/// Combine the six §4.4 sub-scores for (species profile, conditions) into
/// the per-sub-score array and the species-weighted mean. Exposed for the
/// forecast window builder, which scores conditions that never touch the
/// database (projected weather/tide, not a logged snapshot).
pub fn combined_env_score(profile: Option<&SpeciesProfile>, conditions: &Conditions) -> ([f64; 6], f64) {
    let tide = subscores::tide_score(conditions.tide_stage, conditions.tide_change_rate);
    let wind = subscores::wind_score(
        conditions.wind_speed_mph,
        conditions.wind_direction.as_deref(),
        profile.map(|p| &p.wind),
    );
    let temp = subscores::temp_score(
        conditions.water_temp_f,
        conditions.air_temp_f,
        profile.map(|p| &p.water_temp),
    );
    let pressure = subscores::pressure_score(conditions.pressure_trend);
    let moon = subscores::moon_score(conditions.moon_phase);
    let cloud = subscores::cloud_score(conditions.cloud_cover);

    let weights = profile.map(|p| p.weights).unwrap_or_default();
    let combined = species::combined_environmental_score(&weights, tide, wind, temp, pressure, moon, cloud);
    ([tide, wind, temp, pressure, moon, cloud], combined)
}

fn condition_match(profile: &SpeciesProfile, conditions: &Conditions) -> f64 {
    let mut score = 0.0;

    let t = conditions.water_temp_f.unwrap_or(conditions.air_temp_f);
    if t >= profile.water_temp.ideal_min && t <= profile.water_temp.ideal_max {
        score += profile.water_temp.bonus_in_ideal;
    } else if t < profile.water_temp.workable_min || t > profile.water_temp.workable_max {
        score += profile.water_temp.penalty_out_of_workable;
    }
    if conditions.is_cold_snap() {
        score -= 3.0;
    }

    score += profile.tide_stage.score(conditions.tide_stage);
    score += profile.current.score(conditions.current_speed_ft_s);
    score += profile.pressure.score(conditions.pressure_trend);

    let direction = conditions.wind_direction.as_deref();
    let favorable = direction.is_some_and(|d| profile.wind.favorable_directions.contains(&d));
    let unfavorable = direction.is_some_and(|d| profile.wind.unfavorable_directions.contains(&d));
    if favorable {
        score += profile.wind.bonus_favorable;
    } else if unfavorable && conditions.wind_speed_mph > 15.0 {
        score += profile.wind.penalty_unfavorable_strong;
    }

    score
}

/// Simplified condition match for Tier 2 species, which have no full
/// profile: a small, species-independent nudge from the two universal
/// tables (pressure, cloud cover).
fn simple_condition_match(conditions: &Conditions) -> f64 {
    let pressure_delta = (subscores::pressure_score(conditions.pressure_trend) - 0.5) * 10.0;
    let cloud_delta = (subscores::cloud_score(conditions.cloud_cover) - 0.5) * 4.0;
    pressure_delta + cloud_delta
}

fn structure_match(profile: Option<&SpeciesProfile>, zone: ZoneId, conditions: &Conditions) -> f64 {
    let zp = zones::profile(zone);
    let mut score = 0.0;

    match zone.number() {
        1 => {
            if let Some(p) = profile {
                score += p.structure.pilings + p.structure.rubble;
            }
        }
        2 => {
            if let Some(p) = profile {
                score += p.structure.open_water;
            }
        }
        3 => {
            if let Some(p) = profile {
                score += p.structure.pilings;
            }
            score += 0.5;
        }
        4 => {
            if let Some(p) = profile {
                if matches!(
                    conditions.time_of_day,
                    bayscan_core::TimeOfDay::Evening | bayscan_core::TimeOfDay::Night
                ) {
                    let bonus = p.green_light_night_bonus;
                    score += if p.requires_decent_clarity
                        && conditions.water_clarity == bayscan_core::ClarityBand::Muddy
                    {
                        bonus * 0.3
                    } else {
                        bonus
                    };
                }
            }
            score += 0.5;
        }
        5 => {
            if let Some(p) = profile {
                score += p.structure.pilings * 1.5;
                if p.structure.deep_preference_bonus > 0.0 {
                    score += 2.0;
                }
            }
        }
        _ => {}
    }

    if let Some(p) = profile {
        if conditions.current_speed_ft_s > 0.3 && zp.has_pilings {
            score += p.current_structure_bonus;
        }
    } else if zp.is_popular {
        score += 0.5;
    }

    score
}

fn clarity_salinity_modifier(profile: Option<&SpeciesProfile>, conditions: &Conditions) -> f64 {
    let mut score = match conditions.water_clarity {
        bayscan_core::ClarityBand::Clean => 2.0,
        bayscan_core::ClarityBand::Stained => 0.0,
        bayscan_core::ClarityBand::Muddy => -2.0,
    };

    if let Some(p) = profile {
        if let Some(salinity) = conditions.salinity_ppt {
            let (min, max) = p.salinity_preferred;
            if (salinity < min || salinity > max) && !p.salinity_tolerant {
                score -= 4.0;
            }
        }
        if conditions.is_rapid_salinity_change() {
            score -= 3.0;
        }
    }

    score
}

async fn recent_activity_modifier(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    now: DateTime<Utc>,
) -> ScoringResult<(f64, i64)> {
    let since = now - chrono::Duration::hours(6);
    let recent = bayscan_db::repository::recent_catches(db, species, zone, since).await?;

    let raw: f64 = recent
        .iter()
        .map(|c| {
            let hours_ago = (now - c.timestamp).num_seconds() as f64 / 3600.0;
            4.0 * c.quantity as f64 * 0.75_f64.powf(hours_ago.max(0.0))
        })
        .sum::<f64>()
        .min(10.0);

    let historical = bayscan_db::repository::historical_catch_count(db, species, zone).await?;
    let weight = ConfidenceLevel::from_count(historical).recent_activity_weight();
    Ok((raw * weight, historical))
}

async fn predator_modifier(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    now: DateTime<Utc>,
) -> ScoringResult<(f64, Vec<BreakdownEntry>)> {
    if !species::is_prey_species(species) {
        return Ok((0.0, Vec::new()));
    }

    let since = now - chrono::Duration::hours(4);
    let Some(log) = bayscan_db::repository::most_recent_predator_log(db, zone, since).await? else {
        return Ok((0.0, Vec::new()));
    };

    let hours_ago = (now - log.timestamp).num_seconds() as f64 / 3600.0;
    let penalty = -8.0 * (1.0 - hours_ago / 4.0).max(0.0);
    let entry = BreakdownEntry {
        species: log.species.as_str().to_string(),
        hours_ago,
    };
    Ok((penalty, vec![entry]))
}

/// Compute a fresh bite score for (species, zone, conditions, date). Does
/// not touch the score cache; callers go through [`crate::cache`].
pub async fn compute(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    conditions: &Conditions,
    now: DateTime<Utc>,
) -> ScoringResult<BiteScoreResult> {
    let profile = species::profile(species);
    let tier = species::tier(species);
    let running_factor = bayscan_rules::seasonality::running_factor(species, conditions.month);
    let baseline = seasonal_baseline(running_factor);
    let (env_factors, _combined) = combined_env_score(profile.as_ref(), conditions);

    let cond_match = match &profile {
        Some(p) => condition_match(p, conditions),
        None => simple_condition_match(conditions),
    };
    let struct_match = structure_match(profile.as_ref(), zone, conditions);

    let clarity_salinity = if tier == Tier::One {
        clarity_salinity_modifier(profile.as_ref(), conditions)
    } else {
        0.0
    };

    let (recent_activity, historical_count) =
        if tier == Tier::One { recent_activity_modifier(db, species, zone, now).await? } else { (0.0, 0) };
    let (predator_penalty, recent_predators) =
        if tier == Tier::One { predator_modifier(db, species, zone, now).await? } else { (0.0, Vec::new()) };

    let external_indicators = 0.0;

    let raw_score = baseline
        + cond_match
        + struct_match
        + clarity_salinity
        + recent_activity
        + predator_penalty
        + external_indicators;
    let bite_score = clamp(raw_score, 0.0, 100.0);

    Ok(BiteScoreResult {
        bite_score,
        seasonal_baseline: baseline,
        condition_match: cond_match,
        structure_match: struct_match,
        clarity_salinity,
        recent_activity,
        predator_penalty,
        external_indicators,
        confidence: ConfidenceLevel::from_count(historical_count),
        tier,
        breakdown: BiteScoreBreakdown {
            baseline_label: baseline_label(baseline),
            env_factors,
            recent_catches_count: historical_count,
            recent_predators,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_baseline_interpolates_between_breakpoints() {
        assert_eq!(seasonal_baseline(0.0), 0.0);
        assert_eq!(seasonal_baseline(1.0), 90.0);
        assert_eq!(seasonal_baseline(0.25), 25.0);
    }

    #[test]
    fn baseline_label_matches_thresholds() {
        assert_eq!(baseline_label(0.0), "N/A");
        assert_eq!(baseline_label(81.0), "Excellent");
    }

    #[tokio::test]
    async fn tier_two_species_skip_recent_activity_and_predator_terms() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let croaker = SpeciesKey::new("croaker");
        let conditions = Conditions {
            water_temp_f: Some(72.0),
            air_temp_f: 72.0,
            air_temp_24h_ago_f: None,
            tide_stage: bayscan_core::TideStage::Incoming,
            tide_change_rate: 0.5,
            current_speed_ft_s: 0.4,
            wind_speed_mph: 8.0,
            wind_direction: Some("SE".to_string()),
            pressure_trend: bayscan_core::PressureTrend::Falling,
            cloud_cover: bayscan_core::CloudCover::PartlyCloudy,
            time_of_day: bayscan_core::TimeOfDay::Morning,
            moon_phase: 0.1,
            water_clarity: bayscan_core::ClarityBand::Clean,
            salinity_ppt: None,
            salinity_24h_ago_ppt: None,
            month: 6,
        };
        let result = compute(&db, &croaker, ZoneId::Zone3, &conditions, Utc::now()).await.unwrap();
        assert_eq!(result.recent_activity, 0.0);
        assert_eq!(result.predator_penalty, 0.0);
        assert_eq!(result.tier, Tier::Two);
    }
}
