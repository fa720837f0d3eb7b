//! Bait scoring core (§4.6): seasonal baseline, condition match, recent
//! sighting modifier, and the Zone 4 evening/night light modifier.

use crate::bite::{baseline_label, seasonal_baseline};
use crate::conditions::Conditions;
use crate::error::ScoringResult;
use bayscan_core::{clamp, SpeciesKey, ZoneId};
use bayscan_db::DatabasePool;
use bayscan_rules::bait::{
    condition_match_for_bait, light_modifier_for_bait, recent_bait_logs_modifier, BaitConditions,
    QuantityEstimate,
};
use chrono::{DateTime, Utc};

const CARDINAL_DIRECTIONS: &[&str] = &["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Map a borrowed, possibly-owned direction string to the `'static` cardinal
/// literal [`BaitConditions`] expects, since the rule table matches on
/// `&'static str` rather than an arbitrary borrow.
fn static_direction(direction: Option<&str>) -> Option<&'static str> {
    let direction = direction?;
    CARDINAL_DIRECTIONS.iter().find(|&&d| d == direction).copied()
}

fn quantity_estimate(raw: Option<&str>) -> QuantityEstimate {
    match raw {
        Some("plenty") => QuantityEstimate::Plenty,
        Some("some") => QuantityEstimate::Some,
        _ => QuantityEstimate::Few,
    }
}

/// Full composed result of scoring one (bait species, zone, conditions, date).
#[derive(Debug, Clone)]
pub struct BaitScoreResult {
    /// Final composed score, clamped to `[0, 100]`.
    pub bait_score: f64,
    /// Seasonal component.
    pub seasonal_baseline: f64,
    /// Label for the seasonal baseline.
    pub baseline_label: &'static str,
    /// Condition-match component.
    pub condition_match: f64,
    /// Recent-sighting component.
    pub recent_activity: f64,
    /// Light-attraction component (Zone 4 evening/night only).
    pub light_modifier: f64,
    /// Count of sightings within the recent-activity window.
    pub recent_sightings_count: usize,
}

/// Compute a fresh bait score for (bait species, zone, conditions, date).
pub async fn compute(
    db: &DatabasePool,
    bait: &SpeciesKey,
    zone: ZoneId,
    conditions: &Conditions,
    now: DateTime<Utc>,
) -> ScoringResult<BaitScoreResult> {
    let running_factor = bayscan_rules::seasonality::running_factor(bait, conditions.month);
    let baseline = seasonal_baseline(running_factor);

    let bait_conditions = BaitConditions {
        time_of_day: conditions.time_of_day,
        tide_stage: conditions.tide_stage,
        water_temperature: conditions.water_temp_f.unwrap_or(conditions.air_temp_f),
        wind_direction: static_direction(conditions.wind_direction.as_deref()),
        current_speed: conditions.current_speed_ft_s,
        water_clarity: conditions.water_clarity,
        month: conditions.month,
    };

    let cond_match = condition_match_for_bait(bait, zone, &bait_conditions);
    let light_modifier = light_modifier_for_bait(bait, zone, &bait_conditions);

    let since = now - chrono::Duration::hours(6);
    let logs = bayscan_db::repository::recent_bait_logs(db, bait, zone, since).await?;
    let recent_sightings_count = logs.len();
    let weighted_logs: Vec<(QuantityEstimate, f64)> = logs
        .iter()
        .map(|log| {
            let hours_ago = (now - log.timestamp).num_seconds() as f64 / 3600.0;
            (quantity_estimate(log.quantity_estimate.as_deref()), hours_ago.max(0.0))
        })
        .collect();
    let recent_activity = recent_bait_logs_modifier(&weighted_logs);

    let raw_score = baseline + cond_match + recent_activity + light_modifier;
    let bait_score = clamp(raw_score, 0.0, 100.0);

    Ok(BaitScoreResult {
        bait_score,
        seasonal_baseline: baseline,
        baseline_label: baseline_label(baseline),
        condition_match: cond_match,
        recent_activity,
        light_modifier,
        recent_sightings_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayscan_core::{ClarityBand, CloudCover, PressureTrend, TideStage, TimeOfDay};

    fn sample_conditions() -> Conditions {
        Conditions {
            water_temp_f: Some(72.0),
            air_temp_f: 72.0,
            air_temp_24h_ago_f: None,
            tide_stage: TideStage::Incoming,
            tide_change_rate: 0.5,
            current_speed_ft_s: 0.5,
            wind_speed_mph: 8.0,
            wind_direction: Some("SE".to_string()),
            pressure_trend: PressureTrend::Falling,
            cloud_cover: CloudCover::PartlyCloudy,
            time_of_day: TimeOfDay::Night,
            moon_phase: 0.1,
            water_clarity: ClarityBand::Clean,
            salinity_ppt: None,
            salinity_24h_ago_ppt: None,
            month: 7,
        }
    }

    #[tokio::test]
    async fn shrimp_scores_highest_in_zone_four_at_night() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let shrimp = SpeciesKey::new("live_shrimp");
        let night_zone4 = compute(&db, &shrimp, ZoneId::Zone4, &sample_conditions(), Utc::now())
            .await
            .unwrap();
        let night_zone2 = compute(&db, &shrimp, ZoneId::Zone2, &sample_conditions(), Utc::now())
            .await
            .unwrap();
        assert!(night_zone4.bait_score > night_zone2.bait_score);
    }

    #[test]
    fn static_direction_rejects_non_cardinal_strings() {
        assert_eq!(static_direction(Some("not-a-direction")), None);
        assert_eq!(static_direction(Some("SE")), Some("SE"));
    }
}
