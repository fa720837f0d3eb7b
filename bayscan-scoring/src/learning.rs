//! Learning updaters (§4.8): nudge the rig and zone/condition effect tables
//! toward a logged catch's rig and conditions. Learning failures must never
//! fail the catch write they're derived from — callers log and continue
//! rather than propagate an error from here back to the HTTP layer.

use bayscan_core::{ClarityBand, CurrentBand, SpeciesKey, TideBand, TideStage, WindBand, ZoneId};
use bayscan_db::learning::{ConditionEffect, RigEffect};
use bayscan_db::DatabasePool;
use bayscan_db::DatabaseResult;
use chrono::{DateTime, Utc};

/// Capped-log weight for a persisted `success_count`: `min(cap, ln(success_count+1))`.
pub fn learning_weight(success_count: f64, cap: f64) -> f64 {
    (success_count + 1.0).ln().min(cap)
}

/// Crab-trap catches teach the zone/condition tables at a fraction of the
/// weight of rod-and-reel catches, since the trap wasn't actively fished.
/// Never applies to [`RigEffect`], whose `success_count` always increments
/// by a flat 1.0 regardless of how the fish was caught.
const CRAB_TRAP_WEIGHT_MULTIPLIER: f64 = 0.15;

const RIG_EFFECT_CAP: f64 = 3.0;
const CONDITION_EFFECT_CAP: f64 = 4.0;

fn tide_band_of(stage: TideStage) -> Option<TideBand> {
    match stage {
        TideStage::Incoming => Some(TideBand::Incoming),
        TideStage::Outgoing => Some(TideBand::Outgoing),
        TideStage::Slack => Some(TideBand::Slack),
        TideStage::High | TideStage::Low => None,
    }
}

/// The conditions a logged catch was made under, as coarse bands (§4.8).
#[derive(Debug, Clone, Copy)]
pub struct CatchConditions {
    /// Tide stage at the time of the catch.
    pub tide_stage: TideStage,
    /// Water clarity.
    pub clarity: ClarityBand,
    /// Wind favorability relative to the species' profile.
    pub wind_band: WindBand,
    /// Current-speed band.
    pub current_band: CurrentBand,
    /// Whether the catch came from a crab trap rather than active fishing.
    pub crab_trap: bool,
}

fn apply_rig_effect(old: RigEffect) -> RigEffect {
    let success_count = old.success_count + 1.0;
    RigEffect {
        success_count,
        weight: learning_weight(success_count, RIG_EFFECT_CAP),
    }
}

fn apply_condition_effect(old: ConditionEffect, weight_multiplier: f64) -> ConditionEffect {
    let success_count = old.success_count + weight_multiplier;
    ConditionEffect {
        success_count,
        weight: learning_weight(success_count, CONDITION_EFFECT_CAP),
    }
}

/// Nudge the rig effect (if a rig was logged) and the zone/condition effects
/// toward this catch. The rig effect always increments by 1.0, even for a
/// crab-trap catch; the condition tables increment by
/// [`CRAB_TRAP_WEIGHT_MULTIPLIER`] instead of 1.0 for a trap catch. Skips the
/// condition tables entirely when the tide stage is High/Low ("unknown" tide
/// band), since both tables require a tide band.
pub async fn apply_catch_feedback(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    rig: Option<&str>,
    conditions: CatchConditions,
    now: DateTime<Utc>,
) -> DatabaseResult<()> {
    if let Some(rig) = rig {
        let old = bayscan_db::learning::get_rig_effect(db, species, zone, rig).await?;
        let updated = apply_rig_effect(old);
        bayscan_db::learning::upsert_rig_effect(db, species, zone, rig, updated, now).await?;
    }

    let Some(tide_band) = tide_band_of(conditions.tide_stage) else {
        return Ok(());
    };
    let weight_multiplier = if conditions.crab_trap { CRAB_TRAP_WEIGHT_MULTIPLIER } else { 1.0 };

    let old = bayscan_db::learning::get_zone_condition_effect(
        db,
        species,
        zone,
        tide_band,
        conditions.clarity,
        conditions.wind_band,
        conditions.current_band,
    )
    .await?;
    let updated = apply_condition_effect(old, weight_multiplier);
    bayscan_db::learning::upsert_zone_condition_effect(
        db,
        species,
        zone,
        tide_band,
        conditions.clarity,
        conditions.wind_band,
        conditions.current_band,
        updated,
        now,
    )
    .await?;

    if let Some(rig) = rig {
        let old =
            bayscan_db::learning::get_rig_condition_effect(db, species, rig, tide_band, conditions.clarity).await?;
        let updated = apply_condition_effect(old, weight_multiplier);
        bayscan_db::learning::upsert_rig_condition_effect(db, species, rig, tide_band, conditions.clarity, updated, now)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_matches_the_capped_log_formula() {
        assert_eq!(learning_weight(1.0, 3.0), (2.0_f64).ln().min(3.0));
        assert!((learning_weight(1.0, 3.0) - std::f64::consts::LN_2).abs() < 1e-9);
        assert!(learning_weight(1000.0, 3.0) <= 3.0);
    }

    #[test]
    fn crab_trap_catches_teach_conditions_more_slowly() {
        let baseline = ConditionEffect { success_count: 4.0, weight: 0.0 };
        let rod = apply_condition_effect(baseline, 1.0);
        let trap = apply_condition_effect(baseline, CRAB_TRAP_WEIGHT_MULTIPLIER);
        assert!(trap.weight < rod.weight);
        assert_eq!(trap.success_count, 4.15);
    }

    #[test]
    fn high_and_low_tide_stages_have_no_band() {
        assert_eq!(tide_band_of(TideStage::High), None);
        assert_eq!(tide_band_of(TideStage::Low), None);
        assert_eq!(tide_band_of(TideStage::Incoming), Some(TideBand::Incoming));
    }

    #[tokio::test]
    async fn a_single_catch_sets_rig_weight_to_ln_two() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let trout = SpeciesKey::new("speckled_trout");
        let conditions = CatchConditions {
            tide_stage: TideStage::Incoming,
            clarity: ClarityBand::Clean,
            wind_band: WindBand::Favorable,
            current_band: CurrentBand::Medium,
            crab_trap: false,
        };
        apply_catch_feedback(&db, &trout, ZoneId::Zone3, Some("jig"), conditions, Utc::now())
            .await
            .unwrap();
        let effect = bayscan_db::learning::get_rig_effect(&db, &trout, ZoneId::Zone3, "jig")
            .await
            .unwrap();
        assert_eq!(effect.success_count, 1.0);
        assert!((effect.weight - std::f64::consts::LN_2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn crab_trap_catch_increments_rig_effect_by_a_full_count() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let crab = SpeciesKey::new("blue_crab");
        let conditions = CatchConditions {
            tide_stage: TideStage::Incoming,
            clarity: ClarityBand::Clean,
            wind_band: WindBand::Neutral,
            current_band: CurrentBand::Low,
            crab_trap: true,
        };
        apply_catch_feedback(&db, &crab, ZoneId::Zone3, Some("crab_trap"), conditions, Utc::now())
            .await
            .unwrap();

        let rig_effect = bayscan_db::learning::get_rig_effect(&db, &crab, ZoneId::Zone3, "crab_trap")
            .await
            .unwrap();
        assert_eq!(rig_effect.success_count, 1.0);

        let condition_effect = bayscan_db::learning::get_zone_condition_effect(
            &db,
            &crab,
            ZoneId::Zone3,
            TideBand::Incoming,
            ClarityBand::Clean,
            WindBand::Neutral,
            CurrentBand::Low,
        )
        .await
        .unwrap();
        assert_eq!(condition_effect.success_count, CRAB_TRAP_WEIGHT_MULTIPLIER);
    }

    #[tokio::test]
    async fn unrigged_crab_trap_catch_still_updates_zone_conditions() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let trout = SpeciesKey::new("speckled_trout");
        let conditions = CatchConditions {
            tide_stage: TideStage::Incoming,
            clarity: ClarityBand::Clean,
            wind_band: WindBand::Favorable,
            current_band: CurrentBand::Medium,
            crab_trap: true,
        };
        apply_catch_feedback(&db, &trout, ZoneId::Zone3, None, conditions, Utc::now())
            .await
            .unwrap();
        let effect = bayscan_db::learning::get_zone_condition_effect(
            &db,
            &trout,
            ZoneId::Zone3,
            TideBand::Incoming,
            ClarityBand::Clean,
            WindBand::Favorable,
            CurrentBand::Medium,
        )
        .await
        .unwrap();
        assert_eq!(effect.success_count, CRAB_TRAP_WEIGHT_MULTIPLIER);
        assert!(effect.weight > 0.0);
    }

    #[tokio::test]
    async fn unknown_tide_stage_skips_condition_update() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let trout = SpeciesKey::new("speckled_trout");
        let conditions = CatchConditions {
            tide_stage: TideStage::High,
            clarity: ClarityBand::Clean,
            wind_band: WindBand::Favorable,
            current_band: CurrentBand::Medium,
            crab_trap: false,
        };
        apply_catch_feedback(&db, &trout, ZoneId::Zone3, Some("jig"), conditions, Utc::now())
            .await
            .unwrap();

        let rig_effect = bayscan_db::learning::get_rig_effect(&db, &trout, ZoneId::Zone3, "jig")
            .await
            .unwrap();
        assert_eq!(rig_effect.success_count, 1.0);

        let effect = bayscan_db::learning::get_zone_condition_effect(
            &db,
            &trout,
            ZoneId::Zone3,
            TideBand::Incoming,
            ClarityBand::Clean,
            WindBand::Favorable,
            CurrentBand::Medium,
        )
        .await
        .unwrap();
        assert_eq!(effect.success_count, 0.0);
    }
}
