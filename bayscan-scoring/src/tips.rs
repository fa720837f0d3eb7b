//! Tip generator (§4.9): composes a rig/bait/tide-aware sentence from the
//! learned effect tables, rotating among candidate phrasings so the same
//! tip doesn't repeat every time a species/zone pair is queried back to back.

use crate::error::ScoringResult;
use bayscan_core::{SpeciesKey, ZoneId};
use bayscan_db::DatabasePool;
use chrono::{DateTime, Utc};

const MIN_RIG_SUCCESS_COUNT: f64 = 2.0;
const BEST_BAIT_WINDOW_DAYS: i64 = 30;
const TIP_SCORE_THRESHOLD: f64 = 50.0;

async fn best_rig(db: &DatabasePool, species: &SpeciesKey, zone: ZoneId) -> ScoringResult<Option<String>> {
    let rigs = bayscan_db::learning::rig_effects_for_species_zone_with_timestamps(db, species, zone).await?;
    let best = rigs
        .into_iter()
        .filter(|(_, effect, _)| effect.success_count >= MIN_RIG_SUCCESS_COUNT)
        .max_by(|(_, a, a_at), (_, b, b_at)| {
            a.weight
                .partial_cmp(&b.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a_at.cmp(b_at))
        });
    Ok(best.map(|(rig, _, _)| rig))
}

async fn best_bait(db: &DatabasePool, zone: ZoneId, now: DateTime<Utc>) -> ScoringResult<Option<String>> {
    let since = now - chrono::Duration::days(BEST_BAIT_WINDOW_DAYS);
    let bait = bayscan_db::repository::most_frequent_bait_species(db, zone, since).await?;
    Ok(bait.map(|b| bayscan_rules::seasonality::display_name(&b)))
}

fn tide_phrase(band: Option<&str>) -> &'static str {
    match band {
        Some("incoming") => "as the tide comes in",
        Some("outgoing") => "as the tide pulls out",
        Some("slack") => "right around slack water",
        _ => "as conditions line up",
    }
}

fn zone_structure_phrase(zone: ZoneId) -> &'static str {
    match zone.number() {
        1 => "tight against the pilings and rubble",
        5 => "out along the deeper eastern stretch",
        3 | 4 => "working the pilings on the drift",
        _ => "working the open water along the drop-off",
    }
}

fn compose(species_name: &str, rig: Option<&str>, bait: Option<&str>, tide: &str, structure: &str) -> String {
    match (rig, bait) {
        (Some(rig), Some(bait)) => format!(
            "{species_name} are worth a shot here — a {rig} tipped with {bait} {tide}, {structure}."
        ),
        (Some(rig), None) => format!(
            "{species_name} are worth a shot here — try a {rig} {tide}, {structure}."
        ),
        (None, Some(bait)) => format!(
            "{species_name} are worth a shot here — {bait} has been working {tide}, {structure}."
        ),
        (None, None) => format!("{species_name} are worth a shot here {tide}, {structure}."),
    }
}

/// Generate a tip for (species, zone) at the given score, or `None` below
/// the tip threshold. Rotates among the candidate phrasings least recently
/// shown for this (species, zone) pair.
pub async fn generate(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    score: f64,
    now: DateTime<Utc>,
) -> ScoringResult<Option<String>> {
    if score < TIP_SCORE_THRESHOLD {
        return Ok(None);
    }

    let species_name = bayscan_rules::seasonality::display_name(species);
    let rig = best_rig(db, species, zone).await?;
    let bait = best_bait(db, zone, now).await?;
    let tide_band = bayscan_db::learning::dominant_tide_band(db, species, zone).await?;
    let tide = tide_phrase(tide_band.as_deref());
    let structure = zone_structure_phrase(zone);

    let with_rig_and_bait = compose(&species_name, rig.as_deref(), bait.as_deref(), tide, structure);
    let with_rig_only = compose(&species_name, rig.as_deref(), None, tide, structure);
    let with_bait_only = compose(&species_name, None, bait.as_deref(), tide, structure);
    let generic = compose(&species_name, None, None, tide, structure);

    let mut candidates = vec![generic.as_str()];
    if rig.is_some() {
        candidates.push(with_rig_only.as_str());
    }
    if bait.is_some() {
        candidates.push(with_bait_only.as_str());
    }
    if rig.is_some() && bait.is_some() {
        candidates.push(with_rig_and_bait.as_str());
    }

    let chosen = bayscan_db::learning::least_recently_used_tip(db, species, zone, &candidates, now).await?;
    Ok(Some(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tide_phrase_falls_back_when_band_unknown() {
        assert_eq!(tide_phrase(None), "as conditions line up");
        assert_eq!(tide_phrase(Some("incoming")), "as the tide comes in");
    }

    #[test]
    fn zone_one_and_five_get_distinct_structure_phrasing() {
        assert_ne!(zone_structure_phrase(ZoneId::Zone1), zone_structure_phrase(ZoneId::Zone5));
    }

    #[tokio::test]
    async fn below_threshold_score_yields_no_tip() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let trout = SpeciesKey::new("speckled_trout");
        let tip = generate(&db, &trout, ZoneId::Zone3, 30.0, Utc::now()).await.unwrap();
        assert!(tip.is_none());
    }

    #[tokio::test]
    async fn above_threshold_score_yields_a_generic_tip_with_no_learned_data() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let trout = SpeciesKey::new("speckled_trout");
        let tip = generate(&db, &trout, ZoneId::Zone3, 75.0, Utc::now()).await.unwrap();
        assert!(tip.is_some());
    }
}
