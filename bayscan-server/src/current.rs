//! Derives the `GET /current` response (§6): the single most
//! information-dense endpoint, folding the latest environment snapshot
//! together with every Tier 1 species' cached score across all five zones.

use crate::classify;
use crate::dto::{CurrentResponse, DepthInfo, SpeciesSummary, ZoneSummary};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use bayscan_core::{ClarityBand, SpeciesKey, ZoneId};
use bayscan_scoring::cache::SmoothedScore;
use bayscan_scoring::Conditions;
use chrono::{DateTime, Datelike, Duration, Utc};

const MIN_RIG_SUCCESS_COUNT: f64 = 2.0;

/// Label the moon phase into one of the eight traditional named phases,
/// centering each label on its nominal point (0.0 new, 0.5 full) the same
/// way [`bayscan_scoring::subscores::moon_score`] treats distance from
/// those points as the scoring signal.
fn moon_phase_label(moon_phase: f64) -> &'static str {
    let phase = moon_phase.rem_euclid(1.0);
    let index = (((phase + 0.0625) / 0.125).floor() as i64).rem_euclid(8);
    match index {
        0 => "New Moon",
        1 => "Waxing Crescent",
        2 => "First Quarter",
        3 => "Waxing Gibbous",
        4 => "Full Moon",
        5 => "Waning Gibbous",
        6 => "Last Quarter",
        _ => "Waning Crescent",
    }
}

fn current_band_label(band: bayscan_core::CurrentBand) -> &'static str {
    match band {
        bayscan_core::CurrentBand::Low => "weak",
        bayscan_core::CurrentBand::Medium => "moderate",
        bayscan_core::CurrentBand::High => "strong",
    }
}

fn clarity_tip(clarity: ClarityBand) -> &'static str {
    match clarity {
        ClarityBand::Clean => "Water's clear — natural presentations and lighter leaders will outfish anything gaudy.",
        ClarityBand::Stained => "A little stain in the water — go with something that pushes water or flashes to get noticed.",
        ClarityBand::Muddy => "Water's murky — lean on scent and vibration over sight, and slow your retrieve down.",
    }
}

/// Best learned rig for a species in a zone, the same selection
/// [`bayscan_scoring::tips`] uses internally but exposed here since that
/// module keeps it private.
async fn best_rig_for_species(
    db: &bayscan_db::DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
) -> ApiResult<Option<String>> {
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

struct ZoneScore {
    zone: ZoneId,
    smoothed: SmoothedScore,
}

async fn score_all_zones(
    state: &AppState,
    species: &SpeciesKey,
    conditions: &Conditions,
    now: DateTime<Utc>,
) -> ApiResult<Vec<ZoneScore>> {
    let mut scores = Vec::with_capacity(ZoneId::ALL.len());
    for zone in ZoneId::ALL {
        let smoothed = state
            .score_locks
            .recompute_and_cache(&state.db, species, zone, conditions, now, false)
            .await?;
        scores.push(ZoneScore { zone, smoothed });
    }
    Ok(scores)
}

fn summary(species: &SpeciesKey, zone: ZoneId, smoothed: &SmoothedScore) -> SpeciesSummary {
    SpeciesSummary {
        species: species.as_str().to_string(),
        species_name: bayscan_rules::seasonality::display_name(species),
        zone_id: crate::dto::zone_id_str(zone),
        bite_score: smoothed.score,
        rating: smoothed.rating,
    }
}

/// Build the `/current` response against the latest environment snapshot.
pub async fn build(state: &AppState, now: DateTime<Utc>) -> ApiResult<CurrentResponse> {
    let snapshot = bayscan_db::repository::latest_snapshot(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("no environment snapshot captured yet".to_string()))?;
    let conditions = Conditions::from_snapshot(&snapshot, now.month());

    let mut per_species_best: Vec<(SpeciesKey, Vec<ZoneScore>)> = Vec::new();
    for species in bayscan_rules::species::TIER_1_SPECIES.iter().map(|s| SpeciesKey::new(*s)) {
        let zone_scores = score_all_zones(state, &species, &conditions, now).await?;
        per_species_best.push((species, zone_scores));
    }

    per_species_best.sort_by(|a, b| {
        let best_a = a.1.iter().map(|z| z.smoothed.score).fold(f64::MIN, f64::max);
        let best_b = b.1.iter().map(|z| z.smoothed.score).fold(f64::MIN, f64::max);
        best_b.partial_cmp(&best_a).unwrap_or(std::cmp::Ordering::Equal)
    });

    let species_summaries: Vec<SpeciesSummary> = per_species_best
        .iter()
        .map(|(species, zones)| {
            let best = zones
                .iter()
                .max_by(|a, b| a.smoothed.score.partial_cmp(&b.smoothed.score).unwrap_or(std::cmp::Ordering::Equal))
                .expect("every species scores across all five zones");
            summary(species, best.zone, &best.smoothed)
        })
        .collect();

    let top_species: Vec<SpeciesSummary> = species_summaries.iter().take(2).cloned().collect();
    let overall_score = {
        let top_three: Vec<f64> = species_summaries.iter().take(3).map(|s| s.bite_score).collect();
        if top_three.is_empty() {
            0.0
        } else {
            top_three.iter().sum::<f64>() / top_three.len() as f64
        }
    };

    let (leading_species, leading_zones) = per_species_best
        .first()
        .ok_or_else(|| ApiError::Internal("no tier 1 species configured".to_string()))?;

    let mut zones_sorted = leading_zones.iter().collect::<Vec<_>>();
    zones_sorted.sort_by(|a, b| b.smoothed.score.partial_cmp(&a.smoothed.score).unwrap_or(std::cmp::Ordering::Equal));
    let best_zones: Vec<ZoneSummary> = zones_sorted
        .iter()
        .take(3)
        .map(|z| ZoneSummary {
            zone_id: crate::dto::zone_id_str(z.zone),
            bite_score: z.smoothed.score,
        })
        .collect();

    let top_zone = zones_sorted.first().expect("leading species scored at least one zone");
    let zone_profile = bayscan_rules::zones::profile(top_zone.zone);
    let depth_info = DepthInfo {
        zone_id: crate::dto::zone_id_str(top_zone.zone),
        recommended_depth_ft: zone_profile.mid_depth(),
        depth_range_ft: zone_profile.depth_range,
    };

    let rig_of_moment = best_rig_for_species(&state.db, leading_species, top_zone.zone).await?;
    let pro_tip =
        bayscan_scoring::tips::generate(&state.db, leading_species, top_zone.zone, top_zone.smoothed.score, now).await?;

    let current_band = classify::current_band(conditions.current_speed_ft_s);
    let moon_tide_window = format!(
        "{} during the {} tide",
        moon_phase_label(snapshot.moon_phase),
        snapshot.tide_stage
    );

    Ok(CurrentResponse {
        window_start: now,
        window_end: now + Duration::hours(2),
        overall_score,
        tide_state: snapshot.tide_stage.to_string(),
        tide_height: snapshot.tide_height_ft,
        air_temp_f: snapshot.air_temp_f,
        water_temp_f: snapshot.water_temp_f,
        wind_speed: snapshot.wind_speed_mph,
        wind_direction: snapshot.wind_direction.clone(),
        wind_gust: None,
        moon_phase: snapshot.moon_phase,
        conditions_summary: format!(
            "{} {} tide, {} mph wind, {} skies",
            snapshot.time_of_day,
            snapshot.tide_stage,
            snapshot.wind_speed_mph.round(),
            cloud_cover_phrase(snapshot.cloud_cover)
        ),
        depth_info,
        top_species,
        species: species_summaries,
        clarity: conditions.water_clarity.to_string(),
        clarity_tip: clarity_tip(conditions.water_clarity).to_string(),
        confidence: top_zone.smoothed.confidence,
        rig_of_moment,
        best_zones,
        pro_tip,
        current_strength: current_band_label(current_band).to_string(),
        moon_tide_window,
    })
}

fn cloud_cover_phrase(cover: bayscan_core::CloudCover) -> &'static str {
    match cover {
        bayscan_core::CloudCover::Clear => "clear",
        bayscan_core::CloudCover::PartlyCloudy => "partly cloudy",
        bayscan_core::CloudCover::Overcast => "overcast",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moon_phase_label_centers_full_and_new() {
        assert_eq!(moon_phase_label(0.0), "New Moon");
        assert_eq!(moon_phase_label(0.5), "Full Moon");
    }

    #[test]
    fn moon_phase_label_wraps_near_one() {
        assert_eq!(moon_phase_label(0.99), "New Moon");
    }
}
