//! Route handlers for every endpoint in §6, plus the router that wires them
//! together behind CORS and request tracing.

use crate::classify;
use crate::current;
use crate::dto::*;
use crate::error::{ApiError, ApiResult};
use crate::forecast as forecast_build;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use bayscan_core::{Catch, CurrentBand, OverallTier, SpeciesKey, WindBand, ZoneId};
use bayscan_scoring::bait;
use bayscan_scoring::learning::CatchConditions;
use bayscan_scoring::Conditions;
use chrono::{Datelike, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/current", get(get_current))
        .route("/zone-bite-scores", get(get_zone_bite_scores))
        .route("/forecast", get(get_forecast))
        .route("/hourly-outlook", get(get_hourly_outlook))
        .route("/alerts", get(get_alerts))
        .route("/tide", get(get_tide))
        .route("/species/:key", get(get_species))
        .route("/bait-forecast", get(get_bait_forecast))
        .route("/bait/:key", get(get_bait_detail))
        .route("/catches", post(post_catch))
        .route("/catches/:id", delete(delete_catch))
        .route("/bait-logs", post(post_bait_log))
        .route("/bait-logs/:id", delete(delete_bait_log))
        .route("/predator-logs", post(post_predator_log))
        .route("/predator-logs/:id", delete(delete_predator_log))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

type SharedState = State<Arc<AppState>>;

fn zone_from_str(raw: &str) -> ApiResult<ZoneId> {
    ZoneId::parse(raw).ok_or_else(|| ApiError::UnknownZone(raw.to_string()))
}

fn require_known_species(species: &SpeciesKey) -> ApiResult<()> {
    if classify::is_known_species(species) {
        Ok(())
    } else {
        Err(ApiError::UnknownSpecies(species.as_str().to_string()))
    }
}

async fn get_current(State(state): SharedState) -> ApiResult<Json<CurrentResponse>> {
    Ok(Json(current::build(&state, Utc::now()).await?))
}

#[derive(Debug, Deserialize)]
pub struct ZoneBiteScoreQuery {
    species: String,
    zone_id: String,
}

async fn get_zone_bite_scores(
    State(state): SharedState,
    Query(q): Query<ZoneBiteScoreQuery>,
) -> ApiResult<Json<ZoneBiteScoreResponse>> {
    let species = SpeciesKey::new(q.species);
    require_known_species(&species)?;
    let zone = zone_from_str(&q.zone_id)?;

    let snapshot = bayscan_db::repository::latest_snapshot(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("no environment snapshot captured yet".to_string()))?;
    let now = Utc::now();
    let conditions = Conditions::from_snapshot(&snapshot, now.month());

    let smoothed = state.score_locks.recompute_and_cache(&state.db, &species, zone, &conditions, now, false).await?;
    let tip = bayscan_scoring::tips::generate(&state.db, &species, zone, smoothed.score, now).await?;

    Ok(Json(ZoneBiteScoreResponse {
        species: species.as_str().to_string(),
        species_name: bayscan_rules::seasonality::display_name(&species),
        zone_id: zone_id_str(zone),
        bite_score: smoothed.score,
        rating: smoothed.rating,
        confidence: smoothed.confidence,
        reason_summary: smoothed.reason_summary,
        tip,
        last_updated: now,
        data_source: "cached",
    }))
}

#[derive(Debug, Deserialize, Default)]
pub struct HoursQuery {
    hours: Option<i64>,
}

fn forecast_species_scores(by_species: &HashMap<SpeciesKey, Vec<bayscan_forecast::windows::ForecastWindow>>, index: usize) -> Vec<ForecastSpeciesScore> {
    let mut scored: Vec<ForecastSpeciesScore> = by_species
        .iter()
        .filter_map(|(species, windows)| {
            windows.get(index).map(|w| ForecastSpeciesScore {
                species: species.as_str().to_string(),
                species_name: bayscan_rules::seasonality::display_name(species),
                bite_score: w.bite_score,
                label: w.label,
            })
        })
        .collect();
    scored.sort_by(|a, b| b.bite_score.partial_cmp(&a.bite_score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(2);
    scored
}

fn overall_tier_at(by_species: &HashMap<SpeciesKey, Vec<bayscan_forecast::windows::ForecastWindow>>, index: usize) -> OverallTier {
    let mut scores: Vec<f64> = by_species.values().filter_map(|w| w.get(index).map(|w| w.bite_score)).collect();
    scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let top_three: Vec<f64> = scores.into_iter().take(3).collect();
    let avg = if top_three.is_empty() { 0.0 } else { top_three.iter().sum::<f64>() / top_three.len() as f64 };
    OverallTier::from_score(avg)
}

async fn get_forecast(State(state): SharedState, Query(q): Query<HoursQuery>) -> ApiResult<Json<ForecastResponse>> {
    let hours = q.hours.unwrap_or(bayscan_forecast::windows::DEFAULT_HORIZON_HOURS);
    let now = Utc::now();
    let by_species = forecast_build::build_all(&state, hours, now).await?;

    let window_count = by_species.values().map(|w| w.len()).max().unwrap_or(0);
    let windows = (0..window_count)
        .filter_map(|i| {
            let any = by_species.values().find_map(|w| w.get(i))?;
            Some(ForecastWindowDto {
                start: any.start,
                end: any.end,
                overall_tier: overall_tier_at(&by_species, i),
                top_species: forecast_species_scores(&by_species, i),
            })
        })
        .collect();

    Ok(Json(ForecastResponse { windows }))
}

async fn get_hourly_outlook(State(state): SharedState, Query(q): Query<HoursQuery>) -> ApiResult<Json<HourlyOutlookResponse>> {
    let hours = q.hours.unwrap_or(12).clamp(1, bayscan_forecast::windows::MAX_HORIZON_HOURS);
    let now = Utc::now();
    let by_species = forecast_build::build_all(&state, hours, now).await?;

    let mut hour_entries = Vec::new();
    for h in 0..hours {
        let at = now + chrono::Duration::hours(h);
        let index = by_species
            .values()
            .next()
            .and_then(|windows| windows.iter().position(|w| w.start <= at && at < w.end));
        let Some(index) = index else { continue };
        hour_entries.push(HourlyOutlookEntry {
            hour_start: at,
            overall_tier: overall_tier_at(&by_species, index),
            top_species: forecast_species_scores(&by_species, index),
        });
    }

    Ok(Json(HourlyOutlookResponse { hours: hour_entries }))
}

async fn get_alerts(State(state): SharedState) -> ApiResult<Json<Vec<AlertDto>>> {
    let since = Utc::now() - chrono::Duration::hours(24);
    let alerts = bayscan_db::repository::recent_alerts(&state.db, since).await?;
    Ok(Json(
        alerts
            .into_iter()
            .map(|a| AlertDto {
                species_name: bayscan_rules::seasonality::display_name(&a.species),
                species: a.species.as_str().to_string(),
                threshold: a.threshold,
                observed_score: a.observed_score,
                fired_at: a.fired_at,
            })
            .collect(),
    ))
}

async fn get_tide(State(state): SharedState) -> ApiResult<Json<TideResponse>> {
    let snapshot = bayscan_db::repository::latest_snapshot(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("no environment snapshot captured yet".to_string()))?;
    Ok(Json(TideResponse {
        tide_height_ft: snapshot.tide_height_ft,
        tide_stage: snapshot.tide_stage.to_string(),
        tide_change_rate: snapshot.tide_change_rate,
        captured_at: snapshot.captured_at,
    }))
}

async fn get_species(State(state): SharedState, Path(key): Path<String>) -> ApiResult<Json<SpeciesDetailResponse>> {
    let species = SpeciesKey::new(key);
    require_known_species(&species)?;

    let snapshot = bayscan_db::repository::latest_snapshot(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("no environment snapshot captured yet".to_string()))?;
    let now = Utc::now();
    let conditions = Conditions::from_snapshot(&snapshot, now.month());

    let mut zone_scores = Vec::with_capacity(ZoneId::ALL.len());
    for zone in ZoneId::ALL {
        let smoothed = state.score_locks.recompute_and_cache(&state.db, &species, zone, &conditions, now, false).await?;
        zone_scores.push(SpeciesSummary {
            species: species.as_str().to_string(),
            species_name: bayscan_rules::seasonality::display_name(&species),
            zone_id: zone_id_str(zone),
            bite_score: smoothed.score,
            rating: smoothed.rating,
        });
    }

    let tier = match bayscan_rules::species::tier(&species) {
        bayscan_rules::species::Tier::One => "tier_1",
        bayscan_rules::species::Tier::Two => "tier_2",
    };

    Ok(Json(SpeciesDetailResponse {
        species: species.as_str().to_string(),
        species_name: bayscan_rules::seasonality::display_name(&species),
        tier,
        running_factor: bayscan_rules::seasonality::running_factor(&species, now.month()),
        zone_scores,
    }))
}

async fn get_bait_forecast(State(state): SharedState) -> ApiResult<Json<Vec<BaitForecastEntry>>> {
    let snapshot = bayscan_db::repository::latest_snapshot(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("no environment snapshot captured yet".to_string()))?;
    let now = Utc::now();
    let conditions = Conditions::from_snapshot(&snapshot, now.month());

    let mut entries = Vec::new();
    for bait_species in bayscan_rules::species::BAIT_SPECIES.iter().map(|s| SpeciesKey::new(*s)) {
        for zone in ZoneId::ALL {
            let result = bait::compute(&state.db, &bait_species, zone, &conditions, now).await?;
            entries.push(BaitForecastEntry {
                bait_species: bait_species.as_str().to_string(),
                bait_name: bayscan_rules::seasonality::display_name(&bait_species),
                zone_id: zone_id_str(zone),
                bait_score: result.bait_score,
                baseline_label: result.baseline_label,
            });
        }
    }
    Ok(Json(entries))
}

async fn get_bait_detail(State(state): SharedState, Path(key): Path<String>) -> ApiResult<Json<BaitDetailResponse>> {
    let bait_species = SpeciesKey::new(key);
    if !bayscan_rules::species::is_bait_species(&bait_species) {
        return Err(ApiError::UnknownSpecies(bait_species.as_str().to_string()));
    }

    let snapshot = bayscan_db::repository::latest_snapshot(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("no environment snapshot captured yet".to_string()))?;
    let now = Utc::now();
    let conditions = Conditions::from_snapshot(&snapshot, now.month());

    let mut zone_scores = Vec::with_capacity(ZoneId::ALL.len());
    for zone in ZoneId::ALL {
        let result = bait::compute(&state.db, &bait_species, zone, &conditions, now).await?;
        zone_scores.push(BaitForecastEntry {
            bait_species: bait_species.as_str().to_string(),
            bait_name: bayscan_rules::seasonality::display_name(&bait_species),
            zone_id: zone_id_str(zone),
            bait_score: result.bait_score,
            baseline_label: result.baseline_label,
        });
    }

    Ok(Json(BaitDetailResponse {
        bait_species: bait_species.as_str().to_string(),
        bait_name: bayscan_rules::seasonality::display_name(&bait_species),
        zone_scores,
    }))
}

async fn post_catch(State(state): SharedState, Json(body): Json<CatchRequest>) -> ApiResult<Json<WriteAck>> {
    let species = SpeciesKey::new(body.species.clone());
    require_known_species(&species)?;
    let zone = zone_from_str(&body.zone_id)?;
    let now = Utc::now();
    let timestamp = body.timestamp.unwrap_or(now);

    let catch = Catch {
        species: species.clone(),
        zone,
        timestamp,
        quantity: body.quantity,
    };
    let id = bayscan_db::repository::insert_catch(&state.db, &catch).await?;

    let crab_trap = body
        .presentation
        .as_deref()
        .map(|p| p.eq_ignore_ascii_case("crab_trap"))
        .unwrap_or(false);

    if let Some(snapshot) = bayscan_db::repository::latest_snapshot(&state.db).await? {
        let conditions = Conditions::from_snapshot(&snapshot, timestamp.month());
        let profile = bayscan_rules::species::profile(&species);
        let wind_band: WindBand = classify::wind_band(profile.as_ref(), conditions.wind_direction.as_deref());
        let current_band: CurrentBand = classify::current_band(conditions.current_speed_ft_s);

        let feedback = CatchConditions {
            tide_stage: snapshot.tide_stage,
            clarity: conditions.water_clarity,
            wind_band,
            current_band,
            crab_trap,
        };

        let rig = body.rig_type.as_deref().or(body.presentation.as_deref());
        if let Err(err) = bayscan_scoring::learning::apply_catch_feedback(&state.db, &species, zone, rig, feedback, now).await {
            tracing::warn!(species = species.as_str(), zone = ?zone, error = %err, "learning update failed, catch still recorded");
        }

        match state.score_locks.recompute_and_cache(&state.db, &species, zone, &conditions, now, true).await {
            Ok(smoothed) => {
                if let Err(err) = bayscan_scoring::tips::generate(&state.db, &species, zone, smoothed.score, now).await {
                    tracing::warn!(species = species.as_str(), zone = ?zone, error = %err, "tip regeneration failed, catch still recorded");
                }
            }
            Err(err) => {
                tracing::warn!(species = species.as_str(), zone = ?zone, error = %err, "score recompute failed, catch still recorded");
            }
        }
    }

    Ok(Json(WriteAck { id, message: "catch recorded".to_string() }))
}

async fn delete_catch(State(state): SharedState, Path(id): Path<i64>) -> ApiResult<Json<DeleteAck>> {
    let deleted = bayscan_db::repository::delete_catch(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("catch {id}")));
    }
    Ok(Json(DeleteAck { deleted }))
}

async fn post_bait_log(State(state): SharedState, Json(body): Json<BaitLogRequest>) -> ApiResult<Json<WriteAck>> {
    let bait_species = SpeciesKey::new(body.bait_species);
    if !bayscan_rules::species::is_bait_species(&bait_species) {
        return Err(ApiError::UnknownSpecies(bait_species.as_str().to_string()));
    }
    let zone = zone_from_str(&body.zone_id)?;
    let timestamp = body.timestamp.unwrap_or_else(Utc::now);

    let log = bayscan_core::BaitLog {
        bait_species,
        zone,
        timestamp,
        quantity_estimate: body.quantity_estimate,
    };
    let id = bayscan_db::repository::insert_bait_log(&state.db, &log).await?;
    Ok(Json(WriteAck { id, message: "bait sighting recorded".to_string() }))
}

async fn delete_bait_log(State(state): SharedState, Path(id): Path<i64>) -> ApiResult<Json<DeleteAck>> {
    let deleted = bayscan_db::repository::delete_bait_log(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("bait log {id}")));
    }
    Ok(Json(DeleteAck { deleted }))
}

async fn post_predator_log(State(state): SharedState, Json(body): Json<PredatorLogRequest>) -> ApiResult<Json<WriteAck>> {
    let species = SpeciesKey::new(body.species);
    if !bayscan_rules::species::is_predator_species(&species) {
        return Err(ApiError::UnknownSpecies(species.as_str().to_string()));
    }
    let zone = zone_from_str(&body.zone_id)?;
    let timestamp = body.timestamp.unwrap_or_else(Utc::now);

    let log = bayscan_core::PredatorLog { species, zone, timestamp };
    let id = bayscan_db::repository::insert_predator_log(&state.db, &log).await?;
    Ok(Json(WriteAck { id, message: "predator sighting recorded".to_string() }))
}

async fn delete_predator_log(State(state): SharedState, Path(id): Path<i64>) -> ApiResult<Json<DeleteAck>> {
    let deleted = bayscan_db::repository::delete_predator_log(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("predator log {id}")));
    }
    Ok(Json(DeleteAck { deleted }))
}
