//! The three periodic jobs (§4.12): ingest + recompute forecast windows,
//! capture an environment snapshot, and periodically recalculate cached
//! bite scores so smoothing keeps drifting toward fresh conditions even
//! between catch reports.

use crate::error::SchedulerResult;
use bayscan_core::config::EngineConfig;
use bayscan_core::{AstronomicalDay, MarineCondition, SpeciesKey, TideSample, WeatherPoint, ZoneId};
use bayscan_db::{repository, DatabasePool};
use bayscan_forecast::windows::{self, WindowSlice};
use bayscan_net::fetch_with_retry;
use bayscan_net::sources::{
    AstronomySource, MarineSource, TideSource, TimeRange, WeatherForecastSource, DEFAULT_TIMEOUT,
};
use bayscan_scoring::cache::ScoreLocks;
use bayscan_scoring::Conditions;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::HashMap;

fn nearest_weather(points: &[WeatherPoint], at: DateTime<Utc>) -> Option<&WeatherPoint> {
    points.iter().min_by_key(|p| (p.time - at).num_seconds().abs())
}

fn nearest_marine(conditions: &[MarineCondition], at: DateTime<Utc>) -> (f64, Option<String>) {
    conditions
        .iter()
        .min_by_key(|c| (c.time - at).num_seconds().abs())
        .map(|c| (c.wave_height_ft, c.hazard_text.clone()))
        .unwrap_or((0.0, None))
}

/// Project a [`Conditions`] reading for a forecast window's midpoint from
/// the raw tide/weather series. Fields the forecast sources don't carry
/// (water clarity, salinity) fall back to the same neutral defaults
/// [`Conditions::from_snapshot`] uses for a live read.
fn conditions_for_window(
    tide: &[TideSample],
    weather: &[WeatherPoint],
    astronomy: &AstronomicalDay,
    at: DateTime<Utc>,
) -> Conditions {
    let (_, tide_stage, tide_change_rate) =
        crate::snapshot::derive_tide_reading(tide, at).unwrap_or((0.0, bayscan_core::TideStage::Slack, 0.0));
    let point = nearest_weather(weather, at);

    Conditions {
        water_temp_f: point.and_then(|p| p.water_temp_f),
        air_temp_f: point.map(|p| p.air_temp_f).unwrap_or(75.0),
        air_temp_24h_ago_f: None,
        tide_stage,
        tide_change_rate,
        current_speed_ft_s: 0.0,
        wind_speed_mph: point.map(|p| p.wind_speed_mph).unwrap_or(0.0),
        wind_direction: point.and_then(|p| p.wind_direction.clone()),
        pressure_trend: point.map(|p| p.pressure_trend).unwrap_or(bayscan_core::PressureTrend::Stable),
        cloud_cover: point.map(|p| p.cloud_cover).unwrap_or(bayscan_core::CloudCover::PartlyCloudy),
        time_of_day: crate::snapshot::time_of_day(at.time(), astronomy.sunrise, astronomy.sunset),
        moon_phase: astronomy.moon_phase,
        water_clarity: bayscan_core::ClarityBand::Clean,
        salinity_ppt: None,
        salinity_24h_ago_ppt: None,
        month: at.month(),
    }
}

/// Fetch the astronomical record for every distinct calendar date a
/// forecast horizon touches (at most two for a 48-hour horizon).
async fn astronomy_by_date(
    astronomy_source: &dyn AstronomySource,
    dates: impl Iterator<Item = NaiveDate>,
    latitude: f64,
    longitude: f64,
) -> SchedulerResult<HashMap<NaiveDate, AstronomicalDay>> {
    let mut by_date = HashMap::new();
    for date in dates {
        if by_date.contains_key(&date) {
            continue;
        }
        let day = fetch_with_retry(DEFAULT_TIMEOUT, || astronomy_source.fetch_day(date, latitude, longitude)).await?;
        by_date.insert(date, day);
    }
    Ok(by_date)
}

/// Roster scored by the forecast window builder and the current-score
/// recompute: tier 1 and tier 2 game species together, bait/predator keys
/// excluded.
fn scored_species() -> impl Iterator<Item = SpeciesKey> {
    bayscan_rules::species::TIER_1_SPECIES
        .iter()
        .chain(bayscan_rules::species::TIER_2_SPECIES.iter())
        .map(|s| SpeciesKey::new(*s))
}

/// Fetch the forecast horizon's tide/weather/marine projections, build
/// scored windows per species, and evaluate alerts against them.
pub async fn run_ingestion_and_forecast(
    db: &DatabasePool,
    tide_source: &dyn TideSource,
    weather_forecast: &dyn WeatherForecastSource,
    marine_source: &dyn MarineSource,
    astronomy_source: &dyn AstronomySource,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> SchedulerResult<Vec<bayscan_core::Alert>> {
    let range = TimeRange {
        start: now,
        end: now + Duration::hours(windows::DEFAULT_HORIZON_HOURS),
    };

    let tide = fetch_with_retry(DEFAULT_TIMEOUT, || {
        tide_source.fetch_tide(&config.tide.prediction_station_id, range)
    })
    .await?;
    let weather = fetch_with_retry(DEFAULT_TIMEOUT, || weather_forecast.fetch_forecast(range)).await?;
    let marine = fetch_with_retry(DEFAULT_TIMEOUT, || marine_source.fetch_marine(&config.marine.zone, range)).await?;

    let bounds = windows::window_bounds(now, windows::DEFAULT_HORIZON_HOURS, windows::DEFAULT_WINDOW_HOURS);
    let dates = bounds.iter().map(|(start, end)| (*start + (*end - *start) / 2).date_naive());
    let astronomy = astronomy_by_date(astronomy_source, dates, config.location.latitude, config.location.longitude)
        .await?;

    let slices: Vec<WindowSlice> = bounds
        .into_iter()
        .map(|(start, end)| {
            let mid = start + (end - start) / 2;
            let (wave_height_ft, hazard_text) = nearest_marine(&marine, mid);
            let day = astronomy.get(&mid.date_naive()).copied().unwrap_or(AstronomicalDay {
                date: mid.date_naive(),
                sunrise: chrono::NaiveTime::from_hms_opt(6, 0, 0).expect("valid time"),
                sunset: chrono::NaiveTime::from_hms_opt(19, 0, 0).expect("valid time"),
                moon_phase: 0.0,
            });
            WindowSlice {
                start,
                end,
                conditions: conditions_for_window(&tide, &weather, &day, mid),
                wave_height_ft,
                hazard_text,
            }
        })
        .collect();

    let mut windows_by_species = HashMap::new();
    for species in scored_species() {
        let built = windows::build_windows(&species, &slices, &config.marine);
        windows_by_species.insert(species, built);
    }

    let fired = bayscan_forecast::evaluate_all(db, &windows_by_species, &config.alerts, now).await?;
    Ok(fired)
}

/// How far back a catch, bait, or predator log counts as "recent activity"
/// for targeting the periodic recalc (§4.12).
const RECENT_ACTIVITY_HOURS: i64 = 6;

/// Select which (species, zone) pairs the periodic recalc should recompute:
/// pairs with a catch in the last [`RECENT_ACTIVITY_HOURS`], plus zones with
/// recent predator activity crossed with prey species, plus zones with
/// recent bait activity crossed with every scored species. Falls back to
/// every tier 1 species across all zones when nothing qualifies (§4.12).
async fn targeted_pairs(db: &DatabasePool, since: DateTime<Utc>) -> SchedulerResult<Vec<(SpeciesKey, ZoneId)>> {
    let mut pairs: std::collections::HashSet<(SpeciesKey, ZoneId)> =
        repository::recently_active_catch_pairs(db, since).await?.into_iter().collect();

    let predator_zones = repository::recently_active_predator_zones(db, since).await?;
    if !predator_zones.is_empty() {
        for prey in bayscan_rules::species::PREY_SPECIES {
            for &zone in &predator_zones {
                pairs.insert((SpeciesKey::new(*prey), zone));
            }
        }
    }

    let bait_zones = repository::recently_active_bait_zones(db, since).await?;
    if !bait_zones.is_empty() {
        for species in scored_species() {
            for &zone in &bait_zones {
                pairs.insert((species.clone(), zone));
            }
        }
    }

    if pairs.is_empty() {
        for species in bayscan_rules::species::TIER_1_SPECIES.iter().map(|s| SpeciesKey::new(*s)) {
            for zone in ZoneId::ALL {
                pairs.insert((species.clone(), zone));
            }
        }
    }

    Ok(pairs.into_iter().collect())
}

/// Recompute and re-cache the current bite score for the (species, zone)
/// pairs recent activity points at, against the latest snapshot, letting
/// the smoothing schedule keep drifting toward fresh conditions between
/// catch reports (§4.7), and regenerate each pair's tip alongside it.
pub async fn run_periodic_recalc(
    db: &DatabasePool,
    score_locks: &ScoreLocks,
    now: DateTime<Utc>,
) -> SchedulerResult<usize> {
    let Some(snapshot) = repository::latest_snapshot(db).await? else {
        return Ok(0);
    };
    let conditions = Conditions::from_snapshot(&snapshot, now.month());
    let since = now - Duration::hours(RECENT_ACTIVITY_HOURS);

    let mut recomputed = 0;
    for (species, zone) in targeted_pairs(db, since).await? {
        let smoothed = score_locks.recompute_and_cache(db, &species, zone, &conditions, now, false).await?;
        if let Err(err) = bayscan_scoring::tips::generate(db, &species, zone, smoothed.score, now).await {
            tracing::warn!(species = species.as_str(), zone = ?zone, error = %err, "tip regeneration failed, skipping");
        }
        recomputed += 1;
    }
    Ok(recomputed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayscan_core::Catch;

    #[tokio::test]
    async fn targeted_pairs_falls_back_to_tier_1_sweep_when_nothing_is_active() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let now = Utc::now();
        let pairs = targeted_pairs(&db, now - Duration::hours(RECENT_ACTIVITY_HOURS)).await.unwrap();
        let expected = bayscan_rules::species::TIER_1_SPECIES.len() * ZoneId::ALL.len();
        assert_eq!(pairs.len(), expected);
    }

    #[tokio::test]
    async fn targeted_pairs_includes_a_zone_with_a_recent_catch() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let now = Utc::now();
        let species = SpeciesKey::new("redfish");
        repository::insert_catch(
            &db,
            &Catch { species: species.clone(), zone: ZoneId::Zone2, timestamp: now, quantity: 1 },
        )
        .await
        .unwrap();

        let pairs = targeted_pairs(&db, now - Duration::hours(RECENT_ACTIVITY_HOURS)).await.unwrap();
        assert!(pairs.contains(&(species, ZoneId::Zone2)));
    }
}
