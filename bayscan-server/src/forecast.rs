//! Builds forecast windows for `GET /forecast` and `GET /hourly-outlook` on
//! demand, the same tide/weather/marine/astronomy pipeline
//! `bayscan_scheduler::jobs::run_ingestion_and_forecast` runs periodically,
//! adapted here for a single request instead of the full alert-evaluation
//! side effect.

use crate::error::ApiResult;
use crate::state::AppState;
use bayscan_core::{AstronomicalDay, MarineCondition, SpeciesKey, WeatherPoint};
use bayscan_forecast::windows::{self, ForecastWindow, WindowSlice};
use bayscan_net::fetch_with_retry;
use bayscan_net::sources::{TimeRange, DEFAULT_TIMEOUT};
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

fn conditions_for_window(
    tide: &[bayscan_core::TideSample],
    weather: &[WeatherPoint],
    astronomy: &AstronomicalDay,
    at: DateTime<Utc>,
) -> Conditions {
    let (_, tide_stage, tide_change_rate) =
        bayscan_scheduler::snapshot::derive_tide_reading(tide, at).unwrap_or((0.0, bayscan_core::TideStage::Slack, 0.0));
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
        time_of_day: bayscan_scheduler::snapshot::time_of_day(at.time(), astronomy.sunrise, astronomy.sunset),
        moon_phase: astronomy.moon_phase,
        water_clarity: bayscan_core::ClarityBand::Clean,
        salinity_ppt: None,
        salinity_24h_ago_ppt: None,
        month: at.month(),
    }
}

async fn astronomy_by_date(
    state: &AppState,
    dates: impl Iterator<Item = NaiveDate>,
) -> ApiResult<HashMap<NaiveDate, AstronomicalDay>> {
    let mut by_date = HashMap::new();
    for date in dates {
        if by_date.contains_key(&date) {
            continue;
        }
        let day = fetch_with_retry(DEFAULT_TIMEOUT, || {
            state
                .astronomy_source
                .fetch_day(date, state.config.location.latitude, state.config.location.longitude)
        })
        .await?;
        by_date.insert(date, day);
    }
    Ok(by_date)
}

fn scored_species() -> impl Iterator<Item = SpeciesKey> {
    bayscan_rules::species::TIER_1_SPECIES
        .iter()
        .chain(bayscan_rules::species::TIER_2_SPECIES.iter())
        .map(|s| SpeciesKey::new(*s))
}

/// Build scored forecast windows for every species over `[now, now + hours)`,
/// clamped to [`windows::MAX_HORIZON_HOURS`].
pub async fn build_all(
    state: &AppState,
    hours: i64,
    now: DateTime<Utc>,
) -> ApiResult<HashMap<SpeciesKey, Vec<ForecastWindow>>> {
    let range = TimeRange {
        start: now,
        end: now + Duration::hours(hours),
    };

    let tide = fetch_with_retry(DEFAULT_TIMEOUT, || {
        state.tide_source.fetch_tide(&state.config.tide.prediction_station_id, range)
    })
    .await?;
    let weather = fetch_with_retry(DEFAULT_TIMEOUT, || state.weather_forecast.fetch_forecast(range)).await?;
    let marine = fetch_with_retry(DEFAULT_TIMEOUT, || {
        state.marine_source.fetch_marine(&state.config.marine.zone, range)
    })
    .await?;

    let bounds = windows::window_bounds(now, hours, windows::DEFAULT_WINDOW_HOURS);
    let dates = bounds.iter().map(|(start, end)| (*start + (*end - *start) / 2).date_naive());
    let astronomy = astronomy_by_date(state, dates).await?;

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
        let built = windows::build_windows(&species, &slices, &state.config.marine);
        windows_by_species.insert(species, built);
    }
    Ok(windows_by_species)
}
