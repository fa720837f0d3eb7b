//! Snapshot capturer (§4.3): turns a tide/weather/astronomy read into one
//! appended [`EnvironmentSnapshot`], deriving tide stage, tide change rate,
//! time of day, and dock-lights state along the way.

use crate::error::SchedulerResult;
use bayscan_core::config::EngineConfig;
use bayscan_core::{clamp, EnvironmentSnapshot, TideSample, TideStage, TimeOfDay};
use bayscan_db::{repository, DatabasePool};
use bayscan_net::sources::{AstronomySource, TideSource, TimeRange, WeatherObservationSource, DEFAULT_TIMEOUT};
use bayscan_net::fetch_with_retry;
use chrono::{DateTime, Duration, NaiveTime, Utc};

/// How recently a snapshot must exist to skip this capture (§4.3).
const DEDUPE_MINUTES: i64 = 5;
/// How long appended snapshots are retained before being pruned.
const RETENTION_DAYS: i64 = 14;
/// Half-width of the window searched for a local tide extremum.
const EXTREMUM_WINDOW_HOURS: i64 = 2;
/// Height tolerance, in feet, for calling a reading "at" the window extremum.
const EXTREMUM_TOLERANCE_FT: f64 = 0.05;
/// Below this normalized rate the tide counts as slack rather than moving.
const SLACK_RATE_THRESHOLD: f64 = 0.08;

fn interpolate(samples: &[TideSample], at: DateTime<Utc>) -> Option<(f64, f64)> {
    let idx = samples.iter().position(|s| s.time >= at)?;
    if idx == 0 {
        return Some((samples[0].height_ft, 0.0));
    }
    let prev = &samples[idx - 1];
    let next = &samples[idx];
    let span_hours = (next.time - prev.time).num_seconds() as f64 / 3600.0;
    if span_hours <= 0.0 {
        return Some((next.height_ft, 0.0));
    }
    let frac = (at - prev.time).num_seconds() as f64 / 3600.0 / span_hours;
    let height = prev.height_ft + (next.height_ft - prev.height_ft) * frac;
    let slope = (next.height_ft - prev.height_ft) / span_hours;
    Some((height, slope))
}

/// Interpolate the tide height at `at` and classify its stage from a window
/// of samples bracketing it.
pub fn derive_tide_reading(samples: &[TideSample], at: DateTime<Utc>) -> Option<(f64, TideStage, f64)> {
    let mut sorted: Vec<TideSample> = samples.to_vec();
    sorted.sort_by_key(|s| s.time);
    let (height, slope) = interpolate(&sorted, at)?;
    let rate = clamp(slope.abs() / 2.0, 0.0, 1.0);

    let window_start = at - Duration::hours(EXTREMUM_WINDOW_HOURS);
    let window_end = at + Duration::hours(EXTREMUM_WINDOW_HOURS);
    let (local_min, local_max) = sorted
        .iter()
        .filter(|s| s.time >= window_start && s.time <= window_end)
        .fold((f64::MAX, f64::MIN), |(lo, hi), s| (lo.min(s.height_ft), hi.max(s.height_ft)));

    let stage = if local_max > local_min && (local_max - height).abs() < EXTREMUM_TOLERANCE_FT {
        TideStage::High
    } else if local_max > local_min && (height - local_min).abs() < EXTREMUM_TOLERANCE_FT {
        TideStage::Low
    } else if rate < SLACK_RATE_THRESHOLD {
        TideStage::Slack
    } else if slope >= 0.0 {
        TideStage::Incoming
    } else {
        TideStage::Outgoing
    };

    Some((height, stage, rate))
}

/// Classify `local_time` into a [`TimeOfDay`] bucket relative to sunrise and
/// sunset. The station's local wall-clock time is approximated by the raw
/// UTC time of day, since no timezone conversion crate is in the dependency
/// stack; see DESIGN.md.
pub fn time_of_day(local_time: NaiveTime, sunrise: NaiveTime, sunset: NaiveTime) -> TimeOfDay {
    let pre_dawn = sunrise - Duration::minutes(90);
    let dawn_end = sunrise + Duration::minutes(30);
    let evening_start = sunset - Duration::hours(2);
    let dusk_start = sunset - Duration::minutes(30);
    let dusk_end = sunset + Duration::minutes(45);
    let noon = NaiveTime::from_hms_opt(12, 0, 0).expect("12:00:00 is a valid time");

    if local_time >= pre_dawn && local_time < sunrise {
        TimeOfDay::PreDawn
    } else if local_time >= sunrise && local_time < dawn_end {
        TimeOfDay::Dawn
    } else if local_time >= dawn_end && local_time < noon {
        TimeOfDay::Morning
    } else if local_time >= noon && local_time < evening_start {
        TimeOfDay::Midday
    } else if local_time >= evening_start && local_time < dusk_start {
        TimeOfDay::Evening
    } else if local_time >= dusk_start && local_time < dusk_end {
        TimeOfDay::Dusk
    } else {
        TimeOfDay::Night
    }
}

/// Fetch tide, weather, and astronomy data for `now` and append one
/// [`EnvironmentSnapshot`], unless one was captured within the dedupe
/// window. Returns `None` when the capture was skipped.
pub async fn capture(
    db: &DatabasePool,
    tide_source: &dyn TideSource,
    weather_source: &dyn WeatherObservationSource,
    astronomy_source: &dyn AstronomySource,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> SchedulerResult<Option<EnvironmentSnapshot>> {
    if repository::has_recent_snapshot(db, now - Duration::minutes(DEDUPE_MINUTES)).await? {
        return Ok(None);
    }

    let range = TimeRange {
        start: now - Duration::hours(3),
        end: now + Duration::hours(3),
    };
    let samples = fetch_with_retry(DEFAULT_TIMEOUT, || {
        tide_source.fetch_tide(&config.tide.realtime_station_id, range)
    })
    .await?;
    let weather = fetch_with_retry(DEFAULT_TIMEOUT, || weather_source.fetch_observation(now)).await?;
    let astronomy = fetch_with_retry(DEFAULT_TIMEOUT, || {
        astronomy_source.fetch_day(now.date_naive(), config.location.latitude, config.location.longitude)
    })
    .await?;

    let (tide_height_ft, tide_stage, tide_change_rate) =
        derive_tide_reading(&samples, now).unwrap_or((0.0, TideStage::Slack, 0.0));
    let tod = time_of_day(now.time(), astronomy.sunrise, astronomy.sunset);
    let dock_lights_on = matches!(tod, TimeOfDay::Dusk | TimeOfDay::Night);

    let snapshot = EnvironmentSnapshot {
        captured_at: now,
        tide_height_ft,
        tide_stage,
        tide_change_rate,
        air_temp_f: weather.air_temp_f,
        water_temp_f: weather.water_temp_f,
        wind_speed_mph: weather.wind_speed_mph,
        wind_direction: weather.wind_direction,
        pressure_trend: weather.pressure_trend,
        cloud_cover: weather.cloud_cover,
        time_of_day: tod,
        moon_phase: astronomy.moon_phase,
        from_forecast: false,
        dock_lights_on,
    };

    repository::insert_snapshot(db, &snapshot).await?;
    repository::prune_snapshots_before(db, now - Duration::days(RETENTION_DAYS)).await?;

    Ok(Some(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hour: i64, height_ft: f64, base: DateTime<Utc>) -> TideSample {
        TideSample {
            time: base + Duration::hours(hour),
            height_ft,
        }
    }

    #[test]
    fn rising_tide_between_samples_reads_as_incoming() {
        let base = Utc::now();
        let samples = vec![sample(-1, 1.0, base), sample(0, 2.0, base), sample(1, 3.0, base), sample(2, 3.5, base)];
        let (_, stage, rate) = derive_tide_reading(&samples, base + Duration::minutes(30)).unwrap();
        assert_eq!(stage, TideStage::Incoming);
        assert!(rate > 0.0);
    }

    #[test]
    fn reading_at_the_window_maximum_is_high() {
        let base = Utc::now();
        let samples = vec![sample(-2, 1.0, base), sample(-1, 2.0, base), sample(0, 3.0, base), sample(1, 2.0, base)];
        let (_, stage, _) = derive_tide_reading(&samples, base).unwrap();
        assert_eq!(stage, TideStage::High);
    }

    #[test]
    fn midday_between_dawn_and_evening_is_morning_or_midday() {
        let sunrise = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        let sunset = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let nine_am = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(time_of_day(nine_am, sunrise, sunset), TimeOfDay::Morning);
    }

    #[test]
    fn after_sunset_is_dusk_or_night() {
        let sunrise = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        let sunset = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let ten_pm = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        assert_eq!(time_of_day(ten_pm, sunrise, sunset), TimeOfDay::Night);
    }
}
