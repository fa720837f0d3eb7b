//! Deterministic in-memory environmental sources, for tests and local runs
//! without a live network dependency (§4.2).

use crate::error::NetworkResult;
use crate::sources::{
    AstronomySource, MarineSource, TideSource, TimeRange, WeatherForecastSource,
    WeatherObservationSource,
};
use async_trait::async_trait;
use bayscan_core::{AstronomicalDay, CloudCover, MarineCondition, PressureTrend, TideSample, WeatherPoint};
use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// A stub tide source that returns a fixed sinusoid at 10-minute resolution.
#[derive(Debug, Clone, Copy)]
pub struct StubTideSource {
    /// Amplitude of the tide curve, feet.
    pub amplitude_ft: f64,
    /// Midline of the tide curve, feet.
    pub mean_ft: f64,
    /// Period of a full tide cycle, in hours.
    pub period_hours: f64,
}

impl Default for StubTideSource {
    fn default() -> Self {
        Self {
            amplitude_ft: 1.2,
            mean_ft: 1.8,
            period_hours: 12.42,
        }
    }
}

#[async_trait]
impl TideSource for StubTideSource {
    async fn fetch_tide(&self, _station_id: &str, range: TimeRange) -> NetworkResult<Vec<TideSample>> {
        let mut samples = Vec::new();
        let mut t = range.start;
        while t <= range.end {
            let hours = (t - range.start).num_seconds() as f64 / 3600.0;
            let phase = 2.0 * std::f64::consts::PI * hours / self.period_hours;
            samples.push(TideSample {
                time: t,
                height_ft: self.mean_ft + self.amplitude_ft * phase.sin(),
            });
            t += ChronoDuration::minutes(10);
        }
        Ok(samples)
    }
}

/// A stub weather source returning a fixed, mild-weather observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubWeatherSource {
    /// Air temperature to report, °F.
    pub air_temp_f: Option<f64>,
}

fn default_point(time: DateTime<Utc>, air_temp_f: f64, is_forecast: bool) -> WeatherPoint {
    WeatherPoint {
        time,
        air_temp_f,
        water_temp_f: Some(air_temp_f - 3.0),
        wind_speed_mph: 8.0,
        wind_direction: Some("SE".to_string()),
        pressure_trend: PressureTrend::Stable,
        cloud_cover: CloudCover::PartlyCloudy,
        is_forecast,
    }
}

#[async_trait]
impl WeatherObservationSource for StubWeatherSource {
    async fn fetch_observation(&self, as_of: DateTime<Utc>) -> NetworkResult<WeatherPoint> {
        Ok(default_point(as_of, self.air_temp_f.unwrap_or(74.0), false))
    }
}

#[async_trait]
impl WeatherForecastSource for StubWeatherSource {
    async fn fetch_forecast(&self, range: TimeRange) -> NetworkResult<Vec<WeatherPoint>> {
        let mut points = Vec::new();
        let mut t = range.start;
        while t <= range.end {
            points.push(default_point(t, self.air_temp_f.unwrap_or(74.0), true));
            t += ChronoDuration::hours(1);
        }
        Ok(points)
    }
}

/// A stub marine source that always reports calm conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubMarineSource;

#[async_trait]
impl MarineSource for StubMarineSource {
    async fn fetch_marine(&self, _zone_id: &str, range: TimeRange) -> NetworkResult<Vec<MarineCondition>> {
        Ok(vec![MarineCondition {
            time: range.start,
            wave_height_ft: 1.0,
            hazard_text: None,
        }])
    }
}

/// A stub astronomy source with a fixed sunrise/sunset and a linear moon
/// phase derived from the date's day-of-month.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAstronomySource;

#[async_trait]
impl AstronomySource for StubAstronomySource {
    async fn fetch_day(
        &self,
        date: chrono::NaiveDate,
        _latitude: f64,
        _longitude: f64,
    ) -> NetworkResult<AstronomicalDay> {
        use chrono::Datelike;
        let moon_phase = (date.day() as f64 % 29.5) / 29.5;
        Ok(AstronomicalDay {
            date,
            sunrise: chrono::NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            sunset: chrono::NaiveTime::from_hms_opt(19, 15, 0).unwrap(),
            moon_phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_tide_source_produces_samples_across_range() {
        let source = StubTideSource::default();
        let start = Utc::now();
        let range = TimeRange {
            start,
            end: start + ChronoDuration::hours(6),
        };
        let samples = source.fetch_tide("8735180", range).await.unwrap();
        assert!(samples.len() > 1);
    }

    #[tokio::test]
    async fn stub_weather_observation_has_water_temp() {
        let source = StubWeatherSource::default();
        let point = source.fetch_observation(Utc::now()).await.unwrap();
        assert!(point.water_temp_f.is_some());
        assert!(!point.is_forecast);
    }
}
