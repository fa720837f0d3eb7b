//! Narrow environmental client traits (§4.2): one async fetch per source.

use crate::error::{NetworkError, NetworkResult};
use async_trait::async_trait;
use bayscan_core::{AstronomicalDay, MarineCondition, TideSample, WeatherPoint};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// An inclusive UTC time range to fetch observations/predictions over.
#[derive(Debug, Clone, Copy)]
pub struct TimeRange {
    /// Start of the range, inclusive.
    pub start: DateTime<Utc>,
    /// End of the range, inclusive.
    pub end: DateTime<Utc>,
}

/// Default per-request timeout for all environmental sources.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches tide height predictions/observations for a NOAA station.
#[async_trait]
pub trait TideSource: Send + Sync {
    /// Fetch tide samples covering `range`.
    async fn fetch_tide(&self, station_id: &str, range: TimeRange) -> NetworkResult<Vec<TideSample>>;
}

/// Fetches current weather observations.
#[async_trait]
pub trait WeatherObservationSource: Send + Sync {
    /// Fetch the latest observation at or before `as_of`.
    async fn fetch_observation(&self, as_of: DateTime<Utc>) -> NetworkResult<WeatherPoint>;
}

/// Fetches a short-range weather forecast.
#[async_trait]
pub trait WeatherForecastSource: Send + Sync {
    /// Fetch forecast points covering `range`.
    async fn fetch_forecast(&self, range: TimeRange) -> NetworkResult<Vec<WeatherPoint>>;
}

/// Fetches marine hazard conditions for a NOAA marine zone.
#[async_trait]
pub trait MarineSource: Send + Sync {
    /// Fetch marine conditions covering `range` for `zone_id`.
    async fn fetch_marine(&self, zone_id: &str, range: TimeRange) -> NetworkResult<Vec<MarineCondition>>;
}

/// Fetches sunrise/sunset/moon-phase data.
#[async_trait]
pub trait AstronomySource: Send + Sync {
    /// Fetch the astronomical data for a single calendar date, at the given
    /// latitude/longitude.
    async fn fetch_day(
        &self,
        date: chrono::NaiveDate,
        latitude: f64,
        longitude: f64,
    ) -> NetworkResult<AstronomicalDay>;
}

/// Runs `attempt` once, retries exactly once more on failure, and bounds the
/// whole call at `timeout` (§4.2's "retry at most once on transient failure").
pub async fn fetch_with_retry<T, F, Fut>(timeout: Duration, mut attempt: F) -> NetworkResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = NetworkResult<T>>,
{
    let first = tokio::time::timeout(timeout, attempt())
        .await
        .map_err(|_| NetworkError::Timeout(timeout))?;

    match first {
        Ok(value) => Ok(value),
        Err(_) => tokio::time::timeout(timeout, attempt())
            .await
            .map_err(|_| NetworkError::Timeout(timeout))?,
    }
}

/// A value paired with the time it was produced, so a caller can tell a
/// fresh read from a cache fallback (§4.2: "return the last cached value
/// and a staleness indicator rather than fail the pipeline").
#[derive(Debug, Clone)]
pub struct Staleness<T> {
    /// The value itself, fresh or cached.
    pub value: T,
    /// When the value was produced.
    pub as_of: DateTime<Utc>,
    /// Whether this is a cache fallback rather than a fresh read.
    pub stale: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn retries_exactly_once_then_succeeds() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: NetworkResult<u32> = fetch_with_retry(Duration::from_secs(1), move || {
            let attempts = attempts_clone.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(NetworkError::Request("transient".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_second_failure() {
        let result: NetworkResult<u32> = fetch_with_retry(Duration::from_secs(1), || async {
            Err(NetworkError::Request("still failing".to_string()))
        })
        .await;

        assert!(result.is_err());
    }
}
