//! # Bayscan Scheduler
//!
//! Drives the engine's three periodic jobs (§4.12) on top of [`Service`]:
//! ingest forecast-horizon data and recompute forecast windows + alerts,
//! capture an environment snapshot, and periodically recalculate cached
//! bite scores. Each job is guarded against overlapping with itself by an
//! [`AtomicBool`] flag, checked and set before the job body runs and
//! cleared unconditionally when it returns (§5's non-reentrancy
//! requirement) — a slow or stuck run is skipped over rather than stacked.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod jobs;
pub mod snapshot;

pub use error::{SchedulerError, SchedulerResult};

use async_trait::async_trait;
use bayscan_core::config::EngineConfig;
use bayscan_core::traits::{Service, ServiceHealth, ServiceStatus};
use bayscan_core::EngineResult;
use bayscan_db::DatabasePool;
use bayscan_net::sources::{AstronomySource, MarineSource, TideSource, WeatherForecastSource, WeatherObservationSource};
use bayscan_scoring::cache::ScoreLocks;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Guards a job body against running concurrently with itself. Acquired
/// with [`JobGuard::try_acquire`]; dropping it always clears the flag, so a
/// panicking job body doesn't leave the job permanently locked out.
struct JobGuard {
    flag: Arc<AtomicBool>,
}

impl JobGuard {
    fn try_acquire(flag: Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Default)]
struct JobCounters {
    runs: AtomicU64,
    skipped: AtomicU64,
    failures: AtomicU64,
}

impl JobCounters {
    fn record(&self, result: &Result<(), ()>) {
        match result {
            Ok(()) => self.runs.fetch_add(1, Ordering::Relaxed),
            Err(()) => self.failures.fetch_add(1, Ordering::Relaxed),
        };
    }
}

/// Owns the engine's environmental source handles, the score cache's lock
/// table, and the three periodic jobs' lifecycle.
pub struct Scheduler {
    db: DatabasePool,
    config: EngineConfig,
    tide_source: Arc<dyn TideSource>,
    weather_observation: Arc<dyn WeatherObservationSource>,
    weather_forecast: Arc<dyn WeatherForecastSource>,
    marine_source: Arc<dyn MarineSource>,
    astronomy_source: Arc<dyn AstronomySource>,
    score_locks: Arc<ScoreLocks>,
    running: Arc<AtomicBool>,
    ingestion_busy: Arc<AtomicBool>,
    snapshot_busy: Arc<AtomicBool>,
    recalc_busy: Arc<AtomicBool>,
    ingestion_counters: Arc<JobCounters>,
    snapshot_counters: Arc<JobCounters>,
    recalc_counters: Arc<JobCounters>,
    handles: AsyncMutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Build a scheduler over the given environmental sources and database.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: DatabasePool,
        config: EngineConfig,
        tide_source: Arc<dyn TideSource>,
        weather_observation: Arc<dyn WeatherObservationSource>,
        weather_forecast: Arc<dyn WeatherForecastSource>,
        marine_source: Arc<dyn MarineSource>,
        astronomy_source: Arc<dyn AstronomySource>,
    ) -> Self {
        Self {
            db,
            config,
            tide_source,
            weather_observation,
            weather_forecast,
            marine_source,
            astronomy_source,
            score_locks: Arc::new(ScoreLocks::new()),
            running: Arc::new(AtomicBool::new(false)),
            ingestion_busy: Arc::new(AtomicBool::new(false)),
            snapshot_busy: Arc::new(AtomicBool::new(false)),
            recalc_busy: Arc::new(AtomicBool::new(false)),
            ingestion_counters: Arc::new(JobCounters::default()),
            snapshot_counters: Arc::new(JobCounters::default()),
            recalc_counters: Arc::new(JobCounters::default()),
            handles: AsyncMutex::new(Vec::new()),
        }
    }

    fn spawn_loop<F, Fut>(&self, name: &'static str, interval_minutes: u64, flag: Arc<AtomicBool>, counters: Arc<JobCounters>, run: F) -> JoinHandle<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = SchedulerResult<()>> + Send,
    {
        let running = self.running.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_minutes * 60));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !running.load(Ordering::Acquire) {
                    return;
                }
                let Some(_guard) = JobGuard::try_acquire(flag.clone()) else {
                    warn!(job = name, "previous run still in progress, skipping this tick");
                    counters.skipped.fetch_add(1, Ordering::Relaxed);
                    continue;
                };
                debug!(job = name, "starting run");
                let outcome = run().await;
                match &outcome {
                    Ok(()) => {
                        counters.record(&Ok(()));
                        debug!(job = name, "run completed");
                    }
                    Err(err) => {
                        counters.record(&Err(()));
                        error!(job = name, error = %err, "run failed");
                    }
                }
            }
        })
    }
}

#[async_trait]
impl Service for Scheduler {
    async fn start(&self) -> EngineResult<()> {
        self.running.store(true, Ordering::Release);
        info!("starting scheduler");

        let mut handles = self.handles.lock().await;

        let db = self.db.clone();
        let tide = self.tide_source.clone();
        let weather_forecast = self.weather_forecast.clone();
        let marine = self.marine_source.clone();
        let astronomy = self.astronomy_source.clone();
        let config = self.config.clone();
        handles.push(self.spawn_loop(
            "ingestion_and_forecast",
            self.config.scheduler.fetch_interval_minutes,
            self.ingestion_busy.clone(),
            self.ingestion_counters.clone(),
            move || {
                let db = db.clone();
                let tide = tide.clone();
                let weather_forecast = weather_forecast.clone();
                let marine = marine.clone();
                let astronomy = astronomy.clone();
                let config = config.clone();
                async move {
                    jobs::run_ingestion_and_forecast(
                        &db,
                        tide.as_ref(),
                        weather_forecast.as_ref(),
                        marine.as_ref(),
                        astronomy.as_ref(),
                        &config,
                        Utc::now(),
                    )
                    .await
                    .map(|_alerts| ())
                }
            },
        ));

        let db = self.db.clone();
        let tide = self.tide_source.clone();
        let weather_observation = self.weather_observation.clone();
        let astronomy = self.astronomy_source.clone();
        let config = self.config.clone();
        handles.push(self.spawn_loop(
            "snapshot_capture",
            self.config.scheduler.snapshot_interval_minutes,
            self.snapshot_busy.clone(),
            self.snapshot_counters.clone(),
            move || {
                let db = db.clone();
                let tide = tide.clone();
                let weather_observation = weather_observation.clone();
                let astronomy = astronomy.clone();
                let config = config.clone();
                async move {
                    snapshot::capture(&db, tide.as_ref(), weather_observation.as_ref(), astronomy.as_ref(), &config, Utc::now())
                        .await
                        .map(|_snapshot| ())
                }
            },
        ));

        let db = self.db.clone();
        let score_locks = self.score_locks.clone();
        handles.push(self.spawn_loop(
            "periodic_recalc",
            self.config.scheduler.periodic_recalc_minutes,
            self.recalc_busy.clone(),
            self.recalc_counters.clone(),
            move || {
                let db = db.clone();
                let score_locks = score_locks.clone();
                async move { jobs::run_periodic_recalc(&db, &score_locks, Utc::now()).await.map(|_n| ()) }
            },
        ));

        Ok(())
    }

    async fn stop(&self) -> EngineResult<()> {
        info!("stopping scheduler");
        self.running.store(false, Ordering::Release);
        let mut handles = self.handles.lock().await;
        for handle in handles.drain(..) {
            handle.abort();
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    async fn health_check(&self) -> ServiceHealth {
        let status = if !self.is_running() {
            ServiceStatus::Unknown
        } else if self.ingestion_counters.failures.load(Ordering::Relaxed) > 0
            || self.snapshot_counters.failures.load(Ordering::Relaxed) > 0
        {
            ServiceStatus::Degraded
        } else {
            ServiceStatus::Healthy
        };

        let mut metrics = HashMap::new();
        metrics.insert("ingestion_runs".to_string(), self.ingestion_counters.runs.load(Ordering::Relaxed) as f64);
        metrics.insert("ingestion_skipped".to_string(), self.ingestion_counters.skipped.load(Ordering::Relaxed) as f64);
        metrics.insert("ingestion_failures".to_string(), self.ingestion_counters.failures.load(Ordering::Relaxed) as f64);
        metrics.insert("snapshot_runs".to_string(), self.snapshot_counters.runs.load(Ordering::Relaxed) as f64);
        metrics.insert("snapshot_skipped".to_string(), self.snapshot_counters.skipped.load(Ordering::Relaxed) as f64);
        metrics.insert("snapshot_failures".to_string(), self.snapshot_counters.failures.load(Ordering::Relaxed) as f64);
        metrics.insert("recalc_runs".to_string(), self.recalc_counters.runs.load(Ordering::Relaxed) as f64);
        metrics.insert("recalc_skipped".to_string(), self.recalc_counters.skipped.load(Ordering::Relaxed) as f64);
        metrics.insert("recalc_failures".to_string(), self.recalc_counters.failures.load(Ordering::Relaxed) as f64);

        ServiceHealth {
            status,
            message: format!("{} running", if self.is_running() { "scheduler" } else { "scheduler not" }),
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayscan_net::stub::{StubAstronomySource, StubMarineSource, StubTideSource, StubWeatherSource};

    async fn test_scheduler() -> Scheduler {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let weather = Arc::new(StubWeatherSource::default());
        Scheduler::new(
            db,
            EngineConfig::default(),
            Arc::new(StubTideSource::default()),
            weather.clone(),
            weather,
            Arc::new(StubMarineSource),
            Arc::new(StubAstronomySource),
        )
    }

    #[tokio::test]
    async fn job_guard_refuses_a_second_concurrent_acquire() {
        let flag = Arc::new(AtomicBool::new(false));
        let first = JobGuard::try_acquire(flag.clone());
        assert!(first.is_some());
        assert!(JobGuard::try_acquire(flag.clone()).is_none());
        drop(first);
        assert!(JobGuard::try_acquire(flag).is_some());
    }

    #[tokio::test]
    async fn start_and_stop_toggle_running_state() {
        let scheduler = test_scheduler().await;
        assert!(!scheduler.is_running());
        scheduler.start().await.unwrap();
        assert!(scheduler.is_running());
        scheduler.stop().await.unwrap();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn health_check_before_start_is_unknown() {
        let scheduler = test_scheduler().await;
        let health = scheduler.health_check().await;
        assert_eq!(health.status, ServiceStatus::Unknown);
    }
}
