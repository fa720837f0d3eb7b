//! Lifecycle and metrics traits shared across the engine's crates.

use crate::EngineResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trait for long-running components (scheduler, server) that can be
/// started, stopped, and health-checked uniformly.
#[async_trait]
pub trait Service: Send + Sync {
    /// Start the service.
    async fn start(&self) -> EngineResult<()>;

    /// Stop the service gracefully.
    async fn stop(&self) -> EngineResult<()>;

    /// Whether the service is currently running.
    fn is_running(&self) -> bool;

    /// Current health status.
    async fn health_check(&self) -> ServiceHealth;
}

/// Point-in-time health report for a [`Service`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Coarse status.
    pub status: ServiceStatus,
    /// Human-readable detail.
    pub message: String,
    /// Arbitrary numeric metrics (e.g. jobs run, last run duration).
    pub metrics: HashMap<String, f64>,
}

/// Coarse service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// Operating normally.
    Healthy,
    /// Operating, but with a reduced capability (e.g. stale source data).
    Degraded,
    /// Not operating correctly.
    Unhealthy,
    /// Not yet checked.
    Unknown,
}

/// Trait for emitting operational metrics, implemented over the `metrics`
/// crate's global recorder by the server/scheduler binaries.
pub trait MetricsCollector: Send + Sync {
    /// Increment a named counter.
    fn increment_counter(&self, name: &'static str, labels: &[(&'static str, String)]);

    /// Record a histogram observation (e.g. job duration in seconds).
    fn record_histogram(&self, name: &'static str, value: f64, labels: &[(&'static str, String)]);

    /// Set a gauge to an absolute value.
    fn set_gauge(&self, name: &'static str, value: f64, labels: &[(&'static str, String)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopCollector;

    impl MetricsCollector for NoopCollector {
        fn increment_counter(&self, _name: &'static str, _labels: &[(&'static str, String)]) {}
        fn record_histogram(
            &self,
            _name: &'static str,
            _value: f64,
            _labels: &[(&'static str, String)],
        ) {
        }
        fn set_gauge(&self, _name: &'static str, _value: f64, _labels: &[(&'static str, String)]) {}
    }

    #[test]
    fn collector_object_is_usable_as_trait_object() {
        let collector: Box<dyn MetricsCollector> = Box::new(NoopCollector);
        collector.increment_counter("jobs_run", &[]);
    }
}
