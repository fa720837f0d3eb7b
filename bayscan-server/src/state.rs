//! Shared application state handed to every route handler.

use bayscan_core::config::EngineConfig;
use bayscan_db::DatabasePool;
use bayscan_net::sources::{AstronomySource, MarineSource, TideSource, WeatherForecastSource, WeatherObservationSource};
use bayscan_scoring::cache::ScoreLocks;
use std::sync::Arc;

/// Everything a route handler needs: the database, the live config, the
/// score cache's lock table (shared with the scheduler so a synchronous
/// cache-miss recompute and the periodic recalc can't race each other), and
/// the environmental source handles for a same-request cache-miss fetch.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabasePool,
    pub config: EngineConfig,
    pub score_locks: Arc<ScoreLocks>,
    pub tide_source: Arc<dyn TideSource>,
    pub weather_observation: Arc<dyn WeatherObservationSource>,
    pub weather_forecast: Arc<dyn WeatherForecastSource>,
    pub marine_source: Arc<dyn MarineSource>,
    pub astronomy_source: Arc<dyn AstronomySource>,
}
