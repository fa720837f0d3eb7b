//! Bayscan server main application

mod classify;
mod current;
mod dto;
mod error;
mod forecast;
mod routes;
mod state;

use bayscan_core::config::EngineConfig;
use bayscan_core::Service;
use bayscan_db::DatabasePool;
use bayscan_net::stub::{StubAstronomySource, StubMarineSource, StubTideSource, StubWeatherSource};
use bayscan_scheduler::Scheduler;
use bayscan_scoring::cache::ScoreLocks;
use state::AppState;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bayscan=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bayscan server...");

    let config = load_config()?;
    if let Err(errors) = config.validate() {
        for err in errors {
            error!("Configuration error: {}", err);
        }
        return Err("Invalid configuration".into());
    }
    info!("Configuration loaded successfully");

    let db = DatabasePool::connect(&config.database_url).await?;
    info!("Database ready at {}", config.database_url);

    let tide_source = Arc::new(StubTideSource::default());
    let weather_source = Arc::new(StubWeatherSource::default());
    let marine_source = Arc::new(StubMarineSource::default());
    let astronomy_source = Arc::new(StubAstronomySource::default());
    let score_locks = Arc::new(ScoreLocks::default());

    let scheduler = Scheduler::new(
        db.clone(),
        config.clone(),
        tide_source.clone(),
        weather_source.clone(),
        weather_source.clone(),
        marine_source.clone(),
        astronomy_source.clone(),
    );
    scheduler.start().await?;
    info!("Scheduler started");

    let state = AppState {
        db,
        config: config.clone(),
        score_locks,
        tide_source,
        weather_observation: weather_source.clone(),
        weather_forecast: weather_source,
        marine_source,
        astronomy_source,
    };

    let app = routes::router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);

    let serve = axum::serve(listener, app);
    tokio::select! {
        result = serve => {
            if let Err(err) = result {
                error!("HTTP server error: {}", err);
            }
        }
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Received shutdown signal, stopping server..."),
                Err(err) => error!("Unable to listen for shutdown signal: {}", err),
            }
        }
    }

    info!("Stopping scheduler...");
    scheduler.stop().await?;
    info!("Bayscan server stopped successfully");
    Ok(())
}

fn load_config() -> Result<EngineConfig, Box<dyn std::error::Error>> {
    if std::path::Path::new("config/bayscan.toml").exists() {
        info!("Loading configuration from config/bayscan.toml");
        Ok(EngineConfig::load(Some("config/bayscan.toml"))?)
    } else if std::path::Path::new("bayscan.toml").exists() {
        info!("Loading configuration from bayscan.toml");
        Ok(EngineConfig::load(Some("bayscan.toml"))?)
    } else {
        warn!("No configuration file found, using default configuration");
        warn!("Copy config/bayscan.example.toml to config/bayscan.toml to customize settings");
        Ok(EngineConfig::load(None)?)
    }
}
