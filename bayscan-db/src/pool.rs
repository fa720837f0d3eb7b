//! Connection pool and schema management.

use crate::error::DatabaseResult;
use sqlx::sqlite::{SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Thin wrapper over a `sqlx::SqlitePool`, responsible for connecting and
/// bringing the schema up to date.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Connect to `database_url`, creating the database file if it doesn't
    /// already exist, and apply the schema.
    pub async fn connect(database_url: &str) -> DatabaseResult<Self> {
        let options = sqlx::sqlite::SqliteConnectOptions::from_str(database_url)
            .map_err(|e| crate::error::DatabaseError::Connection(e.to_string()))?
            .create_if_missing(true)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        info!("connected to sqlite database");
        let db = Self { pool };
        db.apply_schema().await?;
        Ok(db)
    }

    /// Borrow the underlying sqlx pool.
    pub fn raw(&self) -> &SqlitePool {
        &self.pool
    }

    /// True if a trivial query against the pool succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn apply_schema(&self) -> DatabaseResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS environment_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    captured_at TEXT NOT NULL,
    tide_height_ft REAL NOT NULL,
    tide_stage TEXT NOT NULL,
    tide_change_rate REAL NOT NULL,
    air_temp_f REAL NOT NULL,
    water_temp_f REAL,
    wind_speed_mph REAL NOT NULL,
    wind_direction TEXT,
    pressure_trend TEXT NOT NULL,
    cloud_cover TEXT NOT NULL,
    time_of_day TEXT NOT NULL,
    moon_phase REAL NOT NULL,
    from_forecast INTEGER NOT NULL,
    dock_lights_on INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_snapshots_captured_at ON environment_snapshots (captured_at);

CREATE TABLE IF NOT EXISTS catches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    species TEXT NOT NULL,
    zone TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    quantity INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_catches_species_zone_time ON catches (species, zone, timestamp);

CREATE TABLE IF NOT EXISTS bait_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bait_species TEXT NOT NULL,
    zone TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    quantity_estimate TEXT
);
CREATE INDEX IF NOT EXISTS idx_bait_logs_species_zone_time ON bait_logs (bait_species, zone, timestamp);

CREATE TABLE IF NOT EXISTS predator_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    species TEXT NOT NULL,
    zone TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_predator_logs_zone_time ON predator_logs (zone, timestamp);

CREATE TABLE IF NOT EXISTS alerts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    species TEXT NOT NULL,
    threshold INTEGER NOT NULL,
    observed_score REAL NOT NULL,
    fired_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_alerts_fired_at ON alerts (fired_at);

CREATE TABLE IF NOT EXISTS score_cache (
    species TEXT NOT NULL,
    zone TEXT NOT NULL,
    score REAL NOT NULL,
    rating TEXT NOT NULL,
    confidence TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (species, zone)
);

CREATE TABLE IF NOT EXISTS rig_effects (
    species TEXT NOT NULL,
    zone TEXT NOT NULL,
    rig TEXT NOT NULL,
    success_count REAL NOT NULL DEFAULT 0.0,
    weight REAL NOT NULL DEFAULT 0.0,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (species, zone, rig)
);

CREATE TABLE IF NOT EXISTS zone_condition_effects (
    species TEXT NOT NULL,
    zone TEXT NOT NULL,
    tide_band TEXT NOT NULL,
    clarity_band TEXT NOT NULL,
    wind_band TEXT NOT NULL,
    current_band TEXT NOT NULL,
    success_count REAL NOT NULL DEFAULT 0.0,
    weight REAL NOT NULL DEFAULT 0.0,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (species, zone, tide_band, clarity_band, wind_band, current_band)
);

CREATE TABLE IF NOT EXISTS rig_condition_effects (
    species TEXT NOT NULL,
    rig TEXT NOT NULL,
    tide_band TEXT NOT NULL,
    clarity_band TEXT NOT NULL,
    success_count REAL NOT NULL DEFAULT 0.0,
    weight REAL NOT NULL DEFAULT 0.0,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (species, rig, tide_band, clarity_band)
);

CREATE TABLE IF NOT EXISTS species_zone_tips (
    species TEXT NOT NULL,
    zone TEXT NOT NULL,
    tip TEXT NOT NULL,
    last_used_at TEXT NOT NULL,
    PRIMARY KEY (species, zone, tip)
);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connects_and_applies_schema_to_in_memory_db() {
        let pool = DatabasePool::connect("sqlite::memory:").await.unwrap();
        assert!(pool.health_check().await);
    }
}
