//! Repository functions for the engine's persisted entities (§3).

use crate::error::DatabaseResult;
use crate::pool::DatabasePool;
use bayscan_core::{
    Alert, BaitLog, Catch, CloudCover, EnvironmentSnapshot, PredatorLog, PressureTrend, SpeciesKey,
    TideStage, TimeOfDay, ZoneId,
};
use chrono::{DateTime, Utc};
use sqlx::Row;

fn tide_stage_to_str(stage: TideStage) -> &'static str {
    match stage {
        TideStage::Incoming => "incoming",
        TideStage::Outgoing => "outgoing",
        TideStage::High => "high",
        TideStage::Low => "low",
        TideStage::Slack => "slack",
    }
}

fn tide_stage_from_str(s: &str) -> TideStage {
    match s {
        "incoming" => TideStage::Incoming,
        "outgoing" => TideStage::Outgoing,
        "high" => TideStage::High,
        "low" => TideStage::Low,
        _ => TideStage::Slack,
    }
}

fn pressure_trend_to_str(trend: PressureTrend) -> &'static str {
    match trend {
        PressureTrend::Falling => "falling",
        PressureTrend::Stable => "stable",
        PressureTrend::RisingSlow => "rising_slow",
        PressureTrend::RisingFast => "rising_fast",
    }
}

fn pressure_trend_from_str(s: &str) -> PressureTrend {
    match s {
        "falling" => PressureTrend::Falling,
        "rising_slow" => PressureTrend::RisingSlow,
        "rising_fast" => PressureTrend::RisingFast,
        _ => PressureTrend::Stable,
    }
}

fn cloud_cover_to_str(cover: CloudCover) -> &'static str {
    match cover {
        CloudCover::Clear => "clear",
        CloudCover::PartlyCloudy => "partly_cloudy",
        CloudCover::Overcast => "overcast",
    }
}

fn cloud_cover_from_str(s: &str) -> CloudCover {
    match s {
        "clear" => CloudCover::Clear,
        "overcast" => CloudCover::Overcast,
        _ => CloudCover::PartlyCloudy,
    }
}

fn time_of_day_to_str(tod: TimeOfDay) -> &'static str {
    match tod {
        TimeOfDay::PreDawn => "pre_dawn",
        TimeOfDay::Dawn => "dawn",
        TimeOfDay::Morning => "morning",
        TimeOfDay::Midday => "midday",
        TimeOfDay::Evening => "evening",
        TimeOfDay::Dusk => "dusk",
        TimeOfDay::Night => "night",
    }
}

fn time_of_day_from_str(s: &str) -> TimeOfDay {
    match s {
        "dawn" => TimeOfDay::Dawn,
        "morning" => TimeOfDay::Morning,
        "midday" => TimeOfDay::Midday,
        "evening" => TimeOfDay::Evening,
        "dusk" => TimeOfDay::Dusk,
        "night" => TimeOfDay::Night,
        _ => TimeOfDay::PreDawn,
    }
}

fn zone_to_str(zone: ZoneId) -> &'static str {
    match zone {
        ZoneId::Zone1 => "1",
        ZoneId::Zone2 => "2",
        ZoneId::Zone3 => "3",
        ZoneId::Zone4 => "4",
        ZoneId::Zone5 => "5",
    }
}

fn zone_from_str(s: &str) -> Option<ZoneId> {
    match s {
        "1" => Some(ZoneId::Zone1),
        "2" => Some(ZoneId::Zone2),
        "3" => Some(ZoneId::Zone3),
        "4" => Some(ZoneId::Zone4),
        "5" => Some(ZoneId::Zone5),
        _ => None,
    }
}

/// Insert a new environment snapshot.
pub async fn insert_snapshot(db: &DatabasePool, snapshot: &EnvironmentSnapshot) -> DatabaseResult<()> {
    sqlx::query(
        "INSERT INTO environment_snapshots
         (captured_at, tide_height_ft, tide_stage, tide_change_rate, air_temp_f, water_temp_f,
          wind_speed_mph, wind_direction, pressure_trend, cloud_cover, time_of_day, moon_phase,
          from_forecast, dock_lights_on)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(snapshot.captured_at.to_rfc3339())
    .bind(snapshot.tide_height_ft)
    .bind(tide_stage_to_str(snapshot.tide_stage))
    .bind(snapshot.tide_change_rate)
    .bind(snapshot.air_temp_f)
    .bind(snapshot.water_temp_f)
    .bind(snapshot.wind_speed_mph)
    .bind(&snapshot.wind_direction)
    .bind(pressure_trend_to_str(snapshot.pressure_trend))
    .bind(cloud_cover_to_str(snapshot.cloud_cover))
    .bind(time_of_day_to_str(snapshot.time_of_day))
    .bind(snapshot.moon_phase)
    .bind(snapshot.from_forecast)
    .bind(snapshot.dock_lights_on)
    .execute(db.raw())
    .await?;
    Ok(())
}

/// Whether a snapshot exists within the last `minutes` minutes (§4.3's
/// "skip if a snapshot exists within the last 5 minutes" rule).
pub async fn has_recent_snapshot(db: &DatabasePool, since: DateTime<Utc>) -> DatabaseResult<bool> {
    let row = sqlx::query("SELECT COUNT(*) as n FROM environment_snapshots WHERE captured_at >= ?")
        .bind(since.to_rfc3339())
        .fetch_one(db.raw())
        .await?;
    let n: i64 = row.try_get("n")?;
    Ok(n > 0)
}

/// Fetch the most recent snapshot, if any.
pub async fn latest_snapshot(db: &DatabasePool) -> DatabaseResult<Option<EnvironmentSnapshot>> {
    let row = sqlx::query(
        "SELECT captured_at, tide_height_ft, tide_stage, tide_change_rate, air_temp_f, water_temp_f,
                wind_speed_mph, wind_direction, pressure_trend, cloud_cover, time_of_day, moon_phase,
                from_forecast, dock_lights_on
         FROM environment_snapshots ORDER BY captured_at DESC LIMIT 1",
    )
    .fetch_optional(db.raw())
    .await?;

    let Some(row) = row else { return Ok(None) };
    let captured_at: String = row.try_get("captured_at")?;
    let tide_stage: String = row.try_get("tide_stage")?;
    let pressure_trend: String = row.try_get("pressure_trend")?;
    let cloud_cover: String = row.try_get("cloud_cover")?;
    let time_of_day: String = row.try_get("time_of_day")?;

    Ok(Some(EnvironmentSnapshot {
        captured_at: DateTime::parse_from_rfc3339(&captured_at)
            .map_err(|e| crate::error::DatabaseError::Query(e.to_string()))?
            .with_timezone(&Utc),
        tide_height_ft: row.try_get("tide_height_ft")?,
        tide_stage: tide_stage_from_str(&tide_stage),
        tide_change_rate: row.try_get("tide_change_rate")?,
        air_temp_f: row.try_get("air_temp_f")?,
        water_temp_f: row.try_get("water_temp_f")?,
        wind_speed_mph: row.try_get("wind_speed_mph")?,
        wind_direction: row.try_get("wind_direction")?,
        pressure_trend: pressure_trend_from_str(&pressure_trend),
        cloud_cover: cloud_cover_from_str(&cloud_cover),
        time_of_day: time_of_day_from_str(&time_of_day),
        moon_phase: row.try_get("moon_phase")?,
        from_forecast: row.try_get("from_forecast")?,
        dock_lights_on: row.try_get("dock_lights_on")?,
    }))
}

/// Delete snapshots captured before `cutoff` (§4.3's retention window).
pub async fn prune_snapshots_before(db: &DatabasePool, cutoff: DateTime<Utc>) -> DatabaseResult<u64> {
    let result = sqlx::query("DELETE FROM environment_snapshots WHERE captured_at < ?")
        .bind(cutoff.to_rfc3339())
        .execute(db.raw())
        .await?;
    Ok(result.rows_affected())
}

/// Record a catch, returning its generated row id.
pub async fn insert_catch(db: &DatabasePool, catch: &Catch) -> DatabaseResult<i64> {
    let result = sqlx::query("INSERT INTO catches (species, zone, timestamp, quantity) VALUES (?, ?, ?, ?)")
        .bind(catch.species.as_str())
        .bind(zone_to_str(catch.zone))
        .bind(catch.timestamp.to_rfc3339())
        .bind(catch.quantity)
        .execute(db.raw())
        .await?;
    Ok(result.last_insert_rowid())
}

/// Delete a catch by row id. Returns `false` if no row matched.
pub async fn delete_catch(db: &DatabasePool, id: i64) -> DatabaseResult<bool> {
    let result = sqlx::query("DELETE FROM catches WHERE id = ?").bind(id).execute(db.raw()).await?;
    Ok(result.rows_affected() > 0)
}

/// Catches of `species` in `zone` at or after `since`, most recent first.
pub async fn recent_catches(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    since: DateTime<Utc>,
) -> DatabaseResult<Vec<Catch>> {
    let rows = sqlx::query(
        "SELECT species, zone, timestamp, quantity FROM catches
         WHERE species = ? AND zone = ? AND timestamp >= ? ORDER BY timestamp DESC",
    )
    .bind(species.as_str())
    .bind(zone_to_str(zone))
    .bind(since.to_rfc3339())
    .fetch_all(db.raw())
    .await?;

    rows.into_iter()
        .map(|row| {
            let timestamp: String = row.try_get("timestamp")?;
            Ok(Catch {
                species: SpeciesKey::new(row.try_get::<String, _>("species")?),
                zone,
                timestamp: DateTime::parse_from_rfc3339(&timestamp)
                    .map_err(|e| crate::error::DatabaseError::Query(e.to_string()))?
                    .with_timezone(&Utc),
                quantity: row.try_get("quantity")?,
            })
        })
        .collect()
}

/// Total historical catch count for (species, zone), used by confidence
/// classification (§4.5/§4.7).
pub async fn historical_catch_count(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
) -> DatabaseResult<i64> {
    let row = sqlx::query("SELECT COUNT(*) as n FROM catches WHERE species = ? AND zone = ?")
        .bind(species.as_str())
        .bind(zone_to_str(zone))
        .fetch_one(db.raw())
        .await?;
    row.try_get("n").map_err(Into::into)
}

/// Record a bait sighting, returning its generated row id.
pub async fn insert_bait_log(db: &DatabasePool, log: &BaitLog) -> DatabaseResult<i64> {
    let result = sqlx::query(
        "INSERT INTO bait_logs (bait_species, zone, timestamp, quantity_estimate) VALUES (?, ?, ?, ?)",
    )
    .bind(log.bait_species.as_str())
    .bind(zone_to_str(log.zone))
    .bind(log.timestamp.to_rfc3339())
    .bind(&log.quantity_estimate)
    .execute(db.raw())
    .await?;
    Ok(result.last_insert_rowid())
}

/// Delete a bait log by row id. Returns `false` if no row matched.
pub async fn delete_bait_log(db: &DatabasePool, id: i64) -> DatabaseResult<bool> {
    let result = sqlx::query("DELETE FROM bait_logs WHERE id = ?").bind(id).execute(db.raw()).await?;
    Ok(result.rows_affected() > 0)
}

/// Bait logs of `bait_species` in `zone` at or after `since`.
pub async fn recent_bait_logs(
    db: &DatabasePool,
    bait_species: &SpeciesKey,
    zone: ZoneId,
    since: DateTime<Utc>,
) -> DatabaseResult<Vec<BaitLog>> {
    let rows = sqlx::query(
        "SELECT bait_species, zone, timestamp, quantity_estimate FROM bait_logs
         WHERE bait_species = ? AND zone = ? AND timestamp >= ? ORDER BY timestamp DESC",
    )
    .bind(bait_species.as_str())
    .bind(zone_to_str(zone))
    .bind(since.to_rfc3339())
    .fetch_all(db.raw())
    .await?;

    rows.into_iter()
        .map(|row| {
            let timestamp: String = row.try_get("timestamp")?;
            Ok(BaitLog {
                bait_species: SpeciesKey::new(row.try_get::<String, _>("bait_species")?),
                zone,
                timestamp: DateTime::parse_from_rfc3339(&timestamp)
                    .map_err(|e| crate::error::DatabaseError::Query(e.to_string()))?
                    .with_timezone(&Utc),
                quantity_estimate: row.try_get("quantity_estimate")?,
            })
        })
        .collect()
}

/// Record a predator sighting, returning its generated row id.
pub async fn insert_predator_log(db: &DatabasePool, log: &PredatorLog) -> DatabaseResult<i64> {
    let result = sqlx::query("INSERT INTO predator_logs (species, zone, timestamp) VALUES (?, ?, ?)")
        .bind(log.species.as_str())
        .bind(zone_to_str(log.zone))
        .bind(log.timestamp.to_rfc3339())
        .execute(db.raw())
        .await?;
    Ok(result.last_insert_rowid())
}

/// Delete a predator log by row id. Returns `false` if no row matched.
pub async fn delete_predator_log(db: &DatabasePool, id: i64) -> DatabaseResult<bool> {
    let result = sqlx::query("DELETE FROM predator_logs WHERE id = ?").bind(id).execute(db.raw()).await?;
    Ok(result.rows_affected() > 0)
}

/// The single most recent predator sighting in `zone` at or after `since`.
pub async fn most_recent_predator_log(
    db: &DatabasePool,
    zone: ZoneId,
    since: DateTime<Utc>,
) -> DatabaseResult<Option<PredatorLog>> {
    let row = sqlx::query(
        "SELECT species, zone, timestamp FROM predator_logs
         WHERE zone = ? AND timestamp >= ? ORDER BY timestamp DESC LIMIT 1",
    )
    .bind(zone_to_str(zone))
    .bind(since.to_rfc3339())
    .fetch_optional(db.raw())
    .await?;

    let Some(row) = row else { return Ok(None) };
    let timestamp: String = row.try_get("timestamp")?;
    Ok(Some(PredatorLog {
        species: SpeciesKey::new(row.try_get::<String, _>("species")?),
        zone,
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| crate::error::DatabaseError::Query(e.to_string()))?
            .with_timezone(&Utc),
    }))
}

/// Distinct (species, zone) pairs with a catch at or after `since`, used by
/// the periodic recalc job to target its recompute at recently-active pairs
/// (§4.12) instead of sweeping every species/zone combination.
pub async fn recently_active_catch_pairs(
    db: &DatabasePool,
    since: DateTime<Utc>,
) -> DatabaseResult<Vec<(SpeciesKey, ZoneId)>> {
    let rows = sqlx::query("SELECT DISTINCT species, zone FROM catches WHERE timestamp >= ?")
        .bind(since.to_rfc3339())
        .fetch_all(db.raw())
        .await?;

    rows.into_iter()
        .filter_map(|row| {
            let species: String = row.try_get("species").ok()?;
            let zone: String = row.try_get("zone").ok()?;
            parse_zone(&zone).map(|z| Ok((SpeciesKey::new(species), z)))
        })
        .collect()
}

/// Distinct zones with a predator sighting at or after `since`, used to
/// target the recalc job's recompute at prey species near recent predator
/// activity (§4.12).
pub async fn recently_active_predator_zones(db: &DatabasePool, since: DateTime<Utc>) -> DatabaseResult<Vec<ZoneId>> {
    let rows = sqlx::query("SELECT DISTINCT zone FROM predator_logs WHERE timestamp >= ?")
        .bind(since.to_rfc3339())
        .fetch_all(db.raw())
        .await?;

    rows.into_iter()
        .filter_map(|row| {
            let zone: String = row.try_get("zone").ok()?;
            parse_zone(&zone)
        })
        .map(Ok)
        .collect()
}

/// Distinct zones with a bait sighting at or after `since`, used to target
/// the recalc job's recompute at zones with fresh bait activity (§4.12).
pub async fn recently_active_bait_zones(db: &DatabasePool, since: DateTime<Utc>) -> DatabaseResult<Vec<ZoneId>> {
    let rows = sqlx::query("SELECT DISTINCT zone FROM bait_logs WHERE timestamp >= ?")
        .bind(since.to_rfc3339())
        .fetch_all(db.raw())
        .await?;

    rows.into_iter()
        .filter_map(|row| {
            let zone: String = row.try_get("zone").ok()?;
            parse_zone(&zone)
        })
        .map(Ok)
        .collect()
}

/// Record a fired alert.
pub async fn insert_alert(db: &DatabasePool, alert: &Alert) -> DatabaseResult<()> {
    sqlx::query(
        "INSERT INTO alerts (species, threshold, observed_score, fired_at) VALUES (?, ?, ?, ?)",
    )
    .bind(alert.species.as_str())
    .bind(alert.threshold)
    .bind(alert.observed_score)
    .bind(alert.fired_at.to_rfc3339())
    .execute(db.raw())
    .await?;
    Ok(())
}

/// Alerts fired at or after `since`, most recent first.
pub async fn recent_alerts(db: &DatabasePool, since: DateTime<Utc>) -> DatabaseResult<Vec<Alert>> {
    let rows = sqlx::query(
        "SELECT species, threshold, observed_score, fired_at FROM alerts
         WHERE fired_at >= ? ORDER BY fired_at DESC",
    )
    .bind(since.to_rfc3339())
    .fetch_all(db.raw())
    .await?;

    rows.into_iter()
        .map(|row| {
            let fired_at: String = row.try_get("fired_at")?;
            Ok(Alert {
                species: SpeciesKey::new(row.try_get::<String, _>("species")?),
                threshold: row.try_get("threshold")?,
                observed_score: row.try_get("observed_score")?,
                fired_at: DateTime::parse_from_rfc3339(&fired_at)
                    .map_err(|e| crate::error::DatabaseError::Query(e.to_string()))?
                    .with_timezone(&Utc),
            })
        })
        .collect()
}

/// The most frequently logged bait species in `zone` at or after `since`,
/// used by the tip generator's best-bait pick (§4.9). Ties broken by
/// whichever species sorts first alphabetically.
pub async fn most_frequent_bait_species(
    db: &DatabasePool,
    zone: ZoneId,
    since: DateTime<Utc>,
) -> DatabaseResult<Option<SpeciesKey>> {
    let row = sqlx::query(
        "SELECT bait_species, COUNT(*) as n FROM bait_logs
         WHERE zone = ? AND timestamp >= ?
         GROUP BY bait_species ORDER BY n DESC, bait_species ASC LIMIT 1",
    )
    .bind(zone_to_str(zone))
    .bind(since.to_rfc3339())
    .fetch_optional(db.raw())
    .await?;

    let Some(row) = row else { return Ok(None) };
    Ok(Some(SpeciesKey::new(row.try_get::<String, _>("bait_species")?)))
}

pub(crate) fn zone_key(zone: ZoneId) -> &'static str {
    zone_to_str(zone)
}

pub(crate) fn parse_zone(s: &str) -> Option<ZoneId> {
    zone_from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayscan_core::{PressureTrend, TideStage};

    async fn memory_db() -> DatabasePool {
        DatabasePool::connect("sqlite::memory:").await.unwrap()
    }

    fn sample_snapshot() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            captured_at: Utc::now(),
            tide_height_ft: 2.1,
            tide_stage: TideStage::Incoming,
            tide_change_rate: 0.4,
            air_temp_f: 74.0,
            water_temp_f: Some(71.0),
            wind_speed_mph: 8.0,
            wind_direction: Some("SE".to_string()),
            pressure_trend: PressureTrend::Falling,
            cloud_cover: CloudCover::PartlyCloudy,
            time_of_day: TimeOfDay::Morning,
            moon_phase: 0.2,
            from_forecast: false,
            dock_lights_on: false,
        }
    }

    #[tokio::test]
    async fn round_trips_a_snapshot() {
        let db = memory_db().await;
        insert_snapshot(&db, &sample_snapshot()).await.unwrap();
        let fetched = latest_snapshot(&db).await.unwrap().unwrap();
        assert_eq!(fetched.tide_stage, TideStage::Incoming);
        assert_eq!(fetched.wind_direction.as_deref(), Some("SE"));
    }

    #[tokio::test]
    async fn recent_catches_filters_by_species_zone_and_time() {
        let db = memory_db().await;
        let trout = SpeciesKey::new("speckled_trout");
        insert_catch(
            &db,
            &Catch {
                species: trout.clone(),
                zone: ZoneId::Zone3,
                timestamp: Utc::now(),
                quantity: 2,
            },
        )
        .await
        .unwrap();

        let since = Utc::now() - chrono::Duration::hours(1);
        let found = recent_catches(&db, &trout, ZoneId::Zone3, since).await.unwrap();
        assert_eq!(found.len(), 1);

        let found_other_zone = recent_catches(&db, &trout, ZoneId::Zone4, since).await.unwrap();
        assert!(found_other_zone.is_empty());
    }
}
