//! Persisted learning tables: score cache, rig/condition effects, and the
//! zone-tip rotation (§4.7–§4.9).

use crate::error::DatabaseResult;
use crate::pool::DatabasePool;
use crate::repository::{parse_zone, zone_key};
use bayscan_core::{ClarityBand, ConfidenceLevel, CurrentBand, ScoreRating, SpeciesKey, TideBand, WindBand, ZoneId};
use chrono::{DateTime, Utc};
use sqlx::Row;

/// A cached bite score for (species, zone).
#[derive(Debug, Clone, PartialEq)]
pub struct CachedScore {
    /// Smoothed score, 0-100.
    pub score: f64,
    /// Rating label derived from the score.
    pub rating: ScoreRating,
    /// Confidence classification, from historical sample count.
    pub confidence: ConfidenceLevel,
    /// When this cache row was last written.
    pub updated_at: DateTime<Utc>,
}

fn rating_to_str(rating: ScoreRating) -> &'static str {
    match rating {
        ScoreRating::Poor => "poor",
        ScoreRating::Fair => "fair",
        ScoreRating::Good => "good",
        ScoreRating::Great => "great",
        ScoreRating::Excellent => "excellent",
    }
}

fn confidence_to_str(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::Low => "low",
        ConfidenceLevel::Medium => "medium",
        ConfidenceLevel::High => "high",
    }
}

fn confidence_from_str(s: &str) -> ConfidenceLevel {
    match s {
        "medium" => ConfidenceLevel::Medium,
        "high" => ConfidenceLevel::High,
        _ => ConfidenceLevel::Low,
    }
}

/// Fetch the cached score for (species, zone), if present.
pub async fn get_score(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
) -> DatabaseResult<Option<CachedScore>> {
    let row = sqlx::query(
        "SELECT score, rating, confidence, updated_at FROM score_cache WHERE species = ? AND zone = ?",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .fetch_optional(db.raw())
    .await?;

    let Some(row) = row else { return Ok(None) };
    let confidence: String = row.try_get("confidence")?;
    let updated_at: String = row.try_get("updated_at")?;
    Ok(Some(CachedScore {
        score: row.try_get("score")?,
        rating: ScoreRating::from_score(row.try_get("score")?),
        confidence: confidence_from_str(&confidence),
        updated_at: DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| crate::error::DatabaseError::Query(e.to_string()))?
            .with_timezone(&Utc),
    }))
}

/// Write or replace the cached score for (species, zone).
pub async fn upsert_score(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    score: f64,
    confidence: ConfidenceLevel,
    now: DateTime<Utc>,
) -> DatabaseResult<()> {
    sqlx::query(
        "INSERT INTO score_cache (species, zone, score, rating, confidence, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(species, zone) DO UPDATE SET
             score = excluded.score, rating = excluded.rating,
             confidence = excluded.confidence, updated_at = excluded.updated_at",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .bind(score)
    .bind(rating_to_str(ScoreRating::from_score(score)))
    .bind(confidence_to_str(confidence))
    .bind(now.to_rfc3339())
    .execute(db.raw())
    .await?;
    Ok(())
}

/// A learned effect on bite score for using a particular rig with a species
/// in a zone (§3/§4.8). `weight` is always the capped log of `success_count`
/// (`min(3, ln(success_count + 1))`); a fresh pair starts at `(0.0, 0.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigEffect {
    /// Successful catches landed on this rig in this zone so far.
    pub success_count: f64,
    /// Capped-log weight derived from `success_count`.
    pub weight: f64,
}

/// Fetch the learned effect for (species, zone, rig), defaulting to neutral
/// (`success_count = 0.0, weight = 0.0`) when nothing has been learned yet.
pub async fn get_rig_effect(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    rig: &str,
) -> DatabaseResult<RigEffect> {
    let row = sqlx::query(
        "SELECT success_count, weight FROM rig_effects WHERE species = ? AND zone = ? AND rig = ?",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .bind(rig)
    .fetch_optional(db.raw())
    .await?;

    Ok(match row {
        Some(row) => RigEffect {
            success_count: row.try_get("success_count")?,
            weight: row.try_get("weight")?,
        },
        None => RigEffect { success_count: 0.0, weight: 0.0 },
    })
}

/// Persist an updated rig effect.
pub async fn upsert_rig_effect(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    rig: &str,
    effect: RigEffect,
    now: DateTime<Utc>,
) -> DatabaseResult<()> {
    sqlx::query(
        "INSERT INTO rig_effects (species, zone, rig, success_count, weight, updated_at) VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(species, zone, rig) DO UPDATE SET
             success_count = excluded.success_count, weight = excluded.weight, updated_at = excluded.updated_at",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .bind(rig)
    .bind(effect.success_count)
    .bind(effect.weight)
    .bind(now.to_rfc3339())
    .execute(db.raw())
    .await?;
    Ok(())
}

/// A learned effect for a condition combination, same capped-log shape as
/// [`RigEffect`] but capped at 4 instead of 3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionEffect {
    /// Accumulated success count (fractional: a crab-trap catch adds 0.15).
    pub success_count: f64,
    /// Capped-log weight derived from `success_count`.
    pub weight: f64,
}

/// Fetch the learned zone/condition effect for the full band combination,
/// defaulting to neutral.
pub async fn get_zone_condition_effect(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    tide_band: TideBand,
    clarity_band: ClarityBand,
    wind_band: WindBand,
    current_band: CurrentBand,
) -> DatabaseResult<ConditionEffect> {
    let row = sqlx::query(
        "SELECT success_count, weight FROM zone_condition_effects
         WHERE species = ? AND zone = ? AND tide_band = ? AND clarity_band = ? AND wind_band = ? AND current_band = ?",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .bind(tide_band.to_string())
    .bind(clarity_band.to_string())
    .bind(wind_band.to_string())
    .bind(current_band.to_string())
    .fetch_optional(db.raw())
    .await?;

    Ok(match row {
        Some(row) => ConditionEffect {
            success_count: row.try_get("success_count")?,
            weight: row.try_get("weight")?,
        },
        None => ConditionEffect { success_count: 0.0, weight: 0.0 },
    })
}

/// Persist an updated zone/condition effect.
#[allow(clippy::too_many_arguments)]
pub async fn upsert_zone_condition_effect(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    tide_band: TideBand,
    clarity_band: ClarityBand,
    wind_band: WindBand,
    current_band: CurrentBand,
    effect: ConditionEffect,
    now: DateTime<Utc>,
) -> DatabaseResult<()> {
    sqlx::query(
        "INSERT INTO zone_condition_effects
             (species, zone, tide_band, clarity_band, wind_band, current_band, success_count, weight, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(species, zone, tide_band, clarity_band, wind_band, current_band) DO UPDATE SET
             success_count = excluded.success_count, weight = excluded.weight, updated_at = excluded.updated_at",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .bind(tide_band.to_string())
    .bind(clarity_band.to_string())
    .bind(wind_band.to_string())
    .bind(current_band.to_string())
    .bind(effect.success_count)
    .bind(effect.weight)
    .bind(now.to_rfc3339())
    .execute(db.raw())
    .await?;
    Ok(())
}

/// Fetch the learned effect for (species, rig, tide_band, clarity_band),
/// defaulting to neutral.
pub async fn get_rig_condition_effect(
    db: &DatabasePool,
    species: &SpeciesKey,
    rig: &str,
    tide_band: TideBand,
    clarity_band: ClarityBand,
) -> DatabaseResult<ConditionEffect> {
    let row = sqlx::query(
        "SELECT success_count, weight FROM rig_condition_effects
         WHERE species = ? AND rig = ? AND tide_band = ? AND clarity_band = ?",
    )
    .bind(species.as_str())
    .bind(rig)
    .bind(tide_band.to_string())
    .bind(clarity_band.to_string())
    .fetch_optional(db.raw())
    .await?;

    Ok(match row {
        Some(row) => ConditionEffect {
            success_count: row.try_get("success_count")?,
            weight: row.try_get("weight")?,
        },
        None => ConditionEffect { success_count: 0.0, weight: 0.0 },
    })
}

/// Persist an updated rig/condition effect.
pub async fn upsert_rig_condition_effect(
    db: &DatabasePool,
    species: &SpeciesKey,
    rig: &str,
    tide_band: TideBand,
    clarity_band: ClarityBand,
    effect: ConditionEffect,
    now: DateTime<Utc>,
) -> DatabaseResult<()> {
    sqlx::query(
        "INSERT INTO rig_condition_effects (species, rig, tide_band, clarity_band, success_count, weight, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(species, rig, tide_band, clarity_band) DO UPDATE SET
             success_count = excluded.success_count, weight = excluded.weight, updated_at = excluded.updated_at",
    )
    .bind(species.as_str())
    .bind(rig)
    .bind(tide_band.to_string())
    .bind(clarity_band.to_string())
    .bind(effect.success_count)
    .bind(effect.weight)
    .bind(now.to_rfc3339())
    .execute(db.raw())
    .await?;
    Ok(())
}

/// All rig effects for (species, zone) with their last-updated timestamp,
/// used by the tip generator's best-rig pick (ties broken by
/// most-recently-used).
pub async fn rig_effects_for_species_zone_with_timestamps(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
) -> DatabaseResult<Vec<(String, RigEffect, DateTime<Utc>)>> {
    let rows = sqlx::query(
        "SELECT rig, success_count, weight, updated_at FROM rig_effects WHERE species = ? AND zone = ?",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .fetch_all(db.raw())
    .await?;

    rows.into_iter()
        .map(|row| {
            let updated_at: String = row.try_get("updated_at")?;
            Ok((
                row.try_get("rig")?,
                RigEffect {
                    success_count: row.try_get("success_count")?,
                    weight: row.try_get("weight")?,
                },
                DateTime::parse_from_rfc3339(&updated_at)
                    .map_err(|e| crate::error::DatabaseError::Query(e.to_string()))?
                    .with_timezone(&Utc),
            ))
        })
        .collect()
}

/// The dominant tide band for (species, zone): the `tide_band` value with
/// the highest learned weight among this pair's `ZoneConditionEffect` rows.
pub async fn dominant_tide_band(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
) -> DatabaseResult<Option<String>> {
    let row = sqlx::query(
        "SELECT tide_band, MAX(weight) as weight FROM zone_condition_effects
         WHERE species = ? AND zone = ? GROUP BY tide_band ORDER BY weight DESC LIMIT 1",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .fetch_optional(db.raw())
    .await?;

    Ok(match row {
        Some(row) => Some(row.try_get("tide_band")?),
        None => None,
    })
}

/// Choose the species/zone tip least recently shown, inserting it with
/// `last_used_at = now` if it has never been shown (§4.9's tie-break:
/// most-recently-used loses).
pub async fn least_recently_used_tip(
    db: &DatabasePool,
    species: &SpeciesKey,
    zone: ZoneId,
    candidates: &[&str],
    now: DateTime<Utc>,
) -> DatabaseResult<String> {
    let mut best: Option<(String, DateTime<Utc>)> = None;

    for tip in candidates {
        let row = sqlx::query(
            "SELECT last_used_at FROM species_zone_tips WHERE species = ? AND zone = ? AND tip = ?",
        )
        .bind(species.as_str())
        .bind(zone_key(zone))
        .bind(*tip)
        .fetch_optional(db.raw())
        .await?;

        let last_used = match row {
            Some(row) => {
                let raw: String = row.try_get("last_used_at")?;
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| crate::error::DatabaseError::Query(e.to_string()))?
                    .with_timezone(&Utc)
            }
            None => DateTime::<Utc>::MIN_UTC,
        };

        if best.as_ref().is_none_or(|(_, b)| last_used < *b) {
            best = Some((tip.to_string(), last_used));
        }
    }

    let chosen = best.map(|(tip, _)| tip).unwrap_or_default();

    sqlx::query(
        "INSERT INTO species_zone_tips (species, zone, tip, last_used_at) VALUES (?, ?, ?, ?)
         ON CONFLICT(species, zone, tip) DO UPDATE SET last_used_at = excluded.last_used_at",
    )
    .bind(species.as_str())
    .bind(zone_key(zone))
    .bind(&chosen)
    .bind(now.to_rfc3339())
    .execute(db.raw())
    .await?;

    Ok(chosen)
}

/// Used only to keep `parse_zone` exercised from this module's test; the
/// server layer uses it to parse path parameters.
#[allow(dead_code)]
fn _touch(s: &str) -> Option<ZoneId> {
    parse_zone(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> DatabasePool {
        DatabasePool::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn unknown_rig_effect_defaults_to_neutral() {
        let db = memory_db().await;
        let trout = SpeciesKey::new("speckled_trout");
        let effect = get_rig_effect(&db, &trout, ZoneId::Zone3, "popping_cork").await.unwrap();
        assert_eq!(effect, RigEffect { success_count: 0.0, weight: 0.0 });
    }

    #[tokio::test]
    async fn tip_rotation_picks_unused_tip_first() {
        let db = memory_db().await;
        let trout = SpeciesKey::new("speckled_trout");
        let now = Utc::now();
        let candidates = ["tip_a", "tip_b"];

        let first = least_recently_used_tip(&db, &trout, ZoneId::Zone3, &candidates, now)
            .await
            .unwrap();
        let second = least_recently_used_tip(
            &db,
            &trout,
            ZoneId::Zone3,
            &candidates,
            now + chrono::Duration::seconds(1),
        )
        .await
        .unwrap();

        assert_ne!(first, second);
    }
}
