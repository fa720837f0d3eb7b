//! Score cache smoothing and per-key concurrency (§4.7, §5).
//!
//! Recomputing a score and writing it to the cache is serialized per
//! `(species, zone)` key so two concurrent catch-log updates for the same
//! pair can't interleave a stale read between their writes. The lock map
//! itself is guarded by a short-lived outer mutex, never held across the
//! recompute.

use crate::bite::{self, BiteScoreResult};
use crate::conditions::Conditions;
use crate::error::ScoringResult;
use bayscan_core::{clamp, ConfidenceLevel, ScoreRating, SpeciesKey, ZoneId};
use bayscan_db::DatabasePool;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

/// Smoothing weight given to a fresh raw score, as a function of the
/// species/zone's historical sample count (§4.7).
pub fn smoothing_weight(sample_count: i64) -> f64 {
    let n = sample_count as f64;
    if sample_count < 10 {
        (0.4 + n / 100.0).min(0.5)
    } else if sample_count < 50 {
        0.2 + (50.0 - n) / 400.0
    } else {
        0.1 + (100.0 - n.min(100.0)) / 1000.0
    }
}

/// The smoothed result written to and read back from the score cache.
#[derive(Debug, Clone)]
pub struct SmoothedScore {
    /// Smoothed score, 0-100.
    pub score: f64,
    /// Rating label derived from the smoothed score.
    pub rating: ScoreRating,
    /// Confidence classification.
    pub confidence: ConfidenceLevel,
    /// One-line explanation of the dominant contributing factor.
    pub reason_summary: String,
    /// The fresh, unsmoothed composition this cache entry was built from.
    pub raw: BiteScoreResult,
}

fn reason_summary(raw: &BiteScoreResult) -> String {
    if raw.predator_penalty < -0.5 {
        return "Predator recently sighted nearby — expect a lull".to_string();
    }
    if raw.recent_activity > 3.0 {
        return "Recent catches reported in this zone".to_string();
    }
    if raw.clarity_salinity < -2.0 {
        return "Water clarity or salinity is working against this species".to_string();
    }
    if raw.condition_match > 5.0 {
        return "Tide, wind, and pressure line up well right now".to_string();
    }
    if raw.condition_match < -5.0 {
        return "Current conditions are working against this species".to_string();
    }
    format!("Seasonal baseline: {}", raw.breakdown.baseline_label)
}

/// Per-(species, zone) serialization for score recomputation.
#[derive(Default)]
pub struct ScoreLocks {
    locks: std::sync::Mutex<HashMap<(SpeciesKey, ZoneId), Arc<AsyncMutex<()>>>>,
}

impl ScoreLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, species: &SpeciesKey, zone: ZoneId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().expect("score lock table poisoned");
        locks
            .entry((species.clone(), zone))
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Recompute the bite score for (species, zone), blend it against the
    /// cached value per the smoothing schedule, and persist the result.
    /// `force_recalc` skips blending and writes the raw score directly.
    pub async fn recompute_and_cache(
        &self,
        db: &DatabasePool,
        species: &SpeciesKey,
        zone: ZoneId,
        conditions: &Conditions,
        now: DateTime<Utc>,
        force_recalc: bool,
    ) -> ScoringResult<SmoothedScore> {
        let key_lock = self.lock_for(species, zone).await;
        let _guard = key_lock.lock().await;

        let raw = bite::compute(db, species, zone, conditions, now).await?;
        let prior = bayscan_db::learning::get_score(db, species, zone).await?;

        let score = match (&prior, force_recalc) {
            (Some(prior), false) => {
                let weight = smoothing_weight(raw.breakdown.recent_catches_count);
                clamp(prior.score * (1.0 - weight) + raw.bite_score * weight, 0.0, 100.0)
            }
            _ => raw.bite_score,
        };

        bayscan_db::learning::upsert_score(db, species, zone, score, raw.confidence, now).await?;

        Ok(SmoothedScore {
            score,
            rating: ScoreRating::from_score(score),
            confidence: raw.confidence,
            reason_summary: reason_summary(&raw),
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_weight_is_bounded_and_decreasing_at_the_tail() {
        assert!(smoothing_weight(0) <= 0.5);
        assert!(smoothing_weight(9) <= 0.5);
        assert!(smoothing_weight(100) < smoothing_weight(10));
    }

    #[test]
    fn smoothing_weight_converges_to_a_small_floor_at_high_sample_counts() {
        let w = smoothing_weight(200);
        assert!((w - 0.1).abs() < 1e-9);
    }
}
