//! Alert evaluator (§4.11): compares each species' peak bite score across
//! its forecast windows to its configured threshold and fires at most one
//! alert per species within the dedupe window.

use crate::windows::ForecastWindow;
use bayscan_core::{Alert, SpeciesKey};
use bayscan_db::{DatabasePool, DatabaseResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// How long a fired alert suppresses re-firing for the same species. The
/// persisted [`Alert`] record carries no window-end or active flag, so
/// "deactivate past alerts" is implemented as "don't re-fire within this
/// rolling window" rather than an explicit state transition.
pub const ALERT_DEDUPE_WINDOW_HOURS: i64 = 6;

/// Evaluate one species' windows against its threshold and fire an alert if
/// its peak score crosses it and no alert has fired for it recently.
pub async fn evaluate_species(
    db: &DatabasePool,
    species: &SpeciesKey,
    windows: &[ForecastWindow],
    threshold: i32,
    now: DateTime<Utc>,
) -> DatabaseResult<Option<Alert>> {
    let Some(peak) = windows.iter().map(|w| w.bite_score).fold(None, |acc, x| {
        Some(acc.map_or(x, |a: f64| a.max(x)))
    }) else {
        return Ok(None);
    };

    if peak < threshold as f64 {
        return Ok(None);
    }

    let since = now - Duration::hours(ALERT_DEDUPE_WINDOW_HOURS);
    let recent = bayscan_db::repository::recent_alerts(db, since).await?;
    if recent.iter().any(|a| &a.species == species) {
        return Ok(None);
    }

    let alert = Alert {
        species: species.clone(),
        threshold,
        observed_score: peak,
        fired_at: now,
    };
    bayscan_db::repository::insert_alert(db, &alert).await?;
    Ok(Some(alert))
}

/// Evaluate every species with a configured threshold, returning the alerts
/// that actually fired this pass.
pub async fn evaluate_all(
    db: &DatabasePool,
    windows_by_species: &HashMap<SpeciesKey, Vec<ForecastWindow>>,
    thresholds: &HashMap<String, i32>,
    now: DateTime<Utc>,
) -> DatabaseResult<Vec<Alert>> {
    let mut fired = Vec::new();
    for (species, windows) in windows_by_species {
        let Some(&threshold) = thresholds.get(species.as_str()) else {
            continue;
        };
        if let Some(alert) = evaluate_species(db, species, windows, threshold, now).await? {
            fired.push(alert);
        }
    }
    Ok(fired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayscan_core::{BiteLabel, SafetyLevel};

    fn window(bite_score: f64) -> ForecastWindow {
        ForecastWindow {
            start: Utc::now(),
            end: Utc::now() + Duration::hours(2),
            bite_score,
            label: BiteLabel::from_score(bite_score),
            safety: SafetyLevel::Safe,
        }
    }

    #[tokio::test]
    async fn fires_once_then_suppresses_within_dedupe_window() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let trout = SpeciesKey::new("speckled_trout");
        let windows = vec![window(40.0), window(85.0), window(50.0)];
        let now = Utc::now();

        let first = evaluate_species(&db, &trout, &windows, 70, now).await.unwrap();
        assert!(first.is_some());

        let second = evaluate_species(&db, &trout, &windows, 70, now + Duration::minutes(5))
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn peak_below_threshold_never_fires() {
        let db = DatabasePool::connect("sqlite::memory:").await.unwrap();
        let trout = SpeciesKey::new("speckled_trout");
        let windows = vec![window(40.0), window(55.0)];
        let fired = evaluate_species(&db, &trout, &windows, 70, Utc::now()).await.unwrap();
        assert!(fired.is_none());
    }
}
