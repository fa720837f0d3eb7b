//! Shared domain vocabulary for the Bayscan engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A species key, e.g. `"speckled_trout"`, `"live_shrimp"`.
///
/// Modeled as a newtype over `String` rather than an exhaustive enum because
/// the rule tables (seasonality, species profiles) are themselves
/// data-driven lookups keyed by this string, and the engine must degrade
/// gracefully (default weights, neutral sub-scores) for a key with no
/// profile rather than fail to compile a new species in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesKey(pub String);

impl SpeciesKey {
    /// Build a species key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SpeciesKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SpeciesKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One of the five fixed dock zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZoneId {
    /// Northwest quadrant, above the walkway.
    Zone1,
    /// Southwest quadrant, below the walkway.
    Zone2,
    /// Northeast quadrant, above the walkway.
    Zone3,
    /// Southeast quadrant, below the walkway.
    Zone4,
    /// Eastern zone, full width beyond zones 3 and 4.
    Zone5,
}

impl ZoneId {
    /// All five zones, in numeric order.
    pub const ALL: [ZoneId; 5] = [
        ZoneId::Zone1,
        ZoneId::Zone2,
        ZoneId::Zone3,
        ZoneId::Zone4,
        ZoneId::Zone5,
    ];

    /// The zone's 1-based number.
    pub fn number(self) -> u8 {
        match self {
            ZoneId::Zone1 => 1,
            ZoneId::Zone2 => 2,
            ZoneId::Zone3 => 3,
            ZoneId::Zone4 => 4,
            ZoneId::Zone5 => 5,
        }
    }

    /// Parse from the canonical "Zone N" display form or a bare digit.
    pub fn parse(s: &str) -> Option<Self> {
        let digit = s.trim().rsplit(' ').next().unwrap_or(s).trim();
        match digit {
            "1" => Some(ZoneId::Zone1),
            "2" => Some(ZoneId::Zone2),
            "3" => Some(ZoneId::Zone3),
            "4" => Some(ZoneId::Zone4),
            "5" => Some(ZoneId::Zone5),
            _ => None,
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone {}", self.number())
    }
}

/// Coarse tide direction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TideStage {
    /// Height rising.
    Incoming,
    /// Height falling.
    Outgoing,
    /// Near a high-water extremum.
    High,
    /// Near a low-water extremum.
    Low,
    /// Minimal movement, not near an extremum.
    Slack,
}

impl fmt::Display for TideStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TideStage::Incoming => "incoming",
            TideStage::Outgoing => "outgoing",
            TideStage::High => "high",
            TideStage::Low => "low",
            TideStage::Slack => "slack",
        };
        write!(f, "{s}")
    }
}

/// Coarse tide-direction band used by the learning tables (unknown excluded
/// from storage — `None` means "skip this update", per §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TideBand {
    /// Rising.
    Incoming,
    /// Falling.
    Outgoing,
    /// Not moving.
    Slack,
}

impl fmt::Display for TideBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TideBand::Incoming => "incoming",
            TideBand::Outgoing => "outgoing",
            TideBand::Slack => "slack",
        };
        write!(f, "{s}")
    }
}

/// Water clarity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarityBand {
    /// Clean / clear water.
    Clean,
    /// Lightly stained or tannic water.
    Stained,
    /// Turbid / muddy water.
    Muddy,
}

impl fmt::Display for ClarityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClarityBand::Clean => "clean",
            ClarityBand::Stained => "stained",
            ClarityBand::Muddy => "muddy",
        };
        write!(f, "{s}")
    }
}

/// Wind favorability band, relative to a species profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindBand {
    /// Direction is in the species' favorable list.
    Favorable,
    /// Neither favorable nor unfavorable.
    Neutral,
    /// Direction is in the species' unfavorable list.
    Unfavorable,
}

/// Current-speed band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentBand {
    /// < 0.3 ft/s.
    Low,
    /// < 0.6 ft/s.
    Medium,
    /// >= 0.6 ft/s.
    High,
}

impl fmt::Display for WindBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WindBand::Favorable => "favorable",
            WindBand::Neutral => "neutral",
            WindBand::Unfavorable => "unfavorable",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for CurrentBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CurrentBand::Low => "low",
            CurrentBand::Medium => "medium",
            CurrentBand::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Coarse part-of-day classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// Before dawn twilight begins.
    PreDawn,
    /// Dawn twilight.
    Dawn,
    /// Morning.
    Morning,
    /// Midday.
    Midday,
    /// Evening.
    Evening,
    /// Dusk twilight.
    Dusk,
    /// Night.
    Night,
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeOfDay::PreDawn => "pre-dawn",
            TimeOfDay::Dawn => "dawn",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Dusk => "dusk",
            TimeOfDay::Night => "night",
        };
        write!(f, "{s}")
    }
}

/// Cloud cover classification, as reported by weather sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudCover {
    /// Clear sky.
    Clear,
    /// Partial cloud cover.
    PartlyCloudy,
    /// Fully overcast.
    Overcast,
}

/// Barometric pressure trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureTrend {
    /// Falling.
    Falling,
    /// Essentially flat.
    Stable,
    /// Rising slowly.
    RisingSlow,
    /// Rising quickly.
    RisingFast,
}

/// Marine hazard / safety classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SafetyLevel {
    /// No meaningful hazard.
    Safe,
    /// Conditions warrant caution.
    Caution,
    /// Conditions are unsafe.
    Unsafe,
}

/// Cached-score rating label, derived deterministically from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreRating {
    /// score <= 20
    Poor,
    /// score <= 40
    Fair,
    /// score <= 60
    Good,
    /// score <= 80
    Great,
    /// score > 80
    Excellent,
}

impl ScoreRating {
    /// Derive the rating label from a 0-100 score. Boundaries are inclusive
    /// on the lower tier (`<= 20` is Poor, etc.) per §4.7/§8.
    pub fn from_score(score: f64) -> Self {
        if score <= 20.0 {
            ScoreRating::Poor
        } else if score <= 40.0 {
            ScoreRating::Fair
        } else if score <= 60.0 {
            ScoreRating::Good
        } else if score <= 80.0 {
            ScoreRating::Great
        } else {
            ScoreRating::Excellent
        }
    }
}

impl fmt::Display for ScoreRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreRating::Poor => "Poor",
            ScoreRating::Fair => "Fair",
            ScoreRating::Good => "Good",
            ScoreRating::Great => "Great",
            ScoreRating::Excellent => "Excellent",
        };
        write!(f, "{s}")
    }
}

/// Confidence level derived from historical sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// < 10 historical samples.
    Low,
    /// 10..50 historical samples.
    Medium,
    /// >= 50 historical samples.
    High,
}

impl ConfidenceLevel {
    /// Classify confidence from a historical sample count (§4.7).
    pub fn from_count(count: i64) -> Self {
        if count < 10 {
            ConfidenceLevel::Low
        } else if count < 50 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::High
        }
    }

    /// The recent-activity confidence weight used by §4.5's
    /// `recent_activity_modifier` (0.3 / 0.6 / 1.0).
    pub fn recent_activity_weight(self) -> f64 {
        match self {
            ConfidenceLevel::Low => 0.3,
            ConfidenceLevel::Medium => 0.6,
            ConfidenceLevel::High => 1.0,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

/// HTTP-facing HOT/DECENT/SLOW/UNLIKELY tier, thresholds 80/50/20 (§6).
/// Distinct from [`BiteLabel`] and the depth-behavior tier — see
/// SPEC_FULL.md §9 for why these three scales are kept separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallTier {
    /// score >= 80
    Hot,
    /// score >= 50
    Decent,
    /// score >= 20
    Slow,
    /// score < 20
    Unlikely,
}

impl OverallTier {
    /// Classify an averaged top-3 species score into a forecast tier.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            OverallTier::Hot
        } else if score >= 50.0 {
            OverallTier::Decent
        } else if score >= 20.0 {
            OverallTier::Slow
        } else {
            OverallTier::Unlikely
        }
    }
}

/// Per-species Hot/Decent/Slow/Unlikely label, thresholds 71/41/21 (§4.4/§4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiteLabel {
    /// score >= 71
    Hot,
    /// score >= 41
    Decent,
    /// score >= 21
    Slow,
    /// score < 21
    Unlikely,
}

impl BiteLabel {
    /// Classify a raw `running_factor * env_score * 100` bite score.
    pub fn from_score(score: f64) -> Self {
        if score >= 71.0 {
            BiteLabel::Hot
        } else if score >= 41.0 {
            BiteLabel::Decent
        } else if score >= 21.0 {
            BiteLabel::Slow
        } else {
            BiteLabel::Unlikely
        }
    }
}

impl fmt::Display for BiteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BiteLabel::Hot => "Hot",
            BiteLabel::Decent => "Decent",
            BiteLabel::Slow => "Slow",
            BiteLabel::Unlikely => "Unlikely",
        };
        write!(f, "{s}")
    }
}

/// good/moderate/slow depth-behavior tier, thresholds 70/40, used only to
/// pick a depth note (§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthBehaviorTier {
    /// score >= 70
    Good,
    /// score >= 40
    Moderate,
    /// score < 40
    Slow,
}

impl DepthBehaviorTier {
    /// Classify a bite score into the depth-behavior tier.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            DepthBehaviorTier::Good
        } else if score >= 40.0 {
            DepthBehaviorTier::Moderate
        } else {
            DepthBehaviorTier::Slow
        }
    }
}

/// Clamp a value into `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Clamp a value into `[0, 1]`.
pub fn clamp01(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_display_roundtrips_through_parse() {
        for zone in ZoneId::ALL {
            let text = zone.to_string();
            assert_eq!(ZoneId::parse(&text), Some(zone));
        }
    }

    #[test]
    fn rating_boundaries_are_inclusive_low() {
        assert_eq!(ScoreRating::from_score(20.0), ScoreRating::Poor);
        assert_eq!(ScoreRating::from_score(20.1), ScoreRating::Fair);
        assert_eq!(ScoreRating::from_score(80.0), ScoreRating::Great);
        assert_eq!(ScoreRating::from_score(80.1), ScoreRating::Excellent);
    }

    #[test]
    fn confidence_transitions_at_exact_boundaries() {
        assert_eq!(ConfidenceLevel::from_count(9), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_count(10), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_count(49), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_count(50), ConfidenceLevel::High);
    }

    #[test]
    fn three_tier_scales_disagree_by_design() {
        // 65 is DECENT for the HTTP-facing tier, Decent for the per-species
        // label, but "moderate" for the depth-behavior tier at a different
        // boundary entirely -- these must never be unified (SPEC_FULL §9).
        assert_eq!(OverallTier::from_score(65.0), OverallTier::Decent);
        assert_eq!(BiteLabel::from_score(65.0), BiteLabel::Decent);
        assert_eq!(DepthBehaviorTier::from_score(65.0), DepthBehaviorTier::Good);
    }
}
