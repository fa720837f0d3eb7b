//! # Bayscan Scoring
//!
//! Bite and bait sub-score composition, the score cache's smoothing and
//! per-key concurrency, the learning updaters that nudge rig/condition
//! effects from logged catches, and the tip generator (§4.4-§4.9).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bait;
pub mod bite;
pub mod cache;
pub mod conditions;
pub mod error;
pub mod learning;
pub mod subscores;
pub mod tips;

pub use bait::BaitScoreResult;
pub use bite::BiteScoreResult;
pub use cache::{ScoreLocks, SmoothedScore};
pub use conditions::Conditions;
pub use error::{ScoringError, ScoringResult};
pub use learning::CatchConditions;
