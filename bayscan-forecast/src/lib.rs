//! # Bayscan Forecast
//!
//! Forecast window builder and alert evaluator (§4.10-§4.11): buckets a
//! horizon into scored windows, folds in the marine-hazard penalty, and
//! fires per-species alerts when a window's peak score crosses the
//! configured threshold.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alerts;
pub mod error;
pub mod safety;
pub mod windows;

pub use alerts::{evaluate_all, evaluate_species};
pub use error::{ForecastError, ForecastResult};
pub use windows::{build_windows, window_bounds, ForecastWindow, WindowSlice};
