//! # Bayscan Net
//!
//! Narrow environmental client trait boundary (§4.2): tide, weather
//! observation/forecast, marine hazard, and astronomy sources. Each trait
//! exposes exactly one async fetch method. Production HTTP wiring against
//! NOAA/NWS-style APIs is out of scope; the trait boundary and a
//! deterministic stub implementation are provided and tested here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod sources;
pub mod stub;

pub use error::*;
pub use sources::*;
