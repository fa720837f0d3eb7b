//! Static rule tables for the Bayscan fishing forecast engine: seasonality,
//! species environmental profiles, zone geometry, bait condition rules, and
//! the cold-north-wind depth-shift rule.
//!
//! Everything here is pure and table-driven; no I/O, no database access.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bait;
pub mod seasonality;
pub mod species;
pub mod wind;
pub mod zones;
