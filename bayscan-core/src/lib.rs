//! # Bayscan Core
//!
//! Core types, configuration, and error handling shared across the Bayscan
//! fishing forecast engine. This crate has no dependency on persistence or
//! the HTTP layer; everything here is pure domain vocabulary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod model;
pub mod traits;
pub mod types;

pub use error::*;
pub use model::*;
pub use traits::*;
pub use types::*;

/// Current version of the Bayscan engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
