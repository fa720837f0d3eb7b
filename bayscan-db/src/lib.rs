//! # Bayscan DB
//!
//! Sqlite persistence for the Bayscan fishing forecast engine: raw
//! environmental snapshots and angler-submitted logs (§3), plus the
//! learned score cache, rig/condition effects, and tip rotation (§4.7-4.9).
//!
//! The crate intentionally speaks sqlite only. Tables are created with
//! plain `CREATE TABLE IF NOT EXISTS` statements at connect time rather
//! than through a migrations runner, since the schema has no released
//! history to migrate yet.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod learning;
pub mod pool;
pub mod repository;

pub use error::{DatabaseError, DatabaseResult};
pub use learning::{CachedScore, ConditionEffect, RigEffect};
pub use pool::DatabasePool;
