// --- File: crates/buslink_trips/src/lib.rs ---
//! Trip expansion and catalog maintenance: the schedule-to-trip pipeline
//! plus the pure logic behind the migrate, patch and seed scripts.

pub mod error;
pub mod logic;
pub mod migrate;
pub mod patch;
pub mod seed;

#[cfg(test)]
mod logic_test;

pub use error::TripsError;
pub use logic::{generate_trips, TripGenerationReport};
