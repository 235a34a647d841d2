//! Zone system for card locations.
//!
//! A round has four zones: deck, table, hands, and captured piles.
//! `ZoneManager` owns them and audits the 48-card conservation invariant.

pub mod manager;

pub use manager::{Zone, ZoneCounts, ZoneManager};
