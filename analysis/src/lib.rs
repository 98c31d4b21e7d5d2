//! Conversion of parsed replay event logs into OpenDota style match records.
//!
//! The pipeline is [`events::load`], then [`roster::resolve`],
//! [`combat::aggregate`] and [`snapshot::select_final`] over the loaded
//! events, and finally [`metadata::derive`] and the projections in
//! [`synthesize`]. [`convert()`] runs all of them.

pub mod combat;
pub mod convert;
pub mod events;
pub mod metadata;
pub mod roster;
pub mod snapshot;
pub mod synthesize;

pub use convert::{convert, convert_reader, Conversion, ConversionReport};

pub const PLAYER_SLOTS: usize = 10;
pub const TEAM_SIZE: usize = 5;

/// Slots 0-4 belong to the first (Radiant) team, 5-9 to the second.
pub fn is_first_team(slot: usize) -> bool {
    slot < TEAM_SIZE
}
