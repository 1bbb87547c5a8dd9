//! Gridlock Core - Shared types for the Gridlock battle simulator
//!
//! This crate provides the foundational types used by the battle engine:
//! - Arena geometry (grid bounds, positions, travel direction)
//! - Battle clock and fixed-interval cadences
//! - Identifiers and opaque customization data

pub mod time;
pub mod types;

pub use glam::Vec2;
pub use time::{BattleClock, Cadence};
pub use types::{
    grid, BattleId, Color, Customization, Direction, GridError, Position, Side,
};
