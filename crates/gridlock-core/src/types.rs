//! Core types used throughout the battle simulator

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A location on the arena grid.
///
/// `x` is the lane/distance axis, `y` is the row. Units always stand on
/// integral tiles; projectiles travel through fractional `x` values.
pub type Position = Vec2;

/// Arena dimensions and bounds helpers
pub mod grid {
    use super::{GridError, Position};

    /// Number of columns (x = 0..=5)
    pub const COLUMNS: u32 = 6;
    /// Number of rows (y = 0..=2)
    pub const ROWS: u32 = 3;
    pub const MIN_X: f32 = 0.0;
    pub const MAX_X: f32 = (COLUMNS - 1) as f32;
    pub const MAX_ROW: f32 = (ROWS - 1) as f32;
    /// Last column of the player's half
    pub const PLAYER_MAX_X: f32 = 2.0;
    /// First column of the enemies' half
    pub const ENEMY_MIN_X: f32 = 3.0;

    /// Whether the position lies on the grid
    pub fn in_bounds(pos: Position) -> bool {
        (MIN_X..=MAX_X).contains(&pos.x) && row_exists(pos.y)
    }

    /// Whether `y` names one of the arena rows
    pub fn row_exists(y: f32) -> bool {
        (0.0..=MAX_ROW).contains(&y)
    }

    /// All row indices, top to bottom
    pub fn rows() -> impl Iterator<Item = f32> {
        (0..ROWS).map(|r| r as f32)
    }

    /// Validate a configured position, e.g. from a scenario file
    pub fn validate(pos: Position) -> Result<Position, GridError> {
        if pos.x.fract() != 0.0 || pos.y.fract() != 0.0 {
            return Err(GridError::NotOnTile { x: pos.x, y: pos.y });
        }
        if !in_bounds(pos) {
            return Err(GridError::OutOfBounds { x: pos.x, y: pos.y });
        }
        Ok(pos)
    }
}

/// Errors produced when placing something on the grid
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("Position ({x}, {y}) is outside the arena")]
    OutOfBounds { x: f32, y: f32 },

    #[error("Position ({x}, {y}) is not on a tile")]
    NotOnTile { x: f32, y: f32 },

    #[error("Position ({x}, {y}) is on the wrong half of the arena")]
    WrongHalf { x: f32, y: f32 },
}

/// Travel direction along the x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Unit step along x (-1 for left, +1 for right)
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Which half of the arena a combatant fights from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// Direction this side's projectiles travel
    pub fn facing(self) -> Direction {
        match self {
            Self::Player => Direction::Right,
            Self::Enemy => Direction::Left,
        }
    }

    /// The column closest to the opposing half
    pub fn front_column(self) -> f32 {
        match self {
            Self::Player => grid::PLAYER_MAX_X,
            Self::Enemy => grid::ENEMY_MIN_X,
        }
    }

    /// Inclusive column range owned by this side
    pub fn columns(self) -> (f32, f32) {
        match self {
            Self::Player => (grid::MIN_X, grid::PLAYER_MAX_X),
            Self::Enemy => (grid::ENEMY_MIN_X, grid::MAX_X),
        }
    }

    /// Whether the position is a tile on this side's half
    pub fn contains(self, pos: Position) -> bool {
        let (min, max) = self.columns();
        (min..=max).contains(&pos.x) && grid::row_exists(pos.y)
    }

    /// Clamp a position into this side's half
    pub fn clamp(self, pos: Position) -> Position {
        let (min, max) = self.columns();
        Position::new(pos.x.clamp(min, max), pos.y.clamp(0.0, grid::MAX_ROW))
    }

    /// Validate that a configured position belongs to this side
    pub fn validate(self, pos: Position) -> Result<Position, GridError> {
        let pos = grid::validate(pos)?;
        if !self.contains(pos) {
            return Err(GridError::WrongHalf { x: pos.x, y: pos.y });
        }
        Ok(pos)
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Unique identifier for a single battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleId(pub Uuid);

impl BattleId {
    /// Create a new random battle ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BattleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// RGBA color with floating point components (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Create a color from RGB values (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Visual customization for a combatant.
///
/// The battle engine stores and returns this untouched; only presentation
/// layers read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    /// Named color slots (e.g. "primary", "trim")
    #[serde(default)]
    pub colors: HashMap<String, Color>,
    /// Part shape ids keyed by slot (e.g. "head" -> "visor_02")
    #[serde(default)]
    pub parts: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_split_the_grid() {
        for x in 0..grid::COLUMNS {
            let pos = Position::new(x as f32, 1.0);
            assert_ne!(Side::Player.contains(pos), Side::Enemy.contains(pos));
        }
    }

    #[test]
    fn test_facing_points_at_opponent() {
        assert_eq!(Side::Player.facing(), Direction::Right);
        assert_eq!(Side::Enemy.facing(), Direction::Left);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_clamp_into_half() {
        let clamped = Side::Player.clamp(Position::new(4.0, 7.0));
        assert_eq!(clamped, Position::new(2.0, 2.0));
        let clamped = Side::Enemy.clamp(Position::new(1.0, -1.0));
        assert_eq!(clamped, Position::new(3.0, 0.0));
    }

    #[test]
    fn test_validate_rejects_fractional_and_wrong_half() {
        assert!(grid::validate(Position::new(1.5, 0.0)).is_err());
        assert_eq!(
            Side::Enemy.validate(Position::new(1.0, 0.0)),
            Err(GridError::WrongHalf { x: 1.0, y: 0.0 })
        );
        assert!(Side::Enemy.validate(Position::new(5.0, 2.0)).is_ok());
        assert!(grid::validate(Position::new(6.0, 0.0)).is_err());
    }

    #[test]
    fn test_colors_default_to_opaque_white() {
        let color = Color::rgb(0.2, 0.4, 0.6);
        assert_eq!(color.a, 1.0);
        assert_eq!(Color::default(), Color::WHITE);
        assert!(Customization::default().colors.is_empty());
    }

    #[test]
    fn test_battle_ids_are_unique() {
        assert_ne!(BattleId::new(), BattleId::new());
    }
}
