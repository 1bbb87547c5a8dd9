//! Combat system module
//!
//! Provides damage types, layered damage resolution, status effects and
//! projectiles.

pub mod damage;
pub mod element;
pub mod projectile;
pub mod status;

use serde::{Deserialize, Serialize};

pub use damage::{armor_reduction, DamageBreakdown, DamageCalculator, DamageResult, ARMOR_SCALING};
pub use element::{DamageType, ElementalModifier, ElementalModifiers, DAMAGE_TYPE_COUNT};
pub use projectile::{CollisionReport, EnemyHit, Projectile, ProjectileManager};
pub use status::{StatusEffectManager, StatusKind, StatusStacks};

/// Payload of a single damage instance, from a projectile or a direct attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub damage: f32,
    pub damage_type: DamageType,
    /// Chance (0.0-1.0) to proc the damage type's status
    pub status_chance: f32,
}
