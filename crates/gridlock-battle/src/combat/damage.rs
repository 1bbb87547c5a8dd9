//! Damage calculation pipeline
//!
//! Two stages: the damage-type multiplier for the outermost defense layer
//! ([`DamageCalculator::calculate_damage`]), then layered absorption
//! shields -> armor -> HP ([`DamageCalculator::apply_damage_to_enemy`]).

use serde::{Deserialize, Serialize};

use super::element::{DamageType, ElementalModifier};
use crate::enemy::EnemyState;
use crate::engine::PlayerState;

/// Armor value that yields a 50% reduction. Reduction is `armor / (armor + ARMOR_SCALING)`.
pub const ARMOR_SCALING: f32 = 300.0;

/// Result of the type-effectiveness stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    /// Damage before any multiplier
    pub base_amount: f32,
    /// Modified total; shield/armor absorption has not been subtracted yet
    pub hp_damage: f32,
    pub damage_type: DamageType,
}

/// How a damage instance was split across layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageBreakdown {
    /// Damage absorbed by shields
    pub shield_damage: f32,
    /// Damage that reached HP after armor reduction (before clamping HP at 0)
    pub hp_damage: f32,
}

impl DamageBreakdown {
    pub fn total(&self) -> f32 {
        self.shield_damage + self.hp_damage
    }
}

/// Fraction of damage armor removes
pub fn armor_reduction(armor: f32) -> f32 {
    let armor = armor.max(0.0);
    armor / (armor + ARMOR_SCALING)
}

/// Stateless damage resolution
pub struct DamageCalculator;

impl DamageCalculator {
    /// Apply the damage-type multiplier for whichever layer is outermost
    pub fn calculate_damage(
        base_damage: f32,
        damage_type: DamageType,
        shields: f32,
        armor: f32,
    ) -> DamageResult {
        DamageResult {
            base_amount: base_damage,
            hp_damage: ElementalModifier::calculate_modified_damage(
                base_damage,
                damage_type,
                shields,
                armor,
            ),
            damage_type,
        }
    }

    /// Run `damage` through the enemy's shields, armor and HP, mutating it in place
    pub fn apply_damage_to_enemy(enemy: &mut EnemyState, damage: f32) -> DamageBreakdown {
        absorb(&mut enemy.hp, &mut enemy.shields, enemy.armor, damage)
    }

    /// Same layered absorption against the player
    pub fn apply_damage_to_player(player: &mut PlayerState, damage: f32) -> DamageBreakdown {
        absorb(&mut player.hp, &mut player.shields, player.armor, damage)
    }

    /// Apply every burn stack straight to HP, bypassing shields and armor.
    /// Returns the total dealt.
    pub fn apply_burn_damage(enemy: &mut EnemyState) -> f32 {
        let total: f32 = enemy.status.burn.iter().map(|stack| stack.damage).sum();
        if total > 0.0 {
            enemy.hp = (enemy.hp - total).max(0.0);
        }
        total
    }
}

fn absorb(hp: &mut f32, shields: &mut f32, armor: f32, damage: f32) -> DamageBreakdown {
    let mut remaining = damage.max(0.0);

    let shield_damage = shields.max(0.0).min(remaining);
    *shields = (*shields - shield_damage).max(0.0);
    remaining -= shield_damage;

    let hp_damage = remaining * (1.0 - armor_reduction(armor));
    *hp = (*hp - hp_damage).max(0.0);

    DamageBreakdown {
        shield_damage,
        hp_damage,
    }
}
