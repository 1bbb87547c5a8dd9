//! Damage types and their effectiveness against each defense layer
//!
//! 7 damage types: Kinetic, Thermal, Viral, Energy, Glacial, Concussion, Corrosive.
//! Each has a multiplier against shields, armor and bare HP plus a base
//! status-proc chance. Shields always take priority over armor: when an
//! enemy has both, only the shield multiplier applies.

use serde::{Deserialize, Serialize};

/// The 7 damage types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    #[default]
    Kinetic,
    Thermal,
    Viral,
    Energy,
    Glacial,
    Concussion,
    Corrosive,
}

/// Total number of damage types (for array indexing)
pub const DAMAGE_TYPE_COUNT: usize = 7;

impl DamageType {
    /// Array index for this type (for per-type resistance arrays)
    pub fn index(self) -> usize {
        match self {
            Self::Kinetic => 0,
            Self::Thermal => 1,
            Self::Viral => 2,
            Self::Energy => 3,
            Self::Glacial => 4,
            Self::Concussion => 5,
            Self::Corrosive => 6,
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Kinetic => "Kinetic",
            Self::Thermal => "Thermal",
            Self::Viral => "Viral",
            Self::Energy => "Energy",
            Self::Glacial => "Glacial",
            Self::Concussion => "Concussion",
            Self::Corrosive => "Corrosive",
        }
    }

    /// All damage type variants
    pub fn all() -> &'static [DamageType] {
        &[
            Self::Kinetic,
            Self::Thermal,
            Self::Viral,
            Self::Energy,
            Self::Glacial,
            Self::Concussion,
            Self::Corrosive,
        ]
    }
}

/// Per-layer multipliers for one damage type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementalModifiers {
    pub shield_bonus: f32,
    pub armor_bonus: f32,
    pub hp_bonus: f32,
    /// Base chance (0.0-1.0) that a hit of this type procs its status
    pub status_proc_chance: f32,
}

const MODIFIER_TABLE: [ElementalModifiers; DAMAGE_TYPE_COUNT] = [
    // Kinetic
    ElementalModifiers { shield_bonus: 1.0, armor_bonus: 1.0, hp_bonus: 1.0, status_proc_chance: 0.0 },
    // Thermal
    ElementalModifiers { shield_bonus: 0.8, armor_bonus: 1.0, hp_bonus: 1.2, status_proc_chance: 0.25 },
    // Viral
    ElementalModifiers { shield_bonus: 0.5, armor_bonus: 0.8, hp_bonus: 1.5, status_proc_chance: 0.2 },
    // Energy
    ElementalModifiers { shield_bonus: 2.0, armor_bonus: 0.5, hp_bonus: 1.0, status_proc_chance: 0.15 },
    // Glacial
    ElementalModifiers { shield_bonus: 1.0, armor_bonus: 1.2, hp_bonus: 0.9, status_proc_chance: 0.2 },
    // Concussion
    ElementalModifiers { shield_bonus: 0.8, armor_bonus: 1.5, hp_bonus: 1.0, status_proc_chance: 0.15 },
    // Corrosive
    ElementalModifiers { shield_bonus: 0.7, armor_bonus: 2.0, hp_bonus: 1.0, status_proc_chance: 0.2 },
];

/// Static damage-type lookup
pub struct ElementalModifier;

impl ElementalModifier {
    /// Modifiers for a damage type. Returned by value, the table itself is immutable.
    pub fn get_modifiers(damage_type: DamageType) -> ElementalModifiers {
        MODIFIER_TABLE[damage_type.index()]
    }

    /// Apply the multiplier of the outermost defense layer present.
    ///
    /// Shields > 0 uses `shield_bonus`, otherwise armor > 0 uses
    /// `armor_bonus`, otherwise the base damage is returned unchanged.
    pub fn calculate_modified_damage(
        base_damage: f32,
        damage_type: DamageType,
        shields: f32,
        armor: f32,
    ) -> f32 {
        let modifiers = Self::get_modifiers(damage_type);
        if shields > 0.0 {
            base_damage * modifiers.shield_bonus
        } else if armor > 0.0 {
            base_damage * modifiers.armor_bonus
        } else {
            base_damage
        }
    }
}
