//! Per-tick output handed back to the host

use serde::{Deserialize, Serialize};

use super::state::BattleSnapshot;
use crate::combat::{DamageType, Projectile};
use gridlock_core::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    #[default]
    Fighting,
    PlayerDefeated,
    AllGuardiansDefeated,
}

impl BattleOutcome {
    pub fn is_over(self) -> bool {
        self != Self::Fighting
    }

    pub fn player_won(self) -> bool {
        self == Self::AllGuardiansDefeated
    }
}

/// Damage that landed this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageDealt {
    pub damage_type: DamageType,
    /// Shield plus HP damage
    pub amount: f32,
    pub to_player: bool,
}

/// A trigger/action pair that fired this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairExecution {
    /// `player` or the enemy id
    pub entity: String,
    pub trigger_id: String,
    pub action_id: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleUpdate {
    pub battle_time_ms: f64,
    pub player_position: Position,
    pub player_hp: f32,
    pub player_shields: f32,
    pub player_armor: f32,
    pub enemy_hp: Vec<f32>,
    pub projectiles: Vec<Projectile>,
    pub damage_dealt: Vec<DamageDealt>,
    pub pairs_executed: Vec<PairExecution>,
    pub just_took_damage: bool,
    pub outcome: BattleOutcome,
    pub battle_over: bool,
    pub player_won: bool,
    /// Only filled on the update that ends the battle
    pub battle_history: Option<Vec<BattleSnapshot>>,
}
