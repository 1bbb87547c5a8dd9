//! Mutable battle state owned by the engine

use serde::{Deserialize, Serialize};

use crate::combat::Projectile;
use crate::enemy::EnemyState;
use gridlock_core::Position;

/// HP the player heals up to, regardless of `max_hp`
pub const PLAYER_HEAL_CAP: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Position,
    pub hp: f32,
    pub max_hp: f32,
    pub shields: f32,
    pub armor: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Position::new(1.0, 1.0),
            hp: 100.0,
            max_hp: 100.0,
            shields: 0.0,
            armor: 0.0,
        }
    }
}

impl PlayerState {
    /// Heal toward the fixed cap, returning the HP change.
    ///
    /// HP above the cap is pulled down to it.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0.0)).min(PLAYER_HEAL_CAP);
        self.hp - before
    }
}

/// A running regeneration effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealOverTime {
    /// Index into the enemy list, or `None` for the player
    pub enemy: Option<usize>,
    pub amount_per_tick: f32,
    pub end_time: f64,
}

/// Point-in-time record kept in the battle history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time_ms: f64,
    pub player_position: Position,
    pub player_hp: f32,
    pub player_shields: f32,
    pub enemy_hp: Vec<f32>,
    pub projectile_count: usize,
}

#[derive(Debug, Clone)]
pub struct BattleState {
    pub player: PlayerState,
    /// Dead enemies stay in the list with `hp <= 0`
    pub enemies: Vec<EnemyState>,
    pub projectiles: Vec<Projectile>,
    /// The player was damaged earlier this tick
    pub just_took_damage: bool,
    /// Blocks status procs on every enemy
    pub status_immune: bool,
    pub battle_time_ms: f64,
    pub battle_history: Vec<BattleSnapshot>,
    pub heal_over_time: Vec<HealOverTime>,
}

impl BattleState {
    pub fn new(player: PlayerState, enemies: Vec<EnemyState>) -> Self {
        Self {
            player,
            enemies,
            projectiles: Vec::new(),
            just_took_damage: false,
            status_immune: false,
            battle_time_ms: 0.0,
            battle_history: Vec::new(),
            heal_over_time: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            time_ms: self.battle_time_ms,
            player_position: self.player.position,
            player_hp: self.player.hp,
            player_shields: self.player.shields,
            enemy_hp: self.enemies.iter().map(|e| e.hp).collect(),
            projectile_count: self.projectiles.len(),
        }
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = (usize, &EnemyState)> {
        self.enemies.iter().enumerate().filter(|(_, e)| e.is_alive())
    }

    /// Index of the living enemy standing on `position`
    pub fn enemy_at(&self, position: Position) -> Option<usize> {
        self.living_enemies()
            .find(|(_, e)| e.position == position)
            .map(|(i, _)| i)
    }

    pub fn enemy_hp(&self) -> Vec<f32> {
        self.enemies.iter().map(|e| e.hp).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::test_enemy;

    #[test]
    fn test_player_defaults() {
        let player = PlayerState::default();
        assert_eq!(player.position, Position::new(1.0, 1.0));
        assert_eq!(player.hp, 100.0);
        assert_eq!(player.shields, 0.0);
    }

    #[test]
    fn test_heal_caps_at_literal_hundred() {
        let mut player = PlayerState {
            hp: 90.0,
            max_hp: 150.0,
            ..Default::default()
        };
        assert_eq!(player.heal(30.0), 10.0);
        assert_eq!(player.hp, 100.0);

        player.hp = 120.0;
        assert_eq!(player.heal(5.0), -20.0);
        assert_eq!(player.hp, 100.0);
    }

    #[test]
    fn test_enemy_at_ignores_dead() {
        let alive = test_enemy("alive", 10.0);
        let mut dead = test_enemy("dead", 0.0);
        dead.position = Position::new(5.0, 2.0);
        let state = BattleState::new(PlayerState::default(), vec![dead, alive]);
        assert_eq!(state.enemy_at(Position::new(4.0, 1.0)), Some(1));
        assert_eq!(state.enemy_at(Position::new(5.0, 2.0)), None);
    }
}
