//! Status effects and status manager
//!
//! Six independent stack lists live on every enemy. Each stack is one timed
//! application; stacks of the same kind compound up to a kind-specific cap
//! and expire individually at their `end_time` (battle milliseconds).

use serde::{Deserialize, Serialize};

use super::element::DamageType;
use super::Hit;
use crate::enemy::EnemyState;
use crate::rng::BattleRng;
use gridlock_core::grid;

pub const BURN_MAX_STACKS: usize = 5;
pub const BURN_DURATION_MS: f64 = 3000.0;
/// Burn damage per stack per 500 ms, as a fraction of the triggering hit
pub const BURN_DAMAGE_RATIO: f32 = 0.1;

pub const VIRAL_MAX_STACKS: usize = 5;
pub const VIRAL_DURATION_MS: f64 = 4000.0;
/// Incoming HP damage multiplier indexed by total viral stacks across all enemies
pub const VIRAL_MULTIPLIERS: [f32; 6] = [1.0, 1.2, 1.35, 1.5, 1.75, 2.0];

pub const EMP_MAX_STACKS: usize = 5;
pub const EMP_DURATION_MS: f64 = 3000.0;
pub const EMP_SHIELD_DRAIN: f32 = 0.08;

pub const LAG_MAX_STACKS: usize = 5;
pub const LAG_DURATION_MS: f64 = 4000.0;
pub const LAG_COOLDOWN_INCREASE: f32 = 0.15;
pub const LAG_MOVEMENT_REDUCTION: f32 = 0.1;
pub const LAG_ACTION_FAILURE_CHANCE: f32 = 0.05;

pub const DISPLACE_MAX_STACKS: usize = 3;
pub const DISPLACE_DURATION_MS: f64 = 2000.0;

pub const CORROSIVE_DURATION_MS: f64 = 6000.0;
pub const CORROSIVE_STRIP_RATIO: f32 = 0.1;

/// The six status kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Burn,
    Viral,
    Emp,
    Lag,
    Displace,
    Corrosive,
}

impl StatusKind {
    /// The status a damage type procs, if any
    pub fn for_damage_type(damage_type: DamageType) -> Option<Self> {
        match damage_type {
            DamageType::Thermal => Some(Self::Burn),
            DamageType::Viral => Some(Self::Viral),
            DamageType::Energy => Some(Self::Emp),
            DamageType::Glacial => Some(Self::Lag),
            DamageType::Concussion => Some(Self::Displace),
            DamageType::Corrosive => Some(Self::Corrosive),
            DamageType::Kinetic => None,
        }
    }

    /// Stack cap, `None` for uncapped kinds
    pub fn max_stacks(self) -> Option<usize> {
        match self {
            Self::Burn => Some(BURN_MAX_STACKS),
            Self::Viral => Some(VIRAL_MAX_STACKS),
            Self::Emp => Some(EMP_MAX_STACKS),
            Self::Lag => Some(LAG_MAX_STACKS),
            Self::Displace => Some(DISPLACE_MAX_STACKS),
            Self::Corrosive => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Burn => "Burn",
            Self::Viral => "Viral",
            Self::Emp => "EMP",
            Self::Lag => "Lag",
            Self::Displace => "Displace",
            Self::Corrosive => "Corrosive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnStack {
    /// Damage dealt per burn tick
    pub damage: f32,
    pub end_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViralStack {
    pub end_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmpStack {
    pub end_time: f64,
    pub shield_drain_percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagStack {
    pub end_time: f64,
    pub cooldown_increase: f32,
    pub movement_reduction: f32,
    pub action_failure_chance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaceStack {
    pub end_time: f64,
    pub push_distance: f32,
    pub corrupt_movement: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrosiveStack {
    pub end_time: f64,
    pub armor_stripped: f32,
}

/// All active stacks on one enemy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusStacks {
    pub burn: Vec<BurnStack>,
    pub viral: Vec<ViralStack>,
    pub emp: Vec<EmpStack>,
    pub lag: Vec<LagStack>,
    pub displace: Vec<DisplaceStack>,
    pub corrosive: Vec<CorrosiveStack>,
}

impl StatusStacks {
    /// Number of active stacks of one kind
    pub fn count(&self, kind: StatusKind) -> usize {
        match kind {
            StatusKind::Burn => self.burn.len(),
            StatusKind::Viral => self.viral.len(),
            StatusKind::Emp => self.emp.len(),
            StatusKind::Lag => self.lag.len(),
            StatusKind::Displace => self.displace.len(),
            StatusKind::Corrosive => self.corrosive.len(),
        }
    }

    /// Whether any stack of any kind is active
    pub fn is_empty(&self) -> bool {
        self.burn.is_empty()
            && self.viral.is_empty()
            && self.emp.is_empty()
            && self.lag.is_empty()
            && self.displace.is_empty()
            && self.corrosive.is_empty()
    }

    fn retain_active(&mut self, battle_time: f64) {
        self.burn.retain(|s| s.end_time > battle_time);
        self.viral.retain(|s| s.end_time > battle_time);
        self.emp.retain(|s| s.end_time > battle_time);
        self.lag.retain(|s| s.end_time > battle_time);
        self.displace.retain(|s| s.end_time > battle_time);
        self.corrosive.retain(|s| s.end_time > battle_time);
    }
}

fn has_room(kind: StatusKind, current: usize) -> bool {
    kind.max_stacks().map_or(true, |max| current < max)
}

/// Applies, expires and aggregates status stacks
pub struct StatusEffectManager;

impl StatusEffectManager {
    /// Roll for a status proc from `hit` and apply it on success.
    ///
    /// Returns the kind applied, or `None` when statuses are blocked, the hit
    /// has no proc chance, the roll fails, the type has no status, or the
    /// stack cap is reached.
    pub fn try_apply_status(
        enemy: &mut EnemyState,
        hit: &Hit,
        battle_time: f64,
        can_apply_status: bool,
        rng: &mut BattleRng,
    ) -> Option<StatusKind> {
        if !can_apply_status || hit.status_chance <= 0.0 {
            return None;
        }
        if rng.random_f32() > hit.status_chance {
            return None;
        }

        let kind = StatusKind::for_damage_type(hit.damage_type)?;
        let applied = match kind {
            StatusKind::Burn => Self::apply_burn(enemy, hit.damage, battle_time),
            StatusKind::Viral => Self::apply_viral(enemy, battle_time),
            StatusKind::Emp => Self::apply_emp(enemy, battle_time),
            StatusKind::Lag => Self::apply_lag(enemy, battle_time),
            StatusKind::Displace => Self::apply_displace(enemy, battle_time),
            StatusKind::Corrosive => Self::apply_corrosive(enemy, battle_time),
        };

        if applied {
            tracing::debug!(
                "{} applied to {} ({} stacks)",
                kind.name(),
                enemy.id,
                enemy.status.count(kind)
            );
            Some(kind)
        } else {
            None
        }
    }

    pub fn apply_burn(enemy: &mut EnemyState, hit_damage: f32, battle_time: f64) -> bool {
        if !has_room(StatusKind::Burn, enemy.status.burn.len()) {
            return false;
        }
        enemy.status.burn.push(BurnStack {
            damage: (hit_damage * BURN_DAMAGE_RATIO).max(1.0),
            end_time: battle_time + BURN_DURATION_MS,
        });
        true
    }

    pub fn apply_viral(enemy: &mut EnemyState, battle_time: f64) -> bool {
        if !has_room(StatusKind::Viral, enemy.status.viral.len()) {
            return false;
        }
        enemy.status.viral.push(ViralStack {
            end_time: battle_time + VIRAL_DURATION_MS,
        });
        true
    }

    /// Drains a share of current shields immediately and blocks shield regen
    pub fn apply_emp(enemy: &mut EnemyState, battle_time: f64) -> bool {
        if !has_room(StatusKind::Emp, enemy.status.emp.len()) {
            return false;
        }
        let drain = enemy.shields * EMP_SHIELD_DRAIN;
        enemy.shields = (enemy.shields - drain).max(0.0);
        enemy.status.emp.push(EmpStack {
            end_time: battle_time + EMP_DURATION_MS,
            shield_drain_percent: EMP_SHIELD_DRAIN,
        });
        enemy.shield_regen_disabled = true;
        true
    }

    pub fn apply_lag(enemy: &mut EnemyState, battle_time: f64) -> bool {
        if !has_room(StatusKind::Lag, enemy.status.lag.len()) {
            return false;
        }
        enemy.status.lag.push(LagStack {
            end_time: battle_time + LAG_DURATION_MS,
            cooldown_increase: LAG_COOLDOWN_INCREASE,
            movement_reduction: LAG_MOVEMENT_REDUCTION,
            action_failure_chance: LAG_ACTION_FAILURE_CHANCE,
        });
        true
    }

    /// Pushes the enemy away from the player: one tile for the first two
    /// stacks, two tiles (and movement corruption) from the third.
    pub fn apply_displace(enemy: &mut EnemyState, battle_time: f64) -> bool {
        let existing = enemy.status.displace.len();
        if !has_room(StatusKind::Displace, existing) {
            return false;
        }
        let push_distance = if existing >= 2 { 2.0 } else { 1.0 };
        enemy.position.x = (enemy.position.x + push_distance).min(grid::MAX_X);
        enemy.status.displace.push(DisplaceStack {
            end_time: battle_time + DISPLACE_DURATION_MS,
            push_distance,
            corrupt_movement: existing >= 2,
        });
        true
    }

    /// Permanently strips armor: 10% of current armor, at least 1
    pub fn apply_corrosive(enemy: &mut EnemyState, battle_time: f64) -> bool {
        let armor_stripped = if enemy.armor > 0.0 {
            (enemy.armor * CORROSIVE_STRIP_RATIO).floor().max(1.0).min(enemy.armor)
        } else {
            0.0
        };
        enemy.armor = (enemy.armor - armor_stripped).max(0.0);
        enemy.status.corrosive.push(CorrosiveStack {
            end_time: battle_time + CORROSIVE_DURATION_MS,
            armor_stripped,
        });
        true
    }

    /// Drop every stack whose `end_time` has passed
    pub fn cleanup_expired_effects(enemy: &mut EnemyState, battle_time: f64) {
        enemy.status.retain_active(battle_time);
        enemy.shield_regen_disabled = !enemy.status.emp.is_empty();
    }

    /// Damage amplification from viral stacks summed across every enemy
    pub fn get_viral_damage_multiplier(enemies: &[EnemyState]) -> f32 {
        let total: usize = enemies.iter().map(|e| e.status.viral.len()).sum();
        VIRAL_MULTIPLIERS[total.min(VIRAL_MULTIPLIERS.len() - 1)]
    }

    /// Cooldown multiplier from this enemy's own lag stacks
    pub fn get_lag_cooldown_multiplier(enemy: &EnemyState) -> f32 {
        1.0 + enemy.status.lag.len() as f32 * LAG_COOLDOWN_INCREASE
    }

    /// Cumulative chance an action attempt stutters
    pub fn get_lag_failure_chance(enemy: &EnemyState) -> f32 {
        enemy.status.lag.iter().map(|s| s.action_failure_chance).sum()
    }

    /// Cumulative chance a move is rejected
    pub fn get_lag_movement_penalty(enemy: &EnemyState) -> f32 {
        enemy.status.lag.iter().map(|s| s.movement_reduction).sum()
    }

    /// Whether a displace stack is currently scrambling this enemy's movement
    pub fn is_movement_corrupted(enemy: &EnemyState) -> bool {
        enemy.status.displace.iter().any(|s| s.corrupt_movement)
    }
}
