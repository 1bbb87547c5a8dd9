//! Actions and the results they produce
//!
//! An [`Action`] declares *what* to do as an [`ActionEffect`]. Executing it
//! against a [`BattleContext`] resolves positions, rows and directions and
//! yields an [`ActionResult`] that the engine applies to battle state.

use serde::{Deserialize, Serialize};

use super::context::BattleContext;
use crate::combat::{DamageType, ElementalModifier, Hit};
use gridlock_core::{Position, Side};

/// Which protocol lane an action belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreType {
    Movement,
    Tactical,
}

/// Damage an action deals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub damage: f32,
    #[serde(default)]
    pub damage_type: DamageType,
    /// Overrides the damage type's base proc chance
    #[serde(default)]
    pub status_chance: Option<f32>,
}

impl AttackSpec {
    pub fn new(damage: f32, damage_type: DamageType) -> Self {
        Self {
            damage,
            damage_type,
            status_chance: None,
        }
    }

    pub fn hit(&self) -> Hit {
        Hit {
            damage: self.damage,
            damage_type: self.damage_type,
            status_chance: self
                .status_chance
                .unwrap_or_else(|| ElementalModifier::get_modifiers(self.damage_type).status_proc_chance),
        }
    }
}

/// Where a movement action wants to go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveIntent {
    /// Step one row toward the nearest opponent
    TowardOpponentRow,
    /// Leave a row shared with an opponent
    AwayFromOpponentRow,
    /// Step into an adjacent row with nothing incoming
    DodgeIncoming,
    /// One column toward the opposing half
    Advance,
    /// One column away from the opposing half
    Retreat,
    RowUp,
    RowDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionEffect {
    Shoot { attack: AttackSpec },
    RapidFire { attack: AttackSpec, count: u32 },
    TripleShot { attack: AttackSpec },
    Wave { attack: AttackSpec },
    Spread { attack: AttackSpec },
    Bomb { attack: AttackSpec },
    Cluster { attack: AttackSpec },
    Field { attack: AttackSpec },
    Melee { attack: AttackSpec, range: f32 },
    WideMelee { attack: AttackSpec, range: f32 },
    DashAttack { attack: AttackSpec },
    RetreatShot { attack: AttackSpec },
    Drain { attack: AttackSpec, heal_ratio: f32 },
    Move { intent: MoveIntent },
    Heal { amount: f32 },
    HealOverTime { amount_per_tick: f32, duration_ms: f64 },
    Barrier { amount: f32 },
    Shield { amount: f32 },
    Counter { duration_ms: f64 },
    Invincible { duration_ms: f64 },
    Buff { multiplier: f32, duration_ms: f64 },
}

/// A resolved action, ready to be applied to battle state
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    Shoot { origin: Position, hit: Hit },
    RapidFire { origin: Position, hit: Hit, count: u32 },
    TripleShot { origin: Position, hit: Hit },
    Wave { origin: Position, hit: Hit },
    Spread { origin: Position, hit: Hit },
    Bomb { target: Position, hit: Hit },
    Cluster { target: Position, hit: Hit },
    Field { row: f32, hit: Hit },
    Melee { origin: Position, range: f32, hit: Hit },
    WideMelee { origin: Position, range: f32, hit: Hit },
    DashAttack { to: Position, hit: Hit },
    RetreatShot { to: Position, hit: Hit },
    Drain { target: Option<Position>, hit: Hit, heal_ratio: f32 },
    Move { to: Position },
    Heal { amount: f32 },
    HealOverTime { amount_per_tick: f32, duration_ms: f64 },
    Barrier { amount: f32 },
    Shield { amount: f32 },
    Counter { duration_ms: f64 },
    Invincible { duration_ms: f64 },
    Buff { multiplier: f32, duration_ms: f64 },
}

impl ActionResult {
    /// Short name used in telemetry
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Shoot { .. } => "shoot",
            Self::RapidFire { .. } => "rapid_fire",
            Self::TripleShot { .. } => "triple_shot",
            Self::Wave { .. } => "wave",
            Self::Spread { .. } => "spread",
            Self::Bomb { .. } => "bomb",
            Self::Cluster { .. } => "cluster",
            Self::Field { .. } => "field",
            Self::Melee { .. } => "melee",
            Self::WideMelee { .. } => "wide_melee",
            Self::DashAttack { .. } => "dash_attack",
            Self::RetreatShot { .. } => "retreat_shot",
            Self::Drain { .. } => "drain",
            Self::Move { .. } => "move",
            Self::Heal { .. } => "heal",
            Self::HealOverTime { .. } => "heal_over_time",
            Self::Barrier { .. } => "barrier",
            Self::Shield { .. } => "shield",
            Self::Counter { .. } => "counter",
            Self::Invincible { .. } => "invincible",
            Self::Buff { .. } => "buff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    /// Cooldown after a successful execution, before lag scaling
    pub cooldown_ms: f32,
    pub core_type: CoreType,
    pub effect: ActionEffect,
}

/// Bomb/cluster target when nobody is left to aim at
const BLIND_TARGET_DISTANCE: f32 = 3.0;

impl Action {
    pub fn new(id: impl Into<String>, cooldown_ms: f32, core_type: CoreType, effect: ActionEffect) -> Self {
        Self {
            id: id.into(),
            cooldown_ms,
            core_type,
            effect,
        }
    }

    /// Resolve the effect against the acting entity's view
    pub fn execute(&self, ctx: &BattleContext) -> ActionResult {
        let origin = ctx.self_position;
        let side = ctx.side();
        let forward = side.facing().sign();

        let aim = || {
            ctx.nearest_opponent()
                .map(|c| c.position)
                .unwrap_or_else(|| Position::new(origin.x + forward * BLIND_TARGET_DISTANCE, origin.y))
        };

        match self.effect {
            ActionEffect::Shoot { attack } => ActionResult::Shoot { origin, hit: attack.hit() },
            ActionEffect::RapidFire { attack, count } => ActionResult::RapidFire {
                origin,
                hit: attack.hit(),
                count,
            },
            ActionEffect::TripleShot { attack } => ActionResult::TripleShot { origin, hit: attack.hit() },
            ActionEffect::Wave { attack } => ActionResult::Wave { origin, hit: attack.hit() },
            ActionEffect::Spread { attack } => ActionResult::Spread { origin, hit: attack.hit() },
            ActionEffect::Bomb { attack } => ActionResult::Bomb { target: aim(), hit: attack.hit() },
            ActionEffect::Cluster { attack } => ActionResult::Cluster { target: aim(), hit: attack.hit() },
            ActionEffect::Field { attack } => ActionResult::Field { row: aim().y, hit: attack.hit() },
            ActionEffect::Melee { attack, range } => ActionResult::Melee {
                origin,
                range,
                hit: attack.hit(),
            },
            ActionEffect::WideMelee { attack, range } => ActionResult::WideMelee {
                origin,
                range,
                hit: attack.hit(),
            },
            ActionEffect::DashAttack { attack } => ActionResult::DashAttack {
                to: Position::new(side.front_column(), origin.y),
                hit: attack.hit(),
            },
            ActionEffect::RetreatShot { attack } => ActionResult::RetreatShot {
                to: Position::new(origin.x - forward, origin.y),
                hit: attack.hit(),
            },
            ActionEffect::Drain { attack, heal_ratio } => ActionResult::Drain {
                target: ctx.nearest_opponent().map(|c| c.position),
                hit: attack.hit(),
                heal_ratio,
            },
            ActionEffect::Move { intent } => ActionResult::Move {
                to: resolve_move(intent, ctx, side),
            },
            ActionEffect::Heal { amount } => ActionResult::Heal { amount },
            ActionEffect::HealOverTime { amount_per_tick, duration_ms } => ActionResult::HealOverTime {
                amount_per_tick,
                duration_ms,
            },
            ActionEffect::Barrier { amount } => ActionResult::Barrier { amount },
            ActionEffect::Shield { amount } => ActionResult::Shield { amount },
            ActionEffect::Counter { duration_ms } => ActionResult::Counter { duration_ms },
            ActionEffect::Invincible { duration_ms } => ActionResult::Invincible { duration_ms },
            ActionEffect::Buff { multiplier, duration_ms } => ActionResult::Buff {
                multiplier,
                duration_ms,
            },
        }
    }
}

fn resolve_move(intent: MoveIntent, ctx: &BattleContext, side: Side) -> Position {
    let origin = ctx.self_position;
    let forward = side.facing().sign();
    let up = Position::new(origin.x, origin.y - 1.0);
    let down = Position::new(origin.x, origin.y + 1.0);

    match intent {
        MoveIntent::TowardOpponentRow => match ctx.nearest_opponent() {
            Some(target) if target.position.y < origin.y => up,
            Some(target) if target.position.y > origin.y => down,
            _ => origin,
        },
        MoveIntent::AwayFromOpponentRow => {
            if ctx.opponents_in_row(origin.y).next().is_none() {
                origin
            } else if side.contains(down) {
                down
            } else {
                up
            }
        }
        MoveIntent::DodgeIncoming => [up, down]
            .into_iter()
            .find(|p| side.contains(*p) && !ctx.is_row_threatened(p.y))
            .unwrap_or(origin),
        MoveIntent::Advance => Position::new(origin.x + forward, origin.y),
        MoveIntent::Retreat => Position::new(origin.x - forward, origin.y),
        MoveIntent::RowUp => up,
        MoveIntent::RowDown => down,
    }
}
