//! Trigger conditions
//!
//! A trigger is a named predicate over a [`BattleContext`]. The set of
//! conditions is closed so content files can only name checks the engine
//! knows how to evaluate.

use serde::{Deserialize, Serialize};

use super::context::BattleContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Always passes
    Always,
    /// An opponent stands in the acting entity's row
    OpponentInRow,
    /// No opponent stands in the acting entity's row
    OpponentNotInRow,
    /// An opponent in the same row is at most `range` columns away
    OpponentWithin { range: f32 },
    /// Some opponent is below this HP fraction
    OpponentHpBelow { fraction: f32 },
    /// At least `count` opponents are alive
    OpponentsAtLeast { count: usize },
    SelfHpBelow { fraction: f32 },
    SelfHpAbove { fraction: f32 },
    /// Own shields are at zero
    ShieldsDepleted,
    /// A projectile is travelling toward the acting entity in its row
    ProjectileIncoming,
    /// The acting entity was damaged earlier this tick
    TookDamage,
    /// Battle time has reached `ms`
    TimeElapsed { ms: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub condition: TriggerCondition,
}

impl Trigger {
    pub fn new(id: impl Into<String>, condition: TriggerCondition) -> Self {
        Self {
            id: id.into(),
            condition,
        }
    }

    /// Evaluate the condition against the acting entity's view
    pub fn check(&self, ctx: &BattleContext) -> bool {
        let row = ctx.self_position.y;
        match self.condition {
            TriggerCondition::Always => true,
            TriggerCondition::OpponentInRow => ctx.opponents_in_row(row).next().is_some(),
            TriggerCondition::OpponentNotInRow => ctx.opponents_in_row(row).next().is_none(),
            TriggerCondition::OpponentWithin { range } => ctx
                .opponents_in_row(row)
                .any(|c| (c.position.x - ctx.self_position.x).abs() <= range),
            TriggerCondition::OpponentHpBelow { fraction } => {
                ctx.opponents.iter().any(|c| c.hp_fraction() < fraction)
            }
            TriggerCondition::OpponentsAtLeast { count } => ctx.opponents.len() >= count,
            TriggerCondition::SelfHpBelow { fraction } => ctx.self_hp_fraction() < fraction,
            TriggerCondition::SelfHpAbove { fraction } => ctx.self_hp_fraction() > fraction,
            TriggerCondition::ShieldsDepleted => ctx.self_shields <= 0.0,
            TriggerCondition::ProjectileIncoming => ctx.incoming_in_row() > 0,
            TriggerCondition::TookDamage => ctx.just_took_damage,
            TriggerCondition::TimeElapsed { ms } => ctx.battle_time_ms >= ms,
        }
    }
}
