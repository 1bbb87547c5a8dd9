//! Picks and runs the first eligible pair for an entity each tick

use std::collections::HashMap;

use super::action::{ActionResult, CoreType};
use super::context::BattleContext;
use super::protocol::TriggerActionPair;
use crate::combat::StatusEffectManager;
use crate::enemy::EnemyState;
use crate::rng::BattleRng;

/// Who owns a cooldown
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Player,
    /// Keyed by enemy id, not index
    Enemy(String),
}

/// A pair that fired this tick
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedAction {
    pub trigger_id: String,
    pub action_id: String,
    pub result: ActionResult,
}

/// Cooldown bookkeeping for one battle
#[derive(Debug, Clone, Default)]
pub struct AiExecutor {
    cooldowns: HashMap<(EntityKey, String), f32>,
}

impl AiExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the first pair of `core_type` whose trigger passes.
    ///
    /// `pairs` must already be sorted by descending priority. Pairs on
    /// cooldown or disabled are skipped. A lagged enemy may stutter on a
    /// pair, which skips it without a retry this tick.
    pub fn execute(
        &mut self,
        pairs: &[TriggerActionPair],
        ctx: &BattleContext,
        core_type: CoreType,
        entity: &EntityKey,
        enemy: Option<&EnemyState>,
        rng: &mut BattleRng,
    ) -> Option<ExecutedAction> {
        let cooldown_multiplier = enemy.map_or(1.0, StatusEffectManager::get_lag_cooldown_multiplier);
        let failure_chance = enemy.map_or(0.0, StatusEffectManager::get_lag_failure_chance);

        for pair in pairs.iter().filter(|p| p.action.core_type == core_type) {
            if !pair.enabled {
                continue;
            }

            let key = (entity.clone(), pair.action.id.clone());
            if self.cooldowns.contains_key(&key) {
                continue;
            }

            if failure_chance > 0.0 && rng.chance(failure_chance) {
                tracing::debug!(?entity, action = %pair.action.id, "Action stuttered under lag");
                continue;
            }

            if !pair.trigger.check(ctx) {
                continue;
            }

            let cooldown = pair.action.cooldown_ms * cooldown_multiplier;
            if cooldown > 0.0 {
                self.cooldowns.insert(key, cooldown);
            }

            return Some(ExecutedAction {
                trigger_id: pair.trigger.id.clone(),
                action_id: pair.action.id.clone(),
                result: pair.action.execute(ctx),
            });
        }

        None
    }

    /// Drain every cooldown by `delta_ms`, dropping the ones that finished
    pub fn update_cooldowns(&mut self, delta_ms: f32) {
        self.cooldowns.retain(|_, remaining| {
            *remaining -= delta_ms;
            *remaining > 0.0
        });
    }

    pub fn cooldown_remaining(&self, entity: &EntityKey, action_id: &str) -> Option<f32> {
        self.cooldowns.get(&(entity.clone(), action_id.to_string())).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::action::{Action, ActionEffect};
    use crate::ai::context::Actor;
    use crate::ai::trigger::{Trigger, TriggerCondition};
    use crate::combat::status::LagStack;
    use crate::enemy::test_enemy;
    use gridlock_core::Position;

    fn ctx() -> BattleContext {
        BattleContext {
            actor: Actor::Player,
            battle_time_ms: 0.0,
            self_position: Position::new(1.0, 1.0),
            self_hp: 100.0,
            self_max_hp: 100.0,
            self_shields: 0.0,
            self_armor: 0.0,
            just_took_damage: false,
            opponents: Vec::new(),
            allies: Vec::new(),
            threatened_rows: [0, 0, 0],
        }
    }

    fn pair(action_id: &str, cooldown_ms: f32, priority: i32) -> TriggerActionPair {
        TriggerActionPair::new(
            Trigger::new("always", TriggerCondition::Always),
            Action::new(action_id, cooldown_ms, CoreType::Tactical, ActionEffect::Heal { amount: 5.0 }),
            priority,
        )
    }

    fn sorted(mut pairs: Vec<TriggerActionPair>) -> Vec<TriggerActionPair> {
        crate::ai::protocol::sort_by_priority(&mut pairs);
        pairs
    }

    #[test]
    fn test_highest_priority_wins_once() {
        let pairs = sorted(vec![pair("p3", 1000.0, 3), pair("p1", 1000.0, 1), pair("p2", 1000.0, 2)]);
        let mut executor = AiExecutor::new();
        let mut rng = BattleRng::from_seed(1);

        let executed = executor
            .execute(&pairs, &ctx(), CoreType::Tactical, &EntityKey::Player, None, &mut rng)
            .unwrap();
        assert_eq!(executed.action_id, "p3");
        assert_eq!(executed.trigger_id, "always");
        assert!(executor.cooldown_remaining(&EntityKey::Player, "p2").is_none());
        assert!(executor.cooldown_remaining(&EntityKey::Player, "p1").is_none());
    }

    #[test]
    fn test_cooldown_gating() {
        let pairs = vec![pair("heal", 500.0, 0)];
        let mut executor = AiExecutor::new();
        let mut rng = BattleRng::from_seed(1);
        let run = |executor: &mut AiExecutor, rng: &mut BattleRng| {
            executor.execute(&pairs, &ctx(), CoreType::Tactical, &EntityKey::Player, None, rng)
        };

        assert!(run(&mut executor, &mut rng).is_some());
        assert!(run(&mut executor, &mut rng).is_none());
        executor.update_cooldowns(500.0);
        assert!(run(&mut executor, &mut rng).is_some());
    }

    #[test]
    fn test_core_type_and_disabled_filtering() {
        let mut disabled = pair("off", 0.0, 5);
        disabled.enabled = false;
        let pairs = vec![disabled, pair("on", 0.0, 1)];
        let mut executor = AiExecutor::new();
        let mut rng = BattleRng::from_seed(1);

        let executed = executor.execute(&pairs, &ctx(), CoreType::Tactical, &EntityKey::Player, None, &mut rng);
        assert_eq!(executed.map(|e| e.action_id), Some("on".to_string()));
        let executed = executor.execute(&pairs, &ctx(), CoreType::Movement, &EntityKey::Player, None, &mut rng);
        assert!(executed.is_none());
    }

    #[test]
    fn test_cooldowns_are_per_entity() {
        let pairs = vec![pair("shot", 1000.0, 0)];
        let mut executor = AiExecutor::new();
        let mut rng = BattleRng::from_seed(1);
        let a = EntityKey::Enemy("a".into());
        let b = EntityKey::Enemy("b".into());

        assert!(executor.execute(&pairs, &ctx(), CoreType::Tactical, &a, None, &mut rng).is_some());
        assert!(executor.execute(&pairs, &ctx(), CoreType::Tactical, &b, None, &mut rng).is_some());
        assert!(executor.execute(&pairs, &ctx(), CoreType::Tactical, &a, None, &mut rng).is_none());
    }

    #[test]
    fn test_lag_scales_cooldown() {
        let pairs = vec![pair("shot", 1000.0, 0)];
        let mut enemy = test_enemy("lagged", 50.0);
        for _ in 0..3 {
            StatusEffectManager::apply_lag(&mut enemy, 0.0);
        }
        let mut executor = AiExecutor::new();
        let key = EntityKey::Enemy("lagged".into());

        // Seeds are tried until one passes the 15% stutter roll
        let executed = (0..32u64).find_map(|seed| {
            let mut rng = BattleRng::from_seed(seed);
            executor.execute(&pairs, &ctx(), CoreType::Tactical, &key, Some(&enemy), &mut rng)
        });
        assert!(executed.is_some());
        let remaining = executor.cooldown_remaining(&key, "shot").unwrap();
        assert!((remaining - 1450.0).abs() < 1e-3);
    }

    #[test]
    fn test_certain_stutter_skips_without_cooldown() {
        let pairs = vec![pair("shot", 1000.0, 1), pair("backup", 1000.0, 0)];
        let mut enemy = test_enemy("frozen", 50.0);
        enemy.status.lag.push(LagStack {
            end_time: 4000.0,
            cooldown_increase: 0.15,
            movement_reduction: 0.1,
            action_failure_chance: 1.0,
        });
        let mut executor = AiExecutor::new();
        let mut rng = BattleRng::from_seed(1);
        let key = EntityKey::Enemy("frozen".into());

        let executed = executor.execute(&pairs, &ctx(), CoreType::Tactical, &key, Some(&enemy), &mut rng);
        assert!(executed.is_none());
        assert!(executor.cooldown_remaining(&key, "shot").is_none());
        assert!(executor.cooldown_remaining(&key, "backup").is_none());
    }
}
