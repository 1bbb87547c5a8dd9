//! Id-keyed registries of triggers, actions and enemy definitions
//!
//! Everything that names content by id goes through [`ContentLibrary`], so
//! unknown ids are reported here and the engine only ever sees resolved
//! pairs.

mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ai::{Action, Trigger, TriggerActionPair};
use crate::enemy::EnemyDefinition;
use crate::error::ContentError;

/// A pair named by ids, as written in scenario files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRef {
    pub trigger: String,
    pub action: String,
    #[serde(default)]
    pub priority: i32,
}

impl PairRef {
    pub fn new(trigger: &str, action: &str, priority: i32) -> Self {
        Self {
            trigger: trigger.to_string(),
            action: action.to_string(),
            priority,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    triggers: HashMap<String, Trigger>,
    actions: HashMap<String, Action>,
    enemies: HashMap<String, Arc<EnemyDefinition>>,
}

impl ContentLibrary {
    /// An empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard trigger, action and enemy set
    pub fn builtin() -> Result<Self, ContentError> {
        let mut library = Self::new();
        builtin::populate(&mut library)?;
        Ok(library)
    }

    /// Add or replace a trigger
    pub fn register_trigger(&mut self, trigger: Trigger) {
        self.triggers.insert(trigger.id.clone(), trigger);
    }

    /// Add or replace an action
    pub fn register_action(&mut self, action: Action) {
        self.actions.insert(action.id.clone(), action);
    }

    /// Add or replace an enemy definition after checking its phase graph
    pub fn register_enemy(&mut self, definition: EnemyDefinition) -> Result<(), ContentError> {
        if let Some(phase) = definition.missing_phases().first() {
            return Err(ContentError::UnknownPhase {
                enemy: definition.id.clone(),
                phase: phase.to_string(),
            });
        }
        self.enemies.insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn trigger(&self, id: &str) -> Result<&Trigger, ContentError> {
        self.triggers
            .get(id)
            .ok_or_else(|| ContentError::UnknownTrigger(id.to_string()))
    }

    pub fn action(&self, id: &str) -> Result<&Action, ContentError> {
        self.actions
            .get(id)
            .ok_or_else(|| ContentError::UnknownAction(id.to_string()))
    }

    pub fn enemy(&self, id: &str) -> Result<Arc<EnemyDefinition>, ContentError> {
        self.enemies
            .get(id)
            .cloned()
            .ok_or_else(|| ContentError::UnknownEnemy(id.to_string()))
    }

    /// Build a pair from registered ids
    pub fn resolve_pair(
        &self,
        trigger_id: &str,
        action_id: &str,
        priority: i32,
    ) -> Result<TriggerActionPair, ContentError> {
        Ok(TriggerActionPair::new(
            self.trigger(trigger_id)?.clone(),
            self.action(action_id)?.clone(),
            priority,
        ))
    }

    /// Resolve every reference, failing on the first unknown id
    pub fn resolve_pairs(&self, refs: &[PairRef]) -> Result<Vec<TriggerActionPair>, ContentError> {
        refs.iter()
            .map(|r| self.resolve_pair(&r.trigger, &r.action, r.priority))
            .collect()
    }

    /// Registered enemy ids, sorted
    pub fn enemy_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.enemies.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ActionEffect, CoreType, TriggerCondition};
    use crate::enemy::{EnemyPhase, PhaseTransition, TransitionCondition};

    #[test]
    fn test_builtin_is_complete() {
        let library = ContentLibrary::builtin().unwrap();
        assert!(library.trigger_count() >= 10);
        assert!(library.action_count() >= 20);
        assert_eq!(library.enemy_ids(), ["drone", "sentinel", "skitter", "warden"]);
    }

    #[test]
    fn test_builtin_phases_have_behaviour() {
        let library = ContentLibrary::builtin().unwrap();
        for id in library.enemy_ids() {
            let definition = library.enemy(id).unwrap();
            let initial = definition.phase(&definition.initial_phase).unwrap();
            assert!(!initial.pairs().is_empty(), "{} has an empty initial phase", id);
        }
    }

    #[test]
    fn test_unknown_ids_fail_at_resolution() {
        let library = ContentLibrary::builtin().unwrap();
        assert_eq!(
            library.resolve_pair("nope", "pulse_shot", 1),
            Err(ContentError::UnknownTrigger("nope".into()))
        );
        assert_eq!(
            library.resolve_pair("always", "nope", 1),
            Err(ContentError::UnknownAction("nope".into()))
        );
        assert!(matches!(library.enemy("nope"), Err(ContentError::UnknownEnemy(_))));
    }

    #[test]
    fn test_resolve_pairs_keeps_priority() {
        let library = ContentLibrary::builtin().unwrap();
        let pairs = library
            .resolve_pairs(&[PairRef::new("always", "pulse_shot", 4), PairRef::new("projectile_incoming", "dodge", 9)])
            .unwrap();
        assert_eq!(pairs[0].priority, 4);
        assert_eq!(pairs[1].action.core_type, CoreType::Movement);
    }

    #[test]
    fn test_register_enemy_rejects_dangling_phase() {
        let mut library = ContentLibrary::new();
        library.register_trigger(Trigger::new("always", TriggerCondition::Always));
        library.register_action(Action::new("heal", 0.0, CoreType::Tactical, ActionEffect::Heal { amount: 1.0 }));

        let phase = EnemyPhase {
            transitions: vec![PhaseTransition {
                condition: TransitionCondition::ShieldsDepleted,
                target: "ghost".into(),
            }],
            ..Default::default()
        };
        let definition = EnemyDefinition::basic("bad", "Bad", 10.0, phase);
        assert_eq!(
            library.register_enemy(definition),
            Err(ContentError::UnknownPhase {
                enemy: "bad".into(),
                phase: "ghost".into()
            })
        );
    }
}
