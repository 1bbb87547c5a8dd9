//! Trigger/action pairs, the unit of AI behaviour

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::trigger::Trigger;

/// When `trigger` passes, run `action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerActionPair {
    pub trigger: Trigger,
    pub action: Action,
    /// Higher runs first
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl TriggerActionPair {
    pub fn new(trigger: Trigger, action: Action, priority: i32) -> Self {
        Self {
            trigger,
            action,
            priority,
            enabled: true,
        }
    }
}

/// Sort descending by priority, keeping the given order among equals
pub fn sort_by_priority(pairs: &mut [TriggerActionPair]) {
    pairs.sort_by(|a, b| b.priority.cmp(&a.priority));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::action::{ActionEffect, CoreType};
    use crate::ai::trigger::TriggerCondition;

    fn pair(action_id: &str, priority: i32) -> TriggerActionPair {
        TriggerActionPair::new(
            Trigger::new("always", TriggerCondition::Always),
            Action::new(action_id, 0.0, CoreType::Tactical, ActionEffect::Heal { amount: 1.0 }),
            priority,
        )
    }

    #[test]
    fn test_sort_is_stable_descending() {
        let mut pairs = vec![pair("a", 1), pair("b", 3), pair("c", 1), pair("d", 2)];
        sort_by_priority(&mut pairs);
        let order: Vec<_> = pairs.iter().map(|p| p.action.id.as_str()).collect();
        assert_eq!(order, ["b", "d", "a", "c"]);
    }
}
