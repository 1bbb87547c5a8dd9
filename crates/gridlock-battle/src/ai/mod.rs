//! Protocol AI: prioritized trigger/action pairs evaluated each tick
//!
//! Each combatant carries movement and tactical pair lists. Every tick the
//! [`AiExecutor`] walks a list in priority order and runs the first pair
//! whose trigger passes and whose action is off cooldown.

pub mod action;
pub mod context;
pub mod executor;
pub mod protocol;
pub mod trigger;

pub use action::{Action, ActionEffect, ActionResult, AttackSpec, CoreType, MoveIntent};
pub use context::{Actor, BattleContext, Combatant};
pub use executor::{AiExecutor, EntityKey, ExecutedAction};
pub use protocol::{sort_by_priority, TriggerActionPair};
pub use trigger::{Trigger, TriggerCondition};
