//! Gridlock Battle - Tick-driven grid combat simulation
//!
//! Provides layered damage, stacking status effects, projectiles,
//! trigger/action protocol AI and the battle engine that ties them together.

pub mod ai;
pub mod combat;
pub mod content;
pub mod enemy;
pub mod engine;
pub mod error;
pub mod rng;
pub mod scenario;

pub use ai::{
    Action, ActionEffect, ActionResult, AiExecutor, AttackSpec, BattleContext, CoreType, EntityKey,
    MoveIntent, Trigger, TriggerActionPair, TriggerCondition,
};
pub use combat::{DamageCalculator, DamageType, ElementalModifier, Hit, Projectile, ProjectileManager, StatusEffectManager, StatusKind};
pub use content::{ContentLibrary, PairRef};
pub use enemy::{create_enemy_state, EnemyDefinition, EnemyPhase, EnemyState, PhaseTransition, TransitionCondition};
pub use engine::{
    BattleEngine, BattleOutcome, BattleSnapshot, BattleState, BattleUpdate, DamageDealt, EnemyProtocols,
    PairExecution, PlayerState,
};
pub use error::{ContentError, ScenarioError};
pub use rng::BattleRng;
pub use scenario::{BattleScenario, DEFAULT_SCENARIO};
