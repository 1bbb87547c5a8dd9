//! Enemy blueprints: base stats and the phase graph

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ai::{ActionEffect, TriggerActionPair};
use crate::combat::DAMAGE_TYPE_COUNT;

/// Everything needed to spawn an enemy of one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    pub max_hp: f32,
    #[serde(default)]
    pub max_shields: f32,
    #[serde(default)]
    pub max_armor: f32,
    /// Fraction of post-multiplier damage ignored, per damage type index
    #[serde(default)]
    pub resistances: [f32; DAMAGE_TYPE_COUNT],
    #[serde(default)]
    pub shield_regen_per_sec: f32,
    #[serde(default)]
    pub dodge_chance: f32,
    pub initial_phase: String,
    pub phases: HashMap<String, EnemyPhase>,
}

impl EnemyDefinition {
    /// Single-phase definition with no shields or armor
    pub fn basic(id: impl Into<String>, name: impl Into<String>, max_hp: f32, phase: EnemyPhase) -> Self {
        let mut phases = HashMap::new();
        phases.insert("default".to_string(), phase);
        Self {
            id: id.into(),
            name: name.into(),
            max_hp,
            max_shields: 0.0,
            max_armor: 0.0,
            resistances: [0.0; DAMAGE_TYPE_COUNT],
            shield_regen_per_sec: 0.0,
            dodge_chance: 0.0,
            initial_phase: "default".to_string(),
            phases,
        }
    }

    pub fn phase(&self, name: &str) -> Option<&EnemyPhase> {
        self.phases.get(name)
    }

    /// Every phase name referenced but not defined, initial phase included
    pub fn missing_phases(&self) -> Vec<&str> {
        let referenced = std::iter::once(self.initial_phase.as_str()).chain(
            self.phases
                .values()
                .flat_map(|p| p.transitions.iter().map(|t| t.target.as_str())),
        );
        let mut missing: Vec<&str> = referenced.filter(|name| !self.phases.contains_key(*name)).collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

/// One behaviour stage of an enemy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyPhase {
    #[serde(default)]
    pub movement: Vec<TriggerActionPair>,
    #[serde(default)]
    pub tactical: Vec<TriggerActionPair>,
    /// Checked in order; the first satisfied one wins
    #[serde(default)]
    pub transitions: Vec<PhaseTransition>,
    /// Applied once as the enemy's action when the phase is entered
    #[serde(default)]
    pub on_enter: Option<ActionEffect>,
}

impl EnemyPhase {
    /// Movement and tactical pairs merged, sorted by descending priority
    pub fn pairs(&self) -> Vec<TriggerActionPair> {
        let mut pairs: Vec<_> = self.movement.iter().chain(&self.tactical).cloned().collect();
        crate::ai::sort_by_priority(&mut pairs);
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub condition: TransitionCondition,
    /// Phase to switch to
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionCondition {
    /// HP fraction dropped below `fraction`
    HpBelow { fraction: f32 },
    ShieldsDepleted,
    /// Time spent in the current phase
    ElapsedMs { ms: f64 },
}
