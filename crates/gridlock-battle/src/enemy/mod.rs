//! Enemy runtime state, spawning and phase transitions

pub mod definition;

use std::sync::Arc;

use crate::ai::{ActionEffect, TriggerActionPair};
use crate::combat::{DamageType, StatusStacks, DAMAGE_TYPE_COUNT};
use gridlock_core::Position;

pub use definition::{EnemyDefinition, EnemyPhase, PhaseTransition, TransitionCondition};

/// A live enemy on the grid
#[derive(Debug, Clone)]
pub struct EnemyState {
    /// Unique within a battle
    pub id: String,
    pub definition: Arc<EnemyDefinition>,
    pub position: Position,
    pub hp: f32,
    pub max_hp: f32,
    pub shields: f32,
    pub max_shields: f32,
    pub armor: f32,
    pub max_armor: f32,
    pub resistances: [f32; DAMAGE_TYPE_COUNT],
    pub status: StatusStacks,
    /// Set while EMP stacks are active
    pub shield_regen_disabled: bool,
    pub shield_regen_per_sec: f32,
    pub dodge_chance: f32,
    /// Pawns do not count toward victory
    pub is_pawn: bool,
    /// Active behaviour, sorted by descending priority
    pub pairs: Vec<TriggerActionPair>,
    pub phase: Option<String>,
    pub phase_entered_ms: f64,
    /// Damaged earlier in the current tick
    pub took_damage: bool,
}

impl EnemyState {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        self.hp / self.max_hp
    }

    /// Share of incoming damage of this type that gets through
    pub fn resistance_factor(&self, damage_type: DamageType) -> f32 {
        (1.0 - self.resistances[damage_type.index()]).clamp(0.0, 1.0)
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

/// Spawn a full-stat enemy in its definition's initial phase
pub fn create_enemy_state(
    definition: Arc<EnemyDefinition>,
    id: impl Into<String>,
    position: Position,
    is_pawn: bool,
    battle_time: f64,
) -> EnemyState {
    let phase = definition.phase(&definition.initial_phase);
    let pairs = phase.map(EnemyPhase::pairs).unwrap_or_default();
    let phase = phase.map(|_| definition.initial_phase.clone());

    EnemyState {
        id: id.into(),
        position,
        hp: definition.max_hp,
        max_hp: definition.max_hp,
        shields: definition.max_shields,
        max_shields: definition.max_shields,
        armor: definition.max_armor,
        max_armor: definition.max_armor,
        resistances: definition.resistances,
        status: StatusStacks::default(),
        shield_regen_disabled: false,
        shield_regen_per_sec: definition.shield_regen_per_sec,
        dodge_chance: definition.dodge_chance,
        is_pawn,
        pairs,
        phase,
        phase_entered_ms: battle_time,
        took_damage: false,
        definition,
    }
}

/// Target of the first satisfied transition out of the current phase
pub fn pending_transition(enemy: &EnemyState, battle_time: f64) -> Option<String> {
    let current = enemy.definition.phase(enemy.phase.as_deref()?)?;
    current
        .transitions
        .iter()
        .find(|t| match t.condition {
            TransitionCondition::HpBelow { fraction } => enemy.hp_fraction() < fraction,
            TransitionCondition::ShieldsDepleted => enemy.shields <= 0.0,
            TransitionCondition::ElapsedMs { ms } => battle_time - enemy.phase_entered_ms >= ms,
        })
        .map(|t| t.target.clone())
}

/// Switch `enemy` into `target`, replacing its pairs.
///
/// Returns the phase's entry effect. Unknown phases leave the enemy as is.
pub fn enter_phase(enemy: &mut EnemyState, target: &str, battle_time: f64) -> Option<ActionEffect> {
    let definition = Arc::clone(&enemy.definition);
    let Some(phase) = definition.phase(target) else {
        tracing::warn!("{} has no phase named {}", enemy.id, target);
        return None;
    };

    enemy.pairs = phase.pairs();
    enemy.phase = Some(target.to_string());
    enemy.phase_entered_ms = battle_time;
    phase.on_enter.clone()
}

/// Bare enemy with `hp` max HP, no shields, armor or behaviour, at (4, 1)
#[cfg(test)]
pub(crate) fn test_enemy(id: &str, hp: f32) -> EnemyState {
    let definition = EnemyDefinition::basic(id, id, hp.max(1.0), EnemyPhase::default());
    let mut enemy = create_enemy_state(Arc::new(definition), id, Position::new(4.0, 1.0), false, 0.0);
    enemy.hp = hp;
    enemy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Action, CoreType, Trigger, TriggerCondition};

    fn two_phase() -> Arc<EnemyDefinition> {
        let shoot = TriggerActionPair::new(
            Trigger::new("always", TriggerCondition::Always),
            Action::new(
                "pellet",
                800.0,
                CoreType::Tactical,
                ActionEffect::Heal { amount: 0.0 },
            ),
            1,
        );
        let calm = EnemyPhase {
            tactical: vec![shoot.clone()],
            transitions: vec![
                PhaseTransition {
                    condition: TransitionCondition::HpBelow { fraction: 0.5 },
                    target: "enraged".into(),
                },
                PhaseTransition {
                    condition: TransitionCondition::ElapsedMs { ms: 10_000.0 },
                    target: "enraged".into(),
                },
            ],
            ..Default::default()
        };
        let enraged = EnemyPhase {
            tactical: vec![shoot.clone(), TriggerActionPair { priority: 5, ..shoot }],
            on_enter: Some(ActionEffect::Heal { amount: 20.0 }),
            ..Default::default()
        };

        let mut definition = EnemyDefinition::basic("warden", "Warden", 100.0, calm);
        definition.initial_phase = "calm".into();
        definition.phases = [("calm".to_string(), definition.phases["default"].clone()), ("enraged".to_string(), enraged)]
            .into_iter()
            .collect();
        definition.max_shields = 25.0;
        Arc::new(definition)
    }

    #[test]
    fn test_create_enemy_at_full_stats() {
        let enemy = create_enemy_state(two_phase(), "w1", Position::new(4.0, 0.0), false, 250.0);
        assert_eq!(enemy.hp, 100.0);
        assert_eq!(enemy.shields, 25.0);
        assert_eq!(enemy.phase.as_deref(), Some("calm"));
        assert_eq!(enemy.phase_entered_ms, 250.0);
        assert_eq!(enemy.pairs.len(), 1);
        assert_eq!(enemy.name(), "Warden");
    }

    #[test]
    fn test_transition_on_hp_and_elapsed() {
        let mut enemy = create_enemy_state(two_phase(), "w1", Position::new(4.0, 0.0), false, 0.0);
        assert_eq!(pending_transition(&enemy, 100.0), None);
        assert_eq!(pending_transition(&enemy, 10_000.0).as_deref(), Some("enraged"));

        enemy.hp = 40.0;
        assert_eq!(pending_transition(&enemy, 100.0).as_deref(), Some("enraged"));
    }

    #[test]
    fn test_enter_phase_replaces_pairs() {
        let mut enemy = create_enemy_state(two_phase(), "w1", Position::new(4.0, 0.0), false, 0.0);
        let on_enter = enter_phase(&mut enemy, "enraged", 1500.0);
        assert_eq!(on_enter, Some(ActionEffect::Heal { amount: 20.0 }));
        assert_eq!(enemy.pairs.len(), 2);
        assert_eq!(enemy.pairs[0].priority, 5);
        assert_eq!(enemy.phase_entered_ms, 1500.0);
        // Enraged has no way out
        assert_eq!(pending_transition(&enemy, 99_999.0), None);
    }

    #[test]
    fn test_unknown_phase_is_ignored() {
        let mut enemy = create_enemy_state(two_phase(), "w1", Position::new(4.0, 0.0), false, 0.0);
        assert_eq!(enter_phase(&mut enemy, "missing", 10.0), None);
        assert_eq!(enemy.phase.as_deref(), Some("calm"));
    }

    #[test]
    fn test_missing_phases_reported() {
        let mut definition = (*two_phase()).clone();
        definition.phases.remove("enraged");
        assert_eq!(definition.missing_phases(), vec!["enraged"]);
    }

    #[test]
    fn test_resistance_factor() {
        let mut enemy = test_enemy("e1", 10.0);
        enemy.resistances[DamageType::Thermal.index()] = 0.25;
        assert_eq!(enemy.resistance_factor(DamageType::Thermal), 0.75);
        assert_eq!(enemy.resistance_factor(DamageType::Kinetic), 1.0);
    }
}
