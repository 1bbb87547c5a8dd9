//! Standard content shipped with the simulator

use super::{ContentLibrary, PairRef};
use crate::ai::{Action, ActionEffect, AttackSpec, CoreType, MoveIntent, Trigger, TriggerCondition};
use crate::combat::DamageType;
use crate::enemy::{EnemyDefinition, EnemyPhase, PhaseTransition, TransitionCondition};
use crate::error::ContentError;

fn triggers() -> Vec<Trigger> {
    use TriggerCondition::*;
    vec![
        Trigger::new("always", Always),
        Trigger::new("opponent_in_row", OpponentInRow),
        Trigger::new("opponent_not_in_row", OpponentNotInRow),
        Trigger::new("opponent_adjacent", OpponentWithin { range: 1.0 }),
        Trigger::new("opponent_mid_range", OpponentWithin { range: 3.0 }),
        Trigger::new("opponent_weak", OpponentHpBelow { fraction: 0.3 }),
        Trigger::new("outnumbered", OpponentsAtLeast { count: 2 }),
        Trigger::new("self_hp_low", SelfHpBelow { fraction: 0.3 }),
        Trigger::new("self_hp_high", SelfHpAbove { fraction: 0.7 }),
        Trigger::new("shields_down", ShieldsDepleted),
        Trigger::new("projectile_incoming", ProjectileIncoming),
        Trigger::new("took_damage", TookDamage),
        Trigger::new("after_10s", TimeElapsed { ms: 10_000.0 }),
    ]
}

fn movement(id: &str, cooldown_ms: f32, intent: MoveIntent) -> Action {
    Action::new(id, cooldown_ms, CoreType::Movement, ActionEffect::Move { intent })
}

fn tactical(id: &str, cooldown_ms: f32, effect: ActionEffect) -> Action {
    Action::new(id, cooldown_ms, CoreType::Tactical, effect)
}

fn attack(damage: f32, damage_type: DamageType) -> AttackSpec {
    AttackSpec::new(damage, damage_type)
}

fn actions() -> Vec<Action> {
    use DamageType::*;
    vec![
        movement("move_toward_row", 400.0, MoveIntent::TowardOpponentRow),
        movement("move_away_row", 400.0, MoveIntent::AwayFromOpponentRow),
        movement("dodge", 300.0, MoveIntent::DodgeIncoming),
        movement("advance", 800.0, MoveIntent::Advance),
        movement("retreat", 800.0, MoveIntent::Retreat),
        movement("row_up", 500.0, MoveIntent::RowUp),
        movement("row_down", 500.0, MoveIntent::RowDown),
        tactical("pulse_shot", 600.0, ActionEffect::Shoot { attack: attack(10.0, Kinetic) }),
        tactical("burst", 1500.0, ActionEffect::RapidFire { attack: attack(6.0, Kinetic), count: 3 }),
        tactical("ember_triple", 1800.0, ActionEffect::TripleShot { attack: attack(8.0, Thermal) }),
        tactical("viral_wave", 2500.0, ActionEffect::Wave { attack: attack(6.0, Viral) }),
        tactical("spark_spread", 1400.0, ActionEffect::Spread { attack: attack(8.0, Energy) }),
        tactical("frost_bomb", 3000.0, ActionEffect::Bomb { attack: attack(20.0, Glacial) }),
        tactical("shock_cluster", 3500.0, ActionEffect::Cluster { attack: attack(14.0, Concussion) }),
        tactical("acid_field", 4000.0, ActionEffect::Field { attack: attack(12.0, Corrosive) }),
        tactical("blade", 900.0, ActionEffect::Melee { attack: attack(18.0, Kinetic), range: 1.0 }),
        tactical("sweep", 2000.0, ActionEffect::WideMelee { attack: attack(14.0, Thermal), range: 1.0 }),
        tactical("dash_strike", 4000.0, ActionEffect::DashAttack { attack: attack(22.0, Kinetic) }),
        tactical("fallback_shot", 2500.0, ActionEffect::RetreatShot { attack: attack(10.0, Energy) }),
        tactical("siphon", 3000.0, ActionEffect::Drain { attack: attack(12.0, Viral), heal_ratio: 0.5 }),
        tactical("patch", 5000.0, ActionEffect::Heal { amount: 15.0 }),
        tactical("regen", 8000.0, ActionEffect::HealOverTime { amount_per_tick: 4.0, duration_ms: 3000.0 }),
        tactical("barrier", 6000.0, ActionEffect::Barrier { amount: 30.0 }),
        tactical("overshield", 6000.0, ActionEffect::Shield { amount: 20.0 }),
        tactical("counter", 5000.0, ActionEffect::Counter { duration_ms: 1500.0 }),
        tactical("phase_out", 8000.0, ActionEffect::Invincible { duration_ms: 1000.0 }),
        tactical("overclock", 8000.0, ActionEffect::Buff { multiplier: 1.5, duration_ms: 3000.0 }),
    ]
}

/// Phase built from id references, split into lanes by each action's core type
fn phase(library: &ContentLibrary, refs: &[PairRef]) -> Result<EnemyPhase, ContentError> {
    let (movement, tactical): (Vec<_>, Vec<_>) = library
        .resolve_pairs(refs)?
        .into_iter()
        .partition(|p| p.action.core_type == CoreType::Movement);
    Ok(EnemyPhase {
        movement,
        tactical,
        ..Default::default()
    })
}

fn drone(library: &ContentLibrary) -> Result<EnemyDefinition, ContentError> {
    let patrol = phase(
        library,
        &[
            PairRef::new("opponent_not_in_row", "move_toward_row", 1),
            PairRef::new("opponent_in_row", "pulse_shot", 1),
        ],
    )?;
    Ok(EnemyDefinition::basic("drone", "Drone", 40.0, patrol))
}

fn skitter(library: &ContentLibrary) -> Result<EnemyDefinition, ContentError> {
    let hunt = phase(
        library,
        &[
            PairRef::new("projectile_incoming", "dodge", 3),
            PairRef::new("opponent_not_in_row", "move_toward_row", 2),
            PairRef::new("opponent_in_row", "dash_strike", 2),
            PairRef::new("opponent_adjacent", "blade", 1),
            PairRef::new("opponent_in_row", "fallback_shot", 0),
        ],
    )?;
    let mut definition = EnemyDefinition::basic("skitter", "Skitter", 30.0, hunt);
    definition.dodge_chance = 0.25;
    Ok(definition)
}

fn sentinel(library: &ContentLibrary) -> Result<EnemyDefinition, ContentError> {
    let mut guard = phase(
        library,
        &[
            PairRef::new("projectile_incoming", "dodge", 3),
            PairRef::new("opponent_in_row", "ember_triple", 2),
            PairRef::new("always", "pulse_shot", 1),
        ],
    )?;
    guard.transitions.push(PhaseTransition {
        condition: TransitionCondition::ShieldsDepleted,
        target: "overdrive".into(),
    });

    let mut overdrive = phase(
        library,
        &[
            PairRef::new("opponent_not_in_row", "move_toward_row", 2),
            PairRef::new("always", "burst", 2),
            PairRef::new("always", "spark_spread", 1),
        ],
    )?;
    overdrive.on_enter = Some(ActionEffect::Wave {
        attack: attack(8.0, DamageType::Energy),
    });

    let mut definition = EnemyDefinition::basic("sentinel", "Sentinel", 120.0, guard);
    definition.initial_phase = "guard".into();
    definition.phases = [
        ("guard".to_string(), definition.phases.remove("default").unwrap_or_default()),
        ("overdrive".to_string(), overdrive),
    ]
    .into_iter()
    .collect();
    definition.max_shields = 40.0;
    definition.max_armor = 50.0;
    definition.shield_regen_per_sec = 5.0;
    definition.resistances[DamageType::Energy.index()] = 0.2;
    Ok(definition)
}

fn warden(library: &ContentLibrary) -> Result<EnemyDefinition, ContentError> {
    let mut siege = phase(
        library,
        &[
            PairRef::new("opponent_mid_range", "frost_bomb", 3),
            PairRef::new("always", "acid_field", 2),
            PairRef::new("always", "pulse_shot", 1),
        ],
    )?;
    siege.transitions = vec![
        PhaseTransition {
            condition: TransitionCondition::HpBelow { fraction: 0.5 },
            target: "berserk".into(),
        },
        PhaseTransition {
            condition: TransitionCondition::ElapsedMs { ms: 20_000.0 },
            target: "berserk".into(),
        },
    ];

    let mut berserk = phase(
        library,
        &[
            PairRef::new("self_hp_low", "regen", 4),
            PairRef::new("opponent_adjacent", "sweep", 3),
            PairRef::new("always", "shock_cluster", 2),
            PairRef::new("always", "viral_wave", 1),
            PairRef::new("always", "advance", 1),
        ],
    )?;
    berserk.on_enter = Some(ActionEffect::Heal { amount: 25.0 });

    let mut definition = EnemyDefinition::basic("warden", "Warden", 200.0, siege);
    definition.initial_phase = "siege".into();
    definition.phases = [
        ("siege".to_string(), definition.phases.remove("default").unwrap_or_default()),
        ("berserk".to_string(), berserk),
    ]
    .into_iter()
    .collect();
    definition.max_armor = 150.0;
    definition.resistances[DamageType::Corrosive.index()] = 0.25;
    definition.resistances[DamageType::Kinetic.index()] = 0.1;
    Ok(definition)
}

pub(super) fn populate(library: &mut ContentLibrary) -> Result<(), ContentError> {
    for trigger in triggers() {
        library.register_trigger(trigger);
    }
    for action in actions() {
        library.register_action(action);
    }

    let definitions = [drone(library)?, skitter(library)?, sentinel(library)?, warden(library)?];
    for definition in definitions {
        library.register_enemy(definition)?;
    }
    Ok(())
}
