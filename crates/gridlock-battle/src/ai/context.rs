//! Read-only battle view handed to triggers and actions
//!
//! The same battle is framed differently for each combatant: "self" is the
//! acting entity, "opponents" are the other side, "allies" are the acting
//! entity's teammates.

use crate::engine::BattleState;
use gridlock_core::{grid, Position, Side};

/// The combatant a context, action or heal refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    Player,
    /// Index into `BattleState::enemies`
    Enemy(usize),
}

impl Actor {
    pub fn side(self) -> Side {
        match self {
            Actor::Player => Side::Player,
            Actor::Enemy(_) => Side::Enemy,
        }
    }
}

/// Another combatant as seen from the acting entity
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub position: Position,
    pub hp: f32,
    pub max_hp: f32,
    pub shields: f32,
}

impl Combatant {
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        self.hp / self.max_hp
    }
}

#[derive(Debug, Clone)]
pub struct BattleContext {
    pub actor: Actor,
    pub battle_time_ms: f64,
    pub self_position: Position,
    pub self_hp: f32,
    pub self_max_hp: f32,
    pub self_shields: f32,
    pub self_armor: f32,
    /// Whether the acting entity was damaged earlier this tick
    pub just_took_damage: bool,
    /// Living members of the other side
    pub opponents: Vec<Combatant>,
    /// Living teammates, excluding self
    pub allies: Vec<Combatant>,
    /// Per row: number of projectiles in flight toward this entity's half
    pub threatened_rows: [usize; grid::ROWS as usize],
}

impl BattleContext {
    /// Frame the battle from the player's perspective
    pub fn for_player(state: &BattleState) -> Self {
        let player = &state.player;
        let opponents = state
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| Combatant {
                position: e.position,
                hp: e.hp,
                max_hp: e.max_hp,
                shields: e.shields,
            })
            .collect();

        Self {
            actor: Actor::Player,
            battle_time_ms: state.battle_time_ms,
            self_position: player.position,
            self_hp: player.hp,
            self_max_hp: player.max_hp,
            self_shields: player.shields,
            self_armor: player.armor,
            just_took_damage: state.just_took_damage,
            opponents,
            allies: Vec::new(),
            threatened_rows: threatened_rows(state, Side::Player),
        }
    }

    /// Frame the battle from one enemy's perspective
    pub fn for_enemy(state: &BattleState, index: usize) -> Self {
        let enemy = &state.enemies[index];
        let player = &state.player;
        let opponents = if player.hp > 0.0 {
            vec![Combatant {
                position: player.position,
                hp: player.hp,
                max_hp: player.max_hp,
                shields: player.shields,
            }]
        } else {
            Vec::new()
        };
        let allies = state
            .enemies
            .iter()
            .enumerate()
            .filter(|(i, e)| *i != index && e.is_alive())
            .map(|(_, e)| Combatant {
                position: e.position,
                hp: e.hp,
                max_hp: e.max_hp,
                shields: e.shields,
            })
            .collect();

        Self {
            actor: Actor::Enemy(index),
            battle_time_ms: state.battle_time_ms,
            self_position: enemy.position,
            self_hp: enemy.hp,
            self_max_hp: enemy.max_hp,
            self_shields: enemy.shields,
            self_armor: enemy.armor,
            just_took_damage: enemy.took_damage,
            opponents,
            allies,
            threatened_rows: threatened_rows(state, Side::Enemy),
        }
    }

    pub fn side(&self) -> Side {
        self.actor.side()
    }

    pub fn self_hp_fraction(&self) -> f32 {
        if self.self_max_hp <= 0.0 {
            return 0.0;
        }
        self.self_hp / self.self_max_hp
    }

    /// Closest opponent by grid distance; ties go to the earliest listed
    pub fn nearest_opponent(&self) -> Option<&Combatant> {
        let origin = self.self_position;
        self.opponents.iter().min_by(|a, b| {
            let da = (a.position - origin).abs().element_sum();
            let db = (b.position - origin).abs().element_sum();
            da.total_cmp(&db)
        })
    }

    /// Opponents standing in row `y`
    pub fn opponents_in_row(&self, y: f32) -> impl Iterator<Item = &Combatant> {
        self.opponents.iter().filter(move |c| c.position.y == y)
    }

    /// Projectiles approaching in the acting entity's own row
    pub fn incoming_in_row(&self) -> usize {
        row_index(self.self_position.y)
            .map(|row| self.threatened_rows[row])
            .unwrap_or(0)
    }

    pub fn is_row_threatened(&self, y: f32) -> bool {
        row_index(y).is_some_and(|row| self.threatened_rows[row] > 0)
    }
}

fn row_index(y: f32) -> Option<usize> {
    grid::row_exists(y).then_some(y as usize)
}

/// Count projectiles heading toward `side`'s half, per row
fn threatened_rows(state: &BattleState, side: Side) -> [usize; grid::ROWS as usize] {
    let incoming = side.opponent().facing();
    let mut rows = [0; grid::ROWS as usize];
    for projectile in state.projectiles.iter().filter(|p| p.direction == incoming) {
        if let Some(row) = row_index(projectile.position.y) {
            rows[row] += 1;
        }
    }
    rows
}
