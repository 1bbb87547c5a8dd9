//! Turns resolved action results into state changes

use super::{BattleEngine, HealOverTime};
use crate::ai::{ActionResult, Actor};
use crate::combat::{Hit, StatusEffectManager};
use gridlock_core::{grid, Position, Side};

/// Gap between consecutive rapid-fire projectiles
const RAPID_FIRE_SPACING: f32 = 0.3;
/// Reach of the strike that ends a dash
const DASH_MELEE_RANGE: f32 = 1.0;

/// Spawn columns for a rapid-fire volley, each shot 0.3 tiles behind the last.
///
/// When the tail would start off the grid the whole volley slides forward
/// so the last shot sits on the edge.
fn volley_columns(side: Side, origin_x: f32, count: u32) -> Vec<f32> {
    let back = -side.facing().sign() * RAPID_FIRE_SPACING;
    let tail = origin_x + back * count.saturating_sub(1) as f32;
    let shift = tail.clamp(grid::MIN_X, grid::MAX_X) - tail;
    (0..count)
        .map(|i| (origin_x + back * i as f32 + shift).clamp(grid::MIN_X, grid::MAX_X))
        .collect()
}

impl BattleEngine {
    pub(super) fn apply_action(&mut self, actor: Actor, result: ActionResult) {
        match result {
            ActionResult::Shoot { origin, hit } => self.fire(actor, origin, hit),
            ActionResult::RapidFire { origin, hit, count } => {
                for x in volley_columns(actor.side(), origin.x, count) {
                    self.fire(actor, Position::new(x, origin.y), hit);
                }
            }
            ActionResult::TripleShot { origin, hit } => {
                for y in [origin.y - 1.0, origin.y, origin.y + 1.0] {
                    if grid::row_exists(y) {
                        self.fire(actor, Position::new(origin.x, y), hit);
                    }
                }
            }
            ActionResult::Wave { origin, hit } => {
                for y in grid::rows() {
                    self.fire(actor, Position::new(origin.x, y), hit);
                }
            }
            ActionResult::Spread { origin, hit } => {
                for y in [origin.y - 1.0, origin.y + 1.0] {
                    if grid::row_exists(y) {
                        self.fire(actor, Position::new(origin.x, y), hit);
                    }
                }
            }
            ActionResult::Bomb { target, hit } => {
                for victim in self.opponents_where(actor, |p| p == target) {
                    self.strike(victim, hit);
                }
            }
            ActionResult::Cluster { target, hit } => {
                let covered = |p: Position| {
                    let d = (p - target).abs();
                    d.x + d.y <= 1.0
                };
                for victim in self.opponents_where(actor, covered) {
                    self.strike(victim, hit);
                }
            }
            ActionResult::Field { row, hit } => {
                for victim in self.opponents_where(actor, |p| p.y == row) {
                    self.strike(victim, hit);
                }
            }
            ActionResult::Melee { origin, range, hit } => {
                self.melee(actor, origin, range, hit);
            }
            ActionResult::WideMelee { origin, range, hit } => {
                let reach = |p: Position| (p.y - origin.y).abs() <= 1.0 && (p.x - origin.x).abs() <= range;
                for victim in self.opponents_where(actor, reach) {
                    self.strike(victim, hit);
                }
            }
            ActionResult::DashAttack { to, hit } => {
                self.move_actor(actor, to);
                let origin = self.position_of(actor);
                self.melee(actor, origin, DASH_MELEE_RANGE, hit);
            }
            ActionResult::RetreatShot { to, hit } => {
                self.move_actor(actor, to);
                let origin = self.position_of(actor);
                self.fire(actor, origin, hit);
            }
            ActionResult::Drain { target, hit, heal_ratio } => {
                let victim = target.and_then(|t| self.opponents_where(actor, |p| p == t).into_iter().next());
                if let Some(victim) = victim {
                    let dealt = self.strike(victim, hit);
                    self.heal(actor, dealt * heal_ratio);
                }
            }
            ActionResult::Move { to } => {
                self.move_actor(actor, to);
            }
            ActionResult::Heal { amount } => self.heal(actor, amount),
            ActionResult::HealOverTime { amount_per_tick, duration_ms } => {
                let enemy = match actor {
                    Actor::Player => None,
                    Actor::Enemy(index) => Some(index),
                };
                self.state.heal_over_time.push(HealOverTime {
                    enemy,
                    amount_per_tick,
                    end_time: self.state.battle_time_ms + duration_ms,
                });
            }
            ActionResult::Barrier { .. }
            | ActionResult::Shield { .. }
            | ActionResult::Counter { .. }
            | ActionResult::Invincible { .. }
            | ActionResult::Buff { .. } => {
                tracing::debug!("{:?} used {} (no effect)", actor, result.kind());
            }
        }
    }

    /// Spawn a projectile travelling away from `actor`'s half
    fn fire(&mut self, actor: Actor, origin: Position, hit: Hit) {
        let projectile = self.projectiles.create_projectile(
            origin,
            actor.side().facing(),
            hit.damage,
            hit.damage_type,
            hit.status_chance,
        );
        self.state.projectiles.push(projectile);
    }

    /// Strike the closest opponent in `origin`'s row within `range` columns
    fn melee(&mut self, actor: Actor, origin: Position, range: f32, hit: Hit) {
        let victim = self
            .opponents_where(actor, |p| p.y == origin.y && (p.x - origin.x).abs() <= range)
            .into_iter()
            .min_by(|a, b| {
                let da = (self.position_of(*a).x - origin.x).abs();
                let db = (self.position_of(*b).x - origin.x).abs();
                da.total_cmp(&db)
            });
        if let Some(victim) = victim {
            self.strike(victim, hit);
        }
    }

    /// Living combatants opposing `actor` whose tile satisfies `at`
    fn opponents_where(&self, actor: Actor, at: impl Fn(Position) -> bool) -> Vec<Actor> {
        match actor {
            Actor::Player => self
                .state
                .living_enemies()
                .filter(|(_, e)| at(e.position))
                .map(|(i, _)| Actor::Enemy(i))
                .collect(),
            Actor::Enemy(_) => {
                let player = &self.state.player;
                if player.hp > 0.0 && at(player.position) {
                    vec![Actor::Player]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Direct hit, bypassing projectile travel. Returns damage dealt.
    fn strike(&mut self, target: Actor, hit: Hit) -> f32 {
        match target {
            Actor::Player => self.damage_player(hit),
            Actor::Enemy(index) => self.damage_enemy(index, hit),
        }
    }

    fn position_of(&self, actor: Actor) -> Position {
        match actor {
            Actor::Player => self.state.player.position,
            Actor::Enemy(index) => self.state.enemies[index].position,
        }
    }

    pub(super) fn heal(&mut self, target: Actor, amount: f32) {
        match target {
            Actor::Player => {
                self.state.player.heal(amount);
            }
            Actor::Enemy(index) => {
                let enemy = &mut self.state.enemies[index];
                if enemy.is_alive() {
                    enemy.hp = (enemy.hp + amount.max(0.0)).min(enemy.max_hp);
                }
            }
        }
    }

    /// Move `actor` to `to` if the grid allows it. Returns whether it moved.
    ///
    /// The player is clamped into its half. Enemy moves off the grid, into
    /// the player's half or onto another living enemy are refused, and a
    /// lagged enemy may fail to move at all.
    fn move_actor(&mut self, actor: Actor, to: Position) -> bool {
        match actor {
            Actor::Player => {
                self.state.player.position = Side::Player.clamp(to);
                true
            }
            Actor::Enemy(index) => {
                if !Side::Enemy.contains(to) {
                    tracing::trace!("Enemy move to ({}, {}) refused: outside enemy half", to.x, to.y);
                    return false;
                }
                if self.state.enemy_at(to).is_some_and(|other| other != index) {
                    tracing::trace!("Enemy move to ({}, {}) refused: occupied", to.x, to.y);
                    return false;
                }

                let enemy = &mut self.state.enemies[index];
                let penalty = StatusEffectManager::get_lag_movement_penalty(enemy);
                if penalty > 0.0 && self.rng.chance(penalty) {
                    tracing::debug!("{} lagged and failed to move", enemy.id);
                    return false;
                }

                enemy.position = to;
                true
            }
        }
    }
}
