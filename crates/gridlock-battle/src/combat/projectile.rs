//! Projectile spawning, travel and collision
//!
//! Projectiles move along their row only. They are removed when they leave
//! the grid or hit something; they never expire by age.

use serde::{Deserialize, Serialize};

use super::element::DamageType;
use super::Hit;
use crate::enemy::EnemyState;
use gridlock_core::{grid, Direction, Position};

/// Distance travelled per 16 ms frame-equivalent
pub const PROJECTILE_SPEED: f32 = 0.08;
/// Reference frame length the speed is expressed in
pub const REFERENCE_FRAME_MS: f32 = 16.0;
/// Maximum |dx| at which a projectile connects with a target in its row
pub const HIT_RADIUS: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Sequential id, `proj-N`
    pub id: String,
    pub position: Position,
    pub direction: Direction,
    pub damage: f32,
    pub damage_type: DamageType,
    pub status_chance: f32,
}

impl Projectile {
    /// The damage payload this projectile delivers
    pub fn hit(&self) -> Hit {
        Hit {
            damage: self.damage,
            damage_type: self.damage_type,
            status_chance: self.status_chance,
        }
    }

    /// Whether this projectile connects with a target at `target` travelling `toward`
    fn connects(&self, target: Position, toward: Direction) -> bool {
        self.direction == toward
            && (self.position.x - target.x).abs() < HIT_RADIUS
            && self.position.y == target.y
    }
}

/// A projectile that struck an enemy
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyHit {
    /// Index into the enemy list
    pub enemy_index: usize,
    pub projectile: Projectile,
}

/// Outcome of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub player_hits: Vec<Projectile>,
    pub enemy_hits: Vec<EnemyHit>,
    /// Projectiles that hit nothing and stay in flight
    pub remaining: Vec<Projectile>,
}

/// Issues projectile ids and moves/collides projectiles
#[derive(Debug, Clone, Default)]
pub struct ProjectileManager {
    next_id: u64,
}

impl ProjectileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a projectile at a copy of `position`
    pub fn create_projectile(
        &mut self,
        position: Position,
        direction: Direction,
        damage: f32,
        damage_type: DamageType,
        status_chance: f32,
    ) -> Projectile {
        let id = format!("proj-{}", self.next_id);
        self.next_id += 1;
        Projectile {
            id,
            position,
            direction,
            damage,
            damage_type,
            status_chance,
        }
    }

    /// Move every projectile for `delta_ms` and drop those that left the grid
    pub fn update_projectiles(projectiles: &mut Vec<Projectile>, delta_ms: f32) {
        let step = PROJECTILE_SPEED * (delta_ms / REFERENCE_FRAME_MS);
        for projectile in projectiles.iter_mut() {
            projectile.position.x += step * projectile.direction.sign();
        }
        projectiles.retain(|p| p.position.x >= grid::MIN_X && p.position.x <= grid::MAX_X);
    }

    /// Match each projectile against at most one target.
    ///
    /// Left-moving projectiles are tested against the player first; otherwise
    /// living enemies are scanned in order for the first right-moving match.
    pub fn check_collisions(
        projectiles: Vec<Projectile>,
        player_pos: Position,
        enemies: &[EnemyState],
    ) -> CollisionReport {
        let mut report = CollisionReport::default();

        for projectile in projectiles {
            if projectile.connects(player_pos, Direction::Left) {
                report.player_hits.push(projectile);
                continue;
            }

            let target = enemies
                .iter()
                .position(|e| e.is_alive() && projectile.connects(e.position, Direction::Right));

            match target {
                Some(enemy_index) => report.enemy_hits.push(EnemyHit {
                    enemy_index,
                    projectile,
                }),
                None => report.remaining.push(projectile),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::test_enemy;

    fn shot(manager: &mut ProjectileManager, x: f32, y: f32, direction: Direction) -> Projectile {
        manager.create_projectile(Position::new(x, y), direction, 10.0, DamageType::Kinetic, 0.0)
    }

    #[test]
    fn test_sequential_ids() {
        let mut manager = ProjectileManager::new();
        assert_eq!(shot(&mut manager, 0.0, 0.0, Direction::Right).id, "proj-0");
        assert_eq!(shot(&mut manager, 0.0, 0.0, Direction::Right).id, "proj-1");
    }

    #[test]
    fn test_out_of_bounds_removed() {
        let mut manager = ProjectileManager::new();
        let mut projectiles = vec![
            shot(&mut manager, 4.99, 1.0, Direction::Right),
            shot(&mut manager, 2.5, 1.0, Direction::Right),
        ];
        ProjectileManager::update_projectiles(&mut projectiles, 16.0);
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].id, "proj-1");
    }

    #[test]
    fn test_travel_scales_with_delta() {
        let mut manager = ProjectileManager::new();
        let mut slow = vec![shot(&mut manager, 1.0, 0.0, Direction::Right)];
        let mut fast = vec![shot(&mut manager, 1.0, 0.0, Direction::Right)];
        ProjectileManager::update_projectiles(&mut slow, 16.0);
        ProjectileManager::update_projectiles(&mut fast, 32.0);
        let slow_travel = slow[0].position.x - 1.0;
        let fast_travel = fast[0].position.x - 1.0;
        assert!((fast_travel - 2.0 * slow_travel).abs() < 1e-6);

        let mut left = vec![shot(&mut manager, 3.0, 0.0, Direction::Left)];
        ProjectileManager::update_projectiles(&mut left, 16.0);
        assert!(left[0].position.x < 3.0);
    }

    #[test]
    fn test_player_hit_requires_left_and_same_row() {
        let mut manager = ProjectileManager::new();
        let player = Position::new(1.0, 1.0);
        let projectiles = vec![
            shot(&mut manager, 1.3, 1.0, Direction::Left),
            shot(&mut manager, 1.3, 1.0, Direction::Right),
            shot(&mut manager, 1.3, 0.0, Direction::Left),
        ];
        let report = ProjectileManager::check_collisions(projectiles, player, &[]);
        assert_eq!(report.player_hits.len(), 1);
        assert_eq!(report.player_hits[0].id, "proj-0");
        assert_eq!(report.remaining.len(), 2);
    }

    #[test]
    fn test_row_exactness() {
        let mut manager = ProjectileManager::new();
        let mut enemy = test_enemy("e1", 50.0);
        enemy.position = Position::new(4.0, 1.0);
        let projectiles = vec![shot(&mut manager, 4.0, 1.01, Direction::Right)];
        let report = ProjectileManager::check_collisions(projectiles, Position::new(0.0, 0.0), &[enemy]);
        assert!(report.enemy_hits.is_empty());
        assert_eq!(report.remaining.len(), 1);
    }

    #[test]
    fn test_first_enemy_in_order_wins() {
        let mut manager = ProjectileManager::new();
        let mut a = test_enemy("a", 50.0);
        a.position = Position::new(4.0, 1.0);
        let mut b = test_enemy("b", 50.0);
        b.position = Position::new(4.0, 1.0);
        let projectiles = vec![shot(&mut manager, 3.7, 1.0, Direction::Right)];
        let report = ProjectileManager::check_collisions(projectiles, Position::new(0.0, 0.0), &[a, b]);
        assert_eq!(report.enemy_hits.len(), 1);
        assert_eq!(report.enemy_hits[0].enemy_index, 0);
    }

    #[test]
    fn test_dead_enemies_are_passed_through() {
        let mut manager = ProjectileManager::new();
        let mut dead = test_enemy("dead", 0.0);
        dead.position = Position::new(4.0, 0.0);
        let projectiles = vec![shot(&mut manager, 4.0, 0.0, Direction::Right)];
        let report = ProjectileManager::check_collisions(projectiles, Position::new(0.0, 0.0), &[dead]);
        assert!(report.enemy_hits.is_empty());
    }
}
