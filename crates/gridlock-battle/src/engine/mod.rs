//! Battle engine: the tick orchestrator
//!
//! [`BattleEngine`] owns the [`BattleState`] and advances it one host frame
//! at a time. Every tick runs the same fixed sequence:
//!
//! 1. reset per-tick flags and advance the clock
//! 2. decay AI cooldowns
//! 3. record a history snapshot (every 500 ms)
//! 4. burn and heal-over-time ticks, once per 500 ms mark crossed
//! 5. expire statuses and heal-over-time, regenerate enemy shields
//! 6. move projectiles
//! 7. resolve collisions
//! 8. apply damage and status procs from hits
//! 9. player defeat check
//! 10. victory check
//! 11. player AI, movement before tactical
//! 12. enemy AI per living enemy, phase transitions first

mod apply;
pub mod state;
pub mod update;

use std::mem;

use crate::ai::{
    sort_by_priority, Action, Actor, AiExecutor, BattleContext, CoreType, EntityKey, ExecutedAction,
    TriggerActionPair,
};
use crate::combat::{DamageCalculator, DamageType, Hit, ProjectileManager, StatusEffectManager};
use crate::enemy;
use crate::rng::BattleRng;
use gridlock_core::{BattleClock, Cadence, Customization};

pub use state::{BattleSnapshot, BattleState, HealOverTime, PlayerState, PLAYER_HEAL_CAP};
pub use update::{BattleOutcome, BattleUpdate, DamageDealt, PairExecution};

/// Interval between history snapshots
pub const HISTORY_INTERVAL_MS: f64 = 500.0;
/// Interval between burn and heal-over-time ticks
pub const EFFECT_TICK_INTERVAL_MS: f64 = 500.0;

/// Behaviour handed to the enemies at construction
#[derive(Debug, Clone)]
pub enum EnemyProtocols {
    /// One list used by every enemy
    Shared(Vec<TriggerActionPair>),
    /// One list per enemy index; enemies past the end use the last list
    PerEnemy(Vec<Vec<TriggerActionPair>>),
}

impl Default for EnemyProtocols {
    fn default() -> Self {
        Self::Shared(Vec::new())
    }
}

impl EnemyProtocols {
    pub fn for_enemy(&self, index: usize) -> &[TriggerActionPair] {
        match self {
            Self::Shared(pairs) => pairs,
            Self::PerEnemy(lists) => lists
                .get(index)
                .or_else(|| lists.last())
                .map(Vec::as_slice)
                .unwrap_or_default(),
        }
    }
}

pub struct BattleEngine {
    state: BattleState,
    player_movement: Vec<TriggerActionPair>,
    player_tactical: Vec<TriggerActionPair>,
    executor: AiExecutor,
    projectiles: ProjectileManager,
    rng: BattleRng,
    clock: BattleClock,
    history_cadence: Cadence,
    effect_cadence: Cadence,
    outcome: BattleOutcome,
    final_update: Option<BattleUpdate>,
    damage_dealt: Vec<DamageDealt>,
    pairs_executed: Vec<PairExecution>,
    player_customization: Option<Customization>,
    enemy_customization: Option<Customization>,
}

impl BattleEngine {
    pub fn new(
        mut state: BattleState,
        mut player_movement: Vec<TriggerActionPair>,
        mut player_tactical: Vec<TriggerActionPair>,
        enemy_protocols: EnemyProtocols,
        player_customization: Option<Customization>,
        enemy_customization: Option<Customization>,
    ) -> Self {
        sort_by_priority(&mut player_movement);
        sort_by_priority(&mut player_tactical);

        for (index, enemy) in state.enemies.iter_mut().enumerate() {
            let pairs = enemy_protocols.for_enemy(index);
            if !pairs.is_empty() {
                enemy.pairs = pairs.to_vec();
                sort_by_priority(&mut enemy.pairs);
            }
        }

        let clock = BattleClock {
            elapsed_ms: state.battle_time_ms,
            ..Default::default()
        };

        Self {
            state,
            player_movement,
            player_tactical,
            executor: AiExecutor::new(),
            projectiles: ProjectileManager::new(),
            rng: BattleRng::from_entropy(),
            clock,
            history_cadence: Cadence::new(HISTORY_INTERVAL_MS),
            effect_cadence: Cadence::new(EFFECT_TICK_INTERVAL_MS),
            outcome: BattleOutcome::Fighting,
            final_update: None,
            damage_dealt: Vec::new(),
            pairs_executed: Vec::new(),
            player_customization,
            enemy_customization,
        }
    }

    /// Replace the random source, e.g. with a seeded one
    pub fn with_rng(mut self, rng: BattleRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Deep copy of the current state
    pub fn snapshot(&self) -> BattleState {
        self.state.clone()
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.outcome
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed
    }

    pub fn clock(&self) -> &BattleClock {
        &self.clock
    }

    pub fn player_customization(&self) -> Option<&Customization> {
        self.player_customization.as_ref()
    }

    pub fn enemy_customization(&self) -> Option<&Customization> {
        self.enemy_customization.as_ref()
    }

    /// Advance the battle by `delta_ms` of host time
    pub fn tick(&mut self, delta_ms: f32) -> BattleUpdate {
        if let Some(update) = &self.final_update {
            return update.clone();
        }

        self.state.just_took_damage = false;
        for enemy in &mut self.state.enemies {
            enemy.took_damage = false;
        }
        self.clock.advance(delta_ms);
        self.state.battle_time_ms = self.clock.elapsed_ms;
        let now = self.clock.elapsed_ms;
        let delta = self.clock.delta_ms;

        self.executor.update_cooldowns(delta);

        if self.history_cadence.poll(now) > 0 {
            let snapshot = self.state.snapshot();
            self.state.battle_history.push(snapshot);
        }

        for _ in 0..self.effect_cadence.poll(now) {
            self.apply_periodic_effects();
        }

        self.expire_effects(delta);

        ProjectileManager::update_projectiles(&mut self.state.projectiles, delta);

        let in_flight = mem::take(&mut self.state.projectiles);
        let report = ProjectileManager::check_collisions(in_flight, self.state.player.position, &self.state.enemies);
        self.state.projectiles = report.remaining;

        for projectile in &report.player_hits {
            self.damage_player(projectile.hit());
        }
        for hit in &report.enemy_hits {
            self.damage_enemy(hit.enemy_index, hit.projectile.hit());
        }

        if let Some(update) = self.check_outcome() {
            return update;
        }

        self.run_player_ai();
        for index in 0..self.state.enemies.len() {
            if self.state.enemies[index].is_alive() {
                self.run_enemy_ai(index);
            }
        }

        self.build_update()
    }

    fn apply_periodic_effects(&mut self) {
        for enemy in self.state.enemies.iter_mut().filter(|e| e.is_alive()) {
            let dealt = DamageCalculator::apply_burn_damage(enemy);
            if dealt > 0.0 {
                tracing::trace!("Burn dealt {:.1} to {}", dealt, enemy.id);
                self.damage_dealt.push(DamageDealt {
                    damage_type: DamageType::Thermal,
                    amount: dealt,
                    to_player: false,
                });
                if !enemy.is_alive() {
                    tracing::info!("{} burned out", enemy.id);
                }
            }
        }

        let heals: Vec<HealOverTime> = self.state.heal_over_time.clone();
        for heal in heals {
            let target = heal.enemy.map_or(Actor::Player, Actor::Enemy);
            self.heal(target, heal.amount_per_tick);
        }
    }

    fn expire_effects(&mut self, delta_ms: f32) {
        let now = self.state.battle_time_ms;
        for enemy in &mut self.state.enemies {
            StatusEffectManager::cleanup_expired_effects(enemy, now);
            if enemy.is_alive() && !enemy.shield_regen_disabled && enemy.shield_regen_per_sec > 0.0 {
                let regen = enemy.shield_regen_per_sec * delta_ms / 1000.0;
                enemy.shields = (enemy.shields + regen).min(enemy.max_shields);
            }
        }
        self.state.heal_over_time.retain(|h| h.end_time > now);
    }

    /// Layered damage against the player. Returns shield plus HP damage.
    fn damage_player(&mut self, hit: Hit) -> f32 {
        let player = &mut self.state.player;
        let modified = DamageCalculator::calculate_damage(hit.damage, hit.damage_type, player.shields, player.armor);
        let breakdown = DamageCalculator::apply_damage_to_player(player, modified.hp_damage);
        self.state.just_took_damage = true;

        tracing::debug!(
            "Player took {:.1} {} ({:.1} shield, {:.1} hp)",
            breakdown.total(),
            hit.damage_type.name(),
            breakdown.shield_damage,
            breakdown.hp_damage
        );
        self.damage_dealt.push(DamageDealt {
            damage_type: hit.damage_type,
            amount: breakdown.total(),
            to_player: true,
        });
        breakdown.total()
    }

    /// Full enemy damage pipeline: type multiplier, resistance and viral
    /// amplification, dodge, layered absorption, then a status roll.
    fn damage_enemy(&mut self, index: usize, hit: Hit) -> f32 {
        let viral = StatusEffectManager::get_viral_damage_multiplier(&self.state.enemies);
        let now = self.state.battle_time_ms;
        let can_apply_status = !self.state.status_immune;

        let Some(enemy) = self.state.enemies.get_mut(index) else {
            return 0.0;
        };
        if !enemy.is_alive() {
            return 0.0;
        }

        let modified = DamageCalculator::calculate_damage(hit.damage, hit.damage_type, enemy.shields, enemy.armor);
        let amount = modified.hp_damage * enemy.resistance_factor(hit.damage_type) * viral;

        if self.rng.chance(enemy.dodge_chance) {
            tracing::debug!("{} dodged {:.1} {}", enemy.id, amount, hit.damage_type.name());
            return 0.0;
        }

        let breakdown = DamageCalculator::apply_damage_to_enemy(enemy, amount);
        enemy.took_damage = true;
        StatusEffectManager::try_apply_status(enemy, &hit, now, can_apply_status, &mut self.rng);

        tracing::debug!(
            "{} took {:.1} {} ({:.1} shield, {:.1} hp)",
            enemy.id,
            breakdown.total(),
            hit.damage_type.name(),
            breakdown.shield_damage,
            breakdown.hp_damage
        );
        if !enemy.is_alive() {
            tracing::info!("{} destroyed", enemy.id);
        }

        self.damage_dealt.push(DamageDealt {
            damage_type: hit.damage_type,
            amount: breakdown.total(),
            to_player: false,
        });
        breakdown.total()
    }

    fn check_outcome(&mut self) -> Option<BattleUpdate> {
        let outcome = if self.state.player.hp <= 0.0 {
            BattleOutcome::PlayerDefeated
        } else {
            let mut guardians = self.state.enemies.iter().filter(|e| !e.is_pawn).peekable();
            if guardians.peek().is_some() && guardians.all(|e| e.hp <= 0.0) {
                BattleOutcome::AllGuardiansDefeated
            } else {
                return None;
            }
        };

        self.outcome = outcome;
        tracing::info!(
            "Battle over after {:.1}s: {:?}",
            self.clock.elapsed_secs(),
            outcome
        );

        let update = self.build_update();
        self.final_update = Some(update.clone());
        Some(update)
    }

    fn run_player_ai(&mut self) {
        if self.state.player.hp <= 0.0 {
            return;
        }
        let ctx = BattleContext::for_player(&self.state);
        let key = EntityKey::Player;

        let mut executed = self.executor.execute(
            &self.player_movement,
            &ctx,
            CoreType::Movement,
            &key,
            None,
            &mut self.rng,
        );
        if executed.is_none() {
            executed = self.executor.execute(
                &self.player_tactical,
                &ctx,
                CoreType::Tactical,
                &key,
                None,
                &mut self.rng,
            );
        }

        if let Some(executed) = executed {
            self.record_and_apply(Actor::Player, "player".to_string(), executed);
        }
    }

    fn run_enemy_ai(&mut self, index: usize) {
        let now = self.state.battle_time_ms;

        if let Some(target) = enemy::pending_transition(&self.state.enemies[index], now) {
            let on_enter = enemy::enter_phase(&mut self.state.enemies[index], &target, now);
            tracing::info!("{} entered phase {}", self.state.enemies[index].id, target);
            if let Some(effect) = on_enter {
                let ctx = BattleContext::for_enemy(&self.state, index);
                let action = Action::new(format!("{}:enter", target), 0.0, CoreType::Tactical, effect);
                let result = action.execute(&ctx);
                self.apply_action(Actor::Enemy(index), result);
            }
        }

        let ctx = BattleContext::for_enemy(&self.state, index);
        let enemy = &self.state.enemies[index];
        let key = EntityKey::Enemy(enemy.id.clone());

        let mut executed = None;
        if StatusEffectManager::is_movement_corrupted(enemy) {
            tracing::trace!("{} movement corrupted", enemy.id);
        } else {
            executed = self.executor.execute(
                &enemy.pairs,
                &ctx,
                CoreType::Movement,
                &key,
                Some(enemy),
                &mut self.rng,
            );
        }
        if executed.is_none() {
            executed = self.executor.execute(
                &enemy.pairs,
                &ctx,
                CoreType::Tactical,
                &key,
                Some(enemy),
                &mut self.rng,
            );
        }

        if let Some(executed) = executed {
            let label = enemy.id.clone();
            self.record_and_apply(Actor::Enemy(index), label, executed);
        }
    }

    fn record_and_apply(&mut self, actor: Actor, entity: String, executed: ExecutedAction) {
        tracing::debug!(
            "{} ran {} -> {} ({})",
            entity,
            executed.trigger_id,
            executed.action_id,
            executed.result.kind()
        );
        self.pairs_executed.push(PairExecution {
            entity,
            trigger_id: executed.trigger_id,
            action_id: executed.action_id,
            kind: executed.result.kind().to_string(),
        });
        self.apply_action(actor, executed.result);
    }

    fn build_update(&mut self) -> BattleUpdate {
        let state = &self.state;
        let over = self.outcome.is_over();
        BattleUpdate {
            battle_time_ms: state.battle_time_ms,
            player_position: state.player.position,
            player_hp: state.player.hp,
            player_shields: state.player.shields,
            player_armor: state.player.armor,
            enemy_hp: state.enemy_hp(),
            projectiles: state.projectiles.clone(),
            damage_dealt: mem::take(&mut self.damage_dealt),
            pairs_executed: mem::take(&mut self.pairs_executed),
            just_took_damage: state.just_took_damage,
            outcome: self.outcome,
            battle_over: over,
            player_won: self.outcome.player_won(),
            battle_history: over.then(|| state.battle_history.clone()),
        }
    }
}
