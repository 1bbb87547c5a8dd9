//! Battle reports written as JSON after each run
//!
//! Aggregates per-tick telemetry (damage by type, pair executions) into a
//! single summary alongside the battle history.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gridlock_battle::{BattleOutcome, BattleSnapshot, BattleUpdate};
use gridlock_core::BattleId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    pub battle_id: BattleId,
    pub scenario: String,
    pub seed: Option<u64>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    pub outcome: BattleOutcome,
    /// The time limit ran out before either side won
    #[serde(default)]
    pub timed_out: bool,
    pub battle_time_ms: f64,
    pub ticks: u64,
    /// Damage landed on enemies, by damage type name
    pub damage_dealt: BTreeMap<String, f32>,
    /// Damage landed on the player, by damage type name
    pub damage_taken: BTreeMap<String, f32>,
    /// Executions per `entity: trigger -> action`
    pub pair_counts: BTreeMap<String, u32>,
    pub final_player_hp: f32,
    pub final_enemy_hp: Vec<f32>,
    #[serde(default)]
    pub history: Vec<BattleSnapshot>,
}

impl BattleReport {
    pub fn new(scenario: &str, seed: Option<u64>) -> Self {
        Self {
            battle_id: BattleId::new(),
            scenario: scenario.to_string(),
            seed,
            started_at: Utc::now(),
            finished_at: None,
            outcome: BattleOutcome::Fighting,
            timed_out: false,
            battle_time_ms: 0.0,
            ticks: 0,
            damage_dealt: BTreeMap::new(),
            damage_taken: BTreeMap::new(),
            pair_counts: BTreeMap::new(),
            final_player_hp: 0.0,
            final_enemy_hp: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Fold one tick's telemetry into the totals
    pub fn record(&mut self, update: &BattleUpdate) {
        self.ticks += 1;
        for damage in &update.damage_dealt {
            let totals = if damage.to_player {
                &mut self.damage_taken
            } else {
                &mut self.damage_dealt
            };
            *totals.entry(damage.damage_type.name().to_string()).or_default() += damage.amount;
        }
        for pair in &update.pairs_executed {
            let key = format!("{}: {} -> {}", pair.entity, pair.trigger_id, pair.action_id);
            *self.pair_counts.entry(key).or_default() += 1;
        }
    }

    /// Capture the final state from the last update
    pub fn finish(&mut self, last: &BattleUpdate, history: Vec<BattleSnapshot>) {
        self.finished_at = Some(Utc::now());
        self.outcome = last.outcome;
        self.timed_out = !last.battle_over;
        self.battle_time_ms = last.battle_time_ms;
        self.final_player_hp = last.player_hp;
        self.final_enemy_hp = last.enemy_hp.clone();
        self.history = history;
    }

    pub fn total_damage_dealt(&self) -> f32 {
        self.damage_dealt.values().sum()
    }

    pub fn total_damage_taken(&self) -> f32 {
        self.damage_taken.values().sum()
    }

    /// `battle-<timestamp>-<short id>.json`
    pub fn file_name(&self) -> String {
        let id = self.battle_id.to_string();
        format!(
            "battle-{}-{}.json",
            self.started_at.format("%Y%m%d-%H%M%S"),
            &id[..8]
        )
    }

    /// Write the report into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).context("Failed to create report directory")?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(&path, json).with_context(|| format!("Failed to write report to {:?}", path))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlock_battle::{DamageDealt, DamageType, PairExecution};

    fn update() -> BattleUpdate {
        BattleUpdate {
            damage_dealt: vec![
                DamageDealt { damage_type: DamageType::Thermal, amount: 8.0, to_player: false },
                DamageDealt { damage_type: DamageType::Thermal, amount: 2.0, to_player: false },
                DamageDealt { damage_type: DamageType::Kinetic, amount: 5.0, to_player: true },
            ],
            pairs_executed: vec![PairExecution {
                entity: "player".into(),
                trigger_id: "always".into(),
                action_id: "ember_triple".into(),
                kind: "triple_shot".into(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_record_aggregates_by_type_and_pair() {
        let mut report = BattleReport::new("test", Some(1));
        report.record(&update());
        report.record(&update());

        assert_eq!(report.ticks, 2);
        assert_eq!(report.damage_dealt["Thermal"], 20.0);
        assert_eq!(report.damage_taken["Kinetic"], 10.0);
        assert_eq!(report.pair_counts["player: always -> ember_triple"], 2);
        assert_eq!(report.total_damage_dealt(), 20.0);
    }

    #[test]
    fn test_finish_marks_timeout() {
        let mut report = BattleReport::new("test", None);
        let last = BattleUpdate {
            battle_time_ms: 5000.0,
            player_hp: 70.0,
            enemy_hp: vec![10.0],
            ..Default::default()
        };
        report.finish(&last, Vec::new());
        assert!(report.timed_out);
        assert_eq!(report.outcome, BattleOutcome::Fighting);
        assert_eq!(report.final_enemy_hp, vec![10.0]);
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn test_write_and_load() {
        let dir = std::env::temp_dir().join(format!("gridlock-report-{}", BattleId::new()));
        let mut report = BattleReport::new("test", Some(5));
        report.record(&update());

        let path = report.write_to(&dir).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("battle-"));
        let loaded: BattleReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.battle_id, report.battle_id);
        assert_eq!(loaded.pair_counts, report.pair_counts);

        fs::remove_dir_all(&dir).unwrap();
    }
}
