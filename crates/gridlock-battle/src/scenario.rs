//! Battle scenarios loaded from TOML
//!
//! A scenario names a player loadout and an enemy roster by content id.
//! [`BattleScenario::build`] resolves every id against a [`ContentLibrary`]
//! and hands back a ready [`BattleEngine`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ai::{CoreType, TriggerActionPair};
use crate::content::{ContentLibrary, PairRef};
use crate::enemy::create_enemy_state;
use crate::engine::{BattleEngine, BattleState, EnemyProtocols, PlayerState};
use crate::error::ScenarioError;
use crate::rng::BattleRng;
use gridlock_core::{Customization, Position, Side};

/// Scenario used when the host supplies none
pub const DEFAULT_SCENARIO: &str = r#"
name = "Proving Grounds"

[player]
position = [1.0, 1.0]
movement = [
    { trigger = "projectile_incoming", action = "dodge", priority = 3 },
    { trigger = "opponent_not_in_row", action = "move_toward_row", priority = 1 },
]
tactical = [
    { trigger = "self_hp_low", action = "patch", priority = 5 },
    { trigger = "opponent_weak", action = "siphon", priority = 4 },
    { trigger = "opponent_in_row", action = "ember_triple", priority = 3 },
    { trigger = "always", action = "frost_bomb", priority = 2 },
    { trigger = "opponent_in_row", action = "pulse_shot", priority = 1 },
]

[[enemies]]
definition = "sentinel"
position = [4.0, 1.0]

[[enemies]]
definition = "drone"
position = [5.0, 0.0]
pawn = true

[[enemies]]
definition = "drone"
position = [5.0, 2.0]
pawn = true
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    #[serde(default = "default_player_position")]
    pub position: [f32; 2],
    #[serde(default = "default_player_hp")]
    pub hp: f32,
    #[serde(default = "default_player_hp")]
    pub max_hp: f32,
    #[serde(default)]
    pub shields: f32,
    #[serde(default)]
    pub armor: f32,
    #[serde(default)]
    pub movement: Vec<PairRef>,
    #[serde(default)]
    pub tactical: Vec<PairRef>,
    #[serde(default)]
    pub customization: Option<Customization>,
}

fn default_player_position() -> [f32; 2] {
    [1.0, 1.0]
}

fn default_player_hp() -> f32 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySetup {
    /// Defaults to `<definition>-<index>`
    #[serde(default)]
    pub id: Option<String>,
    pub definition: String,
    pub position: [f32; 2],
    #[serde(default)]
    pub pawn: bool,
    /// Replaces the definition's phase behaviour when non-empty
    #[serde(default)]
    pub protocol: Vec<PairRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleScenario {
    #[serde(default)]
    pub name: String,
    /// Fixed RNG seed; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    pub player: PlayerSetup,
    pub enemies: Vec<EnemySetup>,
    /// Behaviour shared by every enemy without its own protocol
    #[serde(default)]
    pub enemy_protocol: Vec<PairRef>,
    #[serde(default)]
    pub enemy_customization: Option<Customization>,
}

impl BattleScenario {
    pub fn from_toml(source: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(source)?)
    }

    pub fn builtin() -> Result<Self, ScenarioError> {
        Self::from_toml(DEFAULT_SCENARIO)
    }

    /// Resolve every id and spawn the battle
    pub fn build(&self, library: &ContentLibrary) -> Result<BattleEngine, ScenarioError> {
        if self.enemies.is_empty() {
            return Err(ScenarioError::NoEnemies);
        }

        let player = PlayerState {
            position: place(Side::Player, self.player.position, "player")?,
            hp: self.player.hp,
            max_hp: self.player.max_hp,
            shields: self.player.shields,
            armor: self.player.armor,
        };
        let player_movement = resolve_lane(library, &self.player.movement, CoreType::Movement)?;
        let player_tactical = resolve_lane(library, &self.player.tactical, CoreType::Tactical)?;

        let mut seen = HashSet::new();
        let mut enemies = Vec::with_capacity(self.enemies.len());
        let mut overrides = Vec::with_capacity(self.enemies.len());
        for (index, setup) in self.enemies.iter().enumerate() {
            let id = setup
                .id
                .clone()
                .unwrap_or_else(|| format!("{}-{}", setup.definition, index));
            if !seen.insert(id.clone()) {
                return Err(ScenarioError::DuplicateEnemyId(id));
            }

            let definition = library.enemy(&setup.definition)?;
            let position = place(Side::Enemy, setup.position, &id)?;
            enemies.push(create_enemy_state(definition, id, position, setup.pawn, 0.0));
            overrides.push(library.resolve_pairs(&setup.protocol)?);
        }

        let protocols = if overrides.iter().any(|pairs| !pairs.is_empty()) {
            // Enemies without an override fall back to the shared list
            let shared = library.resolve_pairs(&self.enemy_protocol)?;
            EnemyProtocols::PerEnemy(
                overrides
                    .into_iter()
                    .map(|pairs| if pairs.is_empty() { shared.clone() } else { pairs })
                    .collect(),
            )
        } else {
            EnemyProtocols::Shared(library.resolve_pairs(&self.enemy_protocol)?)
        };

        let rng = match self.seed {
            Some(seed) => BattleRng::from_seed(seed),
            None => BattleRng::from_entropy(),
        };

        tracing::info!(
            "Scenario '{}' ready: {} enemies, seed {:?}",
            self.name,
            enemies.len(),
            self.seed
        );

        Ok(BattleEngine::new(
            BattleState::new(player, enemies),
            player_movement,
            player_tactical,
            protocols,
            self.player.customization.clone(),
            self.enemy_customization.clone(),
        )
        .with_rng(rng))
    }
}

fn place(side: Side, [x, y]: [f32; 2], who: &str) -> Result<Position, ScenarioError> {
    side.validate(Position::new(x, y)).map_err(|source| ScenarioError::Grid {
        who: who.to_string(),
        source,
    })
}

/// Resolve refs and check every action belongs to `lane`
fn resolve_lane(
    library: &ContentLibrary,
    refs: &[PairRef],
    lane: CoreType,
) -> Result<Vec<TriggerActionPair>, ScenarioError> {
    let pairs = library.resolve_pairs(refs)?;
    if let Some(pair) = pairs.iter().find(|p| p.action.core_type != lane) {
        return Err(ScenarioError::LaneMismatch {
            action: pair.action.id.clone(),
            expected: lane,
            found: pair.action.core_type,
        });
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;
    use gridlock_core::GridError;

    fn scenario(extra: &str) -> BattleScenario {
        let source = format!(
            r#"
            seed = 11
            player = {{ tactical = [{{ trigger = "always", action = "pulse_shot" }}] }}
            {}
            "#,
            extra
        );
        BattleScenario::from_toml(&source).unwrap()
    }

    #[test]
    fn test_default_scenario_builds() {
        let library = ContentLibrary::builtin().unwrap();
        let engine = BattleScenario::builtin().unwrap().build(&library).unwrap();
        let state = engine.state();
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.enemies[0].id, "sentinel-0");
        assert!(state.enemies[1].is_pawn);
        assert_eq!(state.player.position, Position::new(1.0, 1.0));
        assert_eq!(engine.seed(), None);
    }

    #[test]
    fn test_seeded_battles_repeat() {
        let library = ContentLibrary::builtin().unwrap();
        let mut scenario = BattleScenario::builtin().unwrap();
        scenario.seed = Some(99);

        let run = || {
            let mut engine = scenario.build(&library).unwrap();
            let mut last = None;
            for _ in 0..600 {
                let update = engine.tick(16.0);
                let over = update.battle_over;
                last = Some(update);
                if over {
                    break;
                }
            }
            last.unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_enemy_override_and_shared_fallback() {
        let library = ContentLibrary::builtin().unwrap();
        let scenario = scenario(
            r#"
            enemy_protocol = [{ trigger = "always", action = "viral_wave" }]
            [[enemies]]
            definition = "drone"
            position = [4.0, 0.0]
            protocol = [{ trigger = "always", action = "blade", priority = 2 }]
            [[enemies]]
            definition = "drone"
            position = [4.0, 2.0]
            "#,
        );
        let engine = scenario.build(&library).unwrap();
        let enemies = &engine.state().enemies;
        assert_eq!(enemies[0].pairs[0].action.id, "blade");
        assert_eq!(enemies[1].pairs[0].action.id, "viral_wave");
        assert_eq!(engine.seed(), Some(11));
    }

    #[test]
    fn test_build_errors() {
        let library = ContentLibrary::builtin().unwrap();

        let empty = scenario("enemies = []");
        assert!(matches!(empty.build(&library), Err(ScenarioError::NoEnemies)));

        let unknown = scenario("[[enemies]]\ndefinition = \"dragon\"\nposition = [4.0, 1.0]");
        assert!(matches!(
            unknown.build(&library),
            Err(ScenarioError::Content(ContentError::UnknownEnemy(_)))
        ));

        let wrong_half = scenario("[[enemies]]\ndefinition = \"drone\"\nposition = [1.0, 1.0]");
        assert!(matches!(
            wrong_half.build(&library),
            Err(ScenarioError::Grid { source: GridError::WrongHalf { .. }, .. })
        ));

        let duplicate = scenario(
            "[[enemies]]\nid = \"a\"\ndefinition = \"drone\"\nposition = [4.0, 1.0]\n\
             [[enemies]]\nid = \"a\"\ndefinition = \"drone\"\nposition = [5.0, 1.0]",
        );
        assert!(matches!(duplicate.build(&library), Err(ScenarioError::DuplicateEnemyId(id)) if id == "a"));
    }

    #[test]
    fn test_lane_mismatch_rejected() {
        let library = ContentLibrary::builtin().unwrap();
        let mut scenario = scenario("[[enemies]]\ndefinition = \"drone\"\nposition = [4.0, 1.0]");
        scenario.player.movement.push(PairRef::new("always", "pulse_shot", 1));
        assert!(matches!(
            scenario.build(&library),
            Err(ScenarioError::LaneMismatch { expected: CoreType::Movement, .. })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(BattleScenario::from_toml("player = 3"), Err(ScenarioError::Parse(_))));
    }
}
