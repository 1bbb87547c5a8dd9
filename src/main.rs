//! Gridlock - headless grid battle simulator
//!
//! Runs one scenario to completion (or the configured time limit) and writes
//! a JSON battle report.
//!
//! Usage: `gridlock [scenario.toml]`

mod report;
mod settings;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gridlock_battle::{BattleScenario, BattleUpdate, ContentLibrary};

use report::BattleReport;
use settings::SimSettings;

fn load_scenario(path: Option<PathBuf>) -> Result<BattleScenario> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read scenario {:?}", path))?;
            BattleScenario::from_toml(&source).with_context(|| format!("Invalid scenario {:?}", path))
        }
        None => {
            info!("No scenario given, using the built-in one");
            BattleScenario::builtin().context("Built-in scenario is invalid")
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let settings = SimSettings::load();
    let mut scenario = load_scenario(std::env::args().nth(1).map(PathBuf::from))?;
    if scenario.seed.is_none() {
        scenario.seed = settings.simulation.seed;
    }

    let library = ContentLibrary::builtin().context("Built-in content is invalid")?;
    let mut engine = scenario.build(&library).context("Failed to set up battle")?;
    let mut report = BattleReport::new(&scenario.name, engine.seed());

    info!("Starting battle '{}'", scenario.name);

    let step = settings.simulation.frame_step_ms;
    let mut last = BattleUpdate::default();
    for _ in 0..settings.simulation.max_ticks() {
        last = engine.tick(step);
        report.record(&last);
        if last.battle_over {
            break;
        }
    }

    if last.battle_over {
        let result = if last.player_won { "Victory" } else { "Defeat" };
        info!("{} at {:.1}s", result, last.battle_time_ms / 1000.0);
    } else {
        warn!(
            "Time limit of {:.0}s reached without a winner",
            settings.simulation.time_limit_ms / 1000.0
        );
    }

    let history = last
        .battle_history
        .clone()
        .unwrap_or_else(|| engine.state().battle_history.clone());
    report.finish(&last, history);

    info!(
        "Dealt {:.0} damage, took {:.0}, {} pair executions",
        report.total_damage_dealt(),
        report.total_damage_taken(),
        report.pair_counts.values().sum::<u32>()
    );

    if settings.report.enabled {
        let path = report.write_to(&settings.report.resolved_directory())?;
        info!("Report written to {:?}", path);
    }

    Ok(())
}
