//! Simulator settings with persistence
//!
//! Settings are read from and saved to `~/.config/gridlock/settings.toml`.
//! A default file is written on first run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All simulator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSettings {
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

impl SimSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gridlock"))
    }

    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, writing defaults");
            let settings = Self::default();
            if let Err(e) = settings.save() {
                warn!("Failed to write default settings: {:#}", e);
            }
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse settings {:?}", path))
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create config directory if it doesn't exist
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// How the battle loop is driven
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Milliseconds passed to each tick
    pub frame_step_ms: f32,
    /// Battle time after which the run is abandoned
    pub time_limit_ms: f64,
    /// Seed applied to scenarios that don't set one
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            frame_step_ms: 16.0,
            time_limit_ms: 180_000.0, // 3 minutes
            seed: None,
        }
    }
}

impl SimulationSettings {
    /// Tick count after which the time limit is reached
    pub fn max_ticks(&self) -> u64 {
        if self.frame_step_ms <= 0.0 {
            return 0;
        }
        (self.time_limit_ms / self.frame_step_ms as f64).ceil() as u64
    }
}

/// Battle report output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Write a JSON report after each battle
    pub enabled: bool,
    /// Report directory; the local data dir when unset
    pub directory: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
        }
    }
}

impl ReportSettings {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gridlock")
                .join("reports")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlock_core::BattleId;

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: SimSettings = toml::from_str(
            r#"
            [simulation]
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(settings.simulation.seed, Some(42));
        assert_eq!(settings.simulation.frame_step_ms, 16.0);
        assert!(settings.report.enabled);
    }

    #[test]
    fn test_max_ticks() {
        let simulation = SimulationSettings {
            frame_step_ms: 16.0,
            time_limit_ms: 1000.0,
            seed: None,
        };
        assert_eq!(simulation.max_ticks(), 63);
        let stalled = SimulationSettings {
            frame_step_ms: 0.0,
            ..simulation
        };
        assert_eq!(stalled.max_ticks(), 0);
    }

    #[test]
    fn test_settings_save_then_load() {
        let dir = std::env::temp_dir().join(format!("gridlock-settings-{}", BattleId::new()));
        let path = dir.join("settings.toml");

        let mut settings = SimSettings::default();
        settings.simulation.seed = Some(7);
        settings.report.directory = Some(PathBuf::from("/tmp/reports"));
        settings.save_to(&path).unwrap();

        let back = SimSettings::load_from(&path).unwrap();
        assert_eq!(back.simulation.seed, Some(7));
        assert_eq!(back.report.directory, settings.report.directory);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unreadable_settings_report_the_path() {
        let path = std::env::temp_dir().join(format!("gridlock-missing-{}.toml", BattleId::new()));
        let err = SimSettings::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read settings file"));
    }
}
