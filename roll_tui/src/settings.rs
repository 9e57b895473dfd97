//! Optional `roll_tui.toml` with startup defaults
//!
//! Every field has a default, so a missing file and an empty file behave the
//! same way.

use roll_core::config::{load_toml, parse_toml, ConfigError};
use roll_core::simulation::SimulationConfig;
use roll_core::{ModuleFamily, MutationStrength, SkillLevels, StatVector};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "roll_tui.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Directory with families/mutations/live/valuation TOML; built-ins when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub skills: SkillLevels,
    #[serde(default)]
    pub simulation: SimulationDefaults,
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
    #[serde(default = "default_roll_path")]
    pub roll_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

fn default_export_path() -> PathBuf {
    PathBuf::from("roll_export.json")
}

fn default_roll_path() -> PathBuf {
    PathBuf::from("roll.toml")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("roll_tui.log")
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: None,
            skills: SkillLevels::default(),
            simulation: SimulationDefaults::default(),
            export_path: default_export_path(),
            roll_path: default_roll_path(),
            log_path: default_log_path(),
        }
    }
}

impl Settings {
    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        load_toml(path)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationDefaults {
    #[serde(default = "default_family")]
    pub family: ModuleFamily,
    #[serde(default = "default_strength")]
    pub strength: MutationStrength,
    /// Strength of the second run in comparison mode
    #[serde(default = "default_compare_strength")]
    pub compare_strength: MutationStrength,
    #[serde(default = "default_sample_size")]
    pub sample_size: u64,
    #[serde(default)]
    pub base_cost: f64,
    #[serde(default)]
    pub mutation_cost: f64,
}

fn default_family() -> ModuleFamily {
    ModuleFamily::Ore
}

fn default_strength() -> MutationStrength {
    MutationStrength::Decayed
}

fn default_compare_strength() -> MutationStrength {
    MutationStrength::Unstable
}

fn default_sample_size() -> u64 {
    1_000_000
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        SimulationDefaults {
            family: default_family(),
            strength: default_strength(),
            compare_strength: default_compare_strength(),
            sample_size: default_sample_size(),
            base_cost: 0.0,
            mutation_cost: 0.0,
        }
    }
}

impl SimulationDefaults {
    pub fn primary_config(&self, skills: &SkillLevels) -> SimulationConfig {
        self.config(self.strength, skills)
    }

    pub fn comparison_config(&self, skills: &SkillLevels) -> SimulationConfig {
        self.config(self.compare_strength, skills)
    }

    fn config(&self, strength: MutationStrength, skills: &SkillLevels) -> SimulationConfig {
        let mut config = SimulationConfig::new(self.family, strength, self.sample_size);
        config.skills = skills.clone();
        config.base_cost = self.base_cost;
        config.mutation_cost = self.mutation_cost;
        config
    }
}

/// Parse a flat `name = value` roll file; unknown stat names are ignored
pub fn parse_roll(content: &str) -> Result<StatVector, ConfigError> {
    let raw: HashMap<String, f64> = parse_toml(content)?;
    Ok(StatVector::from_named(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roll_core::StatKind;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: Settings = parse_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.simulation.sample_size, 1_000_000);
    }

    #[test]
    fn test_partial_settings() {
        let settings: Settings = parse_toml(
            r#"
            data_dir = "custom"

            [skills]
            mining = 5
            ice_harvesting_implant = 3.0

            [simulation]
            family = "ice"
            sample_size = 5000
            base_cost = 1500000.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.data_dir, Some(PathBuf::from("custom")));
        assert_eq!(settings.skills.mining, 5);
        assert_eq!(settings.skills.exhumers, 0);
        assert_eq!(settings.simulation.family, ModuleFamily::Ice);
        assert_eq!(settings.simulation.strength, MutationStrength::Decayed);

        let config = settings.simulation.comparison_config(&settings.skills);
        assert_eq!(config.strength, MutationStrength::Unstable);
        assert_eq!(config.sample_size, 5000);
        assert_eq!(config.skills.mining, 5);
        assert!((config.roll_cost() - 1_500_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_is_default() {
        let settings = Settings::load(Path::new("/nonexistent/roll_tui.toml")).unwrap();
        assert_eq!(settings.export_path, PathBuf::from("roll_export.json"));
    }

    #[test]
    fn test_parse_roll_accepts_both_spellings() {
        let roll = parse_roll(
            r#"
            MiningAmount = 210.0
            activation_time = 44.5
            ShieldBonus = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(roll.get(StatKind::MiningAmount), Some(210.0));
        assert_eq!(roll.get(StatKind::ActivationTime), Some(44.5));
        assert_eq!(roll.len(), 2);
    }
}
