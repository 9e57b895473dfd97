//! Configuration loading from TOML files

mod constants;
mod families;
mod mutations;

pub use constants::{FleetBoosts, ImplantConstants, LiveConstants, SkillBonuses, StackingConfig};
pub use families::{parse_families, FamilyProfile, FamilyTable};
pub use mutations::{parse_mutations, MutationRange, MutationRanges, MutationTable};

use crate::types::ModuleFamily;
use crate::valuation::{parse_valuation, Valuation};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load live constants from a TOML string
pub fn parse_live(content: &str) -> Result<LiveConstants, ConfigError> {
    let live: LiveConstants = parse_toml(content)?;
    if live.fleet.module_upgrades.iter().any(|m| !m.is_finite() || *m < 0.0) {
        return Err(ConfigError::ValidationError(
            "fleet module upgrades must be finite and non-negative".to_string(),
        ));
    }
    if !live.implant.max_percent.is_finite() || live.implant.max_percent < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "implant max percent {} is invalid",
            live.implant.max_percent
        )));
    }
    Ok(live)
}

/// Every piece of authored data the engine reads
///
/// Loaded once and shared read-only (usually behind an `Arc`) by the
/// analyzer and every runner.
#[derive(Debug, Clone, PartialEq)]
pub struct GameData {
    pub families: FamilyTable,
    pub mutations: MutationTable,
    pub live: LiveConstants,
    pub valuation: Valuation,
}

const FAMILIES_FILE: &str = "families.toml";
const MUTATIONS_FILE: &str = "mutations.toml";
const LIVE_FILE: &str = "live.toml";
const VALUATION_FILE: &str = "valuation.toml";

impl GameData {
    /// Data set compiled into the binary
    pub fn builtin() -> Result<Self, ConfigError> {
        let data = GameData::from_sources(
            include_str!("../../config/families.toml"),
            include_str!("../../config/mutations.toml"),
            include_str!("../../config/live.toml"),
            include_str!("../../config/valuation.toml"),
        )?;
        tracing::info!(source = "builtin", "game data loaded");
        Ok(data)
    }

    /// Load a data set from a directory holding the four TOML files
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let read = |name: &str| fs::read_to_string(dir.join(name));
        let data = GameData::from_sources(
            &read(FAMILIES_FILE)?,
            &read(MUTATIONS_FILE)?,
            &read(LIVE_FILE)?,
            &read(VALUATION_FILE)?,
        )?;
        tracing::info!(source = %dir.display(), "game data loaded");
        Ok(data)
    }

    /// Parse and validate a data set from TOML strings
    pub fn from_sources(
        families: &str,
        mutations: &str,
        live: &str,
        valuation: &str,
    ) -> Result<Self, ConfigError> {
        Ok(GameData {
            families: parse_families(families)?,
            mutations: parse_mutations(mutations)?,
            live: parse_live(live)?,
            valuation: parse_valuation(valuation)?,
        })
    }

    pub fn family(&self, family: ModuleFamily) -> &FamilyProfile {
        self.families.get(family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TierLetter;
    use crate::types::{MutationStrength, StatKind};

    #[test]
    fn test_builtin_data_loads() {
        let data = GameData::builtin().unwrap();
        assert_eq!(data.mutations.len(), 9);

        let ore = data.family(ModuleFamily::Ore);
        assert_eq!(ore.base_stats.get(StatKind::MiningAmount), Some(200.0));
        assert_eq!(ore.base_optimal_range(), Some(18.75));
        assert_eq!(ore.tier_bands.classify(6.3), TierLetter::S);

        let ice = data.family(ModuleFamily::Ice);
        assert_eq!(ice.base_stats.get(StatKind::ActivationTime), Some(200.0));
    }

    #[test]
    fn test_builtin_base_module_lands_in_e() {
        let data = GameData::builtin().unwrap();
        for profile in data.families.iter() {
            let stats = &profile.base_stats;
            let amount = stats.get_or_zero(StatKind::MiningAmount);
            let crit = stats.get_or_zero(StatKind::CriticalSuccessChance)
                * stats.get_or_zero(StatKind::CriticalSuccessBonusYield);
            let time = stats.get_or_zero(StatKind::ActivationTime);
            assert_eq!(
                profile.tier_bands.classify(amount * (1.0 + crit) / time),
                TierLetter::E,
                "{:?}",
                profile.family
            );
        }
    }

    #[test]
    fn test_builtin_residue_ranges_only_on_residue_families() {
        let data = GameData::builtin().unwrap();
        let ore = data
            .mutations
            .get(ModuleFamily::Ore, MutationStrength::Unstable)
            .unwrap();
        assert!(!ore.contains_key(&StatKind::ResidueProbability));

        let modulated = data
            .mutations
            .get(ModuleFamily::Modulated, MutationStrength::Unstable)
            .unwrap();
        assert!(modulated.contains_key(&StatKind::ResidueProbability));
    }

    #[test]
    fn test_negative_implant_domain_rejected() {
        assert!(matches!(
            parse_live("[implant]\nmax_percent = -1.0\n"),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let result = GameData::load_from_dir(Path::new("/nonexistent/roll_core/config"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
