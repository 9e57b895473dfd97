//! Module family tables: base stats and tier bands

use super::ConfigError;
use crate::stats::StatVector;
use crate::tier::TierBands;
use crate::types::{ModuleFamily, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authored data for one family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyProfile {
    pub family: ModuleFamily,
    /// Un-mutated module stats
    pub base_stats: StatVector,
    pub tier_bands: TierBands,
}

impl FamilyProfile {
    /// Base optimal range, the reference for the `+` suffix
    pub fn base_optimal_range(&self) -> Option<f64> {
        self.base_stats.get(StatKind::OptimalRange)
    }
}

/// On-disk shape of a family entry
#[derive(Debug, Deserialize)]
struct RawFamily {
    family: ModuleFamily,
    base_stats: BTreeMap<String, f64>,
    tier_bands: TierBands,
}

#[derive(Debug, Deserialize)]
struct FamiliesFile {
    #[serde(rename = "families")]
    families: Vec<RawFamily>,
}

/// One profile per module family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyTable {
    ore: FamilyProfile,
    modulated: FamilyProfile,
    ice: FamilyProfile,
}

impl FamilyTable {
    pub fn get(&self, family: ModuleFamily) -> &FamilyProfile {
        match family {
            ModuleFamily::Ore => &self.ore,
            ModuleFamily::Modulated => &self.modulated,
            ModuleFamily::Ice => &self.ice,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FamilyProfile> {
        [&self.ore, &self.modulated, &self.ice].into_iter()
    }

    fn from_profiles(profiles: Vec<FamilyProfile>) -> Result<Self, ConfigError> {
        let mut by_family: BTreeMap<ModuleFamily, FamilyProfile> = BTreeMap::new();
        for profile in profiles {
            let family = profile.family;
            if by_family.insert(family, profile).is_some() {
                return Err(ConfigError::ValidationError(format!(
                    "family {family:?} is defined twice"
                )));
            }
        }

        let mut take = |family: ModuleFamily| {
            by_family.remove(&family).ok_or_else(|| {
                ConfigError::ValidationError(format!("family {family:?} is not defined"))
            })
        };

        Ok(FamilyTable {
            ore: take(ModuleFamily::Ore)?,
            modulated: take(ModuleFamily::Modulated)?,
            ice: take(ModuleFamily::Ice)?,
        })
    }
}

fn validate_base_stats(family: ModuleFamily, stats: &StatVector) -> Result<(), ConfigError> {
    for required in [StatKind::MiningAmount, StatKind::ActivationTime] {
        match stats.get(required) {
            Some(value) if value > 0.0 => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "family {family:?} needs a positive {required}"
                )));
            }
        }
    }
    Ok(())
}

/// Load family tables from a TOML string
pub fn parse_families(content: &str) -> Result<FamilyTable, ConfigError> {
    let file: FamiliesFile = super::parse_toml(content)?;

    let profiles = file
        .families
        .into_iter()
        .map(|raw| {
            let base_stats = StatVector::from_named(raw.base_stats);
            validate_base_stats(raw.family, &base_stats)?;
            Ok(FamilyProfile {
                family: raw.family,
                base_stats,
                tier_bands: raw.tier_bands,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    FamilyTable::from_profiles(profiles)
}
