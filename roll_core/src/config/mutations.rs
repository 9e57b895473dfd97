//! Mutation range tables per (family, strength)

use super::ConfigError;
use crate::types::{ModuleFamily, MutationStrength, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percentage window a stat can move by during a roll
///
/// `-15.0` means -15%. Authored data, never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationRange {
    pub min: f64,
    pub max: f64,
}

impl MutationRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::ValidationError(format!(
                "mutation range [{min}, {max}] is invalid"
            )));
        }
        Ok(MutationRange { min, max })
    }

    pub fn contains(&self, percent: f64) -> bool {
        percent >= self.min && percent <= self.max
    }
}

/// All ranges for one (family, strength) pair
pub type MutationRanges = BTreeMap<StatKind, MutationRange>;

#[derive(Debug, Deserialize)]
struct RawMutation {
    family: ModuleFamily,
    strength: MutationStrength,
    ranges: BTreeMap<String, MutationRange>,
}

#[derive(Debug, Deserialize)]
struct MutationsFile {
    mutations: Vec<RawMutation>,
}

/// Mutation ranges for every (family, strength) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationTable {
    tables: BTreeMap<(ModuleFamily, MutationStrength), MutationRanges>,
}

impl MutationTable {
    pub fn get(&self, family: ModuleFamily, strength: MutationStrength) -> Option<&MutationRanges> {
        self.tables.get(&(family, strength))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn insert(
        &mut self,
        family: ModuleFamily,
        strength: MutationStrength,
        ranges: MutationRanges,
    ) -> Result<(), ConfigError> {
        if self.tables.insert((family, strength), ranges).is_some() {
            return Err(ConfigError::ValidationError(format!(
                "mutation table {family:?}/{strength:?} is defined twice"
            )));
        }
        Ok(())
    }
}

/// Load mutation tables from a TOML string
///
/// Every (family, strength) pair must be present; unknown stat names are
/// skipped.
pub fn parse_mutations(content: &str) -> Result<MutationTable, ConfigError> {
    let file: MutationsFile = super::parse_toml(content)?;

    let mut table = MutationTable::default();
    for raw in file.mutations {
        let mut ranges = MutationRanges::new();
        for (name, range) in raw.ranges {
            let Some(stat) = StatKind::from_name(&name) else {
                continue;
            };
            ranges.insert(stat, MutationRange::new(range.min, range.max)?);
        }
        table.insert(raw.family, raw.strength, ranges)?;
    }

    for family in ModuleFamily::all() {
        for strength in MutationStrength::all() {
            if table.get(*family, *strength).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "mutation table {family:?}/{strength:?} is not defined"
                )));
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(family: &str, strength: &str, mining: (f64, f64)) -> String {
        format!(
            "[[mutations]]\nfamily = \"{family}\"\nstrength = \"{strength}\"\n[mutations.ranges]\nMiningAmount = {{ min = {:.1}, max = {:.1} }}\nCPUUsage = {{ min = -5.0, max = 25.0 }}\nWarpSpeed = {{ min = 1.0, max = 2.0 }}\n",
            mining.0, mining.1
        )
    }

    fn full_document(ore_decayed: (f64, f64)) -> String {
        let mut blocks = Vec::new();
        for family in ["ore", "modulated", "ice"] {
            for strength in ["decayed", "gravid", "unstable"] {
                let mining = if family == "ore" && strength == "decayed" {
                    ore_decayed
                } else {
                    (-10.0, 20.0)
                };
                blocks.push(block(family, strength, mining));
            }
        }
        blocks.join("\n")
    }

    #[test]
    fn test_parse_mutations() {
        let table = parse_mutations(&full_document((-5.0, 10.0))).unwrap();
        assert_eq!(table.len(), 9);

        let ranges = table.get(ModuleFamily::Ore, MutationStrength::Decayed).unwrap();
        assert_eq!(ranges.len(), 2);
        let mining = ranges[&StatKind::MiningAmount];
        assert!((mining.min + 5.0).abs() < f64::EPSILON);
        assert!(mining.contains(10.0));
        assert!(!mining.contains(10.5));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            parse_mutations(&full_document((10.0, -5.0))),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_pair_rejected() {
        let doc = block("ore", "decayed", (-5.0, 10.0));
        assert!(parse_mutations(&doc).is_err());
    }
}
