//! Core enumerations shared by every layer of roll_core

use serde::{Deserialize, Serialize};
use std::fmt;

/// Equipment family a mutated module belongs to
///
/// Each family has its own base stats, tier bands and mutation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleFamily {
    /// Baseline strip miner
    Ore,
    /// Strip miner with the residue (yield loss) mechanic
    Modulated,
    /// Ice harvester, uses its own cycle-time chain
    Ice,
}

impl ModuleFamily {
    /// Get all module families
    pub fn all() -> &'static [ModuleFamily] {
        &[ModuleFamily::Ore, ModuleFamily::Modulated, ModuleFamily::Ice]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModuleFamily::Ore => "ORE Strip Miner",
            ModuleFamily::Modulated => "Modulated Strip Miner II",
            ModuleFamily::Ice => "ORE Ice Harvester",
        }
    }

    /// Whether rolls of this family can lose yield to residue
    pub fn has_residue(&self) -> bool {
        matches!(self, ModuleFamily::Modulated)
    }
}

impl fmt::Display for ModuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strength of the mutation applied to a module (weak / medium / strong)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStrength {
    #[serde(alias = "weak")]
    Decayed,
    #[serde(alias = "medium")]
    Gravid,
    #[serde(alias = "strong")]
    Unstable,
}

impl MutationStrength {
    pub fn all() -> &'static [MutationStrength] {
        &[
            MutationStrength::Decayed,
            MutationStrength::Gravid,
            MutationStrength::Unstable,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MutationStrength::Decayed => "Decayed",
            MutationStrength::Gravid => "Gravid",
            MutationStrength::Unstable => "Unstable",
        }
    }
}

impl fmt::Display for MutationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every stat a module can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    // Throughput
    MiningAmount,
    ActivationTime,
    OptimalRange,
    CriticalSuccessChance,
    CriticalSuccessBonusYield,
    // Residue
    ResidueProbability,
    ResidueVolumeMultiplier,
    // Fitting and hull
    ActivationCost,
    CpuUsage,
    PowergridUsage,
    StructureHitpoints,
    Volume,
    Capacity,
    TechLevel,
    MetaLevel,
}

impl StatKind {
    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::MiningAmount,
            StatKind::ActivationTime,
            StatKind::OptimalRange,
            StatKind::CriticalSuccessChance,
            StatKind::CriticalSuccessBonusYield,
            StatKind::ResidueProbability,
            StatKind::ResidueVolumeMultiplier,
            StatKind::ActivationCost,
            StatKind::CpuUsage,
            StatKind::PowergridUsage,
            StatKind::StructureHitpoints,
            StatKind::Volume,
            StatKind::Capacity,
            StatKind::TechLevel,
            StatKind::MetaLevel,
        ]
    }

    /// Snake case key used in data files
    pub fn key(&self) -> &'static str {
        match self {
            StatKind::MiningAmount => "mining_amount",
            StatKind::ActivationTime => "activation_time",
            StatKind::OptimalRange => "optimal_range",
            StatKind::CriticalSuccessChance => "critical_success_chance",
            StatKind::CriticalSuccessBonusYield => "critical_success_bonus_yield",
            StatKind::ResidueProbability => "residue_probability",
            StatKind::ResidueVolumeMultiplier => "residue_volume_multiplier",
            StatKind::ActivationCost => "activation_cost",
            StatKind::CpuUsage => "cpu_usage",
            StatKind::PowergridUsage => "powergrid_usage",
            StatKind::StructureHitpoints => "structure_hitpoints",
            StatKind::Volume => "volume",
            StatKind::Capacity => "capacity",
            StatKind::TechLevel => "tech_level",
            StatKind::MetaLevel => "meta_level",
        }
    }

    /// Spelling used by item tooltips (`MiningAmount`, `CPUUsage`, ...)
    pub fn tooltip_name(&self) -> &'static str {
        match self {
            StatKind::MiningAmount => "MiningAmount",
            StatKind::ActivationTime => "ActivationTime",
            StatKind::OptimalRange => "OptimalRange",
            StatKind::CriticalSuccessChance => "CriticalSuccessChance",
            StatKind::CriticalSuccessBonusYield => "CriticalSuccessBonusYield",
            StatKind::ResidueProbability => "ResidueProbability",
            StatKind::ResidueVolumeMultiplier => "ResidueVolumeMultiplier",
            StatKind::ActivationCost => "ActivationCost",
            StatKind::CpuUsage => "CPUUsage",
            StatKind::PowergridUsage => "PowergridUsage",
            StatKind::StructureHitpoints => "StructureHitpoints",
            StatKind::Volume => "Volume",
            StatKind::Capacity => "Capacity",
            StatKind::TechLevel => "TechLevel",
            StatKind::MetaLevel => "MetaLevel",
        }
    }

    /// Resolve a stat from either spelling, `None` for unknown names
    pub fn from_name(name: &str) -> Option<StatKind> {
        let name = name.trim();
        StatKind::all()
            .iter()
            .copied()
            .find(|s| s.key() == name || s.tooltip_name().eq_ignore_ascii_case(name))
    }

    /// Live quantity category this stat is scaled by, if any
    pub fn quantity(&self) -> Option<Quantity> {
        match self {
            StatKind::MiningAmount => Some(Quantity::Yield),
            StatKind::ActivationTime => Some(Quantity::CycleTime),
            StatKind::OptimalRange => Some(Quantity::Range),
            StatKind::CriticalSuccessChance => Some(Quantity::CritChance),
            StatKind::CriticalSuccessBonusYield => Some(Quantity::CritBonus),
            StatKind::ResidueProbability => Some(Quantity::ResidueProbability),
            StatKind::ResidueVolumeMultiplier => Some(Quantity::ResidueVolume),
            _ => None,
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tooltip_name())
    }
}

/// Physical quantity scaled by live (in-play) multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Yield,
    CycleTime,
    Range,
    CritChance,
    CritBonus,
    ResidueProbability,
    ResidueVolume,
}

impl Quantity {
    pub fn all() -> &'static [Quantity] {
        &[
            Quantity::Yield,
            Quantity::CycleTime,
            Quantity::Range,
            Quantity::CritChance,
            Quantity::CritBonus,
            Quantity::ResidueProbability,
            Quantity::ResidueVolume,
        ]
    }
}
