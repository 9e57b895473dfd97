//! Live modifiers - Proficiency, ship and fleet multipliers applied in play
//!
//! A rolled module is judged by how it performs once fitted: the rolled
//! stats are scaled by a [`LiveModifierSet`] built from the player's
//! [`SkillLevels`] and the configured constants.

mod compose;
mod stack;

pub use compose::compose;
pub use stack::{reduce, MultiplierStack, StackingPenalty};

use crate::stats::StatVector;
use crate::types::{ModuleFamily, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest trainable level of any proficiency
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Player proficiency levels (the proficiency vector)
///
/// Levels run 0 to 5. The implant axis is a percentage instead of a level
/// and is clamped to the configured domain when composed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillLevels {
    pub mining: u8,
    pub astrogeology: u8,
    pub mining_barge: u8,
    pub exhumers: u8,
    pub mining_exploitation: u8,
    pub mining_precision: u8,
    pub ice_harvesting: u8,
    /// Cycle time reduction from an implant, in percent
    pub ice_harvesting_implant: f64,
}

impl SkillLevels {
    /// Untrained character
    pub fn zero() -> Self {
        SkillLevels::default()
    }

    /// Every level at 5 with the given implant percentage
    pub fn maxed(implant_percent: f64) -> Self {
        SkillLevels {
            mining: MAX_SKILL_LEVEL,
            astrogeology: MAX_SKILL_LEVEL,
            mining_barge: MAX_SKILL_LEVEL,
            exhumers: MAX_SKILL_LEVEL,
            mining_exploitation: MAX_SKILL_LEVEL,
            mining_precision: MAX_SKILL_LEVEL,
            ice_harvesting: MAX_SKILL_LEVEL,
            ice_harvesting_implant: implant_percent,
        }
    }

    /// Copy with every level forced into `0..=5` and the implant into `[0, max_implant]`
    pub fn clamped(&self, max_implant: f64) -> Self {
        let level = |l: u8| l.min(MAX_SKILL_LEVEL);
        let implant = if self.ice_harvesting_implant.is_finite() {
            self.ice_harvesting_implant.min(max_implant).max(0.0)
        } else {
            0.0
        };
        SkillLevels {
            mining: level(self.mining),
            astrogeology: level(self.astrogeology),
            mining_barge: level(self.mining_barge),
            exhumers: level(self.exhumers),
            mining_exploitation: level(self.mining_exploitation),
            mining_precision: level(self.mining_precision),
            ice_harvesting: level(self.ice_harvesting),
            ice_harvesting_implant: implant,
        }
    }
}

/// One multiplier stack per live quantity for a (family, skills) pair
///
/// Every [`Quantity`] is always present; quantities nothing modifies hold
/// an empty stack and reduce to `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveModifierSet {
    pub family: ModuleFamily,
    stacks: BTreeMap<Quantity, MultiplierStack>,
}

impl LiveModifierSet {
    /// Set with an empty stack for every quantity
    pub fn identity(family: ModuleFamily) -> Self {
        let stacks = Quantity::all()
            .iter()
            .map(|q| (*q, MultiplierStack::new()))
            .collect();
        LiveModifierSet { family, stacks }
    }

    pub fn get(&self, quantity: Quantity) -> &MultiplierStack {
        static EMPTY: MultiplierStack = MultiplierStack::new();
        self.stacks.get(&quantity).unwrap_or(&EMPTY)
    }

    pub(crate) fn stack_mut(&mut self, quantity: Quantity) -> &mut MultiplierStack {
        self.stacks.entry(quantity).or_default()
    }

    /// Net multiplier for a quantity
    pub fn multiplier(&self, quantity: Quantity) -> f64 {
        self.get(quantity).reduce()
    }

    /// Scale every live stat of `stats` by its quantity's multiplier
    ///
    /// Stats without a live quantity (fitting, hull) pass through.
    pub fn apply(&self, stats: &StatVector) -> StatVector {
        stats.map_values(|stat, value| match stat.quantity() {
            Some(quantity) => value * self.multiplier(quantity),
            None => value,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quantity, &MultiplierStack)> {
        self.stacks.iter().map(|(q, s)| (*q, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatKind;

    #[test]
    fn test_clamped_levels() {
        let skills = SkillLevels {
            mining: 9,
            ice_harvesting_implant: 12.0,
            ..SkillLevels::zero()
        };
        let clamped = skills.clamped(5.0);
        assert_eq!(clamped.mining, 5);
        assert!((clamped.ice_harvesting_implant - 5.0).abs() < f64::EPSILON);

        let negative = SkillLevels {
            ice_harvesting_implant: -3.0,
            ..SkillLevels::zero()
        };
        assert_eq!(negative.clamped(5.0).ice_harvesting_implant, 0.0);
    }

    #[test]
    fn test_identity_set_changes_nothing() {
        let set = LiveModifierSet::identity(ModuleFamily::Ore);
        for quantity in Quantity::all() {
            assert_eq!(set.multiplier(*quantity), 1.0);
        }
        let stats = StatVector::new()
            .with(StatKind::MiningAmount, 200.0)
            .with(StatKind::CpuUsage, 30.0);
        assert_eq!(set.apply(&stats), stats);
    }

    #[test]
    fn test_apply_scales_by_quantity() {
        let mut set = LiveModifierSet::identity(ModuleFamily::Ore);
        set.stack_mut(Quantity::Yield).push(1.5);
        set.stack_mut(Quantity::CycleTime).push(0.5);

        let stats = StatVector::new()
            .with(StatKind::MiningAmount, 200.0)
            .with(StatKind::ActivationTime, 45.0)
            .with(StatKind::PowergridUsage, 10.0);
        let live = set.apply(&stats);
        assert_eq!(live.get(StatKind::MiningAmount), Some(300.0));
        assert_eq!(live.get(StatKind::ActivationTime), Some(22.5));
        assert_eq!(live.get(StatKind::PowergridUsage), Some(10.0));
    }

    #[test]
    fn test_skill_levels_from_toml_defaults_missing_axes() {
        let skills: SkillLevels = toml::from_str("mining = 4\nice_harvesting_implant = 3.0\n").unwrap();
        assert_eq!(skills.mining, 4);
        assert_eq!(skills.exhumers, 0);
        assert!((skills.ice_harvesting_implant - 3.0).abs() < f64::EPSILON);
    }
}
