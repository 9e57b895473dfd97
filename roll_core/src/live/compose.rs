//! Composer - Builds the live modifier set for a (family, skills) pair

use super::{LiveModifierSet, SkillLevels, StackingPenalty};
use crate::config::LiveConstants;
use crate::types::{ModuleFamily, Quantity};

/// `1 + level * bonus`
fn additive(level: u8, bonus: f64) -> f64 {
    1.0 + f64::from(level) * bonus
}

/// `max(0, 1 - level * reduction)`
fn reduction(level: u8, per_level: f64) -> f64 {
    (1.0 - f64::from(level) * per_level).max(0.0)
}

/// Build the live modifier set for a family
///
/// Strip miners (ORE and Modulated) share one chain; ice harvesters use a
/// separate cycle-time chain and get no yield stacking.
pub fn compose(family: ModuleFamily, skills: &SkillLevels, constants: &LiveConstants) -> LiveModifierSet {
    let skills = skills.clamped(constants.implant.max_percent);
    let mut set = match family {
        ModuleFamily::Ore | ModuleFamily::Modulated => compose_strip_miner(family, &skills, constants),
        ModuleFamily::Ice => compose_ice_harvester(&skills, constants),
    };
    compose_common(&mut set, &skills, constants);
    set
}

fn compose_strip_miner(family: ModuleFamily, skills: &SkillLevels, constants: &LiveConstants) -> LiveModifierSet {
    let bonuses = &constants.skills;
    let fleet = &constants.fleet;
    let mut set = LiveModifierSet::identity(family);

    let yield_stack = set.stack_mut(Quantity::Yield);
    yield_stack.push(additive(skills.mining, bonuses.mining_yield));
    yield_stack.push(additive(skills.astrogeology, bonuses.astrogeology_yield));
    yield_stack.push(additive(skills.mining_barge, bonuses.mining_barge_yield));
    yield_stack.push(additive(skills.exhumers, bonuses.exhumers_yield));

    if fleet.enabled {
        let upgrades = if constants.stacking.enabled {
            StackingPenalty::new(constants.stacking.weights.clone()).apply(&fleet.module_upgrades)
        } else {
            fleet.module_upgrades.clone()
        };

        let yield_stack = set.stack_mut(Quantity::Yield);
        yield_stack.push(fleet.ship_role_yield);
        yield_stack.extend(upgrades);
        yield_stack.push(fleet.foreman_burst_yield);
        yield_stack.push(fleet.industrial_core_yield);
        yield_stack.push(fleet.calibration);

        set.stack_mut(Quantity::CycleTime).push(fleet.industrial_core_cycle_time);
    }

    set
}

fn compose_ice_harvester(skills: &SkillLevels, constants: &LiveConstants) -> LiveModifierSet {
    let bonuses = &constants.skills;
    let fleet = &constants.fleet;
    let mut set = LiveModifierSet::identity(ModuleFamily::Ice);

    let cycle = set.stack_mut(Quantity::CycleTime);
    cycle.push(reduction(skills.ice_harvesting, bonuses.ice_harvesting_cycle_reduction));
    cycle.push(1.0 - skills.ice_harvesting_implant / 100.0);
    cycle.push(reduction(skills.mining_barge, bonuses.mining_barge_ice_cycle_reduction));
    cycle.push(reduction(skills.exhumers, bonuses.exhumers_ice_cycle_reduction));

    if fleet.enabled {
        cycle.push(fleet.ice_role_cycle_time);
        cycle.push(fleet.industrial_core_cycle_time);
    }

    set
}

/// Chains both variants share: crits, residue and fleet range
fn compose_common(set: &mut LiveModifierSet, skills: &SkillLevels, constants: &LiveConstants) {
    let bonuses = &constants.skills;

    set.stack_mut(Quantity::CritChance)
        .push(additive(skills.mining_precision, bonuses.mining_precision_crit_chance));
    set.stack_mut(Quantity::CritBonus)
        .push(additive(skills.mining_exploitation, bonuses.mining_exploitation_crit_bonus));
    set.stack_mut(Quantity::ResidueProbability)
        .push(reduction(skills.exhumers, bonuses.exhumers_residue_reduction));

    if constants.fleet.enabled {
        set.stack_mut(Quantity::Range).push(constants.fleet.foreman_burst_range);
    }
}
