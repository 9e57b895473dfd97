//! Mutation sampler - Draws one concrete rolled stat vector

use crate::config::{GameData, MutationRanges};
use crate::stats::StatVector;
use crate::types::{ModuleFamily, MutationStrength};
use rand::Rng;

/// Roll `base` through `ranges`
///
/// Every stat with a range gets one independent uniform draw `pct` in
/// `[min, max]` and becomes `base * (1 + pct / 100)`. Stats without a
/// range pass through; ranges whose stat has no base value are skipped.
pub fn roll_stats<R: Rng + ?Sized>(base: &StatVector, ranges: &MutationRanges, rng: &mut R) -> StatVector {
    let mut rolled = base.clone();
    for (stat, range) in ranges {
        let Some(value) = base.get(*stat) else {
            continue;
        };
        let percent = if range.min < range.max {
            rng.gen_range(range.min..=range.max)
        } else {
            range.min
        };
        rolled = rolled.with(*stat, value * (1.0 + percent / 100.0));
    }
    rolled
}

/// Roll one module of `family` at `strength` using the loaded tables
///
/// Returns the base stats unchanged when no table exists for the pair;
/// loaded data always has all of them.
pub fn roll_module<R: Rng + ?Sized>(
    data: &GameData,
    family: ModuleFamily,
    strength: MutationStrength,
    rng: &mut R,
) -> StatVector {
    let base = &data.family(family).base_stats;
    match data.mutations.get(family, strength) {
        Some(ranges) => roll_stats(base, ranges, rng),
        None => base.clone(),
    }
}
