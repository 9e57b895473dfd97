//! Single-roll analysis - "What did I get?"
//!
//! Takes one rolled module (typically parsed from a pasted tooltip), applies
//! the player's live modifiers and classifies the result.

use crate::config::{FamilyProfile, GameData};
use crate::live::{compose, LiveModifierSet, SkillLevels};
use crate::metrics::{self, MetricError};
use crate::stats::StatVector;
use crate::tier::Tier;
use crate::types::{ModuleFamily, StatKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    InvalidDuration(#[from] MetricError),
    #[error("Roll is missing required stat {0}")]
    MissingStat(StatKind),
}

/// Input of the single-roll path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Rolled stats; may be partial, missing stats fall back to `base_stats`
    pub stat_vector: StatVector,
    /// Un-mutated module the roll came from
    pub base_stats: StatVector,
    pub family: ModuleFamily,
    pub skills: SkillLevels,
}

impl AnalysisRequest {
    /// Request against the configured base module of `family`
    pub fn for_family(data: &GameData, family: ModuleFamily, stat_vector: StatVector, skills: SkillLevels) -> Self {
        AnalysisRequest {
            stat_vector,
            base_stats: data.family(family).base_stats.clone(),
            family,
            skills,
        }
    }
}

/// Outcome of analysing one roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Rolled stats merged over the base module
    pub stat_vector: StatVector,
    /// Stats after live modifiers
    pub live_stats: StatVector,
    pub throughput_raw: f64,
    pub throughput_with_bonus_only: f64,
    pub throughput_effective: f64,
    pub tier: Tier,
    /// Expected residue waste per second, for families with residue
    pub residue_loss_rate: Option<f64>,
    /// Effective rate relative to the base module under the same skills
    pub delta_vs_base_percent: f64,
}

/// Tier-relevant figures of one roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub effective: f64,
    pub tier: Tier,
}

/// Classify a rolled vector under an already composed live set
///
/// The numeric tier comes from the live effective rate; the `+` suffix
/// compares the rolled (pre-live) optimal range with the profile's base.
pub fn evaluate(profile: &FamilyProfile, live: &LiveModifierSet, rolled: &StatVector) -> Result<Evaluation, MetricError> {
    let effective = metrics::effective_rate(&live.apply(rolled))?;
    let tier = profile.tier_bands.classify_roll(
        effective,
        rolled.get(StatKind::OptimalRange),
        profile.base_optimal_range(),
    );
    Ok(Evaluation { effective, tier })
}

/// Run the single-roll analysis
pub fn analyze(request: &AnalysisRequest, data: &GameData) -> Result<AnalysisResult, AnalysisError> {
    let rolled = request.base_stats.merged_with(&request.stat_vector);
    for required in [StatKind::MiningAmount, StatKind::ActivationTime] {
        if !rolled.contains(required) {
            return Err(AnalysisError::MissingStat(required));
        }
    }

    let profile = data.family(request.family);
    let live_set = compose(request.family, &request.skills, &data.live);
    let live_stats = live_set.apply(&rolled);

    let throughput_raw = metrics::raw_rate(&live_stats)?;
    let throughput_with_bonus_only = metrics::rate_with_bonus_only(&live_stats)?;
    let throughput_effective = metrics::effective_rate(&live_stats)?;

    let base_range = request
        .base_stats
        .get(StatKind::OptimalRange)
        .or_else(|| profile.base_optimal_range());
    let tier = profile.tier_bands.classify_roll(
        throughput_effective,
        rolled.get(StatKind::OptimalRange),
        base_range,
    );

    let residue_loss_rate = if request.family.has_residue() {
        Some(metrics::residue_loss_rate(&live_stats)?)
    } else {
        None
    };

    let base_effective = metrics::effective_rate(&live_set.apply(&request.base_stats))?;
    let delta_vs_base_percent = if base_effective > 0.0 {
        (throughput_effective - base_effective) / base_effective * 100.0
    } else {
        0.0
    };

    Ok(AnalysisResult {
        stat_vector: rolled,
        live_stats,
        throughput_raw,
        throughput_with_bonus_only,
        throughput_effective,
        tier,
        residue_loss_rate,
        delta_vs_base_percent,
    })
}
