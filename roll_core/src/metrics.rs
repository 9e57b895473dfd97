//! Derived metrics - Throughput figures computed from a stat vector
//!
//! All rates are per second of cycle time and require a positive
//! activation time.

use crate::stats::StatVector;
use crate::types::StatKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MetricError {
    #[error("Activation time must be positive, got {activation_time}")]
    InvalidDuration { activation_time: f64 },
}

fn activation_time(stats: &StatVector) -> Result<f64, MetricError> {
    let activation_time = stats.get_or_zero(StatKind::ActivationTime);
    if activation_time.is_nan() || activation_time <= 0.0 {
        return Err(MetricError::InvalidDuration { activation_time });
    }
    Ok(activation_time)
}

/// Expected extra yield per cycle from critical successes
fn crit_gain(stats: &StatVector) -> f64 {
    let amount = stats.get_or_zero(StatKind::MiningAmount);
    amount * stats.get_or_zero(StatKind::CriticalSuccessBonusYield) * stats.get_or_zero(StatKind::CriticalSuccessChance)
}

/// Expected yield wasted to residue per cycle
fn residue_waste(stats: &StatVector) -> f64 {
    let probability = stats.get_or_zero(StatKind::ResidueProbability).clamp(0.0, 1.0);
    stats.get_or_zero(StatKind::MiningAmount) * probability * stats.get_or_zero(StatKind::ResidueVolumeMultiplier)
}

/// `mining_amount / activation_time`
pub fn raw_rate(stats: &StatVector) -> Result<f64, MetricError> {
    let time = activation_time(stats)?;
    Ok(stats.get_or_zero(StatKind::MiningAmount) / time)
}

/// `(amount + amount * crit_bonus * crit_chance) / activation_time`
pub fn rate_with_bonus_only(stats: &StatVector) -> Result<f64, MetricError> {
    let time = activation_time(stats)?;
    Ok((stats.get_or_zero(StatKind::MiningAmount) + crit_gain(stats)) / time)
}

/// Rate used for tier classification
///
/// Same as [`rate_with_bonus_only`] for every family: residue losses are
/// reported separately and never subtracted here.
pub fn effective_rate(stats: &StatVector) -> Result<f64, MetricError> {
    rate_with_bonus_only(stats)
}

/// Expected residue waste per second
pub fn residue_loss_rate(stats: &StatVector) -> Result<f64, MetricError> {
    let time = activation_time(stats)?;
    Ok(residue_waste(stats) / time)
}

/// Crit gains minus residue losses, per second
pub fn rate_with_losses(stats: &StatVector) -> Result<f64, MetricError> {
    let time = activation_time(stats)?;
    let amount = stats.get_or_zero(StatKind::MiningAmount);
    Ok((amount + crit_gain(stats) - residue_waste(stats)) / time)
}
