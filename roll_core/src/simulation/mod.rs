//! Monte-Carlo simulation of mutation batches
//!
//! [`run_to_completion`] is the batch loop itself and runs on the caller's
//! thread. [`SimulationRunner`] wraps it in a worker thread that talks to
//! its owner only through command and event channels.

mod cost;
mod format;
mod run;
mod runner;
mod statistics;

pub use cost::{CostAnalysis, CostGroup, TierCost, TierHistogram};
pub use format::{format_amount, format_eta, format_odds, format_percentage};
pub use run::{run_to_completion, Progress, RunOutcome, BATCH_SIZE};
pub use runner::{RunnerCommand, RunnerEvent, RunnerState, SimulationRunner};
pub use statistics::{SeriesAccumulator, SummaryStatistics, MEDIAN_SAMPLE_CAPACITY};

use crate::live::SkillLevels;
use crate::metrics::MetricError;
use crate::tier::{Tier, TierLetter};
use crate::types::{ModuleFamily, MutationStrength};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),
    #[error("Simulation already running")]
    AlreadyRunning,
    #[error("Simulation failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Metric(#[from] MetricError),
}

/// One batch of mutation attempts to forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub family: ModuleFamily,
    pub strength: MutationStrength,
    #[serde(default)]
    pub skills: SkillLevels,
    /// Price of the un-mutated module
    #[serde(default)]
    pub base_cost: f64,
    /// Price of one mutation
    #[serde(default)]
    pub mutation_cost: f64,
    pub sample_size: u64,
}

impl SimulationConfig {
    pub fn new(family: ModuleFamily, strength: MutationStrength, sample_size: u64) -> Self {
        SimulationConfig {
            family,
            strength,
            skills: SkillLevels::zero(),
            base_cost: 0.0,
            mutation_cost: 0.0,
            sample_size,
        }
    }

    /// Boundary checks performed before a run starts
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.sample_size == 0 {
            return Err(SimulationError::InvalidConfig(
                "sample size must be greater than zero".to_string(),
            ));
        }
        if !self.base_cost.is_finite() || !self.mutation_cost.is_finite() {
            return Err(SimulationError::InvalidConfig(
                "costs must be finite numbers".to_string(),
            ));
        }
        Ok(())
    }

    /// Cost of one attempt
    pub fn roll_cost(&self) -> f64 {
        self.base_cost + self.mutation_cost
    }
}

/// Aggregates of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub config: SimulationConfig,
    pub tier_histogram: TierHistogram,
    pub total_trials: u64,
    pub statistics: SummaryStatistics,
    pub cost_analysis: CostAnalysis,
}

impl SimulationResult {
    pub fn count(&self, tier: Tier) -> u64 {
        self.tier_histogram.get(&tier).copied().unwrap_or(0)
    }

    /// Trials of a letter, `+` variant included
    pub fn letter_count(&self, letter: TierLetter) -> u64 {
        self.tier_histogram
            .iter()
            .filter(|(tier, _)| tier.letter == letter)
            .map(|(_, count)| count)
            .sum()
    }

    /// Fraction of trials that landed on `tier`
    pub fn tier_share(&self, tier: Tier) -> f64 {
        if self.total_trials == 0 {
            return 0.0;
        }
        self.count(tier) as f64 / self.total_trials as f64
    }

    pub fn letter_share(&self, letter: TierLetter) -> f64 {
        if self.total_trials == 0 {
            return 0.0;
        }
        self.letter_count(letter) as f64 / self.total_trials as f64
    }

    pub fn expected_value(&self) -> f64 {
        self.cost_analysis.expected_value
    }

    pub fn roi(&self) -> f64 {
        self.cost_analysis.roi
    }
}

/// Cooperative stop flag checked at batch boundaries
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sample_size_rejected() {
        let config = SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, 0);
        assert!(matches!(config.validate(), Err(SimulationError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_finite_cost_rejected() {
        let mut config = SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, 10);
        assert!(config.validate().is_ok());
        config.base_cost = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cancel_is_shared_and_idempotent() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
