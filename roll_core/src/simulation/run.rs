//! The batch loop shared by the runner thread and blocking callers

use super::{CancellationToken, CostAnalysis, SeriesAccumulator, SimulationConfig, SimulationError, SimulationResult, TierHistogram};
use crate::analysis::evaluate;
use crate::config::GameData;
use crate::live::compose;
use crate::mutation::roll_stats;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Trials per batch; cancellation and progress are observed between batches
pub const BATCH_SIZE: u64 = 100_000;

/// Trials finished so far out of the requested sample size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: u64,
    pub total: u64,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(Box<SimulationResult>),
    /// Stopped at a batch boundary; nothing is reported for partial runs
    Cancelled { completed: u64 },
}

/// Run a whole simulation on the current thread
///
/// Trials are evaluated in batches of [`BATCH_SIZE`]. After every batch
/// `on_progress` is called and `cancel` is checked; a cancelled run returns
/// [`RunOutcome::Cancelled`] and never a partial result.
pub fn run_to_completion<R, F>(
    data: &GameData,
    config: &SimulationConfig,
    rng: &mut R,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<RunOutcome, SimulationError>
where
    R: Rng + ?Sized,
    F: FnMut(Progress),
{
    config.validate()?;
    let ranges = data.mutations.get(config.family, config.strength).ok_or_else(|| {
        SimulationError::InvalidConfig(format!(
            "no mutation table for {:?}/{:?}",
            config.family, config.strength
        ))
    })?;
    let profile = data.family(config.family);
    let live = compose(config.family, &config.skills, &data.live);

    let started = Instant::now();
    tracing::info!(
        family = ?config.family,
        strength = ?config.strength,
        sample_size = config.sample_size,
        "simulation started"
    );

    let total = config.sample_size;
    let mut histogram = TierHistogram::new();
    let mut effective = SeriesAccumulator::new(total);
    let mut completed = 0;

    while completed < total {
        if cancel.is_cancelled() {
            break;
        }

        let batch = BATCH_SIZE.min(total - completed);
        for _ in 0..batch {
            let rolled = roll_stats(&profile.base_stats, ranges, rng);
            let evaluation = evaluate(profile, &live, &rolled)?;
            *histogram.entry(evaluation.tier).or_insert(0) += 1;
            effective.push(evaluation.effective, rng);
        }
        completed += batch;

        tracing::debug!(completed, total, "batch finished");
        on_progress(Progress { completed, total });
    }

    if cancel.is_cancelled() {
        tracing::warn!(completed, total, "simulation cancelled");
        return Ok(RunOutcome::Cancelled { completed });
    }

    let statistics = effective.finish();
    let cost_analysis = CostAnalysis::compute(
        &histogram,
        completed,
        config.base_cost,
        config.mutation_cost,
        &data.valuation,
    );

    tracing::info!(
        total_trials = completed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation completed"
    );

    Ok(RunOutcome::Completed(Box::new(SimulationResult {
        config: config.clone(),
        tier_histogram: histogram,
        total_trials: completed,
        statistics,
        cost_analysis,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Tier;
    use crate::types::{ModuleFamily, MutationStrength};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn completed(outcome: RunOutcome) -> SimulationResult {
        match outcome {
            RunOutcome::Completed(result) => *result,
            RunOutcome::Cancelled { .. } => panic!("run was cancelled"),
        }
    }

    #[test]
    fn test_histogram_conserves_trials() {
        let data = GameData::builtin().unwrap();
        let config = SimulationConfig::new(ModuleFamily::Modulated, MutationStrength::Gravid, 1_234);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let result = completed(run_to_completion(&data, &config, &mut rng, &CancellationToken::new(), |_| {}).unwrap());

        assert_eq!(result.total_trials, 1_234);
        assert_eq!(result.tier_histogram.values().sum::<u64>(), 1_234);
        let labels = Tier::all();
        assert!(result.tier_histogram.keys().all(|t| labels.contains(t)));
    }

    #[test]
    fn test_progress_per_batch() {
        let data = GameData::builtin().unwrap();
        let config = SimulationConfig::new(ModuleFamily::Ice, MutationStrength::Decayed, BATCH_SIZE + 10);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut seen = Vec::new();
        run_to_completion(&data, &config, &mut rng, &CancellationToken::new(), |p| seen.push(p)).unwrap();

        assert_eq!(
            seen,
            vec![
                Progress { completed: BATCH_SIZE, total: BATCH_SIZE + 10 },
                Progress { completed: BATCH_SIZE + 10, total: BATCH_SIZE + 10 },
            ]
        );
    }

    #[test]
    fn test_cancel_between_batches() {
        let data = GameData::builtin().unwrap();
        let config = SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Unstable, BATCH_SIZE * 50);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let cancel = CancellationToken::new();
        let outcome = run_to_completion(&data, &config, &mut rng, &cancel, |_| cancel.cancel()).unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled { completed: BATCH_SIZE });
    }

    #[test]
    fn test_invalid_config_runs_nothing() {
        let data = GameData::builtin().unwrap();
        let config = SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut calls = 0;
        let result = run_to_completion(&data, &config, &mut rng, &CancellationToken::new(), |_| calls += 1);
        assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
        assert_eq!(calls, 0);
    }
}
