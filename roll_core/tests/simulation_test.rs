//! Integration test: GameData -> analysis, blocking runs and the runner thread

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use roll_core::config::GameData;
use roll_core::simulation::{
    run_to_completion, CancellationToken, CostGroup, RunOutcome, RunnerEvent, RunnerState, SimulationConfig,
    SimulationError, SimulationResult, SimulationRunner, BATCH_SIZE,
};
use roll_core::tier::{Tier, TierLetter};
use roll_core::types::{ModuleFamily, MutationStrength};
use roll_core::{analyze, AnalysisRequest, SkillLevels, StatVector};
use std::sync::Arc;
use std::time::{Duration, Instant};

const EVENT_TIMEOUT: Duration = Duration::from_secs(120);

fn data() -> Arc<GameData> {
    Arc::new(GameData::builtin().unwrap())
}

/// Collect events until a result or error arrives
fn drain_until_done(runner: &SimulationRunner) -> Vec<RunnerEvent> {
    let mut events = Vec::new();
    while let Some(event) = runner.next_event_timeout(EVENT_TIMEOUT) {
        let done = !matches!(event, RunnerEvent::Progress { .. });
        events.push(event);
        if done {
            break;
        }
    }
    events
}

fn wait_for_state(runner: &SimulationRunner, wanted: RunnerState) -> bool {
    let deadline = Instant::now() + EVENT_TIMEOUT;
    while Instant::now() < deadline {
        if runner.state() == wanted {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_effective_metric_scenario() {
    let data = data();
    let rolled = StatVector::from_named([
        ("MiningAmount", 200.0),
        ("ActivationTime", 45.0),
        ("CriticalSuccessChance", 0.01),
        ("CriticalSuccessBonusYield", 2.0),
    ]);
    let request = AnalysisRequest::for_family(&data, ModuleFamily::Ore, rolled, SkillLevels::zero());
    let result = analyze(&request, &data).unwrap();
    assert!((result.throughput_with_bonus_only - 4.5333).abs() < 1e-4);
    assert!((result.throughput_raw - 200.0 / 45.0).abs() < 1e-9);
}

#[test]
fn test_ore_decayed_hundred_thousand_scenario() {
    let data = data();
    let config = SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, 100_000);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let outcome = run_to_completion(&data, &config, &mut rng, &CancellationToken::new(), |_| {}).unwrap();
    let RunOutcome::Completed(result) = outcome else {
        panic!("run was cancelled");
    };

    let labels = Tier::all();
    assert_eq!(result.total_trials, 100_000);
    assert_eq!(result.tier_histogram.values().sum::<u64>(), 100_000);
    assert!(result.tier_histogram.keys().all(|t| labels.contains(t)));
    let stats = result.statistics;
    assert!(stats.min <= stats.median && stats.median <= stats.max);
    // decayed rolls at zero skill top out well below the S floor
    assert_eq!(result.letter_count(TierLetter::S), 0);
}

#[test]
fn test_cost_sanity_when_every_roll_lands_in_one_tier() {
    let data = data();
    let mut config = SimulationConfig::new(ModuleFamily::Ice, MutationStrength::Decayed, 500);
    config.base_cost = 2_000_000.0;
    config.mutation_cost = 500_000.0;
    config.skills = SkillLevels::maxed(5.0);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let RunOutcome::Completed(result) =
        run_to_completion(&data, &config, &mut rng, &CancellationToken::new(), |_| {}).unwrap()
    else {
        panic!("run was cancelled");
    };

    // max skills put every ice roll far above the S floor
    assert_eq!(result.letter_count(TierLetter::S), 500);
    let total = result.cost_analysis.row(CostGroup::Total(TierLetter::S)).unwrap();
    assert!((total.cost - 2_500_000.0).abs() < 1e-6);
    let f = result.cost_analysis.row(CostGroup::Tier(Tier::plain(TierLetter::F))).unwrap();
    assert!(f.cost.is_infinite());
    assert!((result.tier_share(Tier::plain(TierLetter::S)) + result.tier_share(Tier::new(TierLetter::S, true)) - 1.0).abs() < 1e-12);
}

#[test]
fn test_runner_completes_with_ordered_progress() {
    let runner = SimulationRunner::spawn(data());
    let config = SimulationConfig::new(ModuleFamily::Modulated, MutationStrength::Unstable, BATCH_SIZE * 2 + 1);
    runner.start(config).unwrap();

    let events = drain_until_done(&runner);
    let (last, progress) = events.split_last().unwrap();
    let completed: Vec<u64> = progress
        .iter()
        .map(|e| match e {
            RunnerEvent::Progress { completed, .. } => *completed,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(completed, vec![BATCH_SIZE, BATCH_SIZE * 2, BATCH_SIZE * 2 + 1]);

    let RunnerEvent::Result { result } = last else {
        panic!("expected a result, got {last:?}");
    };
    assert_eq!(result.total_trials, BATCH_SIZE * 2 + 1);
    assert_eq!(runner.state(), RunnerState::Completed);
    assert_eq!(runner.try_next_event(), None);
    runner.shutdown();
}

#[test]
fn test_stop_yields_no_result() {
    let runner = SimulationRunner::spawn(data());
    let config = SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Gravid, 1_000_000_000);
    runner.start(config).unwrap();
    runner.stop();
    runner.stop();

    assert!(wait_for_state(&runner, RunnerState::Cancelled));
    let mut events = Vec::new();
    while let Some(event) = runner.try_next_event() {
        events.push(event);
    }
    assert!(!events.is_empty());
    assert!(events
        .iter()
        .all(|e| matches!(e, RunnerEvent::Progress { completed, total } if completed < total)));
    runner.shutdown();
}

#[test]
fn test_stop_while_idle_is_noop_and_runner_is_reusable() {
    let runner = SimulationRunner::spawn(data());
    runner.stop();
    assert_eq!(runner.state(), RunnerState::Idle);

    runner
        .start(SimulationConfig::new(ModuleFamily::Ice, MutationStrength::Gravid, 10))
        .unwrap();
    let first = drain_until_done(&runner);
    assert!(matches!(first.last(), Some(RunnerEvent::Result { .. })));

    runner
        .start(SimulationConfig::new(ModuleFamily::Ice, MutationStrength::Gravid, 10))
        .unwrap();
    let second = drain_until_done(&runner);
    assert!(matches!(second.last(), Some(RunnerEvent::Result { .. })));
}

#[test]
fn test_invalid_config_rejected_before_running() {
    let runner = SimulationRunner::spawn(data());
    let result = runner.start(SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, 0));
    assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
    assert_eq!(runner.state(), RunnerState::Idle);
    assert_eq!(runner.next_event_timeout(Duration::from_millis(50)), None);
}

#[test]
fn test_second_start_while_running_is_rejected() {
    let runner = SimulationRunner::spawn(data());
    let long = SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, 1_000_000_000);
    runner.start(long.clone()).unwrap();
    assert!(wait_for_state(&runner, RunnerState::Running));

    assert_eq!(runner.start(long), Err(SimulationError::AlreadyRunning));
    assert_eq!(runner.state(), RunnerState::Running);

    runner.stop();
    assert!(wait_for_state(&runner, RunnerState::Cancelled));
}

#[test]
fn test_back_to_back_start_is_rejected_without_disturbing_the_run() {
    let runner = SimulationRunner::spawn(data());
    let config = SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, BATCH_SIZE * 2);

    runner.start(config.clone()).unwrap();
    // no wait: the worker may not have picked up the first start yet
    assert_eq!(runner.start(config), Err(SimulationError::AlreadyRunning));
    assert_eq!(runner.state(), RunnerState::Running);

    let events = drain_until_done(&runner);
    let (last, progress) = events.split_last().unwrap();
    assert!(progress.iter().all(|e| matches!(e, RunnerEvent::Progress { .. })));
    let RunnerEvent::Result { result } = last else {
        panic!("expected a result, got {last:?}");
    };
    assert_eq!(result.total_trials, BATCH_SIZE * 2);
    assert_eq!(runner.state(), RunnerState::Completed);
    assert_eq!(runner.next_event_timeout(Duration::from_millis(50)), None);
}

#[test]
fn test_trial_failure_reports_error_and_no_result() {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/config");
    let read = |name: &str| std::fs::read_to_string(format!("{root}/{name}")).unwrap();

    // every roll drives the activation time negative
    let mut mutations = String::new();
    for family in ["ore", "modulated", "ice"] {
        for strength in ["decayed", "gravid", "unstable"] {
            mutations.push_str(&format!(
                "[[mutations]]\nfamily = \"{family}\"\nstrength = \"{strength}\"\n[mutations.ranges]\nActivationTime = {{ min = -300.0, max = -200.0 }}\n\n"
            ));
        }
    }
    let data = GameData::from_sources(
        &read("families.toml"),
        &mutations,
        &read("live.toml"),
        &read("valuation.toml"),
    )
    .unwrap();

    let runner = SimulationRunner::spawn(Arc::new(data));
    runner
        .start(SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, 100))
        .unwrap();
    let events = drain_until_done(&runner);
    assert!(matches!(events.last(), Some(RunnerEvent::Error { message }) if message.contains("Activation time")));
    assert!(!events.iter().any(|e| matches!(e, RunnerEvent::Result { .. })));
    assert!(wait_for_state(&runner, RunnerState::Failed));
}

#[test]
fn test_two_runners_run_independently() {
    let data = data();
    let left = SimulationRunner::spawn(Arc::clone(&data));
    let right = SimulationRunner::spawn(Arc::clone(&data));

    left.start(SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Decayed, 5_000))
        .unwrap();
    right
        .start(SimulationConfig::new(ModuleFamily::Ore, MutationStrength::Unstable, 1_000_000_000))
        .unwrap();
    right.stop();

    let left_events = drain_until_done(&left);
    let Some(RunnerEvent::Result { result }) = left_events.last() else {
        panic!("left runner produced no result");
    };
    assert_eq!(result.total_trials, 5_000);
    assert!(wait_for_state(&right, RunnerState::Cancelled));
}

#[test]
fn test_unstable_spreads_wider_than_decayed() {
    let data = data();
    let run = |strength| -> SimulationResult {
        let config = SimulationConfig::new(ModuleFamily::Ore, strength, 20_000);
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        match run_to_completion(&data, &config, &mut rng, &CancellationToken::new(), |_| {}).unwrap() {
            RunOutcome::Completed(result) => *result,
            RunOutcome::Cancelled { .. } => panic!("run was cancelled"),
        }
    };
    let decayed = run(MutationStrength::Decayed);
    let unstable = run(MutationStrength::Unstable);
    let spread = |r: &SimulationResult| r.statistics.max - r.statistics.min;
    assert!(spread(&unstable) > spread(&decayed));
}

#[test]
fn test_result_round_trips_through_json() {
    let data = data();
    let config = SimulationConfig::new(ModuleFamily::Modulated, MutationStrength::Decayed, 1_000);
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let RunOutcome::Completed(result) =
        run_to_completion(&data, &config, &mut rng, &CancellationToken::new(), |_| {}).unwrap()
    else {
        panic!("run was cancelled");
    };

    let json = serde_json::to_string_pretty(&*result).unwrap();
    assert!(json.contains("\"tier_histogram\""));
    let back: SimulationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.tier_histogram, result.tier_histogram);
    assert_eq!(back.config.family, ModuleFamily::Modulated);
    assert!(back.cost_analysis.rows.iter().any(|r| r.cost.is_infinite()));
}
