//! roll_core - Mutation roll engine for mined-module quality forecasting
//!
//! This library provides:
//! - Mutation sampling: drawing a rolled stat vector from authored ranges
//! - Live modifiers: proficiency, ship and fleet multiplier stacks
//! - Tier classification: numeric bands plus the optimal-range `+` suffix
//! - Single-roll analysis and Monte-Carlo batch simulation with cost figures

pub mod analysis;
pub mod config;
pub mod live;
pub mod metrics;
pub mod mutation;
pub mod prelude;
pub mod simulation;
pub mod stats;
pub mod tier;
pub mod types;
pub mod valuation;

// Re-export core types for convenience
pub use analysis::{analyze, AnalysisError, AnalysisRequest, AnalysisResult};
pub use config::{ConfigError, GameData};
pub use live::{compose, LiveModifierSet, MultiplierStack, SkillLevels};
pub use metrics::MetricError;
pub use simulation::{
    run_to_completion, RunnerEvent, RunnerState, SimulationConfig, SimulationError, SimulationResult,
    SimulationRunner,
};
pub use stats::StatVector;
pub use tier::{Tier, TierBands, TierLetter};
pub use types::{ModuleFamily, MutationStrength, Quantity, StatKind};
