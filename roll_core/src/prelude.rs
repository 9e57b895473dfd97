//! Prelude module for convenient imports
//!
//! ```rust
//! use roll_core::prelude::*;
//! ```

// Core types
pub use crate::stats::StatVector;
pub use crate::types::{ModuleFamily, MutationStrength, Quantity, StatKind};

// Data
pub use crate::config::{GameData, LiveConstants};
pub use crate::valuation::Valuation;

// Live modifiers
pub use crate::live::{compose, LiveModifierSet, SkillLevels};

// Classification
pub use crate::analysis::{analyze, AnalysisRequest, AnalysisResult};
pub use crate::tier::{Tier, TierLetter};

// Simulation
pub use crate::simulation::{
    RunnerEvent, RunnerState, SimulationConfig, SimulationResult, SimulationRunner,
};
