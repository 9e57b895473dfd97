//! Application state

use crate::error::AppError;
use crate::settings::{parse_roll, Settings, SimulationDefaults};
use rand::SeedableRng;
use roll_core::mutation::roll_module;
use roll_core::simulation::{
    format_eta, Progress, RunnerEvent, RunnerState, SimulationConfig, SimulationError, SimulationResult,
    SimulationRunner,
};
use roll_core::{
    analyze, AnalysisRequest, AnalysisResult, GameData, ModuleFamily, MutationStrength, SkillLevels, StatKind,
    StatVector,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Simulate,
    Compare,
    Analyze,
    Skills,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Simulate, Tab::Compare, Tab::Analyze, Tab::Skills, Tab::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Simulate => "Simulate",
            Tab::Compare => "Compare",
            Tab::Analyze => "Analyze",
            Tab::Skills => "Skills",
            Tab::Help => "Help",
        }
    }
}

/// Editable simulation settings, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Family,
    Strength,
    CompareStrength,
    SampleSize,
    BaseCost,
    MutationCost,
}

impl ConfigField {
    pub fn all() -> &'static [ConfigField] {
        &[
            ConfigField::Family,
            ConfigField::Strength,
            ConfigField::CompareStrength,
            ConfigField::SampleSize,
            ConfigField::BaseCost,
            ConfigField::MutationCost,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigField::Family => "Module",
            ConfigField::Strength => "Mutation",
            ConfigField::CompareStrength => "Compare with",
            ConfigField::SampleSize => "Sample size",
            ConfigField::BaseCost => "Base cost",
            ConfigField::MutationCost => "Mutation cost",
        }
    }
}

pub const SAMPLE_SIZES: &[u64] = &[
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

const BASE_COST_STEP: f64 = 1_000_000.0;
const MUTATION_COST_STEP: f64 = 100_000.0;

/// Stats editable on the Analyze tab
pub const ROLL_STATS: &[StatKind] = &[
    StatKind::MiningAmount,
    StatKind::ActivationTime,
    StatKind::OptimalRange,
    StatKind::CriticalSuccessChance,
    StatKind::CriticalSuccessBonusYield,
    StatKind::ResidueProbability,
    StatKind::ResidueVolumeMultiplier,
];

pub const SKILL_NAMES: &[&str] = &[
    "Mining",
    "Astrogeology",
    "Mining Barge",
    "Exhumers",
    "Mining Exploitation",
    "Mining Precision",
    "Ice Harvesting",
    "Ice Harvesting Implant",
];

/// One simulation runner plus what the UI has seen from it
pub struct RunPanel {
    pub runner: SimulationRunner,
    pub progress: Option<Progress>,
    pub started_at: Option<Instant>,
    pub result: Option<SimulationResult>,
    pub error: Option<String>,
}

impl RunPanel {
    fn new(data: Arc<GameData>) -> Self {
        RunPanel {
            runner: SimulationRunner::spawn(data),
            progress: None,
            started_at: None,
            result: None,
            error: None,
        }
    }

    fn start(&mut self, config: SimulationConfig) -> Result<(), SimulationError> {
        let total = config.sample_size;
        self.runner.start(config)?;
        self.progress = Some(Progress { completed: 0, total });
        self.started_at = Some(Instant::now());
        self.result = None;
        self.error = None;
        Ok(())
    }

    /// Drain pending events; true when a result arrived
    fn poll(&mut self) -> bool {
        let mut finished = false;
        while let Some(event) = self.runner.try_next_event() {
            match event {
                RunnerEvent::Progress { completed, total } => {
                    self.progress = Some(Progress { completed, total });
                }
                RunnerEvent::Result { result } => {
                    self.result = Some(*result);
                    finished = true;
                }
                RunnerEvent::Error { message } => self.error = Some(message),
            }
        }
        finished
    }

    pub fn state(&self) -> RunnerState {
        self.runner.state()
    }

    pub fn eta(&self) -> Option<String> {
        if self.state() != RunnerState::Running {
            return None;
        }
        let (started, progress) = (self.started_at?, self.progress?);
        Some(format_eta(started.elapsed(), progress.completed, progress.total))
    }
}

/// Shape written by the export key
#[derive(Debug, Serialize)]
struct Export<'a> {
    primary: Option<&'a SimulationResult>,
    comparison: Option<&'a SimulationResult>,
}

pub struct App {
    pub current_tab: Tab,
    pub data: Arc<GameData>,
    pub settings: Settings,
    pub skills: SkillLevels,
    pub defaults: SimulationDefaults,
    pub selected_field: usize,
    pub primary: RunPanel,
    pub comparison: RunPanel,
    compare_pending: bool,
    pub selected_skill: usize,
    pub roll: StatVector,
    pub selected_stat: usize,
    pub analysis: Option<AnalysisResult>,
    pub analysis_error: Option<String>,
    pub rng: rand::rngs::StdRng,
    pub status: Option<String>,
    previous_tab: Tab,
}

impl App {
    pub fn new(data: Arc<GameData>, settings: Settings) -> Self {
        let defaults = settings.simulation.clone();
        let skills = settings.skills.clone();
        let roll = data.family(defaults.family).base_stats.clone();

        let mut app = App {
            current_tab: Tab::Simulate,
            primary: RunPanel::new(Arc::clone(&data)),
            comparison: RunPanel::new(Arc::clone(&data)),
            data,
            settings,
            skills,
            defaults,
            selected_field: 0,
            compare_pending: false,
            selected_skill: 0,
            roll,
            selected_stat: 0,
            analysis: None,
            analysis_error: None,
            rng: rand::rngs::StdRng::from_entropy(),
            status: None,
            previous_tab: Tab::Simulate,
        };
        app.reanalyze();
        app
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }

    pub fn set_tab(&mut self, idx: usize) {
        if let Some(tab) = Tab::all().get(idx) {
            self.current_tab = *tab;
        }
    }

    /// Jump to Help, or back to where help was opened from
    pub fn toggle_help(&mut self) {
        if self.current_tab == Tab::Help {
            self.current_tab = self.previous_tab;
        } else {
            self.previous_tab = self.current_tab;
            self.current_tab = Tab::Help;
        }
    }

    pub fn on_up(&mut self) {
        match self.current_tab {
            Tab::Simulate | Tab::Compare => self.selected_field = self.selected_field.saturating_sub(1),
            Tab::Analyze => self.selected_stat = self.selected_stat.saturating_sub(1),
            Tab::Skills => self.selected_skill = self.selected_skill.saturating_sub(1),
            Tab::Help => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.current_tab {
            Tab::Simulate | Tab::Compare => {
                self.selected_field = (self.selected_field + 1).min(ConfigField::all().len() - 1);
            }
            Tab::Analyze => self.selected_stat = (self.selected_stat + 1).min(ROLL_STATS.len() - 1),
            Tab::Skills => self.selected_skill = (self.selected_skill + 1).min(SKILL_NAMES.len() - 1),
            Tab::Help => {}
        }
    }

    pub fn on_left(&mut self) {
        self.adjust(-1);
    }

    pub fn on_right(&mut self) {
        self.adjust(1);
    }

    fn adjust(&mut self, step: i32) {
        match self.current_tab {
            Tab::Simulate | Tab::Compare => {
                if let Some(field) = ConfigField::all().get(self.selected_field) {
                    self.adjust_field(*field, step);
                }
            }
            Tab::Analyze => self.adjust_stat(step),
            Tab::Skills => self.adjust_skill(step),
            Tab::Help => {}
        }
    }

    fn adjust_field(&mut self, field: ConfigField, step: i32) {
        let defaults = &mut self.defaults;
        match field {
            ConfigField::Family => {
                defaults.family = cycle(ModuleFamily::all(), defaults.family, step);
                self.reset_roll();
            }
            ConfigField::Strength => {
                defaults.strength = cycle(MutationStrength::all(), defaults.strength, step);
            }
            ConfigField::CompareStrength => {
                defaults.compare_strength = cycle(MutationStrength::all(), defaults.compare_strength, step);
            }
            ConfigField::SampleSize => {
                let idx = SAMPLE_SIZES
                    .iter()
                    .position(|&n| n >= defaults.sample_size)
                    .unwrap_or(SAMPLE_SIZES.len() - 1) as i32;
                let next = (idx + step).clamp(0, SAMPLE_SIZES.len() as i32 - 1) as usize;
                defaults.sample_size = SAMPLE_SIZES[next];
            }
            ConfigField::BaseCost => {
                defaults.base_cost = (defaults.base_cost + step as f64 * BASE_COST_STEP).max(0.0);
            }
            ConfigField::MutationCost => {
                defaults.mutation_cost = (defaults.mutation_cost + step as f64 * MUTATION_COST_STEP).max(0.0);
            }
        }
    }

    fn adjust_stat(&mut self, step: i32) {
        let Some(&stat) = ROLL_STATS.get(self.selected_stat) else {
            return;
        };
        let base = self.data.family(self.defaults.family).base_stats.get_or_zero(stat);
        // 1% of the base value per press, or a flat 0.01 for stats the base lacks
        let increment = if base > 0.0 { base * 0.01 } else { 0.01 };
        let current = self.roll.get(stat).unwrap_or(base);
        let value = (current + step as f64 * increment).max(0.0);
        self.roll = self.roll.clone().with(stat, value);
        self.reanalyze();
    }

    fn adjust_skill(&mut self, step: i32) {
        let skills = &mut self.skills;
        let level = match self.selected_skill {
            0 => &mut skills.mining,
            1 => &mut skills.astrogeology,
            2 => &mut skills.mining_barge,
            3 => &mut skills.exhumers,
            4 => &mut skills.mining_exploitation,
            5 => &mut skills.mining_precision,
            6 => &mut skills.ice_harvesting,
            _ => {
                let max = self.data.live.implant.max_percent;
                skills.ice_harvesting_implant = (skills.ice_harvesting_implant + step as f64).min(max).max(0.0);
                self.reanalyze();
                return;
            }
        };
        *level = (*level as i32 + step).clamp(0, roll_core::live::MAX_SKILL_LEVEL as i32) as u8;
        self.reanalyze();
    }

    pub fn skill_value(&self, index: usize) -> String {
        let s = &self.skills;
        match index {
            0 => s.mining.to_string(),
            1 => s.astrogeology.to_string(),
            2 => s.mining_barge.to_string(),
            3 => s.exhumers.to_string(),
            4 => s.mining_exploitation.to_string(),
            5 => s.mining_precision.to_string(),
            6 => s.ice_harvesting.to_string(),
            _ => format!("{:.0}%", s.ice_harvesting_implant),
        }
    }

    pub fn primary_config(&self) -> SimulationConfig {
        self.defaults.primary_config(&self.skills)
    }

    pub fn comparison_config(&self) -> SimulationConfig {
        self.defaults.comparison_config(&self.skills)
    }

    /// Start the run for the current tab
    ///
    /// On the Compare tab the second configuration is queued and started
    /// once the first one reports its result.
    pub fn start_simulation(&mut self) {
        let compare = self.current_tab == Tab::Compare;
        match self.primary.start(self.primary_config()) {
            Ok(()) => {
                self.compare_pending = compare;
                if compare {
                    self.comparison.result = None;
                    self.comparison.progress = None;
                }
                self.status = Some("Simulation started".to_string());
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    pub fn stop_simulation(&mut self) {
        self.compare_pending = false;
        self.primary.runner.stop();
        self.comparison.runner.stop();
        self.status = Some("Stop requested".to_string());
    }

    /// Drain runner events; called once per frame
    pub fn tick(&mut self) {
        let primary_done = self.primary.poll();
        self.comparison.poll();

        if self.compare_pending {
            if primary_done {
                self.compare_pending = false;
                let config = self.comparison_config();
                if let Err(e) = self.comparison.start(config) {
                    self.status = Some(e.to_string());
                }
            } else if self.primary.error.is_some() {
                self.compare_pending = false;
            }
        }
    }

    pub fn roll_random(&mut self) {
        self.roll = roll_module(&self.data, self.defaults.family, self.defaults.strength, &mut self.rng);
        self.reanalyze();
    }

    pub fn reset_roll(&mut self) {
        self.roll = self.data.family(self.defaults.family).base_stats.clone();
        self.reanalyze();
    }

    /// Replace the roll with the contents of the configured roll file
    pub fn load_roll(&mut self) {
        let path = &self.settings.roll_path;
        let loaded = fs::read_to_string(path)
            .map_err(AppError::from)
            .and_then(|content| parse_roll(&content).map_err(AppError::from));
        match loaded {
            Ok(roll) => {
                tracing::info!(path = %path.display(), stats = roll.len(), "roll loaded");
                self.status = Some(format!("Loaded {}", path.display()));
                self.roll = roll;
                self.reanalyze();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "roll load failed");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Re-run single-roll analysis; a failure keeps the previous result on screen
    pub fn reanalyze(&mut self) {
        let request = AnalysisRequest::for_family(&self.data, self.defaults.family, self.roll.clone(), self.skills.clone());
        match analyze(&request, &self.data) {
            Ok(result) => {
                self.analysis = Some(result);
                self.analysis_error = None;
            }
            Err(e) => self.analysis_error = Some(e.to_string()),
        }
    }

    /// Estimated resale value of the analysed roll at the current roll cost
    pub fn sell_price(&self) -> Option<f64> {
        let analysis = self.analysis.as_ref()?;
        let roll_cost = self.defaults.base_cost + self.defaults.mutation_cost;
        Some(
            self.data
                .valuation
                .sell
                .price(roll_cost, analysis.tier, analysis.delta_vs_base_percent),
        )
    }

    pub fn export(&mut self) {
        match self.write_export() {
            Ok(path) => {
                tracing::info!(path = %path.display(), "results exported");
                self.status = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.status = Some(e.to_string());
            }
        }
    }

    fn write_export(&self) -> Result<PathBuf, AppError> {
        let json = export_json(self.primary.result.as_ref(), self.comparison.result.as_ref())?;
        let path = self.settings.export_path.clone();
        fs::write(&path, json)?;
        Ok(path)
    }
}

/// Pretty JSON of the finished results; infinite costs become `null`
pub fn export_json(
    primary: Option<&SimulationResult>,
    comparison: Option<&SimulationResult>,
) -> Result<String, AppError> {
    if primary.is_none() && comparison.is_none() {
        return Err(AppError::NothingToExport);
    }
    Ok(serde_json::to_string_pretty(&Export { primary, comparison })?)
}

fn cycle<T: Copy + PartialEq>(values: &[T], current: T, step: i32) -> T {
    let len = values.len() as i32;
    let idx = values.iter().position(|v| *v == current).unwrap_or(0) as i32;
    values[((idx + step).rem_euclid(len)) as usize]
}
