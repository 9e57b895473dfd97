//! Live modifier constants configuration

use serde::{Deserialize, Serialize};

/// Tunable constants feeding the live modifier composer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveConstants {
    #[serde(default)]
    pub skills: SkillBonuses,
    #[serde(default)]
    pub fleet: FleetBoosts,
    #[serde(default)]
    pub stacking: StackingConfig,
    #[serde(default)]
    pub implant: ImplantConstants,
}

impl Default for LiveConstants {
    fn default() -> Self {
        LiveConstants {
            skills: SkillBonuses::default(),
            fleet: FleetBoosts::default(),
            stacking: StackingConfig::default(),
            implant: ImplantConstants::default(),
        }
    }
}

/// Per-level bonuses granted by each proficiency
///
/// Yield and crit values are additive per level (`1 + level * bonus`);
/// cycle and residue values are reductions (`max(0, 1 - level * reduction)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBonuses {
    #[serde(default = "default_five_percent")]
    pub mining_yield: f64,
    #[serde(default = "default_five_percent")]
    pub astrogeology_yield: f64,
    #[serde(default = "default_barge_yield")]
    pub mining_barge_yield: f64,
    #[serde(default = "default_exhumers_yield")]
    pub exhumers_yield: f64,
    #[serde(default = "default_precision_crit_chance")]
    pub mining_precision_crit_chance: f64,
    #[serde(default = "default_five_percent")]
    pub mining_exploitation_crit_bonus: f64,
    #[serde(default = "default_five_percent")]
    pub exhumers_residue_reduction: f64,
    #[serde(default = "default_five_percent")]
    pub ice_harvesting_cycle_reduction: f64,
    #[serde(default = "default_ice_hull_cycle_reduction")]
    pub mining_barge_ice_cycle_reduction: f64,
    #[serde(default = "default_ice_hull_cycle_reduction")]
    pub exhumers_ice_cycle_reduction: f64,
}

impl Default for SkillBonuses {
    fn default() -> Self {
        SkillBonuses {
            mining_yield: 0.05,
            astrogeology_yield: 0.05,
            mining_barge_yield: 0.03,
            exhumers_yield: 0.06,
            mining_precision_crit_chance: 0.10,
            mining_exploitation_crit_bonus: 0.05,
            exhumers_residue_reduction: 0.05,
            ice_harvesting_cycle_reduction: 0.05,
            mining_barge_ice_cycle_reduction: 0.03,
            exhumers_ice_cycle_reduction: 0.03,
        }
    }
}

fn default_five_percent() -> f64 {
    0.05
}
fn default_barge_yield() -> f64 {
    0.03
}
fn default_exhumers_yield() -> f64 {
    0.06
}
fn default_precision_crit_chance() -> f64 {
    0.10
}
fn default_ice_hull_cycle_reduction() -> f64 {
    0.03
}

/// Ship, module and support-fleet multipliers
///
/// The shipped tier bands are calibrated against an unboosted hull, so
/// these only enter the live chain when `enabled` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetBoosts {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_ship_role_bonus")]
    pub ship_role_yield: f64,
    /// Individual upgrade modules fitted to the ship, as multipliers
    #[serde(default = "default_module_upgrades")]
    pub module_upgrades: Vec<f64>,
    #[serde(default = "default_foreman_burst_yield")]
    pub foreman_burst_yield: f64,
    #[serde(default = "default_foreman_burst_range")]
    pub foreman_burst_range: f64,
    #[serde(default = "default_industrial_core_yield")]
    pub industrial_core_yield: f64,
    #[serde(default = "default_industrial_core_cycle_time")]
    pub industrial_core_cycle_time: f64,
    #[serde(default = "default_ice_role_cycle_time")]
    pub ice_role_cycle_time: f64,
    #[serde(default = "default_calibration")]
    pub calibration: f64,
}

impl Default for FleetBoosts {
    fn default() -> Self {
        FleetBoosts {
            enabled: false,
            ship_role_yield: default_ship_role_bonus(),
            module_upgrades: default_module_upgrades(),
            foreman_burst_yield: default_foreman_burst_yield(),
            foreman_burst_range: default_foreman_burst_range(),
            industrial_core_yield: default_industrial_core_yield(),
            industrial_core_cycle_time: default_industrial_core_cycle_time(),
            ice_role_cycle_time: default_ice_role_cycle_time(),
            calibration: default_calibration(),
        }
    }
}

fn default_ship_role_bonus() -> f64 {
    1.75
}
fn default_module_upgrades() -> Vec<f64> {
    vec![1.05, 1.05, 1.05]
}
fn default_foreman_burst_yield() -> f64 {
    1.15
}
fn default_foreman_burst_range() -> f64 {
    1.3
}
fn default_industrial_core_yield() -> f64 {
    1.5
}
fn default_industrial_core_cycle_time() -> f64 {
    0.75
}
fn default_ice_role_cycle_time() -> f64 {
    0.7
}
fn default_calibration() -> f64 {
    1.35
}

/// Diminishing-returns toggle for stacked upgrade modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Positional weights, strongest module first
    #[serde(default = "default_stacking_weights")]
    pub weights: Vec<f64>,
}

impl Default for StackingConfig {
    fn default() -> Self {
        StackingConfig {
            enabled: false,
            weights: default_stacking_weights(),
        }
    }
}

fn default_stacking_weights() -> Vec<f64> {
    vec![1.0, 0.869_119_980, 0.570_583_143, 0.282_955_709, 0.105_992_806, 0.029_991_166]
}

/// Implant percentage domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplantConstants {
    #[serde(default = "default_implant_max_percent")]
    pub max_percent: f64,
}

impl Default for ImplantConstants {
    fn default() -> Self {
        ImplantConstants {
            max_percent: default_implant_max_percent(),
        }
    }
}

fn default_implant_max_percent() -> f64 {
    5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = LiveConstants::default();
        assert!((constants.skills.mining_yield - 0.05).abs() < f64::EPSILON);
        assert!(!constants.fleet.enabled);
        assert!(!constants.stacking.enabled);
        assert!((constants.implant.max_percent - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[skills]
mining_yield = 0.10

[fleet]
enabled = true
module_upgrades = [1.09, 1.09]

[stacking]
enabled = true
"#;

        let constants: LiveConstants = toml::from_str(toml).unwrap();
        assert!((constants.skills.mining_yield - 0.10).abs() < f64::EPSILON);
        assert!((constants.skills.astrogeology_yield - 0.05).abs() < f64::EPSILON);
        assert!(constants.fleet.enabled);
        assert_eq!(constants.fleet.module_upgrades, vec![1.09, 1.09]);
        assert!((constants.fleet.ship_role_yield - 1.75).abs() < f64::EPSILON);
        assert!(constants.stacking.enabled);
        assert_eq!(constants.stacking.weights.len(), 6);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let constants: LiveConstants = toml::from_str("").unwrap();
        assert_eq!(constants, LiveConstants::default());
    }
}
