//! Valuation - Tier value multipliers and sell-price estimates

use crate::config::ConfigError;
use crate::tier::{Tier, TierLetter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value model used by cost analysis and sell pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    /// Value of a roll relative to what it cost, per tier label
    tier_values: BTreeMap<Tier, f64>,
    pub sell: SellPricing,
}

impl Default for Valuation {
    fn default() -> Self {
        let tier_values = [
            ("S", 10.0),
            ("S+", 12.0),
            ("A", 5.0),
            ("A+", 6.0),
            ("B", 2.5),
            ("B+", 3.0),
            ("C", 1.5),
            ("C+", 1.8),
            ("D", 1.2),
            ("D+", 1.4),
            ("E", 1.0),
            ("E+", 1.1),
            ("F", 0.5),
        ]
        .into_iter()
        .filter_map(|(label, value)| label.parse::<Tier>().ok().map(|tier| (tier, value)))
        .collect();

        Valuation {
            tier_values,
            sell: SellPricing::default(),
        }
    }
}

impl Valuation {
    /// Value multiplier for a tier label, `1.0` for labels without an entry
    pub fn tier_value(&self, tier: Tier) -> f64 {
        self.tier_values.get(&tier).copied().unwrap_or(1.0)
    }
}

/// Sell-price estimate for a single analysed roll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellPricing {
    tier_modifiers: BTreeMap<TierLetter, f64>,
    /// Applied when the tier carries `+`
    pub optimal_range_modifier: f64,
}

impl Default for SellPricing {
    fn default() -> Self {
        let tier_modifiers = TierLetter::all()
            .iter()
            .copied()
            .zip([2.0, 1.8, 1.6, 1.4, 1.2, 1.0, 0.8])
            .collect();
        SellPricing {
            tier_modifiers,
            optimal_range_modifier: 1.0,
        }
    }
}

impl SellPricing {
    /// Modifier for a letter; letters without an entry use `F`'s
    pub fn tier_modifier(&self, letter: TierLetter) -> f64 {
        self.tier_modifiers
            .get(&letter)
            .or_else(|| self.tier_modifiers.get(&TierLetter::F))
            .copied()
            .unwrap_or(0.8)
    }

    /// `roll_cost * tier_modifier * (1 + delta%) * range_modifier(+)`
    ///
    /// `delta_vs_base_percent` is how far the roll's effective rate sits
    /// above (or below) the un-mutated module. Non-positive costs price at 0.
    pub fn price(&self, roll_cost: f64, tier: Tier, delta_vs_base_percent: f64) -> f64 {
        if roll_cost <= 0.0 {
            return 0.0;
        }
        let range_modifier = if tier.plus {
            self.optimal_range_modifier
        } else {
            1.0
        };
        roll_cost * self.tier_modifier(tier.letter) * (1.0 + delta_vs_base_percent / 100.0) * range_modifier
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSell {
    #[serde(default)]
    tier_modifiers: BTreeMap<String, f64>,
    #[serde(default)]
    optimal_range_modifier: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ValuationFile {
    #[serde(default)]
    tier_values: BTreeMap<String, f64>,
    #[serde(default)]
    sell: RawSell,
}

fn parse_label(label: &str) -> Result<Tier, ConfigError> {
    label
        .parse()
        .map_err(|e| ConfigError::ValidationError(format!("{e}")))
}

/// Load valuation tables from a TOML string
///
/// Entries override the defaults; a negative optimal range modifier is
/// clamped to zero.
pub fn parse_valuation(content: &str) -> Result<Valuation, ConfigError> {
    let file: ValuationFile = crate::config::parse_toml(content)?;
    let mut valuation = Valuation::default();

    for (label, value) in file.tier_values {
        valuation.tier_values.insert(parse_label(&label)?, value);
    }

    for (label, value) in file.sell.tier_modifiers {
        let tier = parse_label(&label)?;
        if tier.plus {
            return Err(ConfigError::ValidationError(format!(
                "sell modifier {label} must name a plain letter"
            )));
        }
        valuation.sell.tier_modifiers.insert(tier.letter, value);
    }

    if let Some(modifier) = file.sell.optimal_range_modifier {
        valuation.sell.optimal_range_modifier = modifier.max(0.0);
    }

    Ok(valuation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(label: &str) -> Tier {
        label.parse().unwrap()
    }

    #[test]
    fn test_default_tier_values() {
        let valuation = Valuation::default();
        assert!((valuation.tier_value(tier("S+")) - 12.0).abs() < f64::EPSILON);
        assert!((valuation.tier_value(tier("F")) - 0.5).abs() < f64::EPSILON);
        // F+ is never produced and has no entry
        assert!((valuation.tier_value(Tier::new(TierLetter::F, true)) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sell_price_formula() {
        let pricing = SellPricing::default();
        // 100 * 1.8 * 1.05
        let price = pricing.price(100.0, tier("A"), 5.0);
        assert!((price - 189.0).abs() < 1e-9);
        assert!((pricing.price(0.0, tier("S"), 10.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_plus_uses_range_modifier() {
        let valuation = parse_valuation("[sell]\noptimal_range_modifier = 1.25\n").unwrap();
        let plain = valuation.sell.price(100.0, tier("B"), 0.0);
        let plus = valuation.sell.price(100.0, tier("B+"), 0.0);
        assert!((plus - plain * 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_parse_overrides_and_clamps() {
        let toml = r#"
[tier_values]
"S+" = 20.0

[sell]
optimal_range_modifier = -3.0

[sell.tier_modifiers]
S = 3.0
"#;
        let valuation = parse_valuation(toml).unwrap();
        assert!((valuation.tier_value(tier("S+")) - 20.0).abs() < f64::EPSILON);
        assert!((valuation.tier_value(tier("A")) - 5.0).abs() < f64::EPSILON);
        assert!((valuation.sell.tier_modifier(TierLetter::S) - 3.0).abs() < f64::EPSILON);
        assert!((valuation.sell.optimal_range_modifier - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(parse_valuation("[tier_values]\nZ = 1.0\n").is_err());
        assert!(parse_valuation("[sell.tier_modifiers]\n\"A+\" = 1.0\n").is_err());
    }
}
