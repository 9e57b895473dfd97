//! Cost analysis - Odds-based cost to obtain each tier, expected value and ROI

use crate::tier::{Tier, TierLetter};
use crate::valuation::Valuation;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Exact trial counts per tier label
pub type TierHistogram = BTreeMap<Tier, u64>;

/// What a cost row aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostGroup {
    /// A single label such as `B+`
    Tier(Tier),
    /// A letter and its `+` variant combined
    Total(TierLetter),
}

impl CostGroup {
    pub fn label(&self) -> String {
        match self {
            CostGroup::Tier(tier) => tier.label(),
            CostGroup::Total(letter) => format!("{letter} Total"),
        }
    }
}

/// One row of the cost table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierCost {
    pub group: CostGroup,
    pub count: u64,
    /// Rolls needed on average to see one, `inf` when never observed
    #[serde(serialize_with = "finite_or_null", deserialize_with = "null_as_infinite")]
    pub odds: f64,
    /// `(base_cost + mutation_cost) * odds`, `inf` when never observed
    #[serde(serialize_with = "finite_or_null", deserialize_with = "null_as_infinite")]
    pub cost: f64,
}

/// Cost table plus the coarse value estimate of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    /// Rows best first; each letter's labels are followed by its total
    pub rows: Vec<TierCost>,
    pub expected_value: f64,
    /// Percent return on one roll, `0` when a roll costs nothing
    pub roi: f64,
}

impl CostAnalysis {
    /// Analyse a finished histogram
    pub fn compute(
        histogram: &TierHistogram,
        total_trials: u64,
        base_cost: f64,
        mutation_cost: f64,
        valuation: &Valuation,
    ) -> Self {
        let roll_cost = base_cost + mutation_cost;
        let count_of = |tier: Tier| histogram.get(&tier).copied().unwrap_or(0);

        let mut rows = Vec::new();
        for letter in TierLetter::all() {
            let labels: Vec<Tier> = Tier::all().into_iter().filter(|t| t.letter == *letter).collect();
            let mut letter_count = 0;
            for tier in labels {
                let count = count_of(tier);
                letter_count += count;
                rows.push(cost_row(CostGroup::Tier(tier), count, total_trials, roll_cost));
            }
            rows.push(cost_row(CostGroup::Total(*letter), letter_count, total_trials, roll_cost));
        }

        let expected_value = if total_trials == 0 {
            0.0
        } else {
            histogram
                .iter()
                .map(|(tier, count)| roll_cost * valuation.tier_value(*tier) * (*count as f64 / total_trials as f64))
                .sum()
        };
        let roi = if roll_cost > 0.0 {
            (expected_value - roll_cost) / roll_cost * 100.0
        } else {
            0.0
        };

        CostAnalysis {
            rows,
            expected_value,
            roi,
        }
    }

    pub fn row(&self, group: CostGroup) -> Option<&TierCost> {
        self.rows.iter().find(|r| r.group == group)
    }

    /// Cost keyed by row label (`"B+"`, `"B Total"`)
    pub fn cost_per_tier(&self) -> BTreeMap<String, f64> {
        self.rows.iter().map(|r| (r.group.label(), r.cost)).collect()
    }
}

/// `odds = total / count` (`100 / (100 * count / total)`)
fn cost_row(group: CostGroup, count: u64, total_trials: u64, roll_cost: f64) -> TierCost {
    if count == 0 {
        return TierCost {
            group,
            count,
            odds: f64::INFINITY,
            cost: f64::INFINITY,
        };
    }
    let odds = total_trials as f64 / count as f64;
    TierCost {
        group,
        count,
        odds,
        cost: roll_cost * odds,
    }
}

fn finite_or_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_some(value)
    } else {
        serializer.serialize_none()
    }
}

fn null_as_infinite<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(label: &str) -> Tier {
        label.parse().unwrap()
    }

    #[test]
    fn test_row_layout() {
        let analysis = CostAnalysis::compute(&TierHistogram::new(), 10, 1.0, 1.0, &Valuation::default());
        // 13 labels + 7 totals
        assert_eq!(analysis.rows.len(), 20);
        let labels: Vec<String> = analysis.rows.iter().take(4).map(|r| r.group.label()).collect();
        assert_eq!(labels, ["S", "S+", "S Total", "A"]);
        assert_eq!(analysis.rows.last().unwrap().group.label(), "F Total");
    }

    #[test]
    fn test_unobserved_tier_costs_infinity() {
        let mut histogram = TierHistogram::new();
        histogram.insert(tier("E"), 100);
        let analysis = CostAnalysis::compute(&histogram, 100, 1_000.0, 500.0, &Valuation::default());

        let s = analysis.row(CostGroup::Tier(tier("S"))).unwrap();
        assert!(s.cost.is_infinite());
        // seen every time: odds 1, cost equals one roll
        let e = analysis.row(CostGroup::Tier(tier("E"))).unwrap();
        assert!((e.cost - 1_500.0).abs() < 1e-9);
        assert!((e.odds - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_totals_combine_plus_variant() {
        let mut histogram = TierHistogram::new();
        histogram.insert(tier("B"), 10);
        histogram.insert(tier("B+"), 15);
        histogram.insert(tier("F"), 75);
        let analysis = CostAnalysis::compute(&histogram, 100, 100.0, 0.0, &Valuation::default());

        let total = analysis.row(CostGroup::Total(TierLetter::B)).unwrap();
        assert_eq!(total.count, 25);
        assert!((total.cost - 400.0).abs() < 1e-9);
        let plus = analysis.row(CostGroup::Tier(tier("B+"))).unwrap();
        assert!((plus.odds - 100.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_expected_value_and_roi() {
        let mut histogram = TierHistogram::new();
        histogram.insert(tier("S"), 1);
        histogram.insert(tier("F"), 1);
        let analysis = CostAnalysis::compute(&histogram, 2, 60.0, 40.0, &Valuation::default());
        // 100 * (10 * 0.5 + 0.5 * 0.5)
        assert!((analysis.expected_value - 525.0).abs() < 1e-9);
        assert!((analysis.roi - 425.0).abs() < 1e-9);

        let free = CostAnalysis::compute(&histogram, 2, 0.0, 0.0, &Valuation::default());
        assert_eq!(free.roi, 0.0);
    }

    #[test]
    fn test_infinite_cost_serializes_as_null() {
        let analysis = CostAnalysis::compute(&TierHistogram::new(), 1, 1.0, 0.0, &Valuation::default());
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["rows"][0]["cost"].is_null());

        let back: CostAnalysis = serde_json::from_value(json).unwrap();
        assert!(back.rows[0].cost.is_infinite());
    }
}
