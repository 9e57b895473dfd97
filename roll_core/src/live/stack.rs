//! MultiplierStack - Ordered list of independent multiplicative factors

use serde::{Deserialize, Serialize};

/// Factors that scale one live quantity
///
/// Each entry is a full multiplier (`1.05` = +5%, `0.95` = -5%). Factors
/// are independent, so the net multiplier is their product:
/// `Π(factor)`, and an empty stack is exactly `1.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiplierStack {
    factors: Vec<f64>,
}

impl MultiplierStack {
    pub const fn new() -> Self {
        MultiplierStack { factors: Vec::new() }
    }

    pub fn from_factors(factors: Vec<f64>) -> Self {
        MultiplierStack { factors }
    }

    /// Add a factor
    pub fn push(&mut self, factor: f64) {
        self.factors.push(factor);
    }

    pub fn extend<I: IntoIterator<Item = f64>>(&mut self, factors: I) {
        self.factors.extend(factors);
    }

    pub fn factors(&self) -> &[f64] {
        &self.factors
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Net multiplier: product of all factors, `1.0` when empty
    pub fn reduce(&self) -> f64 {
        reduce(&self.factors)
    }
}

/// Fold a factor list into one scalar
pub fn reduce(factors: &[f64]) -> f64 {
    factors.iter().product()
}

/// Diminishing returns for a stack of same-kind upgrades
///
/// Factors are ordered by the size of their effect, strongest first, and
/// the `n`th one keeps only `weights[n]` of its bonus:
/// `1 + (factor - 1) * weights[n]`. Positions past the table contribute
/// nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackingPenalty {
    weights: Vec<f64>,
}

impl StackingPenalty {
    pub fn new(weights: Vec<f64>) -> Self {
        StackingPenalty { weights }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Penalized copy of `factors`, strongest first
    pub fn apply(&self, factors: &[f64]) -> Vec<f64> {
        let mut ordered = factors.to_vec();
        ordered.sort_by(|a, b| (b - 1.0).abs().total_cmp(&(a - 1.0).abs()));

        ordered
            .into_iter()
            .enumerate()
            .map(|(position, factor)| {
                let weight = self.weights.get(position).copied().unwrap_or(0.0);
                1.0 + (factor - 1.0) * weight
            })
            .collect()
    }
}
