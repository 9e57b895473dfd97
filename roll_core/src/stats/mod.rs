//! StatVector - The concrete stat values of one module

use crate::types::StatKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stat values of a single module (base, rolled or live)
///
/// Built fresh for every roll and never patched in place afterwards: every
/// transformation returns a new vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatVector {
    values: BTreeMap<StatKind, f64>,
}

impl StatVector {
    pub fn new() -> Self {
        StatVector::default()
    }

    /// Build from a flat `name -> value` map such as a parsed tooltip
    ///
    /// Names are matched against both spellings of [`StatKind`]; unknown
    /// names and non-finite values are ignored.
    pub fn from_named<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let values = entries
            .into_iter()
            .filter(|(_, value)| value.is_finite())
            .filter_map(|(name, value)| StatKind::from_name(name.as_ref()).map(|s| (s, value)))
            .collect();
        StatVector { values }
    }

    /// Builder-style setter
    pub fn with(mut self, stat: StatKind, value: f64) -> Self {
        self.values.insert(stat, value);
        self
    }

    pub fn get(&self, stat: StatKind) -> Option<f64> {
        self.values.get(&stat).copied()
    }

    /// Value of a stat, `0.0` when absent
    pub fn get_or_zero(&self, stat: StatKind) -> f64 {
        self.get(stat).unwrap_or(0.0)
    }

    pub fn contains(&self, stat: StatKind) -> bool {
        self.values.contains_key(&stat)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Overlay `other` on top of `self`; values from `other` win
    pub fn merged_with(&self, other: &StatVector) -> StatVector {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (*k, *v)));
        StatVector { values }
    }

    /// Apply `f` to every value, producing a new vector
    pub fn map_values(&self, mut f: impl FnMut(StatKind, f64) -> f64) -> StatVector {
        StatVector {
            values: self.values.iter().map(|(k, v)| (*k, f(*k, *v))).collect(),
        }
    }
}

impl FromIterator<(StatKind, f64)> for StatVector {
    fn from_iter<T: IntoIterator<Item = (StatKind, f64)>>(iter: T) -> Self {
        StatVector {
            values: iter.into_iter().collect(),
        }
    }
}
