//! TierBands - Numeric bands that map a throughput to a tier letter

use super::{with_range_suffix, Tier, TierLetter};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// One authored band: `[min, max)`, or `[min, inf)` for `S`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub tier: TierLetter,
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl TierBand {
    /// Half-open membership test; a band without `max` is open-ended
    pub fn contains(&self, value: f64) -> bool {
        match self.max {
            Some(max) => value >= self.min && value < max,
            None => value >= self.min,
        }
    }
}

/// Validated band set for one module family
///
/// Holds exactly one band per letter `S..E`, stored best first. `F` is
/// implicit and covers `[0, E.min)` plus everything no band matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierBands {
    bands: Vec<TierBand>,
}

const BAND_EPSILON: f64 = 1e-9;

impl TierBands {
    /// Validate authored bands
    ///
    /// Requires one band per banded letter, an open-ended `S`, bounded
    /// `A..E`, non-negative finite bounds and contiguous edges so the bands
    /// plus the implicit `F` cover `[0, inf)` without gaps or overlaps.
    pub fn new(bands: Vec<TierBand>) -> Result<Self, ConfigError> {
        let mut ordered = Vec::with_capacity(TierLetter::banded().len());

        for letter in TierLetter::banded() {
            let mut matching = bands.iter().filter(|b| b.tier == *letter);
            let band = matching.next().ok_or_else(|| {
                ConfigError::ValidationError(format!("missing tier band {letter}"))
            })?;
            if matching.next().is_some() {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate tier band {letter}"
                )));
            }
            ordered.push(*band);
        }

        if bands.iter().any(|b| b.tier == TierLetter::F) {
            return Err(ConfigError::ValidationError(
                "tier F is implicit and must not be listed".to_string(),
            ));
        }

        for band in &ordered {
            if !band.min.is_finite() || band.min < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "tier {} has invalid min {}",
                    band.tier, band.min
                )));
            }
            match (band.tier, band.max) {
                (TierLetter::S, Some(_)) => {
                    return Err(ConfigError::ValidationError(
                        "tier S is open-ended and must not set max".to_string(),
                    ));
                }
                (TierLetter::S, None) => {}
                (tier, None) => {
                    return Err(ConfigError::ValidationError(format!(
                        "tier {tier} is missing max"
                    )));
                }
                (tier, Some(max)) => {
                    if !max.is_finite() || max <= band.min {
                        return Err(ConfigError::ValidationError(format!(
                            "tier {tier} has max {max} not above min {}",
                            band.min
                        )));
                    }
                }
            }
        }

        for pair in ordered.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            let edge = lower.max.unwrap_or(f64::NAN);
            if (edge - upper.min).abs() > BAND_EPSILON {
                return Err(ConfigError::ValidationError(format!(
                    "tier {} max {} does not meet tier {} min {}",
                    lower.tier, edge, upper.tier, upper.min
                )));
            }
        }

        Ok(TierBands { bands: ordered })
    }

    /// Bands best first (`S` .. `E`)
    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }

    pub fn band(&self, letter: TierLetter) -> Option<&TierBand> {
        self.bands.iter().find(|b| b.tier == letter)
    }

    /// Upper edge of the implicit `F` band
    pub fn f_ceiling(&self) -> f64 {
        self.band(TierLetter::E).map(|b| b.min).unwrap_or(0.0)
    }

    /// Classify a live effective throughput
    ///
    /// `S` is checked first, then `A..E` in order; anything unmatched
    /// (including negative and NaN input) is `F`.
    pub fn classify(&self, value: f64) -> TierLetter {
        self.bands
            .iter()
            .find(|band| band.contains(value))
            .map(|band| band.tier)
            .unwrap_or(TierLetter::F)
    }

    /// Classify and apply the optimal-range `+` suffix
    pub fn classify_roll(&self, value: f64, rolled_range: Option<f64>, base_range: Option<f64>) -> Tier {
        with_range_suffix(self.classify(value), rolled_range, base_range)
    }
}

impl<'de> Deserialize<'de> for TierBands {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bands = Vec::<TierBand>::deserialize(deserializer)?;
        TierBands::new(bands).map_err(serde::de::Error::custom)
    }
}
