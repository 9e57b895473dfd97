//! Tier labels and classification

mod bands;

pub use bands::{TierBand, TierBands};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Quality letter of a roll, best first
///
/// The derived ordering is presentation order (`S` sorts first). Compare
/// quality with [`TierLetter::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TierLetter {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl TierLetter {
    pub fn all() -> &'static [TierLetter] {
        &[
            TierLetter::S,
            TierLetter::A,
            TierLetter::B,
            TierLetter::C,
            TierLetter::D,
            TierLetter::E,
            TierLetter::F,
        ]
    }

    /// Letters that own an explicit numeric band (everything but `F`)
    pub fn banded() -> &'static [TierLetter] {
        &[
            TierLetter::S,
            TierLetter::A,
            TierLetter::B,
            TierLetter::C,
            TierLetter::D,
            TierLetter::E,
        ]
    }

    /// Quality rank, `S` = 6 down to `F` = 0
    pub fn rank(&self) -> u8 {
        match self {
            TierLetter::S => 6,
            TierLetter::A => 5,
            TierLetter::B => 4,
            TierLetter::C => 3,
            TierLetter::D => 2,
            TierLetter::E => 1,
            TierLetter::F => 0,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            TierLetter::S => 'S',
            TierLetter::A => 'A',
            TierLetter::B => 'B',
            TierLetter::C => 'C',
            TierLetter::D => 'D',
            TierLetter::E => 'E',
            TierLetter::F => 'F',
        }
    }

    fn from_char(c: char) -> Option<TierLetter> {
        match c.to_ascii_uppercase() {
            'S' => Some(TierLetter::S),
            'A' => Some(TierLetter::A),
            'B' => Some(TierLetter::B),
            'C' => Some(TierLetter::C),
            'D' => Some(TierLetter::D),
            'E' => Some(TierLetter::E),
            'F' => Some(TierLetter::F),
            _ => None,
        }
    }
}

impl fmt::Display for TierLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A tier label: letter plus the optional `+` (optimal range above base)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tier {
    pub letter: TierLetter,
    pub plus: bool,
}

impl Tier {
    pub fn new(letter: TierLetter, plus: bool) -> Self {
        Tier { letter, plus }
    }

    pub fn plain(letter: TierLetter) -> Self {
        Tier::new(letter, false)
    }

    /// The 13 labels a classification can produce, best first (`F+` is never produced)
    pub fn all() -> Vec<Tier> {
        TierLetter::all()
            .iter()
            .flat_map(|&letter| {
                let plus = (letter != TierLetter::F).then_some(Tier::new(letter, true));
                [Some(Tier::plain(letter)), plus]
            })
            .flatten()
            .collect()
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.plus {
            write!(f, "{}+", self.letter)
        } else {
            write!(f, "{}", self.letter)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tier label: {0:?}")]
pub struct ParseTierError(pub String);

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (body, plus) = match trimmed.strip_suffix('+') {
            Some(body) => (body, true),
            None => (trimmed, false),
        };
        let mut chars = body.chars();
        match (chars.next().and_then(TierLetter::from_char), chars.next()) {
            (Some(letter), None) => Ok(Tier::new(letter, plus)),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Apply the `+` suffix rule to a numeric tier
///
/// The suffix compares the rolled optimal range before proficiency bonuses
/// against the base module's range. `F` never carries `+`.
pub fn with_range_suffix(letter: TierLetter, rolled_range: Option<f64>, base_range: Option<f64>) -> Tier {
    let plus = match (rolled_range, base_range) {
        (Some(rolled), Some(base)) => rolled > base && letter != TierLetter::F,
        _ => false,
    };
    Tier::new(letter, plus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirteen_labels() {
        let all = Tier::all();
        assert_eq!(all.len(), 13);
        assert_eq!(all[0].label(), "S");
        assert_eq!(all[1].label(), "S+");
        assert_eq!(all[12].label(), "F");
        assert!(!all.contains(&Tier::new(TierLetter::F, true)));
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("A+".parse::<Tier>(), Ok(Tier::new(TierLetter::A, true)));
        assert_eq!("c".parse::<Tier>(), Ok(Tier::plain(TierLetter::C)));
        assert!("G".parse::<Tier>().is_err());
        assert!("AA".parse::<Tier>().is_err());
        assert!("".parse::<Tier>().is_err());
    }

    #[test]
    fn test_rank_orders_quality() {
        for pair in TierLetter::all().windows(2) {
            assert!(pair[0].rank() > pair[1].rank());
        }
    }

    #[test]
    fn test_suffix_rule() {
        assert_eq!(
            with_range_suffix(TierLetter::B, Some(19.0), Some(18.75)),
            Tier::new(TierLetter::B, true)
        );
        assert_eq!(
            with_range_suffix(TierLetter::B, Some(18.75), Some(18.75)),
            Tier::plain(TierLetter::B)
        );
        assert_eq!(
            with_range_suffix(TierLetter::F, Some(25.0), Some(18.75)),
            Tier::plain(TierLetter::F)
        );
        assert_eq!(with_range_suffix(TierLetter::S, None, Some(18.75)), Tier::plain(TierLetter::S));
    }

    #[test]
    fn test_tier_serializes_as_label() {
        let json = serde_json::to_string(&Tier::new(TierLetter::D, true)).unwrap();
        assert_eq!(json, "\"D+\"");
        let back: Tier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tier::new(TierLetter::D, true));
    }
}
