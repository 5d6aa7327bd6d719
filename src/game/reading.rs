//! Outcomes and reading keys
//!
//! A coin reads as heads (阳) or tails (阴). Three outcomes, in coin
//! order, form a [`ReadingKey`]; there are exactly eight keys.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::OracleError;
use super::hexagram::Hexagram;

/// Number of coins in a toss.
pub const COIN_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// 阳
    Heads,
    /// 阴
    Tails,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Heads, Outcome::Tails];

    /// Uniformly random outcome.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Outcome::Heads
        } else {
            Outcome::Tails
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Outcome::Heads => '阳',
            Outcome::Tails => '阴',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '阳' | 'H' | 'h' => Some(Outcome::Heads),
            '阴' | 'T' | 't' => Some(Outcome::Tails),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Ordered triple of coin outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadingKey(pub [Outcome; COIN_COUNT]);

impl ReadingKey {
    /// Number of distinct keys.
    pub const COUNT: usize = 1 << COIN_COUNT;

    pub fn new(outcomes: [Outcome; COIN_COUNT]) -> Self {
        Self(outcomes)
    }

    pub fn outcomes(&self) -> &[Outcome; COIN_COUNT] {
        &self.0
    }

    /// Dense index in `0..COUNT`; the first coin is the high bit, heads is 1.
    pub fn index(&self) -> usize {
        self.0
            .iter()
            .fold(0, |acc, o| (acc << 1) | usize::from(*o == Outcome::Heads))
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Self::COUNT {
            return None;
        }
        let mut outcomes = [Outcome::Tails; COIN_COUNT];
        for (i, slot) in outcomes.iter_mut().enumerate() {
            let bit = COIN_COUNT - 1 - i;
            if (index >> bit) & 1 == 1 {
                *slot = Outcome::Heads;
            }
        }
        Some(Self(outcomes))
    }

    /// Every key, in index order.
    pub fn all() -> impl Iterator<Item = ReadingKey> {
        (0..Self::COUNT).filter_map(Self::from_index)
    }

    /// Outcomes separated by spaces, e.g. `阳 阴 阳`.
    pub fn spaced(&self) -> String {
        self.0
            .iter()
            .map(|o| o.glyph().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ReadingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.0 {
            write!(f, "{outcome}")?;
        }
        Ok(())
    }
}

impl FromStr for ReadingKey {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<Outcome> = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Outcome::from_symbol)
            .collect::<Option<_>>()
            .ok_or_else(|| OracleError::InvalidReadingKey(s.to_string()))?;
        let outcomes: [Outcome; COIN_COUNT] = symbols
            .try_into()
            .map_err(|_| OracleError::InvalidReadingKey(s.to_string()))?;
        Ok(Self(outcomes))
    }
}

impl Serialize for ReadingKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReadingKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Result of a toss: the key plus the table entry, when the table has one.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub key: ReadingKey,
    pub hexagram: Option<Hexagram>,
}

impl Reading {
    pub fn is_recognized(&self) -> bool {
        self.hexagram.is_some()
    }

    /// Headline shown to the user, e.g. `阳 阴 阳 - 震卦 ☳`.
    pub fn title(&self) -> String {
        match &self.hexagram {
            Some(h) => format!("{} - {}", self.key.spaced(), h.name),
            None => self.key.spaced(),
        }
    }
}
