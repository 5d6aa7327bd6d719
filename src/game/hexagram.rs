//! Hexagram table
//!
//! Maps every [`ReadingKey`] to a named reading. The built-in table is
//! total; a table supplied through configuration may leave gaps, which
//! are reported when the table is built and again on lookup.

use serde::{Deserialize, Serialize};

use super::error::OracleError;
use super::reading::ReadingKey;

/// Shown when a key has no table entry.
pub const UNRECOGNIZED_MESSAGE: &str = "无法解析此卦象，请重新抛掷。";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hexagram {
    pub name: String,
    pub meaning: String,
}

/// One table row as it appears in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramEntry {
    pub key: ReadingKey,
    pub name: String,
    pub meaning: String,
}

/// (key, name, meaning)
pub const DEFAULT_HEXAGRAMS: [(&str, &str, &str); 8] = [
    (
        "阳阳阳",
        "乾卦 ☰",
        "乾为天，刚健中正。象征天行健，君子以自强不息。",
    ),
    (
        "阴阴阴",
        "坤卦 ☷",
        "坤为地，柔顺厚德。象征地势坤，君子以厚德载物。",
    ),
    (
        "阳阴阳",
        "震卦 ☳",
        "震为雷，震惊百里。象征雷霆行动，君子以恐惧修省。",
    ),
    (
        "阴阳阴",
        "艮卦 ☶",
        "艮为山，刚止而静。象征山不动，君子以思不出其位。",
    ),
    (
        "阳阳阴",
        "坎卦 ☵",
        "坎为水，险陷不测。象征行险而不失其信，君子以修身节行。",
    ),
    (
        "阴阴阳",
        "离卦 ☲",
        "离为火，丽泽明白。象征日月丽天，君子以继明照于四方。",
    ),
    (
        "阴阳阳",
        "兑卦 ☱",
        "兑为泽，喜悦和顺。象征刚内柔外，君子以和愉群众。",
    ),
    (
        "阳阴阴",
        "巽卦 ☴",
        "巽为风，谦逊随顺。象征无孔不入，君子以广行教化。",
    ),
];

static_assertions::const_assert_eq!(DEFAULT_HEXAGRAMS.len(), ReadingKey::COUNT);

#[derive(Debug, Clone, PartialEq)]
pub struct HexagramTable {
    entries: [Option<Hexagram>; ReadingKey::COUNT],
}

impl Default for HexagramTable {
    fn default() -> Self {
        let mut entries: [Option<Hexagram>; ReadingKey::COUNT] = Default::default();
        for (key, name, meaning) in DEFAULT_HEXAGRAMS {
            // The built-in keys are literals; an unparsable one would leave a gap
            // that `is_total` and the tests catch.
            if let Ok(key) = key.parse::<ReadingKey>() {
                entries[key.index()] = Some(Hexagram {
                    name: name.to_string(),
                    meaning: meaning.to_string(),
                });
            }
        }
        Self { entries }
    }
}

impl HexagramTable {
    /// Build a table from configuration rows. Duplicate keys are rejected;
    /// missing keys are allowed and logged.
    pub fn from_entries(rows: &[HexagramEntry]) -> Result<Self, OracleError> {
        let mut entries: [Option<Hexagram>; ReadingKey::COUNT] = Default::default();
        for row in rows {
            let slot = &mut entries[row.key.index()];
            if slot.is_some() {
                return Err(OracleError::InvalidConfig(format!(
                    "duplicate hexagram key {}",
                    row.key
                )));
            }
            *slot = Some(Hexagram {
                name: row.name.clone(),
                meaning: row.meaning.clone(),
            });
        }
        let table = Self { entries };
        if !table.is_total() {
            let keys: Vec<String> = table.missing_keys().iter().map(ToString::to_string).collect();
            tracing::warn!(missing = ?keys, "hexagram table has gaps");
        }
        Ok(table)
    }

    pub fn lookup(&self, key: &ReadingKey) -> Option<&Hexagram> {
        self.entries[key.index()].as_ref()
    }

    pub fn missing_keys(&self) -> Vec<ReadingKey> {
        ReadingKey::all().filter(|k| self.lookup(k).is_none()).collect()
    }

    pub fn is_total(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }
}
