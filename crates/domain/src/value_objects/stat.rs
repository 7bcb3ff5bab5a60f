//! Stat value object - the base attributes every character and mob carries.
//!
//! Strength drives attack and Constitution drives defense; the remaining
//! attributes are stored and aggregated but not yet consumed by combat.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// One named attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    /// Physical attack and carrying capacity
    Strength,
    /// Defense and health
    Constitution,
    /// Evasion and hit rate
    Dexterity,
    /// Magical attack and mana
    Intelligence,
    /// Magical defense and restoration
    Wisdom,
    /// Critical rate and loot
    Luck,
}

impl Stat {
    pub fn all() -> [Stat; 6] {
        [
            Self::Strength,
            Self::Constitution,
            Self::Dexterity,
            Self::Intelligence,
            Self::Wisdom,
            Self::Luck,
        ]
    }

    /// Short uppercase label (e.g., "STR").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Constitution => "CON",
            Self::Dexterity => "DEX",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Luck => "LCK",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STR" | "STRENGTH" => Ok(Self::Strength),
            "CON" | "CONSTITUTION" => Ok(Self::Constitution),
            "DEX" | "DEXTERITY" => Ok(Self::Dexterity),
            "INT" | "INTELLIGENCE" => Ok(Self::Intelligence),
            "WIS" | "WISDOM" => Ok(Self::Wisdom),
            "LCK" | "LUCK" => Ok(Self::Luck),
            other => Err(DomainError::parse(format!("unknown stat '{other}'"))),
        }
    }
}

/// Sparse stat table. Missing entries read as zero, which is what makes the
/// same type usable both as a base block and as a modifier set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(BTreeMap<Stat, i32>);

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stat: Stat, value: i32) -> Self {
        self.0.insert(stat, value);
        self
    }

    pub fn get(&self, stat: Stat) -> i32 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        self.0.insert(stat, value);
    }
}

impl FromIterator<(Stat, i32)> for Stats {
    fn from_iter<T: IntoIterator<Item = (Stat, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
