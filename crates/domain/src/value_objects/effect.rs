//! Magical effects and their additive aggregation.

use serde::{Deserialize, Serialize};

use super::stat::{Stat, Stats};

/// A transient modifier bundle carried by a character, a mob or an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effect {
    pub attack: i32,
    pub stats_modifiers: Stats,
    pub see_hidden: bool,
    pub see_invisible: bool,
    pub grant_hidden: bool,
    pub grant_invisible: bool,
}

impl Effect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attack(mut self, attack: i32) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_stat(mut self, stat: Stat, modifier: i32) -> Self {
        self.stats_modifiers.set(stat, modifier);
        self
    }

    pub fn seeing_hidden(mut self) -> Self {
        self.see_hidden = true;
        self
    }

    pub fn seeing_invisible(mut self) -> Self {
        self.see_invisible = true;
        self
    }

    pub fn granting_hidden(mut self) -> Self {
        self.grant_hidden = true;
        self
    }

    pub fn granting_invisible(mut self) -> Self {
        self.grant_invisible = true;
        self
    }
}

/// Ordered list of active effects. Sums and ORs only, so order never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectList(Vec<Effect>);

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn attack_modifiers(&self) -> i32 {
        self.0.iter().map(|e| e.attack).sum()
    }

    pub fn stat_modifiers(&self, stat: Stat) -> i32 {
        self.0.iter().map(|e| e.stats_modifiers.get(stat)).sum()
    }

    pub fn can_see_hidden(&self) -> bool {
        self.0.iter().any(|e| e.see_hidden)
    }

    pub fn can_see_invisible(&self) -> bool {
        self.0.iter().any(|e| e.see_invisible)
    }

    pub fn grant_hidden(&self) -> bool {
        self.0.iter().any(|e| e.grant_hidden)
    }

    pub fn grant_invisible(&self) -> bool {
        self.0.iter().any(|e| e.grant_invisible)
    }
}

impl From<Vec<Effect>> for EffectList {
    fn from(value: Vec<Effect>) -> Self {
        Self(value)
    }
}

impl FromIterator<Effect> for EffectList {
    fn from_iter<T: IntoIterator<Item = Effect>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
