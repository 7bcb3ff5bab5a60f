//! Mob templates - the shared definition every spawned mob copies.

use serde::{Deserialize, Serialize};

use crate::entities::Item;
use crate::value_objects::{EffectList, Stats};
use crate::{DomainError, MobTemplateId};

/// Loot chance denominator: probabilities are "x out of 10000".
pub const DROP_PROBABILITY_SCALE: u32 = 10_000;

/// One entry of a loot table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootDrop {
    pub item: Item,
    pub probability: u32,
}

impl LootDrop {
    /// Whether a roll in `1..=10000` wins this drop.
    pub fn wins(&self, roll: u32) -> bool {
        roll <= self.probability
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobTemplate {
    pub id: MobTemplateId,
    pub name: String,
    #[serde(default)]
    pub stats: Stats,
    pub max_hp: i32,
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub effects: EffectList,
    #[serde(default)]
    pub drops: Vec<LootDrop>,
}

impl MobTemplate {
    pub fn new(id: impl Into<MobTemplateId>, name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats: Stats::new(),
            max_hp,
            experience: 0,
            effects: EffectList::new(),
            drops: Vec::new(),
        }
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_experience(mut self, experience: i64) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_effects(mut self, effects: EffectList) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_drop(mut self, item: Item, probability: u32) -> Self {
        self.drops.push(LootDrop { item, probability });
        self
    }

    /// Checks the invariants loaded data must satisfy.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation(format!("mob template '{}' has no name", self.id)));
        }
        if self.max_hp <= 0 {
            return Err(DomainError::validation(format!(
                "mob template '{}' must have positive max_hp, got {}",
                self.id, self.max_hp
            )));
        }
        if let Some(drop) = self.drops.iter().find(|d| d.probability > DROP_PROBABILITY_SCALE) {
            return Err(DomainError::validation(format!(
                "mob template '{}' drop '{}' exceeds {} probability",
                self.id, drop.item.name, DROP_PROBABILITY_SCALE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_roll_is_inclusive() {
        let drop = LootDrop {
            item: Item::new("fang", "wolf fang"),
            probability: 2500,
        };
        assert!(drop.wins(1));
        assert!(drop.wins(2500));
        assert!(!drop.wins(2501));
    }

    #[test]
    fn validate_rejects_bad_templates() {
        assert!(MobTemplate::new("rat", "rat", 5).validate().is_ok());
        assert!(MobTemplate::new("rat", "rat", 0).validate().is_err());
        assert!(MobTemplate::new("rat", " ", 5).validate().is_err());
        assert!(MobTemplate::new("rat", "rat", 5)
            .with_drop(Item::new("tail", "tail"), 10_001)
            .validate()
            .is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"id": "wolf", "name": "grey wolf", "max_hp": 30}"#;
        let template: MobTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.id.as_str(), "wolf");
        assert!(template.drops.is_empty());
        assert_eq!(template.experience, 0);
    }
}
