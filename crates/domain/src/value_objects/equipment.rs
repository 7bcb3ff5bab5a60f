//! Equipment slots and the worn/wielded set of a character.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::effect::EffectList;
use super::stat::{Stat, Stats};
use crate::entities::Item;

/// Where a piece of equipment is worn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Head,
    Chest,
    Legs,
    Feet,
    /// Default slot for anything wieldable
    RightHand,
    LeftHand,
    Necklace,
    /// Default slot for rings
    RightRing,
    LeftRing,
}

impl EquipmentSlot {
    pub fn is_hand(&self) -> bool {
        matches!(self, Self::RightHand | Self::LeftHand)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Chest => "chest",
            Self::Legs => "legs",
            Self::Feet => "feet",
            Self::RightHand => "right hand",
            Self::LeftHand => "left hand",
            Self::Necklace => "neck",
            Self::RightRing => "right ring finger",
            Self::LeftRing => "left ring finger",
        }
    }
}

/// Which hand a weapon attack is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Right,
    Left,
}

impl Hand {
    pub fn slot(&self) -> EquipmentSlot {
        match self {
            Self::Right => EquipmentSlot::RightHand,
            Self::Left => EquipmentSlot::LeftHand,
        }
    }
}

/// A single wearable or wieldable piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(flatten)]
    pub item: Item,
    pub slot: EquipmentSlot,
    #[serde(default)]
    pub stats_modifiers: Stats,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub magic_effects: EffectList,
}

impl Equipment {
    pub fn new(item: Item, slot: EquipmentSlot) -> Self {
        Self {
            item,
            slot,
            stats_modifiers: Stats::new(),
            attack: 0,
            magic_effects: EffectList::new(),
        }
    }

    pub fn with_attack(mut self, attack: i32) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_stat(mut self, stat: Stat, modifier: i32) -> Self {
        self.stats_modifiers.set(stat, modifier);
        self
    }

    pub fn with_effects(mut self, effects: EffectList) -> Self {
        self.magic_effects = effects;
        self
    }
}

/// Everything a character currently wears, at most one piece per slot.
///
/// An item's magic effects count as active effects of the wearer, so their
/// attack and stat modifiers are folded into the equipment totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerEquipment(BTreeMap<EquipmentSlot, Equipment>);

impl PlayerEquipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wears `equipment` in its own slot, returning whatever it replaced.
    pub fn equip(&mut self, equipment: Equipment) -> Option<Equipment> {
        self.0.insert(equipment.slot, equipment)
    }

    /// Wears `equipment` in an explicit slot (e.g. a weapon in the left hand).
    pub fn equip_in(&mut self, slot: EquipmentSlot, mut equipment: Equipment) -> Option<Equipment> {
        equipment.slot = slot;
        self.0.insert(slot, equipment)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Equipment> {
        self.0.remove(&slot)
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Equipment> {
        self.0.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EquipmentSlot, &Equipment)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attack of the weapon held in `hand`, or `None` when the hand is empty.
    pub fn weapon_attack(&self, hand: Hand) -> Option<i32> {
        self.0.get(&hand.slot()).map(|weapon| weapon.attack)
    }

    /// Passive attack bonus: non-hand pieces plus every magic effect.
    pub fn attack_modifiers(&self) -> i32 {
        let worn: i32 = self
            .0
            .iter()
            .filter(|(slot, _)| !slot.is_hand())
            .map(|(_, piece)| piece.attack)
            .sum();
        let enchantments: i32 = self
            .0
            .values()
            .map(|piece| piece.magic_effects.attack_modifiers())
            .sum();
        worn + enchantments
    }

    pub fn stat_modifiers(&self, stat: Stat) -> i32 {
        self.0
            .values()
            .map(|piece| piece.stats_modifiers.get(stat) + piece.magic_effects.stat_modifiers(stat))
            .sum()
    }

    pub fn can_see_hidden(&self) -> bool {
        self.0.values().any(|piece| piece.magic_effects.can_see_hidden())
    }

    pub fn can_see_invisible(&self) -> bool {
        self.0.values().any(|piece| piece.magic_effects.can_see_invisible())
    }

    pub fn grant_hidden(&self) -> bool {
        self.0.values().any(|piece| piece.magic_effects.grant_hidden())
    }

    pub fn grant_invisible(&self) -> bool {
        self.0.values().any(|piece| piece.magic_effects.grant_invisible())
    }
}
