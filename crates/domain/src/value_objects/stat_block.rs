//! StatBlock - live combat numbers derived from base stats, worn equipment
//! and active effects.
//!
//! Pure derivation: a `StatBlock` borrows the three sources and computes on
//! demand, so callers can build one inside a short critical section and drop
//! it before touching any other entity.

use super::effect::EffectList;
use super::equipment::{Hand, PlayerEquipment};
use super::stat::{Stat, Stats};
use crate::combat::floor_at_zero;

#[derive(Debug, Clone, Copy)]
pub struct StatBlock<'a> {
    base: &'a Stats,
    equipment: Option<&'a PlayerEquipment>,
    effects: &'a EffectList,
}

impl<'a> StatBlock<'a> {
    /// Stat block for a character that wears equipment.
    pub fn equipped(base: &'a Stats, equipment: &'a PlayerEquipment, effects: &'a EffectList) -> Self {
        Self {
            base,
            equipment: Some(equipment),
            effects,
        }
    }

    /// Stat block for a creature without equipment slots.
    pub fn unequipped(base: &'a Stats, effects: &'a EffectList) -> Self {
        Self {
            base,
            equipment: None,
            effects,
        }
    }

    /// Base + equipment modifiers + effect modifiers, floored at zero.
    pub fn current_stat(&self, stat: Stat) -> i32 {
        let equipment = self.equipment.map_or(0, |e| e.stat_modifiers(stat));
        floor_at_zero(self.base.get(stat) + equipment + self.effects.stat_modifiers(stat))
    }

    fn passive_attack(&self) -> i32 {
        self.equipment.map_or(0, |e| e.attack_modifiers()) + self.effects.attack_modifiers()
    }

    /// Attack dealt by the weapon in `hand`; zero when that hand holds no
    /// weapon. A piece with no attack of its own, such as a shield, is not one.
    pub fn hand_attack(&self, hand: Hand) -> i32 {
        let weapon = self
            .equipment
            .and_then(|e| e.weapon_attack(hand))
            .filter(|attack| *attack != 0);
        let Some(weapon) = weapon else {
            return 0;
        };
        floor_at_zero(self.current_stat(Stat::Strength) + weapon + self.passive_attack())
    }

    /// Attack for a creature that fights without weapons.
    pub fn natural_attack(&self) -> i32 {
        floor_at_zero(self.current_stat(Stat::Strength) + self.passive_attack())
    }

    /// Sum of both hands for an equipped character, natural attack otherwise.
    pub fn total_attack(&self) -> i32 {
        match self.equipment {
            Some(_) => self.hand_attack(Hand::Right) + self.hand_attack(Hand::Left),
            None => self.natural_attack(),
        }
    }

    pub fn defense(&self) -> i32 {
        self.current_stat(Stat::Constitution)
    }

    pub fn can_see_hidden(&self) -> bool {
        self.equipment.is_some_and(|e| e.can_see_hidden()) || self.effects.can_see_hidden()
    }

    pub fn can_see_invisible(&self) -> bool {
        self.equipment.is_some_and(|e| e.can_see_invisible()) || self.effects.can_see_invisible()
    }

    pub fn is_hidden(&self) -> bool {
        self.equipment.is_some_and(|e| e.grant_hidden()) || self.effects.grant_hidden()
    }

    pub fn is_invisible(&self) -> bool {
        self.equipment.is_some_and(|e| e.grant_invisible()) || self.effects.grant_invisible()
    }
}
