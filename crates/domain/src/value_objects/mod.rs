//! Value objects - Immutable objects defined by their attributes

mod character;
mod direction;
mod effect;
mod equipment;
mod stat;
mod stat_block;

pub use character::{PlayerClass, Race};
pub use direction::Direction;
pub use effect::{Effect, EffectList};
pub use equipment::{Equipment, EquipmentSlot, Hand, PlayerEquipment};
pub use stat::{Stat, Stats};
pub use stat_block::StatBlock;
