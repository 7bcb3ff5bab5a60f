//! mudworld domain model.
//!
//! Pure, synchronous types shared by the engine: identifiers, stats,
//! effects, equipment, mob templates and combat arithmetic. Nothing here
//! performs I/O or holds a lock.

pub mod combat;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{Item, LootDrop, MobTemplate, DROP_PROBABILITY_SCALE};

pub use error::DomainError;

// Re-export ID types
pub use ids::{AreaId, BattleId, ItemId, MobInstanceId, MobTemplateId, RoomId, ShoutId, UserId};

// Re-export value objects
pub use value_objects::{
    Direction, Effect, EffectList, Equipment, EquipmentSlot, Hand, PlayerClass, PlayerEquipment,
    Race, Stat, StatBlock, Stats,
};
