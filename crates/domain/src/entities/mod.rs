//! Domain entities - Core business objects with identity

mod item;
mod mob_template;

pub use item::Item;
pub use mob_template::{LootDrop, MobTemplate, DROP_PROBABILITY_SCALE};
