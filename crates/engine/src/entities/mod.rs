//! Entity modules - live, stateful actors of the world.
//!
//! Each entity layers the pure domain model onto mutable runtime state
//! (location, health, flags) behind its own lock.

pub mod mob;
pub mod player;
pub mod room;
pub mod visibility;

pub use mob::{Mob, MobPulse};
pub use player::{BattleRequester, Player, PlayerState, Speech};
pub use room::{Door, Room, RoomGraph};
pub use visibility::{Perception, Visibility};

#[cfg(test)]
pub use player::MockBattleRequester;
