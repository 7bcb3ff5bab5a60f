//! mudworld Engine library.
//!
//! The live simulation of a persistent multi-user world.
//!
//! ## Structure
//!
//! - `entities/` - Rooms, doors, players and mobs with their live state
//! - `battle/` - Turn-based battles and the engine that merges them
//! - `tasks/` - Regeneration, shout garbage collection and autosave loops
//! - `persistence/` - Player snapshot codec and storage
//! - `world/` - World loading, lifecycle and the player command surface
//! - `infrastructure/` - External dependency implementations (ports + adapters)

pub mod battle;
pub mod entities;
pub mod infrastructure;
pub mod persistence;
pub mod tasks;
pub mod world;

/// Test fixtures shared by unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use world::{World, WorldError, WorldPorts};
