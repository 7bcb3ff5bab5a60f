//! The world aggregate and everything it orchestrates.
//!
//! - `loader` turns area and mob data into the room graph
//! - `lifecycle` owns init, background tasks and shutdown
//! - `commands` is the surface the chat layer calls into
//! - `registry` holds the live players

mod commands;
pub mod error;
pub mod lifecycle;
pub mod loader;
pub mod registry;

pub use error::WorldError;
pub use lifecycle::{World, WorldPorts};
pub use loader::{LoadError, MobTemplates};
pub use registry::PlayerRegistry;
