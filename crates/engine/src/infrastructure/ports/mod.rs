//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY infrastructure abstractions in the engine. Ports exist for:
//! - Message delivery (the chat transport lives outside the core)
//! - Durable key-value storage (player snapshots)
//! - Declarative world data (areas and mob templates)
//! - Clock/Random (for testing)

mod error;
mod external;
mod testing;
pub mod types;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{AssetSource, KvStorePort, NotifierPort};

#[cfg(test)]
pub use external::{MockKvStorePort, MockNotifierPort};

// =============================================================================
// Types from types module (re-export for visibility)
// =============================================================================
pub use types::{AreaFile, NeighbourDef, RoomDef, EXTERNAL_ROOM_PREFIX};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{AssetError, NotifyError, StoreError};
