//! Player snapshot persistence.

pub mod codec;
pub mod store;

use thiserror::Error;

use crate::infrastructure::ports::StoreError;

pub use codec::PlayerRecord;
pub use store::PlayerSnapshotStore;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to encode player snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode player snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
