//! Unified infrastructure error types.

use super::ports::{AssetError, NotifyError, StoreError};
use thiserror::Error;

/// Aggregate of every failure an infrastructure port can report.
#[derive(Debug, Error)]
pub enum InfraError {
    /// Key-value store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Notification delivery failed.
    #[error("Notify error: {0}")]
    Notify(#[from] NotifyError),

    /// World data could not be read.
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
