//! Error types for port operations.

/// Key-value store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend I/O failed - includes operation name for tracing.
    #[error("Store error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }
}

/// Notification delivery failures. Always logged and swallowed by the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    #[error("Recipient unreachable: {0}")]
    Unreachable(String),
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Failures reading declarative world data.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Malformed asset {path}: {message}")]
    Malformed { path: String, message: String },
}

impl AssetError {
    pub fn io(path: impl ToString, message: impl ToString) -> Self {
        Self::Io {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    pub fn malformed(path: impl ToString, message: impl ToString) -> Self {
        Self::Malformed {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}
