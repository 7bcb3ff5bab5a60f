//! Notifier that writes every message to the log.
//!
//! Stands in for a real chat transport when the engine runs standalone.

use async_trait::async_trait;
use mudworld_domain::UserId;

use crate::infrastructure::ports::{NotifierPort, NotifyError};

#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifierPort for TracingNotifier {
    async fn notify(&self, user_id: &UserId, message: &str) -> Result<(), NotifyError> {
        tracing::info!(user_id = %user_id, message = %message, "Notify");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_delivers() {
        let notifier = TracingNotifier::new();
        let result = notifier.notify(&UserId::new("u1"), "hello").await;
        assert!(result.is_ok());
    }
}
