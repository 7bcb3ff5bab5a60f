//! Long-running background loops.
//!
//! Every loop checks the shutdown token before each unit of work and waits
//! between units with a cancellable sleep, so it stops within one interval
//! of the signal firing.

pub mod autosave;
pub mod garbage_collector;
pub mod regeneration;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

pub use autosave::autosave;
pub use garbage_collector::garbage_collector;
pub use regeneration::{mob_regeneration, player_regeneration, PlayerRegenConfig};

/// Sleep for `duration`. Returns `false` if cancelled first.
pub(crate) async fn pause(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pause_returns_early_on_cancel() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let finished = tokio::time::timeout(Duration::from_millis(100), pause(&cancel, Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(!finished);
    }

    #[tokio::test]
    async fn pause_completes_without_cancel() {
        let cancel = CancellationToken::new();
        assert!(pause(&cancel, Duration::from_millis(1)).await);
    }
}
