//! Periodic player snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::pause;
use crate::persistence::PlayerSnapshotStore;
use crate::world::PlayerRegistry;

/// Save every player each `interval` until cancelled. Failures are logged
/// and the next attempt happens on schedule.
pub async fn autosave(
    players: Arc<PlayerRegistry>,
    store: Arc<PlayerSnapshotStore>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Starting autosave");
    loop {
        if !pause(&cancel, interval).await {
            break;
        }
        match players.save_to(&store).await {
            Ok(saved) => tracing::debug!(players = saved, "Autosave complete"),
            Err(e) => tracing::error!(error = %e, "Autosave failed"),
        }
    }
    tracing::info!("Autosave stopped");
}
