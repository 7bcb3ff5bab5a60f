//! World-wide shout record expiry.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::pause;
use crate::entities::RoomGraph;
use crate::infrastructure::ports::ClockPort;

/// Visit rooms one at a time, `interval` apart, dropping shout records older
/// than `lifespan`.
pub async fn garbage_collector(
    graph: Arc<RoomGraph>,
    clock: Arc<dyn ClockPort>,
    interval: Duration,
    lifespan: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(rooms = graph.len(), "Starting garbage collector");
    let room_ids = graph.room_ids();

    'sweep: loop {
        if room_ids.is_empty() && !pause(&cancel, interval).await {
            break;
        }

        for room_id in &room_ids {
            if !pause(&cancel, interval).await {
                break 'sweep;
            }
            let Some(room) = graph.get(room_id) else {
                continue;
            };
            let purged = room.purge_shouts(clock.now(), lifespan);
            if purged > 0 {
                tracing::debug!(room_id = %room_id, purged, "Shouts expired");
            }
        }
    }

    tracing::info!("Garbage collector stopped");
}
