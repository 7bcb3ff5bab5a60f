//! Per-entity regeneration loops.

use std::sync::Arc;
use std::time::Duration;

use mudworld_domain::RoomId;
use tokio_util::sync::CancellationToken;

use super::pause;
use crate::entities::{Mob, MobPulse, Player};
use crate::infrastructure::ports::ClockPort;

#[derive(Debug, Clone)]
pub struct PlayerRegenConfig {
    pub interval: Duration,
    /// Where regeneration is multiplied.
    pub safe_room: RoomId,
    pub safe_room_multiplier: i32,
}

/// Heal `player` every interval, faster while resting in the safe room.
pub async fn player_regeneration(
    player: Arc<Player>,
    config: PlayerRegenConfig,
    cancel: CancellationToken,
) {
    tracing::debug!(user_id = %player.user_id(), "Starting player regeneration");
    loop {
        if !pause(&cancel, config.interval).await {
            break;
        }

        let multiplier = if player.room().await == config.safe_room {
            config.safe_room_multiplier
        } else {
            1
        };
        let healed = player.regenerate(multiplier).await;
        if healed > 0 {
            tracing::debug!(user_id = %player.user_id(), healed, "Player regenerated");
        }
    }
    tracing::debug!(user_id = %player.user_id(), "Player regeneration stopped");
}

/// Heal `mob` every interval and bring it back once it has been dead for
/// `respawn_delay`.
pub async fn mob_regeneration(
    mob: Arc<Mob>,
    clock: Arc<dyn ClockPort>,
    interval: Duration,
    respawn_delay: Duration,
    cancel: CancellationToken,
) {
    loop {
        if !pause(&cancel, interval).await {
            break;
        }

        if let MobPulse::Respawned = mob.regenerate(clock.now(), respawn_delay).await {
            tracing::debug!(mob_id = %mob.id(), room_id = %mob.room(), name = mob.name(), "Mob respawned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MockBattleRequester, PlayerState};
    use crate::infrastructure::ports::MockClockPort;
    use crate::test_fixtures::{wolf, RecordingNotifier};
    use chrono::{DateTime, Utc};
    use mudworld_domain::{MobInstanceId, UserId};

    fn player_in(room: &str) -> Arc<Player> {
        Arc::new(Player::new(
            UserId::new("alice"),
            PlayerState::new_character("alice", RoomId::new(room)),
            Arc::new(RecordingNotifier::new()),
            Arc::new(MockBattleRequester::new()),
        ))
    }

    fn config() -> PlayerRegenConfig {
        PlayerRegenConfig {
            interval: Duration::from_millis(10),
            safe_room: RoomId::new("midgaard_temple"),
            safe_room_multiplier: 3,
        }
    }

    #[tokio::test]
    async fn player_heals_until_cancelled() {
        let player = player_in("midgaard_square");
        player.take_damage(50).await;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(player_regeneration(Arc::clone(&player), config(), cancel.clone()));

        tokio::time::sleep(Duration::from_millis(60)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();

        let hp = player.hp().await;
        assert!(hp > 50 && hp <= 100, "hp was {hp}");
    }

    #[tokio::test]
    async fn safe_room_heals_three_times_faster() {
        let player = player_in("midgaard_temple");
        player.take_damage(90).await;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(player_regeneration(Arc::clone(&player), config(), cancel.clone()));

        while player.hp().await == 10 {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        cancel.cancel();
        handle.await.unwrap();

        let hp = player.hp().await;
        assert_eq!((hp - 10) % 30, 0, "hp was {hp}");
    }

    #[tokio::test]
    async fn dead_mob_respawns_after_delay() {
        let mob = Arc::new(Mob::spawn(
            MobInstanceId::new(),
            Arc::new(wolf()),
            RoomId::new("forest_path"),
        ));
        let died = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        mob.take_damage(30).await;
        mob.die(died).await;

        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(move || died + chrono::Duration::minutes(5));

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(mob_regeneration(
            Arc::clone(&mob),
            Arc::new(clock),
            Duration::from_millis(5),
            Duration::from_secs(300),
            cancel.clone(),
        ));

        tokio::time::timeout(Duration::from_secs(1), async {
            while !mob.is_alive().await {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .unwrap();
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(mob.hp().await, 30);
    }

    #[tokio::test]
    async fn loops_exit_promptly_on_shutdown() {
        let cancel = CancellationToken::new();
        let mob = Arc::new(Mob::spawn(MobInstanceId::new(), Arc::new(wolf()), RoomId::new("r")));
        let mob_task = tokio::spawn(mob_regeneration(
            mob,
            Arc::new(MockClockPort::new()),
            Duration::from_secs(60),
            Duration::from_secs(300),
            cancel.clone(),
        ));
        let player_task = tokio::spawn(player_regeneration(
            player_in("r"),
            PlayerRegenConfig {
                interval: Duration::from_secs(60),
                ..config()
            },
            cancel.clone(),
        ));

        cancel.cancel();
        tokio::time::timeout(Duration::from_millis(500), async {
            mob_task.await.unwrap();
            player_task.await.unwrap();
        })
        .await
        .unwrap();
    }
}
