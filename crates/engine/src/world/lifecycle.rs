//! The world aggregate: load, restore, background tasks and shutdown.

use std::sync::Arc;

use mudworld_domain::UserId;
use tokio_util::task::TaskTracker;

use super::error::WorldError;
use super::loader;
use super::registry::PlayerRegistry;
use crate::battle::{BattleContext, BattleEngine};
use crate::entities::{Player, PlayerState, RoomGraph};
use crate::infrastructure::config::WorldConfig;
use crate::infrastructure::error::InfraError;
use crate::infrastructure::ports::{AssetSource, ClockPort, KvStorePort, NotifierPort, RandomPort};
use crate::infrastructure::shutdown::ShutdownSignal;
use crate::persistence::{PersistenceError, PlayerSnapshotStore};
use crate::tasks::{self, PlayerRegenConfig};

const BACK_ONLINE: &str = "The world is back online. Welcome back!";
const SHUTTING_DOWN: &str = "The world is shutting down. See you soon!";

/// External services the world talks to.
#[derive(Clone)]
pub struct WorldPorts {
    pub kv: Arc<dyn KvStorePort>,
    pub notifier: Arc<dyn NotifierPort>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
}

/// Owns every room, player, battle and background task.
pub struct World {
    pub(super) config: WorldConfig,
    pub(super) graph: Arc<RoomGraph>,
    pub(super) players: Arc<PlayerRegistry>,
    pub(super) battles: Arc<BattleEngine>,
    pub(super) ports: WorldPorts,
    snapshots: Arc<PlayerSnapshotStore>,
    shutdown: ShutdownSignal,
    tasks: TaskTracker,
}

impl World {
    /// Load world data, restore saved players and start every background task.
    pub async fn init(
        config: WorldConfig,
        assets: &dyn AssetSource,
        ports: WorldPorts,
    ) -> Result<Self, WorldError> {
        let templates = assets
            .load_mob_templates()
            .await
            .map_err(InfraError::from)?;
        let areas = assets.load_areas().await.map_err(InfraError::from)?;
        tracing::info!(
            mob_templates = templates.len(),
            areas = areas.len(),
            "World data read"
        );

        let graph = Arc::new(loader::load(
            templates,
            areas,
            &config.default_room,
            ports.random.as_ref(),
        )?);

        let shutdown = ShutdownSignal::new();
        let tasks = TaskTracker::new();
        let battles = Arc::new(BattleEngine::new(
            Arc::new(BattleContext {
                graph: Arc::clone(&graph),
                clock: Arc::clone(&ports.clock),
                random: Arc::clone(&ports.random),
                tick: config.battle_tick,
            }),
            shutdown.token(),
            tasks.clone(),
        ));
        let snapshots = Arc::new(PlayerSnapshotStore::new(
            Arc::clone(&ports.kv),
            config.snapshot_key.clone(),
        ));

        let world = Self {
            config,
            graph,
            players: Arc::new(PlayerRegistry::new()),
            battles,
            ports,
            snapshots,
            shutdown,
            tasks,
        };

        world.restore_players().await?;
        world.start_background_tasks();

        for player in world.players.all() {
            player.notify(BACK_ONLINE).await;
        }

        tracing::info!(
            rooms = world.graph.len(),
            mobs = world.mob_count(),
            players = world.players.len(),
            "World initialized"
        );
        Ok(world)
    }

    /// Put every saved player back in its room. A snapshot that cannot be
    /// read is skipped; one that cannot be decoded aborts the restore.
    async fn restore_players(&self) -> Result<(), WorldError> {
        let records = match self.snapshots.load().await {
            Ok(records) => records,
            Err(PersistenceError::Store(e)) => {
                tracing::error!(error = %e, "Player snapshot unavailable, starting with no players");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        for record in records {
            let (user_id, state) = record.restore(&self.graph);
            let room = Arc::clone(self.graph.get_or_default(&state.room));
            let player = self.new_player(user_id, state);
            if let Err(existing) = self.players.insert(Arc::clone(&player)) {
                tracing::warn!(user_id = %existing.user_id(), "Duplicate player in snapshot, keeping the first");
                continue;
            }
            room.place(&player);
        }
        tracing::info!(players = self.players.len(), "Players restored");
        Ok(())
    }

    fn start_background_tasks(&self) {
        for room in self.graph.rooms() {
            for mob in room.mobs() {
                self.tasks.spawn(tasks::mob_regeneration(
                    Arc::clone(mob),
                    Arc::clone(&self.ports.clock),
                    self.config.regen_interval,
                    self.config.mob_respawn_delay,
                    self.shutdown.token(),
                ));
            }
        }
        for player in self.players.all() {
            self.start_player_regeneration(player);
        }

        self.tasks.spawn(tasks::garbage_collector(
            Arc::clone(&self.graph),
            Arc::clone(&self.ports.clock),
            self.config.gc_interval,
            self.config.shout_lifespan,
            self.shutdown.token(),
        ));
        self.tasks.spawn(tasks::autosave(
            Arc::clone(&self.players),
            Arc::clone(&self.snapshots),
            self.config.autosave_interval,
            self.shutdown.token(),
        ));
    }

    pub(super) fn start_player_regeneration(&self, player: Arc<Player>) {
        let config = PlayerRegenConfig {
            interval: self.config.regen_interval,
            safe_room: self.graph.default_room().id().clone(),
            safe_room_multiplier: self.config.safe_room_regen_multiplier,
        };
        self.tasks
            .spawn(tasks::player_regeneration(player, config, self.shutdown.token()));
    }

    /// Attach the live capabilities to a player state.
    pub(super) fn new_player(&self, user_id: UserId, state: PlayerState) -> Arc<Player> {
        Arc::new(Player::new(
            user_id,
            state,
            Arc::clone(&self.ports.notifier),
            self.battles.clone(),
        ))
    }

    /// Fire the shutdown signal, end every battle, wait for all tasks and
    /// write the final snapshot.
    pub async fn finalize(&self) -> Result<(), WorldError> {
        if !self.shutdown.fire() {
            return Err(WorldError::AlreadyShutDown);
        }
        tracing::info!("World shutting down");

        self.battles.stop_all().await;
        for player in self.players.all() {
            player.notify(SHUTTING_DOWN).await;
        }

        self.tasks.close();
        self.tasks.wait().await;

        let saved = self.save_players().await?;
        tracing::info!(players = saved, "World shut down");
        Ok(())
    }

    pub async fn save_players(&self) -> Result<usize, WorldError> {
        Ok(self.players.save_to(&self.snapshots).await?)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_fired()
    }

    pub fn graph(&self) -> &Arc<RoomGraph> {
        &self.graph
    }

    pub fn players(&self) -> &Arc<PlayerRegistry> {
        &self.players
    }

    pub fn battles(&self) -> &Arc<BattleEngine> {
        &self.battles
    }

    pub fn mob_count(&self) -> usize {
        self.graph.rooms().map(|room| room.mobs().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, SystemClock};
    use crate::infrastructure::kv_store::InMemoryKvStore;
    use crate::infrastructure::ports::{MockKvStorePort, StoreError};
    use crate::persistence::PlayerRecord;
    use crate::test_fixtures::{sample_assets, RecordingNotifier};
    use mudworld_domain::RoomId;
    use std::time::Duration;

    fn ports(kv: Arc<dyn KvStorePort>, notifier: Arc<RecordingNotifier>) -> WorldPorts {
        WorldPorts {
            kv,
            notifier,
            clock: Arc::new(SystemClock::new()),
            random: Arc::new(FixedRandom(1)),
        }
    }

    fn config() -> WorldConfig {
        WorldConfig {
            autosave_interval: Duration::from_secs(3600),
            ..WorldConfig::default()
        }
    }

    async fn seed(kv: &Arc<InMemoryKvStore>, players: &[(&str, &str)]) {
        let records: Vec<PlayerRecord> = players
            .iter()
            .map(|(id, room)| {
                PlayerRecord::capture(
                    &UserId::new(*id),
                    &PlayerState::new_character(*id, RoomId::new(*room)),
                )
            })
            .collect();
        PlayerSnapshotStore::new(kv.clone(), "players")
            .save(&records)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn init_restores_players_into_their_rooms() {
        let kv = Arc::new(InMemoryKvStore::new());
        seed(&kv, &[("alice", "forest_path"), ("bob", "gone_room")]).await;
        let notifier = Arc::new(RecordingNotifier::new());

        let world = World::init(config(), &sample_assets(), ports(kv, notifier.clone()))
            .await
            .unwrap();

        assert_eq!(world.players().len(), 2);
        assert_eq!(world.mob_count(), 2);
        let path = world.graph().get(&RoomId::new("forest_path")).unwrap();
        assert!(path.has_player(&UserId::new("alice")));
        assert!(world.graph().default_room().has_player(&UserId::new("bob")));
        assert!(notifier.received(&UserId::new("alice"), BACK_ONLINE));
        assert!(notifier.received(&UserId::new("bob"), BACK_ONLINE));

        world.finalize().await.unwrap();
    }

    #[tokio::test]
    async fn unreadable_snapshot_starts_empty() {
        let mut kv = MockKvStorePort::new();
        kv.expect_get()
            .returning(|_| Err(StoreError::backend("get", "offline")));
        kv.expect_set().returning(|_, _| Ok(()));

        let world = World::init(
            config(),
            &sample_assets(),
            ports(Arc::new(kv), Arc::new(RecordingNotifier::new())),
        )
        .await
        .unwrap();

        assert!(world.players().is_empty());
        world.finalize().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_snapshot_aborts_init() {
        let kv = InMemoryKvStore::new();
        kv.set("players", b"[{\"user_id\":".to_vec()).await.unwrap();

        let result = World::init(
            config(),
            &sample_assets(),
            ports(Arc::new(kv), Arc::new(RecordingNotifier::new())),
        )
        .await;

        assert!(matches!(
            result,
            Err(WorldError::Persistence(PersistenceError::Decode(_)))
        ));
    }

    #[tokio::test]
    async fn invalid_world_data_aborts_init() {
        let mut assets = sample_assets();
        assets.mobs.clear();

        let result = World::init(
            config(),
            &assets,
            ports(Arc::new(InMemoryKvStore::new()), Arc::new(RecordingNotifier::new())),
        )
        .await;

        assert!(matches!(result, Err(WorldError::Load(_))));
    }

    #[tokio::test]
    async fn finalize_notifies_saves_and_refuses_a_second_call() {
        let kv = Arc::new(InMemoryKvStore::new());
        seed(&kv, &[("alice", "midgaard_square")]).await;
        let notifier = Arc::new(RecordingNotifier::new());
        let world = World::init(config(), &sample_assets(), ports(kv.clone(), notifier.clone()))
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(5), world.finalize())
            .await
            .unwrap()
            .unwrap();

        assert!(world.is_shut_down());
        assert!(notifier.received(&UserId::new("alice"), SHUTTING_DOWN));
        let saved = PlayerSnapshotStore::new(kv, "players")
            .load()
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].current_room, RoomId::new("midgaard_square"));

        assert!(matches!(world.finalize().await, Err(WorldError::AlreadyShutDown)));
    }
}
