//! The list of active battles and how new fights join it.

use std::sync::Arc;

use async_trait::async_trait;
use mudworld_domain::{BattleId, UserId};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::session::{Battle, BattleContext};
use crate::entities::{BattleRequester, Mob, Player};

type ActiveBattles = Arc<Mutex<Vec<Arc<Battle>>>>;

/// Owns every running battle.
///
/// Starting a fight looks up the battle the player is already in and the
/// battle the mob is already in, merges both into a new battle with the new
/// pair added, retires the old ones and starts the merged turn loop. Each
/// battle removes itself from the active list when its loop exits.
pub struct BattleEngine {
    ctx: Arc<BattleContext>,
    active: ActiveBattles,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl BattleEngine {
    pub fn new(ctx: Arc<BattleContext>, shutdown: CancellationToken, tasks: TaskTracker) -> Self {
        Self {
            ctx,
            active: Arc::new(Mutex::new(Vec::new())),
            shutdown,
            tasks,
        }
    }

    pub async fn active(&self) -> Vec<Arc<Battle>> {
        self.active.lock().await.clone()
    }

    pub async fn active_count(&self) -> usize {
        self.active.lock().await.len()
    }

    pub async fn battle_of_player(&self, user_id: &UserId) -> Option<Arc<Battle>> {
        for battle in self.active.lock().await.iter() {
            if battle.has_player(user_id).await {
                return Some(Arc::clone(battle));
            }
        }
        None
    }

    /// Put `player` and `mob` in the same running battle.
    pub async fn engage(&self, player: Arc<Player>, mob: Arc<Mob>) -> Arc<Battle> {
        let mut active = self.active.lock().await;

        let mut player_side = None;
        let mut mob_side = None;
        for battle in active.iter().filter(|battle| !battle.is_stopped()) {
            if player_side.is_none() && battle.has_player(player.user_id()).await {
                player_side = Some(Arc::clone(battle));
            }
            if mob_side.is_none() && battle.has_mob(mob.id()).await {
                mob_side = Some(Arc::clone(battle));
            }
        }
        if let (Some(a), Some(b)) = (&player_side, &mob_side) {
            if a.id() == b.id() {
                mob_side = None;
            }
        }

        let merged = Arc::new(
            Battle::merge(
                player_side.as_deref(),
                mob_side.as_deref(),
                BattleId::new(),
                self.shutdown.child_token(),
                Arc::clone(&self.ctx),
            )
            .await,
        );
        merged.add_player(Arc::clone(&player)).await;
        merged.add_mob(Arc::clone(&mob)).await;

        active.retain(|battle| !battle.is_stopped());
        active.push(Arc::clone(&merged));
        drop(active);

        tracing::info!(
            battle_id = %merged.id(),
            user_id = %player.user_id(),
            mob_id = %mob.id(),
            merged_from_player = player_side.is_some(),
            merged_from_mob = mob_side.is_some(),
            "Battle engaged"
        );

        self.spawn(Arc::clone(&merged));
        merged
    }

    fn spawn(&self, battle: Arc<Battle>) {
        let active = Arc::clone(&self.active);
        self.tasks.spawn(async move {
            let id = battle.id();
            Arc::clone(&battle).run().await;
            active.lock().await.retain(|b| b.id() != id);
        });
    }

    /// Stop every battle and forget them.
    pub async fn stop_all(&self) {
        let mut active = self.active.lock().await;
        for battle in active.iter() {
            battle.stop();
        }
        active.clear();
    }
}

#[async_trait]
impl BattleRequester for BattleEngine {
    async fn request_battle(&self, player: Arc<Player>, mob: Arc<Mob>) {
        self.engage(player, mob).await;
    }
}
