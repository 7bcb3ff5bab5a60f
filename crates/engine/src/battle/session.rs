//! A single battle: two rosters and one turn loop.
//!
//! The roster lock is held for a whole turn, and joining goes through the
//! same lock, so a fighter added mid-turn waits for the turn to finish.
//! Lock order is roster first, then entity; no entity lock is held while
//! another is taken.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mudworld_domain::combat::damage;
use mudworld_domain::{BattleId, MobInstanceId, UserId, DROP_PROBABILITY_SCALE};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::entities::{Mob, Player, RoomGraph};
use crate::infrastructure::ports::{ClockPort, RandomPort};

/// Health a defeated player wakes up with.
pub const REVIVE_HP: i32 = 1;

/// What every battle needs from the surrounding world.
pub struct BattleContext {
    pub graph: Arc<RoomGraph>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
    pub tick: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Built, turn loop not started yet.
    Pending,
    Running,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Every player fell; mobs win silently.
    PlayersDefeated,
    /// Every mob fell.
    Victory,
    /// The battle had already been stopped.
    Stopped,
}

#[derive(Default)]
struct Roster {
    players: Vec<Arc<Player>>,
    mobs: Vec<Arc<Mob>>,
}

impl Roster {
    fn push_player(&mut self, player: &Arc<Player>) -> bool {
        if self.players.iter().any(|p| p.user_id() == player.user_id()) {
            return false;
        }
        self.players.push(Arc::clone(player));
        true
    }

    fn push_mob(&mut self, mob: &Arc<Mob>) -> bool {
        if self.mobs.iter().any(|m| m.id() == mob.id()) {
            return false;
        }
        self.mobs.push(Arc::clone(mob));
        true
    }
}

pub struct Battle {
    id: BattleId,
    roster: Mutex<Roster>,
    cancel: CancellationToken,
    started: AtomicBool,
    ctx: Arc<BattleContext>,
}

impl Battle {
    /// `cancel` should be a child of the world shutdown token.
    pub fn new(id: BattleId, cancel: CancellationToken, ctx: Arc<BattleContext>) -> Self {
        Self {
            id,
            roster: Mutex::new(Roster::default()),
            cancel,
            started: AtomicBool::new(false),
            ctx,
        }
    }

    /// Combine two battles into a fresh, pending one.
    ///
    /// The result holds `a`'s fighters in their order followed by whatever
    /// `b` adds, without duplicates. Both sources are stopped. A source that
    /// had already ended contributes nobody.
    pub async fn merge(
        a: Option<&Battle>,
        b: Option<&Battle>,
        id: BattleId,
        cancel: CancellationToken,
        ctx: Arc<BattleContext>,
    ) -> Battle {
        let mut roster = Roster::default();
        for source in [a, b].into_iter().flatten() {
            let theirs = source.roster.lock().await;
            if source.is_stopped() {
                continue;
            }
            source.stop();
            for player in &theirs.players {
                roster.push_player(player);
            }
            for mob in &theirs.mobs {
                roster.push_mob(mob);
            }
        }

        tracing::debug!(
            battle_id = %id,
            players = roster.players.len(),
            mobs = roster.mobs.len(),
            "Merged battles"
        );

        Self {
            id,
            roster: Mutex::new(roster),
            cancel,
            started: AtomicBool::new(false),
            ctx,
        }
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    pub fn phase(&self) -> BattlePhase {
        if self.cancel.is_cancelled() {
            BattlePhase::Ended
        } else if self.started.load(Ordering::SeqCst) {
            BattlePhase::Running
        } else {
            BattlePhase::Pending
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// End the battle. Stopping twice is harmless.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub async fn add_player(&self, player: Arc<Player>) {
        let mut roster = self.roster.lock().await;
        if roster.push_player(&player) {
            player.set_fighting(true).await;
        }
    }

    pub async fn add_mob(&self, mob: Arc<Mob>) {
        let mut roster = self.roster.lock().await;
        if roster.push_mob(&mob) {
            mob.set_fighting(true).await;
        }
    }

    pub async fn has_player(&self, user_id: &UserId) -> bool {
        self.roster
            .lock()
            .await
            .players
            .iter()
            .any(|p| p.user_id() == user_id)
    }

    pub async fn has_mob(&self, mob_id: MobInstanceId) -> bool {
        self.roster.lock().await.mobs.iter().any(|m| m.id() == mob_id)
    }

    pub async fn player_ids(&self) -> Vec<UserId> {
        self.roster
            .lock()
            .await
            .players
            .iter()
            .map(|p| p.user_id().clone())
            .collect()
    }

    pub async fn mob_ids(&self) -> Vec<MobInstanceId> {
        self.roster.lock().await.mobs.iter().map(|m| m.id()).collect()
    }

    /// Turn loop: resolve a turn, then wait one tick, until the battle ends
    /// or is cancelled.
    pub async fn run(self: Arc<Self>) {
        self.started.store(true, Ordering::SeqCst);
        tracing::info!(battle_id = %self.id, "Battle started");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let outcome = self.tick().await;
            if outcome != TickOutcome::Continue {
                tracing::info!(battle_id = %self.id, outcome = ?outcome, "Battle ended");
                self.stop();
                break;
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.ctx.tick) => {}
            }
        }

        tracing::debug!(battle_id = %self.id, "Battle loop exited");
    }

    /// Resolve one turn: all player attacks, then all mob attacks, one
    /// broadcast, then removal of the fallen.
    pub async fn tick(&self) -> TickOutcome {
        let mut roster = self.roster.lock().await;
        if self.cancel.is_cancelled() {
            return TickOutcome::Stopped;
        }

        let mut hits = Vec::new();
        let mut kills = Vec::new();

        for player in &roster.players {
            if !player.is_alive().await {
                continue;
            }
            let Some(mob) = first_living_mob(&roster.mobs).await else {
                break;
            };
            let name = player.name().await;
            let dealt = damage(player.attack().await, mob.defense().await);
            let left = mob.take_damage(dealt).await;
            hits.push(format!("{name} inflicted {dealt} damage to the {}.", mob.name()));
            if left <= 0 {
                kills.push(format!("{name} killed the {}!", mob.name()));
                self.reward(player, &name, mob, &mut kills).await;
            }
        }

        for mob in &roster.mobs {
            // Killed earlier this turn.
            if !mob.is_alive().await {
                continue;
            }
            let Some(player) = first_living_player(&roster.players).await else {
                break;
            };
            let name = player.name().await;
            let dealt = damage(mob.attack().await, player.defense().await);
            let left = player.take_damage(dealt).await;
            hits.push(format!("The {} inflicted {dealt} damage to {name}.", mob.name()));
            if left <= 0 {
                kills.push(format!("The {} killed {name}!", mob.name()));
            }
        }

        hits.append(&mut kills);
        if !hits.is_empty() {
            broadcast(&roster.players, &hits.join("\n")).await;
        }

        let mut standing = Vec::with_capacity(roster.players.len());
        for player in std::mem::take(&mut roster.players) {
            if player.is_alive().await {
                standing.push(player);
            } else {
                self.fall(&player).await;
            }
        }
        roster.players = standing;

        let now = self.ctx.clock.now();
        let mut alive = Vec::with_capacity(roster.mobs.len());
        for mob in std::mem::take(&mut roster.mobs) {
            if mob.is_alive().await {
                alive.push(mob);
            } else {
                mob.die(now).await;
            }
        }
        roster.mobs = alive;

        // A finished battle is stopped before the roster is released so it
        // can never be merged.
        if roster.players.is_empty() {
            self.stop();
            for mob in &roster.mobs {
                mob.set_fighting(false).await;
            }
            return TickOutcome::PlayersDefeated;
        }

        if roster.mobs.is_empty() {
            self.stop();
            for player in &roster.players {
                player.set_fighting(false).await;
            }
            broadcast(&roster.players, "You won!").await;
            return TickOutcome::Victory;
        }

        TickOutcome::Continue
    }

    async fn reward(&self, player: &Arc<Player>, name: &str, mob: &Mob, lines: &mut Vec<String>) {
        let experience = mob.experience();
        if experience > 0 {
            player.gain_experience(experience).await;
            lines.push(format!("{name} gained {experience} experience."));
        }
        for drop in mob.drops() {
            let roll = self.ctx.random.gen_range(1, DROP_PROBABILITY_SCALE);
            if drop.wins(roll) {
                player.add_item(drop.item.clone()).await;
                lines.push(format!("{name} found {}.", drop.item.name));
            }
        }
    }

    /// Carry a fallen player back to the default room.
    async fn fall(&self, player: &Arc<Player>) {
        player.revive(REVIVE_HP).await;
        let home = Arc::clone(self.ctx.graph.default_room());
        self.ctx.graph.teleport(player, &home).await;
        tracing::info!(battle_id = %self.id, user_id = %player.user_id(), "Player defeated");

        let view = home
            .show(player.user_id(), player.perception().await, false)
            .await;
        player
            .notify(&format!("You have been defeated. You wake up somewhere safe.\n\n{view}"))
            .await;
    }
}

async fn first_living_mob(mobs: &[Arc<Mob>]) -> Option<&Arc<Mob>> {
    for mob in mobs {
        if mob.is_alive().await {
            return Some(mob);
        }
    }
    None
}

async fn first_living_player(players: &[Arc<Player>]) -> Option<&Arc<Player>> {
    for player in players {
        if player.is_alive().await {
            return Some(player);
        }
    }
    None
}

async fn broadcast(players: &[Arc<Player>], message: &str) {
    for player in players {
        player.notify(message).await;
    }
}
