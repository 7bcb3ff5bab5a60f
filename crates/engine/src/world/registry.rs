//! Live player table.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mudworld_domain::UserId;

use crate::entities::Player;
use crate::persistence::{PersistenceError, PlayerRecord, PlayerSnapshotStore};

/// Every player known to the world, online or not. Players are never removed.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: DashMap<UserId, Arc<Player>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &UserId) -> Option<Arc<Player>> {
        self.players.get(user_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Add `player` unless the user already has one, in which case the
    /// existing player is returned.
    pub fn insert(&self, player: Arc<Player>) -> Result<(), Arc<Player>> {
        match self.players.entry(player.user_id().clone()) {
            Entry::Occupied(existing) => Err(Arc::clone(existing.get())),
            Entry::Vacant(slot) => {
                slot.insert(player);
                Ok(())
            }
        }
    }

    /// Every player, ordered by user ID.
    pub fn all(&self) -> Vec<Arc<Player>> {
        let mut players: Vec<Arc<Player>> = self
            .players
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        players.sort_by(|a, b| a.user_id().cmp(b.user_id()));
        players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub async fn records(&self) -> Vec<PlayerRecord> {
        let mut records = Vec::with_capacity(self.players.len());
        for player in self.all() {
            records.push(PlayerRecord::capture(player.user_id(), &player.snapshot().await));
        }
        records
    }

    /// Write every player to `store`. Returns how many were saved.
    pub async fn save_to(&self, store: &PlayerSnapshotStore) -> Result<usize, PersistenceError> {
        let records = self.records().await;
        store.save(&records).await?;
        Ok(records.len())
    }
}
