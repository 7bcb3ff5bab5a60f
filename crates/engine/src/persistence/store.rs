//! Snapshot storage: every player in one blob under a single key.

use std::sync::Arc;

use super::codec::{decode, encode, PlayerRecord};
use super::PersistenceError;
use crate::infrastructure::ports::KvStorePort;

pub struct PlayerSnapshotStore {
    kv: Arc<dyn KvStorePort>,
    key: String,
}

impl PlayerSnapshotStore {
    pub fn new(kv: Arc<dyn KvStorePort>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub async fn save(&self, records: &[PlayerRecord]) -> Result<(), PersistenceError> {
        let bytes = encode(records)?;
        self.kv.set(&self.key, bytes).await?;
        tracing::info!(key = %self.key, players = records.len(), "Player snapshot saved");
        Ok(())
    }

    /// An absent snapshot is an empty one.
    pub async fn load(&self) -> Result<Vec<PlayerRecord>, PersistenceError> {
        let Some(bytes) = self.kv.get(&self.key).await? else {
            tracing::info!(key = %self.key, "No player snapshot found");
            return Ok(Vec::new());
        };
        let records = decode(&bytes)?;
        tracing::info!(key = %self.key, players = records.len(), "Player snapshot loaded");
        Ok(records)
    }
}
