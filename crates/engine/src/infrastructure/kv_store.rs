//! Key-value store adapters.
//!
//! `FileKvStore` keeps one file per key under a data directory and replaces
//! it atomically on write. `InMemoryKvStore` is for tests and throwaway runs.

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::infrastructure::ports::{KvStorePort, StoreError};

/// Durable store backed by the filesystem.
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::backend("path", format!("invalid key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.bin")))
    }
}

#[async_trait]
impl KvStorePort for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::backend("get", e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::backend("set", e.to_string()))?;

        let tmp = path.with_extension("bin.tmp");
        tokio::fs::write(&tmp, &value)
            .await
            .map_err(|e| StoreError::backend("set", e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::backend("set", e.to_string()))?;

        tracing::debug!(key = %key, bytes = value.len(), "Stored value");
        Ok(())
    }
}

/// Volatile store.
#[derive(Default)]
pub struct InMemoryKvStore {
    entries: DashMap<String, Vec<u8>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStorePort for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
