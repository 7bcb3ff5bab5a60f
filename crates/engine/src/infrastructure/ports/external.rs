//! External service ports: message delivery, durable storage, world data.

use async_trait::async_trait;
use mudworld_domain::{MobTemplate, UserId};

use super::error::{AssetError, NotifyError, StoreError};
use super::types::AreaFile;

/// Delivers one line of text to one user. Best effort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn notify(&self, user_id: &UserId, message: &str) -> Result<(), NotifyError>;
}

/// Opaque blobs under string keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
}

/// Declarative world data: mob templates first, then areas.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn load_mob_templates(&self) -> Result<Vec<MobTemplate>, AssetError>;
    async fn load_areas(&self) -> Result<Vec<AreaFile>, AssetError>;
}
