//! Directory-backed world data.
//!
//! Layout under the assets root:
//! - `mobs/*.json`  - each file holds a JSON array of mob templates
//! - `areas/*.json` - each file holds one area with its rooms
//!
//! Files are read in path order so loading is deterministic.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mudworld_domain::MobTemplate;
use serde::de::DeserializeOwned;

use crate::infrastructure::ports::{AreaFile, AssetError, AssetSource};

pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn json_files(&self, subdir: &str) -> Result<Vec<PathBuf>, AssetError> {
        let dir = self.root.join(subdir);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %dir.display(), "Asset directory missing, nothing to load");
                return Ok(Vec::new());
            }
            Err(e) => return Err(AssetError::io(dir.display(), e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AssetError::io(dir.display(), e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AssetError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AssetError::io(path.display(), e))?;
        serde_json::from_slice(&bytes).map_err(|e| AssetError::malformed(path.display(), e))
    }
}

#[async_trait]
impl AssetSource for DirectoryAssetSource {
    async fn load_mob_templates(&self) -> Result<Vec<MobTemplate>, AssetError> {
        let mut templates = Vec::new();
        for path in self.json_files("mobs").await? {
            let mut batch: Vec<MobTemplate> = Self::read_json(&path).await?;
            tracing::debug!(path = %path.display(), count = batch.len(), "Loaded mob templates");
            templates.append(&mut batch);
        }
        Ok(templates)
    }

    async fn load_areas(&self) -> Result<Vec<AreaFile>, AssetError> {
        let mut areas = Vec::new();
        for path in self.json_files("areas").await? {
            let area: AreaFile = Self::read_json(&path).await?;
            tracing::debug!(path = %path.display(), area_id = %area.id, rooms = area.rooms.len(), "Loaded area");
            areas.push(area);
        }
        Ok(areas)
    }
}
